//! Simulation grid: one running-count bucket per simulated minute

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Width of one bucket in seconds
pub const BUCKET_SECS: i64 = 60;

/// One simulated minute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Position in the grid, 0-based and chronological
    pub index: usize,
    /// Minute boundary this bucket starts at
    pub instant: DateTime<Utc>,
    /// Number of jobs running during this minute
    pub running_count: u32,
}

/// Ordered, contiguous minute buckets covering the simulated window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    buckets: Vec<Bucket>,
}

impl Grid {
    /// Build a zeroed grid with one bucket per whole minute boundary in
    /// `[window_start, window_start + window_secs)`
    ///
    /// `window_start` is taken at whole-second precision.
    pub fn build(window_start: DateTime<Utc>, window_secs: u64) -> Self {
        let start = window_start.timestamp();
        let end = start.saturating_add(i64::try_from(window_secs).unwrap_or(i64::MAX));
        let first = start.div_euclid(BUCKET_SECS) * BUCKET_SECS
            + if start.rem_euclid(BUCKET_SECS) == 0 { 0 } else { BUCKET_SECS };

        let capacity = usize::try_from(window_secs / BUCKET_SECS as u64).unwrap_or(0) + 1;
        let mut buckets = Vec::with_capacity(capacity);
        let mut timestamp = first;
        while timestamp < end {
            let Some(instant) = DateTime::from_timestamp(timestamp, 0) else {
                break;
            };
            buckets.push(Bucket {
                index: buckets.len(),
                instant,
                running_count: 0,
            });
            timestamp += BUCKET_SECS;
        }

        debug!(
            "Built grid of {} buckets from {} ({}s window)",
            buckets.len(),
            window_start,
            window_secs
        );
        Self { buckets }
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the grid has no buckets
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// All buckets in chronological order
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Bucket at `index`
    pub fn bucket(&self, index: usize) -> Option<&Bucket> {
        self.buckets.get(index)
    }

    /// Instant of the bucket at `index`
    pub fn instant(&self, index: usize) -> Option<DateTime<Utc>> {
        self.buckets.get(index).map(|bucket| bucket.instant)
    }

    /// Running counts in chronological order
    pub fn counts(&self) -> Vec<u32> {
        self.buckets.iter().map(|bucket| bucket.running_count).collect()
    }

    /// Consume the grid, yielding its buckets
    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }

    /// Count one firing at `index` occupying `span` buckets
    ///
    /// Buckets past the end of the grid are dropped; occupancy never wraps.
    pub fn record_firing(&mut self, index: usize, span: usize) {
        let end = index.saturating_add(span.max(1)).min(self.buckets.len());
        if let Some(run) = self.buckets.get_mut(index..end) {
            for bucket in run {
                bucket.running_count = bucket.running_count.saturating_add(1);
            }
        }
    }

    /// Same buckets with every count reset to zero
    pub fn blank_copy(&self) -> Self {
        Self {
            buckets: self
                .buckets
                .iter()
                .map(|bucket| Bucket {
                    running_count: 0,
                    ..bucket.clone()
                })
                .collect(),
        }
    }

    /// Add another grid's counts into this one, bucket by bucket
    pub fn merge(&mut self, other: &Grid) {
        debug_assert_eq!(self.len(), other.len());
        for (bucket, contribution) in self.buckets.iter_mut().zip(&other.buckets) {
            bucket.running_count = bucket.running_count.saturating_add(contribution.running_count);
        }
    }

    /// Bucket with the highest count; the earliest one wins ties
    pub fn peak(&self) -> Option<&Bucket> {
        self.buckets.iter().fold(None, |best: Option<&Bucket>, bucket| match best {
            Some(current) if current.running_count >= bucket.running_count => Some(current),
            _ => Some(bucket),
        })
    }
}
