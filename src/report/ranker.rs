//! Ranking of buckets by running count

use crate::simulation::{Bucket, Grid};

/// Buckets ordered by running count, highest first
///
/// Buckets with equal counts keep their chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedReport {
    buckets: Vec<Bucket>,
}

/// Rank the buckets of an aggregated grid
pub fn rank(grid: &Grid) -> RankedReport {
    let mut buckets = grid.buckets().to_vec();
    // `sort_by` is stable, which gives the chronological tie-break
    buckets.sort_by(|a, b| b.running_count.cmp(&a.running_count));
    RankedReport { buckets }
}

impl RankedReport {
    /// Full ranked sequence
    pub fn all(&self) -> &[Bucket] {
        &self.buckets
    }

    /// First `n` ranked buckets (fewer if the grid is smaller)
    pub fn top(&self, n: usize) -> &[Bucket] {
        &self.buckets[..n.min(self.buckets.len())]
    }

    /// Highest-count bucket, earliest on ties
    pub fn peak(&self) -> Option<&Bucket> {
        self.buckets.first()
    }

    /// Number of ranked buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether there is nothing to rank
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl From<&Grid> for RankedReport {
    fn from(grid: &Grid) -> Self {
        rank(grid)
    }
}
