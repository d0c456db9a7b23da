//! Occupancy model: how many minute buckets one job run covers

/// Seconds per occupied bucket.
///
/// One second short of a minute, absorbing the one-second lookback of the
/// firing check. Every derived span depends on this value.
pub const OCCUPANCY_DIVISOR_SECS: f64 = 59.0;

/// Number of buckets a firing occupies, starting at its firing bucket
///
/// `ceil(average_duration_secs / 59)`, never less than 1.
pub fn occupied_buckets(average_duration_secs: f64) -> usize {
    let buckets = (average_duration_secs / OCCUPANCY_DIVISOR_SECS).ceil();
    if buckets.is_nan() || buckets < 1.0 {
        1
    } else {
        buckets as usize
    }
}
