use std::time::Duration;

/// Aggregated latency statistics for one run.
///
/// Only requests whose callback arrived contribute; unmatched requests lower
/// the effective sample count instead of poisoning the percentiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    pub total_requests: usize,
    pub total_duration: Duration,
    pub avg_response_time: Duration,
    pub min_response_time: Duration,
    pub max_response_time: Duration,
    pub median_response_time: Duration,
    pub p95_response_time: Duration,
    /// Requests per second over the first-start..last-end window, x100 fixed
    /// point.
    pub rps_x100: u64,
}
