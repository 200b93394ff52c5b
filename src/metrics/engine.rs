use std::time::Duration;

use tokio::time::Instant;

use crate::tracker::TrackerEntry;

use super::RunMetrics;

/// Computes latency statistics from a finalized tracker snapshot.
///
/// Entries that never received a callback are excluded. An empty or fully
/// unmatched snapshot yields a zeroed result; the same snapshot always
/// yields the same result.
#[must_use]
pub fn compute_metrics(entries: &[TrackerEntry], total_duration: Duration) -> RunMetrics {
    let completed: Vec<(Instant, Instant)> = entries
        .iter()
        .filter_map(|entry| entry.end.map(|end| (entry.start, end)))
        .collect();
    if completed.is_empty() {
        return RunMetrics::default();
    }

    let mut latencies: Vec<Duration> = completed
        .iter()
        .map(|(start, end)| end.saturating_duration_since(*start))
        .collect();
    latencies.sort_unstable();

    let count = latencies.len();
    let min = latencies.first().copied().unwrap_or_default();
    let max = latencies.last().copied().unwrap_or_default();

    let sum = latencies
        .iter()
        .fold(Duration::ZERO, |acc, latency| acc.saturating_add(*latency));
    let avg = sum
        .checked_div(u32::try_from(count).unwrap_or(u32::MAX))
        .unwrap_or_default();

    let median = median_of_sorted(&latencies);
    // floor(0.95 * count), no interpolation.
    let p95_index = count.saturating_mul(95) / 100;
    let p95 = latencies.get(p95_index).copied().unwrap_or(max);

    // Throughput window runs from the first dispatch to the last callback.
    let first_start = completed
        .iter()
        .map(|(start, _)| *start)
        .min()
        .unwrap_or_else(Instant::now);
    let last_end = completed
        .iter()
        .map(|(_, end)| *end)
        .max()
        .unwrap_or(first_start);
    let window = last_end.saturating_duration_since(first_start);

    RunMetrics {
        total_requests: count,
        total_duration,
        avg_response_time: avg,
        min_response_time: min,
        max_response_time: max,
        median_response_time: median,
        p95_response_time: p95,
        rps_x100: rate_x100(count, window),
    }
}

fn median_of_sorted(latencies: &[Duration]) -> Duration {
    let count = latencies.len();
    let upper = latencies.get(count / 2).copied().unwrap_or_default();
    if count % 2 == 0 {
        let lower = latencies
            .get((count / 2).saturating_sub(1))
            .copied()
            .unwrap_or_default();
        lower
            .checked_add(upper)
            .map_or(upper, |total| total / 2)
    } else {
        upper
    }
}

fn rate_x100(count: usize, window: Duration) -> u64 {
    let window_ms = window.as_millis();
    if window_ms == 0 {
        return 0;
    }
    let scaled = (count as u128).saturating_mul(100_000);
    u64::try_from(scaled / window_ms).unwrap_or(u64::MAX)
}
