use std::time::Duration;

use tokio::time::Instant;

use crate::tracker::TrackerEntry;

use super::compute_metrics;

fn entries_with_latencies_ms(base: Instant, latencies_ms: &[u64]) -> Vec<TrackerEntry> {
    latencies_ms
        .iter()
        .enumerate()
        .map(|(index, ms)| {
            let start = base + Duration::from_millis(index as u64 * 10);
            TrackerEntry {
                start,
                end: Some(start + Duration::from_millis(*ms)),
            }
        })
        .collect()
}

#[test]
fn empty_snapshot_yields_zeroed_result() {
    let metrics = compute_metrics(&[], Duration::from_secs(5));
    assert_eq!(metrics.total_requests, 0);
    assert_eq!(metrics.avg_response_time, Duration::ZERO);
    assert_eq!(metrics.rps_x100, 0);
}

#[test]
fn unmatched_entries_are_excluded() {
    let base = Instant::now();
    let mut entries = entries_with_latencies_ms(base, &[10, 20]);
    entries.push(TrackerEntry {
        start: base,
        end: None,
    });

    let metrics = compute_metrics(&entries, Duration::from_secs(1));
    assert_eq!(metrics.total_requests, 2);
}

#[test]
fn fully_unmatched_snapshot_yields_zeroed_result() {
    let base = Instant::now();
    let entries = vec![
        TrackerEntry {
            start: base,
            end: None,
        };
        4
    ];
    assert_eq!(
        compute_metrics(&entries, Duration::from_secs(1)),
        super::RunMetrics::default()
    );
}

#[test]
fn computes_min_max_avg_for_known_latencies() {
    let base = Instant::now();
    let entries = entries_with_latencies_ms(base, &[10, 20, 30, 40]);

    let metrics = compute_metrics(&entries, Duration::from_secs(1));
    assert_eq!(metrics.min_response_time, Duration::from_millis(10));
    assert_eq!(metrics.max_response_time, Duration::from_millis(40));
    assert_eq!(metrics.avg_response_time, Duration::from_millis(25));
}

#[test]
fn median_averages_the_two_middle_elements_for_even_counts() {
    let base = Instant::now();
    let even = entries_with_latencies_ms(base, &[10, 20, 30, 40]);
    assert_eq!(
        compute_metrics(&even, Duration::from_secs(1)).median_response_time,
        Duration::from_millis(25)
    );

    let odd = entries_with_latencies_ms(base, &[10, 20, 30]);
    assert_eq!(
        compute_metrics(&odd, Duration::from_secs(1)).median_response_time,
        Duration::from_millis(20)
    );
}

#[test]
fn p95_uses_floor_index_without_interpolation() {
    let base = Instant::now();
    let latencies: Vec<u64> = (1..=20).map(|step| step * 10).collect();
    let entries = entries_with_latencies_ms(base, &latencies);

    // floor(0.95 * 20) = 19 -> last element of the sorted list.
    let metrics = compute_metrics(&entries, Duration::from_secs(1));
    assert_eq!(metrics.p95_response_time, Duration::from_millis(200));
}

#[test]
fn percentile_ordering_law_holds() {
    let base = Instant::now();
    let samples: [&[u64]; 3] = [&[5], &[120, 3, 77, 9, 240], &[1, 1, 1, 1000]];
    for latencies in samples {
        let metrics = compute_metrics(
            &entries_with_latencies_ms(base, latencies),
            Duration::from_secs(1),
        );
        assert!(metrics.min_response_time <= metrics.median_response_time);
        assert!(metrics.median_response_time <= metrics.max_response_time);
        assert!(metrics.p95_response_time >= metrics.median_response_time);
    }
}

#[test]
fn compute_is_idempotent_over_the_same_snapshot() {
    let base = Instant::now();
    let entries = entries_with_latencies_ms(base, &[15, 44, 9, 300, 72]);
    let first = compute_metrics(&entries, Duration::from_secs(2));
    let second = compute_metrics(&entries, Duration::from_secs(2));
    assert_eq!(first, second);
}

#[test]
fn throughput_spans_first_start_to_last_end() {
    let base = Instant::now();
    // Two requests, 1s apart, each 500ms latency: window = 1.5s, 2/1.5 rps.
    let entries = vec![
        TrackerEntry {
            start: base,
            end: Some(base + Duration::from_millis(500)),
        },
        TrackerEntry {
            start: base + Duration::from_secs(1),
            end: Some(base + Duration::from_millis(1500)),
        },
    ];
    let metrics = compute_metrics(&entries, Duration::from_secs(2));
    assert_eq!(metrics.rps_x100, 133);
}
