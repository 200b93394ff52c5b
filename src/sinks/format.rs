//! Plain-text report layout.

use std::time::Duration;

use crate::metrics::RunMetrics;
use crate::wait::WaitOutcome;

const LABEL_WIDTH: usize = 30;

/// Renders the end-of-run report as aligned label/value lines.
///
/// A timed-out run is labeled as partial, with the matched/fired counts,
/// so a truncated result can never be mistaken for a clean one.
#[must_use]
pub fn render_report(
    name: &str,
    metrics: &RunMetrics,
    outcome: &WaitOutcome,
    fired: u64,
) -> String {
    let mut lines = vec![
        format!("Test Results: {}", name),
        "=".repeat(40),
        line("Status", &status_value(outcome, fired)),
        line("Total Requests", &metrics.total_requests.to_string()),
        line("Total Duration", &format_duration(metrics.total_duration)),
        line(
            "Average Response Time",
            &format_duration(metrics.avg_response_time),
        ),
        line(
            "Minimum Response Time",
            &format_duration(metrics.min_response_time),
        ),
        line(
            "Maximum Response Time",
            &format_duration(metrics.max_response_time),
        ),
        line(
            "Median Response Time",
            &format_duration(metrics.median_response_time),
        ),
        line(
            "95th Percentile Response Time",
            &format_duration(metrics.p95_response_time),
        ),
        line("Requests Per Second", &format_rate(metrics.rps_x100)),
    ];
    lines.push(String::new());
    lines.join("\n")
}

fn line(label: &str, value: &str) -> String {
    format!("{:<width$}: {}", label, value, width = LABEL_WIDTH)
}

fn status_value(outcome: &WaitOutcome, fired: u64) -> String {
    match outcome {
        WaitOutcome::Complete => "complete".to_owned(),
        WaitOutcome::TimedOut { completed } => format!(
            "timed out ({} of {} callbacks received)",
            completed, fired
        ),
    }
}

/// Sub-second values in whole milliseconds, longer ones in centisecond
/// precision seconds. Integer math throughout.
fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        let secs = millis / 1000;
        let centis = (millis % 1000) / 10;
        format!("{}.{:02}s", secs, centis)
    }
}

fn format_rate(rps_x100: u64) -> String {
    format!("{}.{:02}", rps_x100 / 100, rps_x100 % 100)
}
