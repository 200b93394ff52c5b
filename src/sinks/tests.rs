use std::time::Duration;

use crate::config::types::{OutputConfig, OutputKind};
use crate::metrics::RunMetrics;
use crate::wait::WaitOutcome;

use super::{render_report, write_outputs};

fn sample_metrics() -> RunMetrics {
    RunMetrics {
        total_requests: 10,
        total_duration: Duration::from_millis(5250),
        avg_response_time: Duration::from_millis(120),
        min_response_time: Duration::from_millis(80),
        max_response_time: Duration::from_millis(1340),
        median_response_time: Duration::from_millis(110),
        p95_response_time: Duration::from_millis(900),
        rps_x100: 190,
    }
}

#[test]
fn report_lines_are_aligned_and_integer_formatted() {
    let report = render_report("demo", &sample_metrics(), &WaitOutcome::Complete, 10);

    assert!(report.starts_with("Test Results: demo\n"));
    assert!(report.contains("Status                        : complete\n"));
    assert!(report.contains("Total Requests                : 10\n"));
    assert!(report.contains("Total Duration                : 5.25s\n"));
    assert!(report.contains("Average Response Time         : 120ms\n"));
    assert!(report.contains("Minimum Response Time         : 80ms\n"));
    assert!(report.contains("Maximum Response Time         : 1.34s\n"));
    assert!(report.contains("Median Response Time          : 110ms\n"));
    assert!(report.contains("95th Percentile Response Time : 900ms\n"));
    assert!(report.contains("Requests Per Second           : 1.90\n"));
}

#[test]
fn timed_out_report_cannot_pass_for_a_clean_one() {
    let outcome = WaitOutcome::TimedOut { completed: 7 };
    let report = render_report("demo", &sample_metrics(), &outcome, 10);
    assert!(report.contains("Status                        : timed out (7 of 10 callbacks received)"));
    assert!(!report.contains(": complete"));
}

#[test]
fn zeroed_metrics_render_without_surprises() {
    let report = render_report("empty", &RunMetrics::default(), &WaitOutcome::TimedOut { completed: 0 }, 3);
    assert!(report.contains("Total Requests                : 0"));
    assert!(report.contains("Requests Per Second           : 0.00"));
    assert!(report.contains("Average Response Time         : 0ms"));
}

#[tokio::test]
async fn text_output_writes_the_file_and_creates_parents() -> Result<(), String> {
    let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("nested").join("report.txt");
    let outputs = vec![OutputConfig {
        kind: OutputKind::Text,
        path: Some(path.to_string_lossy().into_owned()),
    }];

    let report = render_report("demo", &sample_metrics(), &WaitOutcome::Complete, 10);
    write_outputs(&outputs, &report)
        .await
        .map_err(|err| format!("write failed: {}", err))?;

    let written = std::fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;
    assert_eq!(written, report);
    Ok(())
}

#[tokio::test]
async fn unwritable_text_output_surfaces_an_error() -> Result<(), String> {
    let outputs = vec![OutputConfig {
        kind: OutputKind::Text,
        path: Some("/proc/definitely-not-writable/report.txt".to_owned()),
    }];
    match write_outputs(&outputs, "report").await {
        Err(_err) => Ok(()),
        Ok(()) => Err("expected a sink error".to_owned()),
    }
}
