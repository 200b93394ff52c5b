use super::*;

#[test]
fn get_unknown_id_returns_none() {
    let tracker = Tracker::new();
    assert!(tracker.get("no-such-id").is_none());
}

#[test]
fn record_end_for_unknown_id_creates_nothing() {
    let tracker = Tracker::new();
    assert!(!tracker.record_end("stray", Instant::now()));
    assert!(tracker.is_empty());
}

#[test]
fn record_end_closes_entry_once() -> Result<(), String> {
    let tracker = Tracker::new();
    let start = Instant::now();
    tracker.record_start("abc", start);

    let first_end = start + Duration::from_millis(5);
    assert!(tracker.record_end("abc", first_end));
    assert!(!tracker.record_end("abc", first_end + Duration::from_millis(5)));

    let entry = tracker.get("abc").ok_or("entry missing")?;
    assert_eq!(entry.end, Some(first_end));
    assert_eq!(entry.latency(), Some(Duration::from_millis(5)));
    Ok(())
}

#[test]
fn snapshot_reflects_open_and_closed_entries() {
    let tracker = Tracker::new();
    let start = Instant::now();
    tracker.record_start("open", start);
    tracker.record_start("closed", start);
    tracker.record_end("closed", start + Duration::from_millis(1));

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.get("open").is_some_and(|entry| entry.end.is_none()));
    assert!(
        snapshot
            .get("closed")
            .is_some_and(|entry| entry.end.is_some())
    );
}

#[test]
fn concurrent_writers_do_not_lose_entries() -> Result<(), String> {
    let tracker = std::sync::Arc::new(Tracker::new());
    let mut handles = Vec::new();
    for shard in 0..8u32 {
        let tracker = tracker.clone();
        handles.push(std::thread::spawn(move || {
            for index in 0..50u32 {
                let id = format!("{}-{}", shard, index);
                tracker.record_start(&id, Instant::now());
                tracker.record_end(&id, Instant::now());
            }
        }));
    }
    for handle in handles {
        handle
            .join()
            .map_err(|_panicked| "writer thread panicked".to_owned())?;
    }
    assert_eq!(tracker.len(), 400);
    Ok(())
}
