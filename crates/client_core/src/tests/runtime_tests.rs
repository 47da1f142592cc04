use super::*;
use std::time::Duration;

use shared::domain::RowId;

use crate::{
    input::Signal,
    test_support::{MemoryStore, RecordingDisplay},
};

/// Button held down during the given windows, measured from creation.
struct ScriptedButton {
    origin: Instant,
    presses: Vec<(Duration, Duration)>,
    reads: usize,
}

impl ScriptedButton {
    fn new(presses: &[(u64, u64)]) -> Self {
        Self {
            origin: Instant::now(),
            presses: presses
                .iter()
                .map(|(from, to)| (Duration::from_millis(*from), Duration::from_millis(*to)))
                .collect(),
            reads: 0,
        }
    }

    fn idle() -> Self {
        Self::new(&[])
    }
}

impl InputSignal for ScriptedButton {
    fn read_signal(&mut self) -> Signal {
        self.reads += 1;
        let elapsed = Instant::now() - self.origin;
        Signal::from(
            self.presses
                .iter()
                .any(|(from, to)| elapsed >= *from && elapsed < *to),
        )
    }
}

fn lines(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn pages_rotate_on_the_ticker_and_loop() {
    let config = ReaderConfig::default();
    let store = MemoryStore::with_messages(&["Hello world this is a long message"]);
    let mut reader = MessageReader::new(store.clone(), RecordingDisplay::default(), &config);
    let mut button = ScriptedButton::idle();

    run(
        &mut reader,
        &mut button,
        &config,
        sleep(Duration::from_secs(6)),
    )
    .await;

    let first = lines(&["Hello world this", "is a long"]);
    let second = lines(&["message"]);
    assert_eq!(
        reader.display().frames,
        vec![first.clone(), second, first]
    );
    assert_eq!(store.fetch_calls(), 1);
    assert!(store.ack_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn held_press_advances_exactly_once() {
    let config = ReaderConfig::default();
    let store = MemoryStore::with_messages(&["first message", "second"]);
    let mut reader = MessageReader::new(store.clone(), RecordingDisplay::default(), &config);
    let mut button = ScriptedButton::new(&[(1_000, 1_700)]);

    run(
        &mut reader,
        &mut button,
        &config,
        sleep(Duration::from_secs(2)),
    )
    .await;

    assert_eq!(store.ack_calls(), vec![RowId(1)]);
    assert_eq!(
        reader.display().frames.last(),
        Some(&lines(&["second"]))
    );
}

#[tokio::test(start_paused = true)]
async fn manual_advance_resets_page_ticker_phase() {
    let config = ReaderConfig::default();
    let store = MemoryStore::with_messages(&[
        "Hello world this is a long message",
        "Another fairly long message for paging",
    ]);
    let mut reader = MessageReader::new(store.clone(), RecordingDisplay::default(), &config);
    let mut button = ScriptedButton::new(&[(2_000, 2_100)]);

    run(
        &mut reader,
        &mut button,
        &config,
        sleep(Duration::from_secs(4)),
    )
    .await;

    assert_eq!(
        reader.display().frames,
        vec![
            lines(&["Hello world this", "is a long"]),
            lines(&["Another fairly", "long message for"]),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn input_is_not_sampled_during_debounce_guard() {
    let config = ReaderConfig::default();
    let store = MemoryStore::with_messages(&["a", "b", "c"]);
    let mut reader = MessageReader::new(store.clone(), RecordingDisplay::default(), &config);
    reader.refresh().await.expect("refresh");
    let mut state = LoopState::new(&config, Instant::now());
    let mut button = ScriptedButton::new(&[(0, 10_000)]);

    let report = step(&mut reader, &mut button, &mut state).await;
    assert!(report.advanced);
    assert_eq!(button.reads, 1);

    for _ in 0..5 {
        tokio::time::advance(config.sample_period).await;
        let report = step(&mut reader, &mut button, &mut state).await;
        assert!(!report.advanced);
    }
    assert_eq!(button.reads, 1);

    tokio::time::advance(config.sample_period).await;
    let report = step(&mut reader, &mut button, &mut state).await;
    assert!(!report.advanced, "still held after the guard");
    assert_eq!(button.reads, 2);
    assert_eq!(store.ack_calls(), vec![RowId(1)]);
}

#[tokio::test(start_paused = true)]
async fn step_polls_store_when_interval_elapses() {
    let config = ReaderConfig::default();
    let store = MemoryStore::default();
    let mut reader = MessageReader::new(store.clone(), RecordingDisplay::default(), &config);
    reader.refresh().await.expect("refresh");
    let mut state = LoopState::new(&config, Instant::now());
    let mut button = ScriptedButton::idle();

    store.push("new note");
    tokio::time::advance(config.poll_interval).await;
    let report = step(&mut reader, &mut button, &mut state).await;

    assert!(report.synced);
    assert!(report.paged);
    assert!(reader.presence());
}

#[tokio::test(start_paused = true)]
async fn unreachable_store_at_startup_shows_idle_page() {
    let config = ReaderConfig::default();
    let store = MemoryStore::with_messages(&["waiting"]);
    store.set_fetch_down(true);
    let mut reader = MessageReader::new(store.clone(), RecordingDisplay::default(), &config);
    let mut button = ScriptedButton::idle();

    run(
        &mut reader,
        &mut button,
        &config,
        sleep(Duration::from_secs(1)),
    )
    .await;

    assert_eq!(
        reader.display().frames,
        vec![lines(&["No messages", "right now!"])]
    );
    assert_eq!(reader.display().presence_log, vec![false]);
    assert!(reader.display().released);
}

#[tokio::test(start_paused = true)]
async fn immediate_shutdown_still_releases_display() {
    let config = ReaderConfig::default();
    let store = MemoryStore::with_messages(&["never shown"]);
    let mut reader = MessageReader::new(store.clone(), RecordingDisplay::default(), &config);
    let mut button = ScriptedButton::idle();

    run(&mut reader, &mut button, &config, std::future::ready(())).await;

    assert_eq!(store.fetch_calls(), 0);
    assert_eq!(reader.display().presence(), Some(false));
    assert!(reader.display().released);
}
