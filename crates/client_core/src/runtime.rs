//! The cooperative display loop.

use std::future::Future;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::{
    config::ReaderConfig,
    debounce::Debouncer,
    display::DisplayDriver,
    input::{InputEvent, InputSignal},
    reader::MessageReader,
    store::RemoteStore,
    ticker::PageTicker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub advanced: bool,
    pub paged: bool,
    pub synced: bool,
}

pub struct LoopState {
    debouncer: Debouncer,
    ticker: PageTicker,
}

impl LoopState {
    pub fn new(config: &ReaderConfig, now: Instant) -> Self {
        Self {
            debouncer: Debouncer::new(config.debounce_guard),
            ticker: PageTicker::new(config.page_period(), now),
        }
    }
}

/// One iteration, handlers in priority order: input, page ticker, sync.
pub async fn step<S, D, I>(
    reader: &mut MessageReader<S, D>,
    input: &mut I,
    state: &mut LoopState,
) -> StepReport
where
    S: RemoteStore,
    D: DisplayDriver,
    I: InputSignal + ?Sized,
{
    let mut report = StepReport::default();

    let now = Instant::now();
    if let Some(InputEvent::Advance) = state.debouncer.poll(input, now) {
        debug!("advance pressed");
        reader.advance().await;
        reader.show_next_page();
        state.ticker.reset(Instant::now());
        report.advanced = true;
    } else if state.ticker.is_due(now) {
        reader.show_next_page();
        state.ticker.reset(now);
        report.paged = true;
    }

    report.synced = reader.poll_sync(Instant::now()).await.is_some();
    report
}

/// Runs until `shutdown` resolves, then switches presence off and releases
/// the display.
pub async fn run<S, D, I, F>(
    reader: &mut MessageReader<S, D>,
    input: &mut I,
    config: &ReaderConfig,
    shutdown: F,
) where
    S: RemoteStore,
    D: DisplayDriver,
    I: InputSignal + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let started = tokio::select! {
        biased;
        () = &mut shutdown => false,
        () = start(reader) => true,
    };

    if started {
        let mut state = LoopState::new(config, Instant::now());
        info!(
            width = config.line_width,
            page_period_ms = config.page_period().as_millis() as u64,
            poll_interval_s = config.poll_interval.as_secs(),
            "display loop running"
        );
        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = step(reader, input, &mut state) => {}
            }
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = sleep(config.sample_period) => {}
            }
        }
    }

    info!("shutdown requested");
    reader.shutdown();
}

async fn start<S: RemoteStore, D: DisplayDriver>(reader: &mut MessageReader<S, D>) {
    if let Err(error) = reader.refresh().await {
        warn!(%error, "initial refresh failed; retrying on the poll interval");
    }
    reader.show_next_page();
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
