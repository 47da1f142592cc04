use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use client_core::{submit_text, InputSignal, RemoteStore, Signal};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// Button simulated from the console: each pending press is reported as one
/// active sample followed by one inactive sample.
#[derive(Debug, Default)]
pub struct StdinButton {
    pending: Arc<AtomicUsize>,
    held: bool,
}

impl StdinButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presses(&self) -> PressHandle {
        PressHandle(Arc::clone(&self.pending))
    }
}

impl InputSignal for StdinButton {
    fn read_signal(&mut self) -> Signal {
        if self.held {
            self.held = false;
            return Signal::Inactive;
        }
        let took = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok();
        self.held = took;
        Signal::from(took)
    }
}

#[derive(Debug, Clone)]
pub struct PressHandle(Arc<AtomicUsize>);

impl PressHandle {
    pub fn press(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Press,
    Send(&'a str),
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Command::Press;
    }
    match line.strip_prefix("/send") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => Command::Send(rest),
        _ => Command::Unknown(line),
    }
}

/// Reads console lines until EOF: an empty line presses the button and
/// `/send <text>` submits a new message to the store.
pub async fn run_console<R, S>(input: R, presses: PressHandle, store: Arc<S>)
where
    R: AsyncBufRead + Unpin,
    S: RemoteStore + ?Sized,
{
    let mut lines = input.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                warn!(%error, "console input failed");
                break;
            }
        };
        match parse_command(&line) {
            Command::Press => presses.press(),
            Command::Send(text) => match submit_text(store.as_ref(), text).await {
                Ok(row_id) => info!(%row_id, "message submitted"),
                Err(error) => warn!(%error, "message not submitted"),
            },
            Command::Unknown(other) => {
                warn!(input = other, "unknown command; press Enter or use /send <text>")
            }
        }
    }
    info!("console closed");
}
