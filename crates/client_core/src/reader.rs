use shared::domain::RowId;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    config::ReaderConfig,
    display::{DisplayDriver, BLANK_MESSAGE_PAGE, IDLE_PAGE},
    error::{DriverError, StoreError},
    paginator::{fit_line, LinesPerPage, Pages},
    queue::{MessageQueue, RefreshOutcome},
    store::RemoteStore,
    sync::SyncScheduler,
};

pub struct MessageReader<S, D> {
    store: S,
    display: D,
    queue: MessageQueue,
    pages: Pages,
    /// Row the current `pages` were built from.
    paged_row: Option<RowId>,
    sync: SyncScheduler,
    line_width: usize,
    lines_per_page: LinesPerPage,
    presence: Option<bool>,
}

impl<S: RemoteStore, D: DisplayDriver> MessageReader<S, D> {
    pub fn new(store: S, display: D, config: &ReaderConfig) -> Self {
        Self {
            store,
            display,
            queue: MessageQueue::new(),
            pages: Pages::default(),
            paged_row: None,
            sync: SyncScheduler::new(config.poll_interval),
            line_width: config.line_width,
            lines_per_page: config.lines_per_page,
            presence: None,
        }
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn sync(&self) -> &SyncScheduler {
        &self.sync
    }

    pub fn presence(&self) -> bool {
        self.presence.unwrap_or(false)
    }

    pub async fn poll_sync(&mut self, now: Instant) -> Option<RefreshOutcome> {
        if !self.sync.is_due(now) {
            return None;
        }
        match self.refresh().await {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                warn!(%error, "scheduled refresh failed; keeping current messages");
                None
            }
        }
    }

    /// Refreshes are serialized by `&mut self`; the scheduler's permit only
    /// matters when a refresh future is dropped mid-flight.
    pub async fn refresh(&mut self) -> Result<RefreshOutcome, StoreError> {
        let Some(_permit) = self.sync.try_begin(Instant::now()) else {
            debug!("refresh already in flight; coalesced");
            return Ok(RefreshOutcome::default());
        };

        let fetched = self.store.fetch_unseen().await?;
        let outcome = self.queue.replace(fetched);
        self.sync_pages();
        self.update_presence();

        if outcome.added > 0 || outcome.became_empty {
            info!(
                added = outcome.added,
                unseen = self.queue.len(),
                became_empty = outcome.became_empty,
                "message queue refreshed"
            );
        }
        Ok(outcome)
    }

    /// A failed acknowledgement is logged and the cursor still moves; the
    /// row comes back on a later refresh.
    pub async fn advance(&mut self) {
        if let Some(message) = self.queue.current() {
            let row_id = message.row_id;
            match self.store.acknowledge(row_id).await {
                Ok(()) => debug!(%row_id, "message acknowledged"),
                Err(error) => warn!(
                    %row_id,
                    %error,
                    "acknowledge failed; message will be shown again after a refresh"
                ),
            }
            self.queue.advance_cursor();
        }

        self.pages.reset();
        self.sync_pages();

        if self.queue.is_exhausted() {
            self.sync.request_immediate();
            if let Err(error) = self.refresh().await {
                warn!(%error, "refresh after last message failed");
            }
        }
        self.update_presence();
    }

    pub fn show_next_page(&mut self) {
        self.update_presence();
        if let Err(error) = self.render_current_page() {
            warn!(%error, "display update failed; keeping previous output");
        }
        self.pages.advance();
    }

    pub fn shutdown(&mut self) {
        if self.presence != Some(false) {
            if let Err(error) = self.display.set_presence(false) {
                warn!(%error, "failed to switch presence off");
            }
            self.presence = Some(false);
        }
        if let Err(error) = self.display.release() {
            warn!(%error, "failed to release display");
        }
        info!("display released");
    }

    fn render_current_page(&mut self) -> Result<(), DriverError> {
        self.display.clear()?;

        let lines: Vec<&str> = if self.queue.current().is_none() {
            IDLE_PAGE.to_vec()
        } else if self.pages.is_empty() {
            BLANK_MESSAGE_PAGE.to_vec()
        } else {
            self.pages.current().iter().map(String::as_str).collect()
        };

        for (row, line) in lines.iter().enumerate() {
            self.display
                .write_line(row, &fit_line(line, self.line_width))?;
        }
        Ok(())
    }

    // Keeps the page position unless the current message changed.
    fn sync_pages(&mut self) {
        let current_row = self.queue.current().map(|m| m.row_id);
        if current_row == self.paged_row {
            return;
        }
        self.pages = match self.queue.current() {
            Some(message) => Pages::from_text(&message.text, self.line_width, self.lines_per_page),
            None => Pages::default(),
        };
        self.paged_row = current_row;
    }

    fn update_presence(&mut self) {
        let on = self.queue.current().is_some();
        if self.presence == Some(on) {
            return;
        }
        match self.display.set_presence(on) {
            Ok(()) => self.presence = Some(on),
            Err(error) => warn!(%error, on, "failed to update presence signal"),
        }
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
