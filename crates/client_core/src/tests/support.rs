//! In-memory collaborators shared by the reader and runtime tests.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::domain::RowId;

use crate::{
    display::DisplayDriver,
    error::{DriverError, StoreError},
    queue::Message,
    store::RemoteStore,
};

#[derive(Default)]
pub(crate) struct MemoryStoreState {
    pub(crate) rows: Vec<(RowId, String, bool)>,
    pub(crate) failing_acks: usize,
    pub(crate) fetch_down: bool,
    pub(crate) fetch_calls: usize,
    pub(crate) ack_calls: Vec<RowId>,
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    pub(crate) state: Arc<Mutex<MemoryStoreState>>,
}

impl MemoryStore {
    pub(crate) fn with_messages(texts: &[&str]) -> Self {
        let store = Self::default();
        for text in texts {
            store.push(text);
        }
        store
    }

    pub(crate) fn push(&self, text: &str) -> RowId {
        let mut state = self.state.lock().expect("store state");
        let row_id = RowId(state.rows.len() as i64 + 1);
        state.rows.push((row_id, text.to_string(), false));
        row_id
    }

    pub(crate) fn fail_next_acks(&self, count: usize) {
        self.state.lock().expect("store state").failing_acks = count;
    }

    pub(crate) fn set_fetch_down(&self, down: bool) {
        self.state.lock().expect("store state").fetch_down = down;
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.state.lock().expect("store state").fetch_calls
    }

    pub(crate) fn ack_calls(&self) -> Vec<RowId> {
        self.state.lock().expect("store state").ack_calls.clone()
    }

    pub(crate) fn unseen_ids(&self) -> Vec<RowId> {
        self.state
            .lock()
            .expect("store state")
            .rows
            .iter()
            .filter(|(_, _, seen)| !seen)
            .map(|(id, _, _)| *id)
            .collect()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn fetch_unseen(&self) -> Result<Vec<Message>, StoreError> {
        let mut state = self.state.lock().expect("store state");
        state.fetch_calls += 1;
        if state.fetch_down {
            return Err(StoreError::Transient("connection refused".into()));
        }
        Ok(state
            .rows
            .iter()
            .filter(|(_, _, seen)| !seen)
            .map(|(id, text, _)| Message::new(*id, text.clone()))
            .collect())
    }

    async fn acknowledge(&self, row_id: RowId) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store state");
        state.ack_calls.push(row_id);
        if state.failing_acks > 0 {
            state.failing_acks -= 1;
            return Err(StoreError::Transient("timed out".into()));
        }
        if let Some(row) = state.rows.iter_mut().find(|(id, _, _)| *id == row_id) {
            row.2 = true;
        }
        Ok(())
    }

    async fn submit(&self, text: &str) -> Result<RowId, StoreError> {
        Ok(self.push(text))
    }
}

#[derive(Default)]
pub(crate) struct RecordingDisplay {
    pub(crate) screen: BTreeMap<usize, String>,
    pub(crate) frames: Vec<Vec<String>>,
    pub(crate) presence_log: Vec<bool>,
    pub(crate) clears: usize,
    pub(crate) released: bool,
    pub(crate) broken: bool,
}

impl RecordingDisplay {
    /// Rows currently on screen with the centering padding removed.
    pub(crate) fn visible(&self) -> Vec<String> {
        self.screen.values().map(|line| line.trim().to_string()).collect()
    }

    pub(crate) fn presence(&self) -> Option<bool> {
        self.presence_log.last().copied()
    }

    fn snapshot(&mut self) {
        if !self.screen.is_empty() {
            let frame = self.visible();
            self.frames.push(frame);
        }
    }
}

impl DisplayDriver for RecordingDisplay {
    fn clear(&mut self) -> Result<(), DriverError> {
        if self.broken {
            return Err(DriverError::Unavailable("i2c nack".into()));
        }
        self.snapshot();
        self.screen.clear();
        self.clears += 1;
        Ok(())
    }

    fn write_line(&mut self, row: usize, text: &str) -> Result<(), DriverError> {
        if self.broken {
            return Err(DriverError::Unavailable("i2c nack".into()));
        }
        self.screen.insert(row, text.to_string());
        Ok(())
    }

    fn set_presence(&mut self, on: bool) -> Result<(), DriverError> {
        self.presence_log.push(on);
        Ok(())
    }

    fn release(&mut self) -> Result<(), DriverError> {
        self.snapshot();
        self.screen.clear();
        self.released = true;
        Ok(())
    }
}
