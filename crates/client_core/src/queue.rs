//! The set of unseen messages and the read cursor into it.

use shared::domain::RowId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub row_id: RowId,
    pub text: String,
}

impl Message {
    pub fn new(row_id: RowId, text: impl Into<String>) -> Self {
        Self {
            row_id,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshOutcome {
    pub added: usize,
    /// The queue held messages before the refresh and holds none after.
    pub became_empty: bool,
}

/// Invariant: `cursor <= items.len()`. A cursor equal to the length means
/// every fetched message has been read and the queue needs a refill.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageQueue {
    items: Vec<Message>,
    cursor: usize,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Message] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub fn current(&self) -> Option<&Message> {
        self.items.get(self.cursor)
    }

    pub fn advance_cursor(&mut self) -> bool {
        if self.cursor < self.items.len() {
            self.cursor += 1;
        }
        self.is_exhausted()
    }

    /// The cursor follows the row it pointed at when that row is still
    /// unseen. An exhausted queue restarts at the front. Otherwise the
    /// cursor is clamped to the last message (or 0 when empty).
    pub fn replace(&mut self, fetched: Vec<Message>) -> RefreshOutcome {
        let was_empty = self.items.is_empty();
        let added = fetched
            .iter()
            .filter(|m| !self.items.iter().any(|old| old.row_id == m.row_id))
            .count();

        let followed = self
            .current()
            .and_then(|current| fetched.iter().position(|m| m.row_id == current.row_id));
        let cursor = match followed {
            Some(index) => index,
            None if self.is_exhausted() || fetched.is_empty() => 0,
            None => self.cursor.min(fetched.len() - 1),
        };

        self.items = fetched;
        self.cursor = cursor;

        RefreshOutcome {
            added,
            became_empty: !was_empty && self.items.is_empty(),
        }
    }
}
