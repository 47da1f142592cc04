//! Message synchronization and pagination core for a small text display.
//!
//! [`reader::MessageReader`] owns the unseen-message queue and the page
//! cursor; [`runtime::run`] drives it from a single cooperative loop.

pub mod config;
pub mod debounce;
pub mod display;
pub mod error;
pub mod input;
pub mod paginator;
pub mod queue;
pub mod reader;
pub mod runtime;
pub mod store;
pub mod sync;
pub mod ticker;

pub use config::ReaderConfig;
pub use display::DisplayDriver;
pub use error::{ConfigError, DriverError, StoreError, SubmitError};
pub use input::{InputEvent, InputSignal, Signal};
pub use paginator::{fit_line, segment, LinesPerPage, Pages};
pub use queue::{Message, MessageQueue, RefreshOutcome};
pub use reader::MessageReader;
pub use store::{submit_text, HttpRemoteStore, RemoteStore};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
