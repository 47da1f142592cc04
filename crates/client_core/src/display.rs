use crate::error::DriverError;

/// Shown when there is nothing unseen.
pub const IDLE_PAGE: [&str; 2] = ["No messages", "right now!"];

/// Shown for a message whose text wraps to zero lines.
pub const BLANK_MESSAGE_PAGE: [&str; 1] = ["(blank message)"];

/// Output surface plus its ambient presence indicator (LED, chime, ...).
///
/// Calls are fire-and-forget from the loop's point of view: errors are
/// logged and the previous output stays up.
pub trait DisplayDriver {
    fn clear(&mut self) -> Result<(), DriverError>;

    /// `text` is already centered and truncated to the surface width.
    fn write_line(&mut self, row: usize, text: &str) -> Result<(), DriverError>;

    fn set_presence(&mut self, on: bool) -> Result<(), DriverError>;

    /// Called once on shutdown, after presence has been switched off.
    fn release(&mut self) -> Result<(), DriverError> {
        self.clear()
    }
}
