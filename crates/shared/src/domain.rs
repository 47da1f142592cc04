use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RowId);

/// Longest message body the store accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 280;

/// Trims a submitted message body and checks it against the store limits.
pub fn normalize_message_text(raw: &str) -> Result<String, MessageTextError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(MessageTextError::Empty);
    }
    let chars = text.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(MessageTextError::TooLong {
            max: MAX_MESSAGE_CHARS,
            actual: chars,
        });
    }
    Ok(text.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageTextError {
    #[error("message text must not be empty")]
    Empty,
    #[error("message text is {actual} characters; the limit is {max}")]
    TooLong { max: usize, actual: usize },
}
