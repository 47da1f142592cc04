use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RowId;

pub fn unseen_messages_route() -> &'static str {
    "/messages/unseen"
}

pub fn submit_message_route() -> &'static str {
    "/messages"
}

pub fn mark_seen_route(row_id: RowId) -> String {
    format!("/messages/{}/seen", row_id.0)
}

/// One row of the store whose seen flag is still clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnseenMessage {
    pub row_id: RowId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitMessageRequest {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubmitMessageResponse {
    pub row_id: RowId,
}
