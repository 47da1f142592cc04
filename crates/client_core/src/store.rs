//! Remote message store contract and its HTTP client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{normalize_message_text, RowId},
    error::ApiError,
    protocol::{
        mark_seen_route, submit_message_route, unseen_messages_route, SubmitMessageRequest,
        SubmitMessageResponse, UnseenMessage,
    },
};
use tracing::debug;
use url::Url;

use crate::{
    config::parse_store_url,
    error::{ConfigError, StoreError, SubmitError},
    queue::Message,
};

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Rows whose seen flag is clear, in store order.
    async fn fetch_unseen(&self) -> Result<Vec<Message>, StoreError>;

    /// Sets the seen flag on one row. Safe to retry.
    async fn acknowledge(&self, row_id: RowId) -> Result<(), StoreError>;

    /// Appends a new unseen row.
    async fn submit(&self, text: &str) -> Result<RowId, StoreError>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    async fn fetch_unseen(&self) -> Result<Vec<Message>, StoreError> {
        (**self).fetch_unseen().await
    }

    async fn acknowledge(&self, row_id: RowId) -> Result<(), StoreError> {
        (**self).acknowledge(row_id).await
    }

    async fn submit(&self, text: &str) -> Result<RowId, StoreError> {
        (**self).submit(text).await
    }
}

/// Validates text from an entry surface and hands it to the store.
pub async fn submit_text<S: RemoteStore + ?Sized>(
    store: &S,
    raw_text: &str,
) -> Result<RowId, SubmitError> {
    let text = normalize_message_text(raw_text)?;
    Ok(store.submit(&text).await?)
}

pub struct HttpRemoteStore {
    http: Client,
    base_url: Url,
}

impl HttpRemoteStore {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = parse_store_url(base_url)?;
        let http = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}{route}", self.base_url.as_str().trim_end_matches('/'))
    }

    pub async fn fetch_unseen_rows(&self) -> Result<Vec<UnseenMessage>, StoreError> {
        let res = self
            .http
            .get(self.endpoint(unseen_messages_route()))
            .send()
            .await?;
        let rows: Vec<UnseenMessage> = check_status(res).await?.json().await?;
        debug!(count = rows.len(), "fetched unseen messages");
        Ok(rows)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch_unseen(&self) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .fetch_unseen_rows()
            .await?
            .into_iter()
            .map(|row| Message::new(row.row_id, row.text))
            .collect())
    }

    async fn acknowledge(&self, row_id: RowId) -> Result<(), StoreError> {
        let res = self
            .http
            .post(self.endpoint(&mark_seen_route(row_id)))
            .send()
            .await?;
        check_status(res).await?;
        Ok(())
    }

    async fn submit(&self, text: &str) -> Result<RowId, StoreError> {
        let res = self
            .http
            .post(self.endpoint(submit_message_route()))
            .json(&SubmitMessageRequest {
                text: text.to_string(),
            })
            .send()
            .await?;
        let body: SubmitMessageResponse = check_status(res).await?.json().await?;
        Ok(body.row_id)
    }
}

/// Maps non-success statuses to [`StoreError`], preferring the server's
/// `ApiError` message when the body carries one.
async fn check_status(res: Response) -> Result<Response, StoreError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    Err(status_error(status, message))
}

fn status_error(status: StatusCode, message: String) -> StoreError {
    if status.is_client_error() && status != StatusCode::REQUEST_TIMEOUT {
        StoreError::Rejected {
            status: status.as_u16(),
            message,
        }
    } else {
        StoreError::Transient(format!("{status}: {message}"))
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
