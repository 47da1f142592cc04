use shared::{
    domain::{normalize_message_text, RowId},
    error::{ApiError, ErrorCode},
    protocol::{SubmitMessageResponse, UnseenMessage},
};
use storage::Storage;
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_unseen(ctx: &ApiContext) -> Result<Vec<UnseenMessage>, ApiError> {
    let rows = ctx
        .storage
        .list_unseen_messages()
        .await
        .map_err(internal)?;
    Ok(rows
        .into_iter()
        .map(|row| UnseenMessage {
            row_id: row.row_id,
            text: row.content,
            created_at: row.created_at,
        })
        .collect())
}

pub async fn acknowledge(ctx: &ApiContext, row_id: RowId) -> Result<(), ApiError> {
    let exists = ctx.storage.mark_seen(row_id).await.map_err(internal)?;
    if !exists {
        return Err(ApiError::new(
            ErrorCode::NotFound,
            format!("message {row_id} does not exist"),
        ));
    }
    info!(%row_id, "message acknowledged");
    Ok(())
}

pub async fn submit(ctx: &ApiContext, raw_text: &str) -> Result<SubmitMessageResponse, ApiError> {
    let text = normalize_message_text(raw_text)
        .map_err(|e| ApiError::new(ErrorCode::Validation, e.to_string()))?;
    let row_id = ctx.storage.insert_message(&text).await.map_err(internal)?;
    info!(%row_id, chars = text.chars().count(), "message submitted");
    Ok(SubmitMessageResponse { row_id })
}

fn internal(e: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, e.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
