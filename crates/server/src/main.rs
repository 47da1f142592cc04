use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::RowId,
    error::{ApiError, ErrorCode},
    protocol::{SubmitMessageRequest, SubmitMessageResponse, UnseenMessage},
};
use storage::Storage;
use tracing::{error, info};

mod api;
mod app_state;
mod config;

use api::{acknowledge, list_unseen, submit, ApiContext};
use app_state::AppState;
use config::{load_settings, prepare_database_url};

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    let unseen = storage.count_unseen().await?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, unseen, "message store listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("message store stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for ctrl-c");
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/messages", post(http_submit_message))
        .route("/messages/unseen", get(http_list_unseen))
        .route("/messages/:row_id/seen", post(http_mark_seen))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    state.api.storage.health_check().await.map_err(|e| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(ErrorCode::Internal, e.to_string())),
        )
    })?;
    Ok("ok")
}

async fn http_list_unseen(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UnseenMessage>>, HttpError> {
    list_unseen(&state.api)
        .await
        .map(Json)
        .map_err(|e| (status_for(&e), Json(e)))
}

async fn http_mark_seen(
    State(state): State<Arc<AppState>>,
    Path(row_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    acknowledge(&state.api, RowId(row_id))
        .await
        .map_err(|e| (status_for(&e), Json(e)))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn http_submit_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitMessageRequest>,
) -> Result<Json<SubmitMessageResponse>, HttpError> {
    submit(&state.api, &req.text)
        .await
        .map(Json)
        .map_err(|e| (status_for(&e), Json(e)))
}

fn status_for(error: &ApiError) -> StatusCode {
    match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => {
            error!(message = %error.message, "message store request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
