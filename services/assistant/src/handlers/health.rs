use axum::{extract::State, http::StatusCode};

use crate::error::AssistantError;
use crate::state::AppState;

/// Handler for `GET /readyz`: ready once Redis answers a ping.
pub async fn readyz(State(state): State<AppState>) -> Result<StatusCode, AssistantError> {
    let mut conn = state
        .redis
        .get()
        .await
        .map_err(|e| AssistantError::Internal(e.into()))?;
    let (): () = deadpool_redis::redis::cmd("PING")
        .query_async(&mut conn)
        .await
        .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
    Ok(StatusCode::OK)
}
