use axum::http::StatusCode;

/// Handler for `GET /healthz`: liveness only. Readiness probes a backing
/// store, so each service carries its own `readyz` handler.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
