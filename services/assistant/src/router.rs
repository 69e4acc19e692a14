use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use edutec_core::health::healthz;
use edutec_core::middleware::request_id_layer;

use crate::handlers::{
    assistant::{ask, generate_password, verify_email_code},
    health::readyz,
    login::login,
    register::register,
    reset::{forgot_password, reset_password, validate_reset_token},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Credential issuance
        .route("/generate-password", post(generate_password))
        .route("/verify-email-code", post(verify_email_code))
        // Conversation
        .route("/ask", post(ask))
        // Accounts
        .route("/login", post(login))
        .route("/register", post(register))
        // Reset flow
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/validate", get(validate_reset_token))
        .route("/reset-password", post(reset_password))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
