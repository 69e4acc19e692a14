use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;
use crate::state::AppState;
use crate::usecase::reset::{
    ForgotPasswordUseCase, ResetPasswordInput, ResetPasswordUseCase, ValidateResetTokenUseCase,
};

use super::required;

pub const REPLY_RESET_SENT: &str = "If that address has an account, I've emailed it a reset \
    link. The link expires in 60 minutes.";

pub const REPLY_RESET_DONE: &str =
    "Your password has been updated. You can sign in with it now.";

// ── POST /forgot-password ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub reply: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AssistantError> {
    let email = required(body.email, "email")?;
    let usecase = ForgotPasswordUseCase {
        accounts: state.accounts(),
        tokens: state.reset_tokens(),
        mailer: state.mailer(),
        frontend_url: state.frontend_url.clone(),
    };
    usecase.execute(email).await?;
    Ok(Json(ForgotPasswordResponse {
        success: true,
        reply: REPLY_RESET_SENT.to_owned(),
    }))
}

// ── GET /reset-password/validate ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ValidateResetQuery {
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct ValidateResetResponse {
    pub valid: bool,
}

pub async fn validate_reset_token(
    State(state): State<AppState>,
    Query(query): Query<ValidateResetQuery>,
) -> Result<Json<ValidateResetResponse>, AssistantError> {
    let token = required(query.token, "token")?;
    let usecase = ValidateResetTokenUseCase {
        tokens: state.reset_tokens(),
    };
    usecase.execute(&token).await?;
    Ok(Json(ValidateResetResponse { valid: true }))
}

// ── POST /reset-password ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct ResetPasswordResponse {
    pub success: bool,
    pub reply: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, AssistantError> {
    let token = required(body.token, "token")?;
    let password = required(body.password, "password")?;
    let usecase = ResetPasswordUseCase {
        accounts: state.accounts(),
        tokens: state.reset_tokens(),
    };
    usecase.execute(ResetPasswordInput { token, password }).await?;
    Ok(Json(ResetPasswordResponse {
        success: true,
        reply: REPLY_RESET_DONE.to_owned(),
    }))
}
