use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::types::Role;
use crate::error::AssistantError;
use crate::state::AppState;
use crate::usecase::register::{RegisterInput, RegisterUseCase};

use super::required;

pub const REPLY_REGISTERED: &str = "Your account has been created. You can sign in now.";

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub reply: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AssistantError> {
    let full_name = required(body.full_name, "fullName")?;
    let email = required(body.email, "email")?;
    let password = required(body.password, "password")?;
    let role = required(body.role, "role")?;
    let role = Role::parse(&role).ok_or(AssistantError::UnknownRole)?;

    let usecase = RegisterUseCase {
        accounts: state.accounts(),
        domains: state.domains.clone(),
    };
    usecase
        .execute(RegisterInput {
            full_name,
            email,
            password,
            role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            reply: REPLY_REGISTERED.to_owned(),
        }),
    ))
}
