use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::{Account, Role};
use crate::error::AssistantError;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};

use super::required;

pub const REPLY_SIGNED_IN: &str = "Welcome back! You're signed in.";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public projection of an account; the hash never crosses the wire.
#[derive(Serialize)]
pub struct AccountView {
    pub id: Uuid,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            full_name: account.full_name,
            email: account.email,
            role: account.role,
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub reply: String,
    pub account: AccountView,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AssistantError> {
    let email = required(body.email, "email")?;
    let password = required(body.password, "password")?;
    let usecase = LoginUseCase {
        accounts: state.accounts(),
        attempts: state.login_attempts(),
        mailer: state.mailer(),
        domains: state.domains.clone(),
    };

    let out = usecase.execute(LoginInput { email, password }).await?;

    Ok(Json(LoginResponse {
        success: true,
        reply: REPLY_SIGNED_IN.to_owned(),
        account: out.account.into(),
    }))
}
