use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::domain::types::ChatTurn;
use crate::error::AssistantError;
use crate::state::AppState;
use crate::usecase::chat::{AskAssistantUseCase, AskInput};
use crate::usecase::issue::{
    RequestPasswordInput, RequestPasswordOutcome, RequestPasswordUseCase, VerifyCodeInput,
    VerifyCodeUseCase,
};

use super::required;

// ── POST /generate-password ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GeneratePasswordRequest {
    pub email: Option<String>,
    pub context: Option<String>,
}

/// Both outcomes carry `verificationRequired` so clients branch on one flag.
#[derive(Serialize)]
#[serde(untagged)]
pub enum GeneratePasswordResponse {
    VerificationSent {
        #[serde(rename = "verificationRequired")]
        verification_required: bool,
        reply: String,
    },
    Issued {
        #[serde(rename = "verificationRequired")]
        verification_required: bool,
        password: String,
        reply: String,
    },
}

pub async fn generate_password(
    State(state): State<AppState>,
    Json(body): Json<GeneratePasswordRequest>,
) -> Result<Json<GeneratePasswordResponse>, AssistantError> {
    let email = required(body.email, "email")?;
    let usecase = RequestPasswordUseCase {
        accounts: state.accounts(),
        codes: state.verification_codes(),
        mailer: state.mailer(),
        generator: state.generation(),
        domains: state.domains.clone(),
    };

    let outcome = usecase
        .execute(RequestPasswordInput {
            email,
            context: body.context,
        })
        .await?;

    let body = match outcome {
        RequestPasswordOutcome::VerificationSent { reply } => {
            GeneratePasswordResponse::VerificationSent {
                verification_required: true,
                reply,
            }
        }
        RequestPasswordOutcome::Issued { password, reply } => GeneratePasswordResponse::Issued {
            verification_required: false,
            password,
            reply,
        },
    };
    Ok(Json(body))
}

// ── POST /verify-email-code ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub email: Option<String>,
    pub code: Option<String>,
    pub context: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub password: String,
    pub reply: String,
}

pub async fn verify_email_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, AssistantError> {
    let email = required(body.email, "email")?;
    let code = required(body.code, "code")?;
    let usecase = VerifyCodeUseCase {
        accounts: state.accounts(),
        codes: state.verification_codes(),
        generator: state.generation(),
    };

    let out = usecase
        .execute(VerifyCodeInput {
            email,
            code,
            context: body.context,
        })
        .await?;

    Ok(Json(VerifyCodeResponse {
        success: true,
        password: out.password,
        reply: out.reply,
    }))
}

// ── POST /ask ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AskRequest {
    pub history: Option<Vec<ChatTurn>>,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub reply: String,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(body): Json<AskRequest>,
) -> Result<Json<AskResponse>, AssistantError> {
    let history = match body.history {
        Some(history) if !history.is_empty() => history,
        _ => return Err(AssistantError::MissingField("history")),
    };
    let usecase = AskAssistantUseCase {
        generator: state.generation(),
    };
    let out = usecase.execute(AskInput { history }).await?;
    Ok(Json(AskResponse { reply: out.reply }))
}
