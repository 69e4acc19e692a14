use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Assistant service error variants. Every variant carries two faces: a
/// machine code (`kind`) and a chat-style sentence (`reply`) for the widget.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("account not found")]
    AccountNotFound,
    #[error("account already exists")]
    AccountExists,
    #[error("email domain not allowed")]
    NonInstitutionalEmail,
    #[error("unknown role")]
    UnknownRole,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password too short")]
    PasswordTooShort,
    #[error("invalid verification code")]
    InvalidCode,
    #[error("verification code already used")]
    UsedCode,
    #[error("verification code expired")]
    ExpiredCode,
    #[error("invalid reset token")]
    InvalidResetToken,
    #[error("reset token expired")]
    ExpiredResetToken,
    #[error("mail delivery failed")]
    MailDelivery,
    #[error("password generation unavailable")]
    GenerationUnavailable,
    #[error("credential update conflict")]
    CredentialConflict,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AssistantError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::AccountExists => "ACCOUNT_EXISTS",
            Self::NonInstitutionalEmail => "NON_INSTITUTIONAL_EMAIL",
            Self::UnknownRole => "UNKNOWN_ROLE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::PasswordTooShort => "PASSWORD_TOO_SHORT",
            Self::InvalidCode => "INVALID_CODE",
            Self::UsedCode => "CODE_ALREADY_USED",
            Self::ExpiredCode => "CODE_EXPIRED",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::ExpiredResetToken => "RESET_TOKEN_EXPIRED",
            Self::MailDelivery => "MAIL_DELIVERY_FAILED",
            Self::GenerationUnavailable => "GENERATION_UNAVAILABLE",
            Self::CredentialConflict => "CREDENTIAL_CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// The sentence the chat widget shows. Curated text only; internal
    /// detail stays in the logs.
    pub fn reply(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "I need a bit more information before I can do that.",
            Self::AccountNotFound => "I couldn't find an account with that email address.",
            Self::AccountExists => {
                "There is already an account registered with that email address."
            }
            Self::NonInstitutionalEmail => "Only institutional email addresses can be used here.",
            Self::UnknownRole => "The role must be either student or teacher.",
            Self::InvalidCredentials => {
                "That email and password combination doesn't match my records."
            }
            Self::PasswordTooShort => "Passwords need at least 6 characters. Try a longer one.",
            Self::InvalidCode => {
                "That code doesn't match the one I sent you. Double-check it and try again."
            }
            Self::UsedCode => {
                "That code has already been used. Request a new one and I'll email it to you."
            }
            Self::ExpiredCode => {
                "That code has expired. Request a new one and I'll email it to you."
            }
            Self::InvalidResetToken => {
                "That reset link isn't valid. Request a new one from the login page."
            }
            Self::ExpiredResetToken => {
                "That reset link has expired. Request a new one from the login page."
            }
            Self::MailDelivery => {
                "I couldn't send the email right now. Please try again in a few minutes."
            }
            Self::GenerationUnavailable => {
                "I couldn't come up with a password right now. Please try again in a few minutes."
            }
            Self::CredentialConflict => {
                "Another password change just went through. Please start over."
            }
            Self::Internal(_) => "Something went wrong on my end. Please try again.",
        }
    }
}

impl IntoResponse for AssistantError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingField(_)
            | Self::NonInstitutionalEmail
            | Self::UnknownRole
            | Self::PasswordTooShort
            | Self::InvalidCode
            | Self::UsedCode
            | Self::ExpiredCode => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AccountNotFound | Self::InvalidResetToken => StatusCode::NOT_FOUND,
            Self::AccountExists | Self::CredentialConflict => StatusCode::CONFLICT,
            Self::ExpiredResetToken => StatusCode::GONE,
            Self::MailDelivery | Self::GenerationUnavailable | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Log 500s only; tower-http TraceLayer already records method/uri/status
        // for every request, and 4xx are expected client errors. Internal errors
        // carry an anyhow chain that must reach the logs to be traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "error": self.kind(),
            "reply": self.reply(),
        });
        (status, axum::Json(body)).into_response()
    }
}
