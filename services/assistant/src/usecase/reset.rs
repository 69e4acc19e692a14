use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use rand::RngExt;

use crate::domain::repository::{AccountDirectory, Mailer, ResetTokenStore};
use crate::domain::types::{
    MIN_PASSWORD_LEN, OutgoingMail, RESET_TOKEN_TTL_MINUTES, ResetToken,
};
use crate::error::AssistantError;
use crate::usecase::issue::commit_credential;

/// 256-bit token, URL-safe so it can ride in a query string unescaped.
pub fn generate_reset_token() -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.random_range(0..=u8::MAX)).collect();
    URL_SAFE_NO_PAD.encode(bytes)
}

fn reset_mail(to: &str, full_name: &str, link: &str) -> OutgoingMail {
    OutgoingMail {
        to: to.to_owned(),
        subject: "Reset your EduTecHub password".to_owned(),
        text: format!(
            "Hi {}! Open {} to choose a new password. The link expires in {} \
             minutes. If you didn't ask for this, you can ignore this email.",
            full_name, link, RESET_TOKEN_TTL_MINUTES
        ),
        html: Some(format!(
            "<p>Hi {}! <a href=\"{}\">Choose a new password</a>. The link expires \
             in {} minutes. If you didn't ask for this, you can ignore this email.</p>",
            full_name, link, RESET_TOKEN_TTL_MINUTES
        )),
    }
}

pub struct ForgotPasswordUseCase<D, R, M>
where
    D: AccountDirectory,
    R: ResetTokenStore,
    M: Mailer,
{
    pub accounts: D,
    pub tokens: R,
    pub mailer: M,
    pub frontend_url: String,
}

impl<D, R, M> ForgotPasswordUseCase<D, R, M>
where
    D: AccountDirectory,
    R: ResetTokenStore,
    M: Mailer,
{
    /// Always acknowledges, so callers can't probe which addresses exist.
    pub async fn execute(&self, email: String) -> Result<(), AssistantError> {
        let email = email.trim().to_lowercase();
        let Some(account) = self.accounts.find_by_email(&email).await? else {
            return Ok(());
        };

        let now = Utc::now();
        let token = ResetToken {
            token: generate_reset_token(),
            account_id: account.id,
            email: account.email.clone(),
            expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
            created_at: now,
        };
        // Insert replaces any earlier token for the account.
        self.tokens.insert(&token).await?;

        let link = format!(
            "{}/reset-password?token={}",
            self.frontend_url.trim_end_matches('/'),
            token.token
        );
        self.mailer
            .send(&reset_mail(&account.email, &account.full_name, &link))
            .await?;
        Ok(())
    }
}

pub struct ValidateResetTokenUseCase<R>
where
    R: ResetTokenStore,
{
    pub tokens: R,
}

impl<R> ValidateResetTokenUseCase<R>
where
    R: ResetTokenStore,
{
    pub async fn execute(&self, token: &str) -> Result<(), AssistantError> {
        let record = self
            .tokens
            .find(token)
            .await?
            .ok_or(AssistantError::InvalidResetToken)?;
        if record.is_expired(Utc::now()) {
            self.tokens.remove(token).await?;
            return Err(AssistantError::ExpiredResetToken);
        }
        Ok(())
    }
}

pub struct ResetPasswordInput {
    pub token: String,
    pub password: String,
}

pub struct ResetPasswordUseCase<D, R>
where
    D: AccountDirectory,
    R: ResetTokenStore,
{
    pub accounts: D,
    pub tokens: R,
}

impl<D, R> ResetPasswordUseCase<D, R>
where
    D: AccountDirectory,
    R: ResetTokenStore,
{
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AssistantError> {
        // 1. Password floor before any lookup
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AssistantError::PasswordTooShort);
        }

        // 2. Token must exist and still be live; expired rows get dropped
        let record = self
            .tokens
            .find(&input.token)
            .await?
            .ok_or(AssistantError::InvalidResetToken)?;
        if record.is_expired(Utc::now()) {
            self.tokens.remove(&input.token).await?;
            return Err(AssistantError::ExpiredResetToken);
        }

        // 3. Re-read the account the token was minted for
        let account = self
            .accounts
            .find_by_email(&record.email)
            .await?
            .ok_or(AssistantError::InvalidResetToken)?;

        // 4. Commit first, then burn the token
        commit_credential(&self.accounts, &account, &input.password).await?;
        self.tokens.remove(&input.token).await?;
        Ok(())
    }
}
