use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{
    AccountDirectory, GenerationService, Mailer, VerificationCodeStore,
};
use crate::domain::types::{
    Account, CODE_MAX, CODE_MIN, CODE_TTL_MINUTES, CREDENTIAL_HASH_COST,
    InstitutionalDomains, OutgoingMail, VerificationCode,
};
use crate::error::AssistantError;

pub const REPLY_VERIFICATION_SENT: &str = "I've emailed you a 6-digit verification code. \
    It expires in 10 minutes. Send it back to me and I'll generate your new password.";

pub const REPLY_ISSUED: &str =
    "Done! Here's your new password. Store it somewhere safe, it won't be shown again.";

/// Uniform 6-digit code; the lower bound rules out leading zeros.
fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(CODE_MIN..=CODE_MAX).to_string()
}

pub fn hash_secret(plain: &str) -> Result<String, AssistantError> {
    bcrypt::hash(plain, CREDENTIAL_HASH_COST).map_err(|e| AssistantError::Internal(e.into()))
}

pub fn verify_secret(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

fn default_prompt(email: &str) -> String {
    format!(
        "Generate a single secure 12-character password for the account {}. \
         Answer with the password only, no explanation and no formatting.",
        email
    )
}

/// Caller-supplied context wins when it carries any text.
pub(crate) fn generation_prompt(email: &str, context: Option<&str>) -> String {
    match context.map(str::trim) {
        Some(context) if !context.is_empty() => context.to_owned(),
        _ => default_prompt(email),
    }
}

fn verification_mail(to: &str, code: &str) -> OutgoingMail {
    OutgoingMail {
        to: to.to_owned(),
        subject: "Your EduTecHub verification code".to_owned(),
        text: format!(
            "Hi! Your verification code is {}. It expires in {} minutes.",
            code, CODE_TTL_MINUTES
        ),
        html: Some(format!(
            "<p>Hi! Your verification code is <b>{}</b>. It expires in {} minutes.</p>",
            code, CODE_TTL_MINUTES
        )),
    }
}

/// Hashes the new password and applies it against the snapshot the caller
/// read. A lost version race maps to a conflict the caller can retry.
pub(crate) async fn commit_credential<D>(
    accounts: &D,
    account: &Account,
    password: &str,
) -> Result<(), AssistantError>
where
    D: AccountDirectory,
{
    let hash = hash_secret(password)?;
    let applied = accounts.update_credential_hash(account, &hash).await?;
    if !applied {
        return Err(AssistantError::CredentialConflict);
    }
    Ok(())
}

pub struct RequestPasswordInput {
    pub email: String,
    pub context: Option<String>,
}

#[derive(Debug)]
pub enum RequestPasswordOutcome {
    /// Institutional address: a code was mailed, nothing issued yet.
    VerificationSent { reply: String },
    /// External address: the credential was replaced in this call.
    Issued { password: String, reply: String },
}

pub struct RequestPasswordUseCase<D, C, M, G>
where
    D: AccountDirectory,
    C: VerificationCodeStore,
    M: Mailer,
    G: GenerationService,
{
    pub accounts: D,
    pub codes: C,
    pub mailer: M,
    pub generator: G,
    pub domains: InstitutionalDomains,
}

impl<D, C, M, G> RequestPasswordUseCase<D, C, M, G>
where
    D: AccountDirectory,
    C: VerificationCodeStore,
    M: Mailer,
    G: GenerationService,
{
    pub async fn execute(
        &self,
        input: RequestPasswordInput,
    ) -> Result<RequestPasswordOutcome, AssistantError> {
        // 1. Find account by email → 404 if not found
        let email = input.email.trim().to_lowercase();
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(AssistantError::AccountNotFound)?;

        // 2. Institutional address → mail a 6-digit code, issue nothing yet
        if self.domains.is_institutional(&email) {
            let now = Utc::now();
            let code = VerificationCode {
                id: Uuid::new_v4(),
                account_id: account.id,
                code: generate_code(),
                expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
                used_at: None,
                created_at: now,
            };
            self.codes.insert(&code).await?;
            // Delivery failure propagates; the unused row falls to retention.
            self.mailer.send(&verification_mail(&email, &code.code)).await?;
            return Ok(RequestPasswordOutcome::VerificationSent {
                reply: REPLY_VERIFICATION_SENT.to_owned(),
            });
        }

        // 3. External address → generate and commit in one call
        let prompt = generation_prompt(&email, input.context.as_deref());
        let password = self.generator.generate_secret(&prompt).await?;
        commit_credential(&self.accounts, &account, &password).await?;
        Ok(RequestPasswordOutcome::Issued {
            password,
            reply: REPLY_ISSUED.to_owned(),
        })
    }
}

pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
    pub context: Option<String>,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub password: String,
    pub reply: String,
}

pub struct VerifyCodeUseCase<D, C, G>
where
    D: AccountDirectory,
    C: VerificationCodeStore,
    G: GenerationService,
{
    pub accounts: D,
    pub codes: C,
    pub generator: G,
}

impl<D, C, G> VerifyCodeUseCase<D, C, G>
where
    D: AccountDirectory,
    C: VerificationCodeStore,
    G: GenerationService,
{
    pub async fn execute(&self, input: VerifyCodeInput) -> Result<VerifyCodeOutput, AssistantError> {
        // 1. Find account by email → 404 if not found
        let email = input.email.trim().to_lowercase();
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(AssistantError::AccountNotFound)?;

        // 2. Look up the submitted code, newest row for that value
        let code = input.code.trim();
        let row = self
            .codes
            .find_latest(account.id, code)
            .await?
            .ok_or(AssistantError::InvalidCode)?;

        // 3. Used and expired rows are told apart; expired rows get dropped
        if row.is_used() {
            return Err(AssistantError::UsedCode);
        }
        if row.is_expired(Utc::now()) {
            self.codes.remove(&row).await?;
            return Err(AssistantError::ExpiredCode);
        }

        // 4. Generate, commit the credential, then burn the code. A failed
        //    commit leaves the code live so the caller can retry with it.
        let prompt = generation_prompt(&email, input.context.as_deref());
        let password = self.generator.generate_secret(&prompt).await?;
        commit_credential(&self.accounts, &account, &password).await?;
        self.codes.mark_used(&row).await?;

        Ok(VerifyCodeOutput {
            password,
            reply: REPLY_ISSUED.to_owned(),
        })
    }
}
