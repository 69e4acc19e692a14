#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{Account, ChatTurn, OutgoingMail, ResetToken, VerificationCode};
use crate::error::AssistantError;

/// Port for the user directory: lookup by email plus credential writes.
pub trait AccountDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AssistantError>;

    /// Insert a new account. Fails with `AccountExists` when the email is
    /// already taken.
    async fn insert(&self, account: &Account) -> Result<(), AssistantError>;

    /// Conditionally replace the credential hash: applies only while the
    /// stored `credential_version` still equals the snapshot's. Returns
    /// `false` when a concurrent writer won.
    async fn update_credential_hash(
        &self,
        account: &Account,
        new_hash: &str,
    ) -> Result<bool, AssistantError>;
}

/// Store for one-time verification codes.
pub trait VerificationCodeStore: Send + Sync {
    async fn insert(&self, code: &VerificationCode) -> Result<(), AssistantError>;

    /// Most recently issued code for the account matching the submitted
    /// value, regardless of used/expired state; the flow distinguishes the
    /// rejection reasons itself.
    async fn find_latest(
        &self,
        account_id: Uuid,
        code: &str,
    ) -> Result<Option<VerificationCode>, AssistantError>;

    /// Mark a code used (sets used_at = now).
    async fn mark_used(&self, code: &VerificationCode) -> Result<(), AssistantError>;

    /// Delete a code row. Used for lazy cleanup when an expired row is
    /// presented.
    async fn remove(&self, code: &VerificationCode) -> Result<(), AssistantError>;
}

/// Store for single-use password-reset tokens.
pub trait ResetTokenStore: Send + Sync {
    /// Insert a token, replacing any previous token of the same account.
    async fn insert(&self, token: &ResetToken) -> Result<(), AssistantError>;

    async fn find(&self, token: &str) -> Result<Option<ResetToken>, AssistantError>;

    async fn remove(&self, token: &str) -> Result<(), AssistantError>;
}

/// Failed sign-in counter with a TTL window, owned by the store rather than
/// process memory so it survives restarts and cannot grow unbounded.
pub trait LoginAttemptCache: Send + Sync {
    /// Record one failure and return the count inside the current window.
    async fn record_failure(&self, email: &str) -> Result<u64, AssistantError>;

    async fn clear(&self, email: &str) -> Result<(), AssistantError>;
}

/// Port for outbound mail.
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AssistantError>;
}

/// Port for the external language-model service.
pub trait GenerationService: Send + Sync {
    /// One-shot prompt → trimmed candidate text (the generated secret).
    async fn generate_secret(&self, prompt: &str) -> Result<String, AssistantError>;

    /// Multi-turn conversation → assistant reply text.
    async fn chat(&self, turns: &[ChatTurn]) -> Result<String, AssistantError>;
}
