use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use edutec_assistant::domain::repository::{
    AccountDirectory, GenerationService, LoginAttemptCache, Mailer, ResetTokenStore,
    VerificationCodeStore,
};
use edutec_assistant::domain::types::{
    Account, ChatTurn, CODE_TTL_MINUTES, InstitutionalDomains, OutgoingMail, ResetToken, Role,
    VerificationCode,
};
use edutec_assistant::error::AssistantError;

/// 12 characters, the shape the generator is asked for.
pub const STUB_SECRET: &str = "Xy7#Kp2$Lm9!";

pub fn test_domains() -> InstitutionalDomains {
    InstitutionalDomains {
        student: "alu.inst.edu".to_owned(),
        staff: "inst.edu".to_owned(),
    }
}

/// Account fixture with a placeholder hash; tests that verify passwords
/// hash one for real first.
pub fn account(email: &str) -> Account {
    Account {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        full_name: "Ana García".to_owned(),
        password_hash: "not-a-real-hash".to_owned(),
        role: Role::Student,
        credential_version: 0,
        created_at: Utc::now(),
    }
}

pub fn code_row(account_id: Uuid, code: &str) -> VerificationCode {
    let now = Utc::now();
    VerificationCode {
        id: Uuid::new_v4(),
        account_id,
        code: code.to_owned(),
        expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
        used_at: None,
        created_at: now,
    }
}

// ── MockDirectory ────────────────────────────────────────────────────────────

/// Clones share the same account list, so one instance can back several
/// usecases in a scenario.
#[derive(Clone)]
pub struct MockDirectory {
    pub accounts: Arc<Mutex<Vec<Account>>>,
}

impl MockDirectory {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn handle(&self) -> Arc<Mutex<Vec<Account>>> {
        Arc::clone(&self.accounts)
    }
}

impl AccountDirectory for MockDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AssistantError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn insert(&self, account: &Account) -> Result<(), AssistantError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AssistantError::AccountExists);
        }
        accounts.push(account.clone());
        Ok(())
    }

    async fn update_credential_hash(
        &self,
        account: &Account,
        new_hash: &str,
    ) -> Result<bool, AssistantError> {
        let mut accounts = self.accounts.lock().unwrap();
        let Some(stored) = accounts.iter_mut().find(|a| a.id == account.id) else {
            return Ok(false);
        };
        if stored.credential_version != account.credential_version {
            return Ok(false);
        }
        stored.password_hash = new_hash.to_owned();
        stored.credential_version += 1;
        Ok(true)
    }
}

/// Directory whose conditional update always loses, for conflict paths.
pub struct ConflictingDirectory {
    pub inner: MockDirectory,
}

impl AccountDirectory for ConflictingDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AssistantError> {
        self.inner.find_by_email(email).await
    }

    async fn insert(&self, account: &Account) -> Result<(), AssistantError> {
        self.inner.insert(account).await
    }

    async fn update_credential_hash(
        &self,
        _account: &Account,
        _new_hash: &str,
    ) -> Result<bool, AssistantError> {
        Ok(false)
    }
}

// ── MockCodeStore ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockCodeStore {
    pub codes: Arc<Mutex<Vec<VerificationCode>>>,
}

impl MockCodeStore {
    pub fn new(codes: Vec<VerificationCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn handle(&self) -> Arc<Mutex<Vec<VerificationCode>>> {
        Arc::clone(&self.codes)
    }
}

impl VerificationCodeStore for MockCodeStore {
    async fn insert(&self, code: &VerificationCode) -> Result<(), AssistantError> {
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn find_latest(
        &self,
        account_id: Uuid,
        code: &str,
    ) -> Result<Option<VerificationCode>, AssistantError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.account_id == account_id && c.code == code)
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn mark_used(&self, code: &VerificationCode) -> Result<(), AssistantError> {
        let mut codes = self.codes.lock().unwrap();
        if let Some(c) = codes.iter_mut().find(|c| c.id == code.id) {
            c.used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn remove(&self, code: &VerificationCode) -> Result<(), AssistantError> {
        self.codes.lock().unwrap().retain(|c| c.id != code.id);
        Ok(())
    }
}

// ── MockResetTokens ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockResetTokens {
    pub tokens: Arc<Mutex<Vec<ResetToken>>>,
}

impl MockResetTokens {
    pub fn new(tokens: Vec<ResetToken>) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn handle(&self) -> Arc<Mutex<Vec<ResetToken>>> {
        Arc::clone(&self.tokens)
    }
}

impl ResetTokenStore for MockResetTokens {
    async fn insert(&self, token: &ResetToken) -> Result<(), AssistantError> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.retain(|t| t.account_id != token.account_id);
        tokens.push(token.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<ResetToken>, AssistantError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn remove(&self, token: &str) -> Result<(), AssistantError> {
        self.tokens.lock().unwrap().retain(|t| t.token != token);
        Ok(())
    }
}

// ── MockAttempts ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockAttempts {
    pub counts: Arc<Mutex<HashMap<String, u64>>>,
}

impl MockAttempts {
    pub fn empty() -> Self {
        Self {
            counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn handle(&self) -> Arc<Mutex<HashMap<String, u64>>> {
        Arc::clone(&self.counts)
    }
}

impl LoginAttemptCache for MockAttempts {
    async fn record_failure(&self, email: &str) -> Result<u64, AssistantError> {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(email.to_owned()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn clear(&self, email: &str) -> Result<(), AssistantError> {
        self.counts.lock().unwrap().remove(email);
        Ok(())
    }
}

// ── RecordingMailer ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<OutgoingMail>>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    pub fn handle(&self) -> Arc<Mutex<Vec<OutgoingMail>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AssistantError> {
        if self.fail {
            return Err(AssistantError::MailDelivery);
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

// ── StubGenerator ────────────────────────────────────────────────────────────

/// Records every prompt it is handed; chat echoes the last user turn.
#[derive(Clone)]
pub struct StubGenerator {
    pub secret: String,
    pub fail: bool,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl StubGenerator {
    pub fn returning(secret: &str) -> Self {
        Self {
            secret: secret.to_owned(),
            fail: false,
            prompts: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            secret: String::new(),
            fail: true,
            prompts: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn prompts_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl GenerationService for StubGenerator {
    async fn generate_secret(&self, prompt: &str) -> Result<String, AssistantError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        if self.fail {
            return Err(AssistantError::GenerationUnavailable);
        }
        Ok(self.secret.clone())
    }

    async fn chat(&self, turns: &[ChatTurn]) -> Result<String, AssistantError> {
        if self.fail {
            return Err(AssistantError::GenerationUnavailable);
        }
        let last = turns.last().map(|t| t.text.as_str()).unwrap_or_default();
        Ok(format!("echo: {last}"))
    }
}
