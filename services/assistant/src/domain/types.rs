use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account roles. Students register under the student mail domain, teachers
/// under the staff domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            _ => None,
        }
    }
}

/// A person who can authenticate. Stored as JSON under `account:{email}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    /// Lower-cased, immutable once created. Doubles as the directory key and
    /// the domain-classification input.
    pub email: String,
    pub full_name: String,
    /// bcrypt hash of the current secret. The plaintext is never stored.
    pub password_hash: String,
    pub role: Role,
    /// Bumped on every credential write; conditional updates compare it.
    pub credential_version: u32,
    pub created_at: DateTime<Utc>,
}

/// One-time email code gating institutional password issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCode {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Exactly six ASCII digits, first digit never zero.
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Single-use password-reset token. Issuing a new one replaces the account's
/// previous token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetToken {
    pub token: String,
    pub account_id: Uuid,
    /// Kept alongside the id so the reset flow can re-read the account from
    /// the email-keyed directory. Safe because email is immutable.
    pub email: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A mail handed to the Mailer port.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

/// One turn of an assistant conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// Accepted institutional mail domains. The student domain is a subdomain of
/// the staff domain, so staff matching relies on the `@` anchor to exclude
/// student addresses.
#[derive(Debug, Clone)]
pub struct InstitutionalDomains {
    pub student: String,
    pub staff: String,
}

impl InstitutionalDomains {
    pub fn is_institutional(&self, email: &str) -> bool {
        self.matches_student(email) || self.matches_staff(email)
    }

    pub fn matches_student(&self, email: &str) -> bool {
        email.ends_with(&format!("@{}", self.student))
    }

    pub fn matches_staff(&self, email: &str) -> bool {
        email.ends_with(&format!("@{}", self.staff))
    }
}

/// Verification code time-to-live in minutes.
pub const CODE_TTL_MINUTES: i64 = 10;

/// Inclusive bounds of the verification-code space: 900000 values, six
/// digits each, leading zeros excluded by construction.
pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

/// bcrypt cost factor for credential hashes.
pub const CREDENTIAL_HASH_COST: u32 = 10;

/// Minimum accepted password length for register and reset.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Reset token time-to-live in minutes.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Failed sign-in window in seconds, and the count within one window that
/// triggers a security-alert mail.
pub const LOGIN_ATTEMPT_WINDOW_SECS: u64 = 900;
pub const LOGIN_ALERT_THRESHOLD: u64 = 3;
