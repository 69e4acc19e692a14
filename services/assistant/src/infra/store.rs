use chrono::Utc;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;
use uuid::Uuid;

use crate::domain::repository::{
    AccountDirectory, LoginAttemptCache, ResetTokenStore, VerificationCodeStore,
};
use crate::domain::types::{
    Account, LOGIN_ATTEMPT_WINDOW_SECS, ResetToken, VerificationCode,
};
use crate::error::AssistantError;

/// Retention for code rows, well past the 10-minute logical expiry. An
/// expired row must stay observable so its rejection reads "expired", not
/// "invalid"; the Redis expiry is only the cleanup sweep.
const CODE_RETENTION_SECS: u64 = 86_400;

/// Retention for reset-token rows, same reasoning as code rows.
const RESET_RETENTION_SECS: u64 = 86_400;

fn account_key(email: &str) -> String {
    format!("account:{}", email)
}

fn code_key(account_id: Uuid, code: &str) -> String {
    format!("verify:{}:{}", account_id, code)
}

fn reset_key(token: &str) -> String {
    format!("reset:{}", token)
}

fn reset_owner_key(account_id: Uuid) -> String {
    format!("reset_owner:{}", account_id)
}

fn attempt_key(email: &str) -> String {
    format!("login_fail:{}", email)
}

// ── Accounts ─────────────────────────────────────────────────────────────────

/// Conditional credential write: replaces the account record only while the
/// stored version still matches the snapshot the caller read.
const CREDENTIAL_CAS_LUA: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then return 0 end
local account = cjson.decode(raw)
if account.credential_version ~= tonumber(ARGV[1]) then return 0 end
redis.call('SET', KEYS[1], ARGV[2])
return 1
"#;

#[derive(Clone)]
pub struct RedisAccountDirectory {
    pub pool: Pool,
}

impl AccountDirectory for RedisAccountDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AssistantError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let raw: Option<String> = conn
            .get(account_key(email))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(|e| AssistantError::Internal(e.into()))
    }

    async fn insert(&self, account: &Account) -> Result<(), AssistantError> {
        let raw = serde_json::to_string(account)
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let created: bool = conn
            .set_nx(account_key(&account.email), raw)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        if !created {
            return Err(AssistantError::AccountExists);
        }
        Ok(())
    }

    async fn update_credential_hash(
        &self,
        account: &Account,
        new_hash: &str,
    ) -> Result<bool, AssistantError> {
        let mut updated = account.clone();
        updated.password_hash = new_hash.to_owned();
        updated.credential_version = account.credential_version + 1;
        let raw = serde_json::to_string(&updated)
            .map_err(|e| AssistantError::Internal(e.into()))?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let applied: i64 = deadpool_redis::redis::Script::new(CREDENTIAL_CAS_LUA)
            .key(account_key(&account.email))
            .arg(account.credential_version)
            .arg(raw)
            .invoke_async(&mut conn)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        Ok(applied == 1)
    }
}

// ── Verification codes ───────────────────────────────────────────────────────

/// Codes keyed by `(account, code value)`, so a re-issued identical value
/// lands on the same key and a lookup always sees the latest row.
#[derive(Clone)]
pub struct RedisVerificationCodeStore {
    pub pool: Pool,
}

impl VerificationCodeStore for RedisVerificationCodeStore {
    async fn insert(&self, code: &VerificationCode) -> Result<(), AssistantError> {
        let raw = serde_json::to_string(code)
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(code_key(code.account_id, &code.code), raw, CODE_RETENTION_SECS)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        Ok(())
    }

    async fn find_latest(
        &self,
        account_id: Uuid,
        code: &str,
    ) -> Result<Option<VerificationCode>, AssistantError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let raw: Option<String> = conn
            .get(code_key(account_id, code))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(|e| AssistantError::Internal(e.into()))
    }

    async fn mark_used(&self, code: &VerificationCode) -> Result<(), AssistantError> {
        let mut used = code.clone();
        used.used_at = Some(Utc::now());
        let raw = serde_json::to_string(&used)
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(code_key(code.account_id, &code.code), raw, CODE_RETENTION_SECS)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        Ok(())
    }

    async fn remove(&self, code: &VerificationCode) -> Result<(), AssistantError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let _: i64 = conn
            .del(code_key(code.account_id, &code.code))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        Ok(())
    }
}

// ── Reset tokens ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisResetTokenStore {
    pub pool: Pool,
}

impl ResetTokenStore for RedisResetTokenStore {
    async fn insert(&self, token: &ResetToken) -> Result<(), AssistantError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        // One live token per account: drop the previous one first.
        let previous: Option<String> = conn
            .get(reset_owner_key(token.account_id))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        if let Some(previous) = previous {
            let _: i64 = conn
                .del(reset_key(&previous))
                .await
                .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        }
        let raw = serde_json::to_string(token)
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(reset_key(&token.token), raw, RESET_RETENTION_SECS)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(
                reset_owner_key(token.account_id),
                token.token.clone(),
                RESET_RETENTION_SECS,
            )
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<ResetToken>, AssistantError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let raw: Option<String> = conn
            .get(reset_key(token))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(|e| AssistantError::Internal(e.into()))
    }

    async fn remove(&self, token: &str) -> Result<(), AssistantError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let raw: Option<String> = conn
            .get(reset_key(token))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        if let Some(raw) = raw {
            if let Ok(record) = serde_json::from_str::<ResetToken>(&raw) {
                let _: i64 = conn
                    .del(reset_owner_key(record.account_id))
                    .await
                    .map_err(|e: deadpool_redis::redis::RedisError| {
                        AssistantError::Internal(e.into())
                    })?;
            }
        }
        let _: i64 = conn
            .del(reset_key(token))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        Ok(())
    }
}

// ── Login attempt counters ───────────────────────────────────────────────────

/// Per-email failure counter with a window TTL. The window opens at the first
/// failure and Redis expires the key on its own.
#[derive(Clone)]
pub struct RedisLoginAttemptCache {
    pub pool: Pool,
}

impl LoginAttemptCache for RedisLoginAttemptCache {
    async fn record_failure(&self, email: &str) -> Result<u64, AssistantError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let key = attempt_key(email);
        let count: u64 = conn
            .incr(&key, 1)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        if count == 1 {
            let (): () = conn
                .expire(&key, LOGIN_ATTEMPT_WINDOW_SECS as i64)
                .await
                .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        }
        Ok(count)
    }

    async fn clear(&self, email: &str) -> Result<(), AssistantError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AssistantError::Internal(e.into()))?;
        let _: i64 = conn
            .del(attempt_key(email))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AssistantError::Internal(e.into()))?;
        Ok(())
    }
}
