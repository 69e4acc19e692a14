use deadpool_redis::Pool as RedisPool;

use crate::domain::types::InstitutionalDomains;
use crate::infra::llm::{HttpChatTransport, LlmClient};
use crate::infra::mail::{HttpMailer, LogMailer, MailTransport};
use crate::infra::retry::RetryPolicy;
use crate::infra::store::{
    RedisAccountDirectory, RedisLoginAttemptCache, RedisResetTokenStore,
    RedisVerificationCodeStore,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub redis: RedisPool,
    pub http: reqwest::Client,
    pub domains: InstitutionalDomains,
    pub llm_api_url: String,
    pub llm_api_key: String,
    pub mail_relay_url: Option<String>,
    pub mail_from: String,
    pub frontend_url: String,
}

impl AppState {
    pub fn accounts(&self) -> RedisAccountDirectory {
        RedisAccountDirectory {
            pool: self.redis.clone(),
        }
    }

    pub fn verification_codes(&self) -> RedisVerificationCodeStore {
        RedisVerificationCodeStore {
            pool: self.redis.clone(),
        }
    }

    pub fn reset_tokens(&self) -> RedisResetTokenStore {
        RedisResetTokenStore {
            pool: self.redis.clone(),
        }
    }

    pub fn login_attempts(&self) -> RedisLoginAttemptCache {
        RedisLoginAttemptCache {
            pool: self.redis.clone(),
        }
    }

    /// Falls back to log-only delivery when no relay is configured, so the
    /// service stays usable in local development.
    pub fn mailer(&self) -> MailTransport {
        match &self.mail_relay_url {
            Some(relay_url) => MailTransport::Http(HttpMailer {
                client: self.http.clone(),
                relay_url: relay_url.clone(),
                from: self.mail_from.clone(),
            }),
            None => MailTransport::Log(LogMailer),
        }
    }

    pub fn generation(&self) -> LlmClient<HttpChatTransport> {
        LlmClient {
            transport: HttpChatTransport {
                client: self.http.clone(),
                url: self.llm_api_url.clone(),
                api_key: self.llm_api_key.clone(),
            },
            policy: RetryPolicy::default(),
        }
    }
}
