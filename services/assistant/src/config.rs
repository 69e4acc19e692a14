/// Assistant service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AppConfig {
    /// Redis connection URL.
    pub redis_url: String,
    /// Generation endpoint URL (the model's generateContent endpoint).
    pub llm_api_url: String,
    /// API key appended to the generation endpoint query string.
    pub llm_api_key: String,
    /// HTTP mail relay base URL. Unset → outbound mail is logged, not sent.
    pub mail_relay_url: Option<String>,
    /// From header for outbound mail.
    pub mail_from: String,
    /// Frontend base URL, used to build reset links.
    pub frontend_url: String,
    /// Student mail domain (e.g. "alu.school.edu").
    pub student_domain: String,
    /// Staff mail domain (e.g. "school.edu").
    pub staff_domain: String,
    /// TCP port to listen on (default 3001). Env var: `ASSISTANT_PORT`.
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            llm_api_url: std::env::var("LLM_API_URL").expect("LLM_API_URL"),
            llm_api_key: std::env::var("LLM_API_KEY").expect("LLM_API_KEY"),
            mail_relay_url: std::env::var("MAIL_RELAY_URL").ok(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Alfred <no-reply@edutechub.local>".to_owned()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_owned()),
            student_domain: std::env::var("STUDENT_EMAIL_DOMAIN")
                .unwrap_or_else(|_| "alu.tecnica29de6.edu.ar".to_owned()),
            staff_domain: std::env::var("STAFF_EMAIL_DOMAIN")
                .unwrap_or_else(|_| "tecnica29de6.edu.ar".to_owned()),
            port: std::env::var("ASSISTANT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
        }
    }
}
