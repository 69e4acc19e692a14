use tracing::info;

use edutec_assistant::config::AppConfig;
use edutec_assistant::domain::types::InstitutionalDomains;
use edutec_assistant::router::build_router;
use edutec_assistant::state::AppState;

#[tokio::main]
async fn main() {
    edutec_core::tracing::init_tracing();

    let config = AppConfig::from_env();

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let http = reqwest::Client::builder()
        .user_agent(concat!("edutec-assistant/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build HTTP client");

    let port = config.port;
    let state = AppState {
        redis,
        http,
        domains: InstitutionalDomains {
            student: config.student_domain,
            staff: config.staff_domain,
        },
        llm_api_url: config.llm_api_url,
        llm_api_key: config.llm_api_key,
        mail_relay_url: config.mail_relay_url,
        mail_from: config.mail_from,
        frontend_url: config.frontend_url,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("assistant service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
