use ai_chat::relay::{self, RelayConfig};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,axum=warn,tower_http=warn"));
    fmt().with_env_filter(filter).compact().with_target(false).init();

    RelayConfig::load_dotenv()?;
    let config = RelayConfig::from_env();
    config.log_summary();

    relay::serve(config).await
}
