use racetrack_server::ServerConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str =
    "racetrack_server=info,racetrack_auth=info,racetrack_storage=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env()?;
    racetrack_server::run_server(config).await
}
