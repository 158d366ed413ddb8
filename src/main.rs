use nc_news::{bind_listener, config::Config, init_db, make_router, run_app, seed::seed};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Default to info-level logs; override via RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    let pool = init_db(&config.database_url).await?;
    if let Some(data) = config.seed {
        seed(&pool, data).await?;
    }

    let listener = bind_listener(config.address)?;
    run_app(make_router(pool), listener).await
}
