// Market analyzer: HTTP front for the report pipeline, its stored analyses
// and the PDF renderer.

use anyhow::{Context, Result};
use analyzer_core::domains::analysis::TOTAL_STAGES;
use analyzer_core::{kernel::ServerDeps, server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,analyzer_core=debug,ai_client=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        stages = TOTAL_STAGES,
        openai = config.openai_api_key.is_some(),
        anthropic = config.anthropic_api_key.is_some(),
        tavily = config.tavily_api_key.is_some(),
        serper = config.serper_api_key.is_some(),
        "Market analyzer configured"
    );

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the analyses database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply analyses migrations")?;
    info!("Analyses store ready");

    let deps = ServerDeps::from_config(&config, pool).context("Failed to build dependencies")?;
    let app = build_app(deps);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Accepting analysis requests on POST /analyze");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
