use entagen_service::config::AppConfig;
use entagen_service::startup::Application;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,entagen_service=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A missing credential for the selected backend is fatal here, before
    // the server starts accepting requests.
    let config = AppConfig::load()?;

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
