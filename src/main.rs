use std::path::PathBuf;

use clipkeep::bootstrap::{self, tracing::init_tracing_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => bootstrap::default_config_path()?,
    };
    let config = bootstrap::load_config_or_default(&config_path)?;

    if let Err(e) = init_tracing_subscriber(&config.storage.log_dir()?) {
        eprintln!("Failed to initialize tracing: {e:#}");
    }
    ::tracing::info!(config = %config_path.display(), "Starting ClipKeep");

    bootstrap::run_app(config).await
}
