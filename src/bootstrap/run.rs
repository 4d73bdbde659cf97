//! Application lifecycle: open the store, seed collections, start the
//! listener, worker and sweepers, and tear them down on Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use ck_app::RetentionTrigger;
use ck_infra::{SystemClock, TracingCaptureSink};
use ck_platform::{start_listener, LocalClipboard};

use super::config::AppConfig;
use super::wiring::{open_store, Engine, EnginePorts, WiringError};

pub async fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let database_path = config.storage.database_path()?;
    let store = open_store(&database_path)?;
    info!(path = %database_path.display(), "Clip store opened");

    let clipboard =
        Arc::new(LocalClipboard::new().map_err(|e| WiringError::ClipboardInit(format!("{e:#}")))?);

    let engine = Engine::wire(
        &config,
        EnginePorts {
            store,
            source: clipboard.clone(),
            writer: clipboard,
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingCaptureSink),
        },
    );
    engine.seed_collections(&config.collections()).await?;
    info!(active = ?engine.active_collection(), "Engine wired");

    let cancel = CancellationToken::new();
    let retention = &config.engine.retention;

    if retention.run_on_startup {
        sweep(&engine, RetentionTrigger::Startup, &cancel).await;
    }

    let (signals_tx, signals_rx) = engine.signal_channel();
    let worker = engine.spawn_capture_worker(signals_rx, cancel.child_token());
    let sweeper = tokio::spawn(engine.sweeper.clone().run(cancel.child_token()));
    let idle_sweeper = engine.spawn_idle_sweeper(cancel.child_token());
    let listener = start_listener(signals_tx)?;
    info!("ClipKeep is running; press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Shutdown requested");

    listener.stop().await;
    cancel.cancel();
    if let Err(e) = worker.await {
        warn!(error = %e, "Capture worker ended abnormally");
    }
    if let Err(e) = sweeper.await {
        warn!(error = %e, "Retention sweeper ended abnormally");
    }
    if let Err(e) = idle_sweeper.await {
        warn!(error = %e, "Idle retention sweeper ended abnormally");
    }

    if retention.run_on_shutdown {
        sweep(&engine, RetentionTrigger::Shutdown, &CancellationToken::new()).await;
    }

    info!("ClipKeep stopped");
    Ok(())
}

async fn sweep(engine: &Engine, trigger: RetentionTrigger, cancel: &CancellationToken) {
    let span = info_span!("bootstrap.sweep", trigger = ?trigger);
    match engine.sweeper.sweep(trigger, cancel).instrument(span).await {
        Ok(report) => info!(
            demoted = report.retention.demoted,
            trashed = report.retention.trashed,
            erased = report.purge.map(|p| p.erased).unwrap_or(0),
            "Retention sweep finished"
        ),
        Err(e) => warn!(error = %e, ?trigger, "Retention sweep failed"),
    }
}
