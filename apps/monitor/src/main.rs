//! tf2rp monitor entry point.

mod app;
mod config;

#[cfg(target_os = "linux")]
#[path = "process_linux.rs"]
mod process;

#[cfg(not(target_os = "linux"))]
#[path = "process_other.rs"]
mod process;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // The log level fallback lives in the config, so load it first.
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        wait_time = config.wait_time,
        scan_kb = config.console_scan_kb,
        "starting tf2rp monitor"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let cancel = CancellationToken::new();

        let ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "can't listen for Ctrl-C");
                return;
            }
            tracing::info!("SIGINT received, shutting down");
            ctrl_c.cancel();
        });

        app::run(config, cancel).await
    })?;

    tracing::info!("monitor shut down cleanly");
    Ok(())
}
