use config_reloader::{cli, logging};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level, args.log_format) {
        eprintln!("config-reloader: failed to initialise logging: {err}");
        return ExitCode::FAILURE;
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting config-reloader");

    let reloader = match args.reloader_builder().build() {
        Ok(reloader) => reloader,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let token = CancellationToken::new();
    tokio::spawn({
        let token = token.clone();
        async move {
            wait_for_interrupt().await;
            warn!("shutting down");
            token.cancel();
        }
    });

    match reloader.run(token).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if !err.is_fatal() => {
            info!(error = %err, "stopped during reload");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "error watching config");
            ExitCode::FAILURE
        }
    }
}

#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(terminate) => terminate,
        Err(err) => {
            warn!(error = %err, "failed to install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() {
    let _ = tokio::signal::ctrl_c().await;
}
