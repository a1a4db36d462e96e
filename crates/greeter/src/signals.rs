//! Interrupt handling for cancelling an in-flight load pass.

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Resolves once the process receives an interrupt.
///
/// Handles SIGINT and SIGTERM on Unix and Ctrl+C elsewhere.
pub async fn wait_for_interrupt() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c().await?;

    Ok(())
}

/// Cancels `token` when an interrupt arrives. Returns early if the token is
/// cancelled by someone else or the handlers cannot be installed.
pub async fn cancel_on_interrupt(token: CancellationToken) {
    tokio::select! {
        result = wait_for_interrupt() => match result {
            Ok(()) => {
                warn!("📡 Received interrupt - cancelling plugin loading");
                token.cancel();
            }
            Err(e) => warn!("⚠️ Could not install signal handlers: {e}"),
        },
        _ = token.cancelled() => (),
    }
}
