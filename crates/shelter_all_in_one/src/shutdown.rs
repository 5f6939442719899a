use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cancels `token` on SIGINT, or on SIGTERM on unix
pub fn spawn_signal_handler(token: CancellationToken) {
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                ctrl_c_token.cancel();
            }
            Err(err) => {
                error!("Error setting up signal handler: {}", err);
            }
        }
    });

    #[cfg(unix)]
    tokio::spawn(async move {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM signal");
                token.cancel();
            }
            Err(err) => {
                error!("Error setting up SIGTERM handler: {}", err);
            }
        }
    });
}
