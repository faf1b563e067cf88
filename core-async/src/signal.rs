//! Process shutdown signals.
//!
//! The service loop listens on a [`CancellationToken`]; this module bridges
//! OS signals (Ctrl-C everywhere, SIGTERM on Unix) into that token.

use crate::sync::CancellationToken;

/// Resolves when the process receives Ctrl-C or (on Unix) SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // Without a handler we can never observe Ctrl-C; wait forever instead.
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Spawns a listener that cancels `token` on the first shutdown signal.
pub fn cancel_on_shutdown(token: CancellationToken) -> crate::task::JoinHandle<()> {
    crate::task::spawn(async move {
        shutdown_signal().await;
        token.cancel();
    })
}
