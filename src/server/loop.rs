// Server loop module
// Accepts connections until shutdown is requested, then drains open ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the gateway accept loop.
///
/// Returns once `shutdown` is notified and either every open connection has
/// finished or `write_timeout` seconds have passed.
///
/// # Errors
///
/// Currently never; accept failures are logged and the loop continues.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run_server(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown(active_connections.load(Ordering::SeqCst));
                break;
            }
        }
    }

    drop(listener);
    let deadline = Duration::from_secs(state.config.performance.write_timeout);
    drain_connections(&active_connections, deadline).await;
    Ok(())
}

/// Wait for open connections to finish, giving up after `deadline`
async fn drain_connections(active_connections: &AtomicUsize, deadline: Duration) {
    let drained = tokio::time::timeout(deadline, async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    })
    .await;

    match drained {
        Ok(()) => logger::log_info("All connections closed"),
        Err(_) => logger::log_warning(&format!(
            "Shutdown with {} connections still open after {}s",
            active_connections.load(Ordering::SeqCst),
            deadline.as_secs()
        )),
    }
}
