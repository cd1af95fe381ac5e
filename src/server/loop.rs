// Server loop module
// Accepts connections until shutdown, then waits for in-flight requests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Poll interval while draining connections
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop until `shutdown` is notified.
///
/// After the listener is closed, active connections get up to
/// `max(read_timeout, write_timeout)` seconds to finish.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
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

            _ = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);

    let performance = &state.config.performance;
    let grace = Duration::from_secs(std::cmp::max(
        performance.read_timeout,
        performance.write_timeout,
    ));
    drain_connections(&active_connections, grace).await;
    Ok(())
}

/// Wait until no connection is active or `grace` has elapsed.
///
/// Returns the number of connections still open when it gave up.
pub async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) -> usize {
    let remaining = active_connections.load(Ordering::SeqCst);
    logger::log_shutdown(remaining);

    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 {
            logger::log_info("[Shutdown] All connections closed");
            return 0;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "[Shutdown] Grace period elapsed with {remaining} connection(s) still open"
            ));
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}
