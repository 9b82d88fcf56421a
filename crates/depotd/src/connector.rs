//! Outbound dialer for `Connect` directives.

use tokio::net::TcpStream;

use crate::depot::SharedDepot;
use crate::session;

/// Dial a peer's listening port and run the session actor over the
/// stream. Dial failure is silent: no retry, nothing reported to the
/// peer that asked.
pub async fn dial(port: u16, depot: SharedDepot) {
    let addr = format!("{}:{}", depot.connect_addr, port);
    match TcpStream::connect(&addr).await {
        Ok(stream) => session::run(stream, depot).await,
        Err(e) => tracing::debug!(%addr, error = %e, "dial failed"),
    }
}
