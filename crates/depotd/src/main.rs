//! depotd — distributed depot daemon.
use std::io::Write;

use anyhow::{Context, Result};
use tokio::net::TcpSocket;

use depot_core::config::DepotConfig;

mod args;
mod connector;
mod defer;
mod depot;
mod dispatch;
mod inventory;
mod neighbours;
mod session;
mod signal;

use depot::Depot;

#[tokio::main]
async fn main() -> Result<()> {
    let invocation = match args::parse(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    };

    // Diagnostics go to stderr and only when RUST_LOG asks for them —
    // stdout belongs to the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = DepotConfig::load().context("failed to load config")?;

    let socket = TcpSocket::new_v4()?;
    socket.bind(
        format!("{}:0", config.network.bind_addr)
            .parse()
            .context("invalid bind address")?,
    )?;
    let listener = socket.listen(config.network.backlog)?;
    let port = listener.local_addr()?.port();

    let depot = Depot::new(
        invocation.name,
        port,
        config.network.connect_addr.clone(),
        &invocation.seeds,
    );
    tracing::info!(name = %depot.name, port, "depot listening");

    // The port line is the only startup output.
    println!("{port}");
    std::io::stdout().flush()?;

    let watcher = {
        let depot = depot.clone();
        tokio::spawn(async move {
            if let Err(e) = signal::watch(depot).await {
                tracing::error!(error = %e, "signal watcher failed");
            }
        })
    };

    let acceptor = {
        let depot = depot.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        tracing::debug!(%peer, "inbound connection");
                        tokio::spawn(session::run(stream, depot.clone()));
                    }
                    Err(e) => tracing::warn!(error = %e, "accept failed"),
                }
            }
        })
    };

    tokio::select! {
        r = watcher => tracing::error!("signal watcher exited: {:?}", r),
        r = acceptor => tracing::error!("accept loop exited: {:?}", r),
    }

    Ok(())
}
