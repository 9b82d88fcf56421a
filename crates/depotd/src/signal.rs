//! SIGHUP watcher — dumps goods and neighbours to stdout.
//!
//! One dedicated task blocks on the signal instead of running in signal
//! context; each snapshot goes through the same locks as the mutating
//! verbs, so the dump is consistent with some sequential order of
//! completed updates. SIGPIPE needs no handling of its own: the runtime
//! ignores it before `main`, and broken-pipe write errors are swallowed
//! where they surface.

use std::io::Write;

use anyhow::Result;
use tokio::signal::unix::{signal, SignalKind};

use crate::depot::{Depot, SharedDepot};

/// Runs until the process exits; one dump per SIGHUP.
pub async fn watch(depot: SharedDepot) -> Result<()> {
    let mut hangup = signal(SignalKind::hangup())?;
    while hangup.recv().await.is_some() {
        dump(&depot);
    }
    Ok(())
}

fn dump(depot: &Depot) {
    let goods = depot.goods_snapshot();
    let neighbours = depot.neighbours_snapshot();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let _ = writeln!(out, "Goods:");
    for good in &goods {
        let _ = writeln!(out, "{} {}", good.name, good.qty);
    }
    let _ = writeln!(out, "Neighbours:");
    for peer in &neighbours {
        let _ = writeln!(out, "{}", peer.name);
    }
    let _ = out.flush();
}
