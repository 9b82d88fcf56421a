//! Neighbour registry — peers admitted through the `IM` handshake.
//!
//! Keyed jointly by name AND listening port: a record is admitted only if
//! no existing record shares either. Records are never evicted, even after
//! the backing session is gone; sends on a stale sink fail silently.

use crate::session::LineSender;

/// A peer depot and the sink feeding its session's socket writer.
#[derive(Debug, Clone)]
pub struct Neighbour {
    pub name: String,
    pub port: u16,
    pub tx: LineSender,
}

#[derive(Debug, Default)]
pub struct NeighbourTable {
    peers: Vec<Neighbour>,
}

impl NeighbourTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a peer unless an existing record shares its name or port.
    pub fn try_admit(&mut self, name: &str, port: u16, tx: LineSender) -> bool {
        if self.peers.iter().any(|p| p.name == name || p.port == port) {
            return false;
        }
        self.peers.push(Neighbour {
            name: name.to_owned(),
            port,
            tx,
        });
        true
    }

    /// Clone of the sink for `name`. Linear scan; the table stays small.
    pub fn find_tx(&self, name: &str) -> Option<LineSender> {
        self.peers
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.tx.clone())
    }

    /// Copy of the records, ordered by name.
    pub fn snapshot_sorted(&self) -> Vec<Neighbour> {
        let mut peers = self.peers.clone();
        peers.sort_by(|a, b| a.name.cmp(&b.name));
        peers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn sink() -> LineSender {
        mpsc::unbounded_channel().0
    }

    #[test]
    fn admits_distinct_peers() {
        let mut table = NeighbourTable::new();
        assert!(table.try_admit("a", 4001, sink()));
        assert!(table.try_admit("b", 4002, sink()));
        assert!(table.find_tx("a").is_some());
        assert!(table.find_tx("b").is_some());
    }

    #[test]
    fn rejects_duplicate_name() {
        let mut table = NeighbourTable::new();
        assert!(table.try_admit("a", 4001, sink()));
        assert!(!table.try_admit("a", 4002, sink()));
        assert_eq!(table.snapshot_sorted().len(), 1);
    }

    #[test]
    fn rejects_duplicate_port() {
        let mut table = NeighbourTable::new();
        assert!(table.try_admit("a", 4001, sink()));
        assert!(!table.try_admit("b", 4001, sink()));
        assert_eq!(table.snapshot_sorted().len(), 1);
    }

    #[test]
    fn unknown_name_has_no_sink() {
        let table = NeighbourTable::new();
        assert!(table.find_tx("nobody").is_none());
    }

    #[test]
    fn snapshot_orders_by_name() {
        let mut table = NeighbourTable::new();
        table.try_admit("carol", 4003, sink());
        table.try_admit("alice", 4001, sink());
        table.try_admit("bob", 4002, sink());
        let names: Vec<_> = table
            .snapshot_sorted()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }
}
