//! Process-wide depot state — shared by every session and the signal
//! watcher.
//!
//! Inventory and neighbour table each form one synchronization domain.
//! Critical sections are short, panic-free, and never held across an
//! await; network writes always happen outside both locks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::inventory::{Good, Inventory};
use crate::neighbours::{Neighbour, NeighbourTable};
use crate::session::LineSender;

pub struct Depot {
    pub name: String,
    pub port: u16,
    /// Address `Connect` directives dial, from config.
    pub connect_addr: String,
    inventory: Mutex<Inventory>,
    neighbours: Mutex<NeighbourTable>,
}

/// Shared handle passed into each session rather than kept as a global.
pub type SharedDepot = Arc<Depot>;

impl Depot {
    pub fn new(
        name: String,
        port: u16,
        connect_addr: String,
        seeds: &[(String, i32)],
    ) -> SharedDepot {
        let mut inventory = Inventory::new();
        for (good, qty) in seeds {
            inventory.seed(good, *qty);
        }
        Arc::new(Self {
            name,
            port,
            connect_addr,
            inventory: Mutex::new(inventory),
            neighbours: Mutex::new(NeighbourTable::new()),
        })
    }

    pub fn deliver(&self, good: &str, qty: u32) {
        lock(&self.inventory).deliver(good, qty);
    }

    pub fn withdraw(&self, good: &str, qty: u32) {
        lock(&self.inventory).withdraw(good, qty);
    }

    pub fn goods_snapshot(&self) -> Vec<Good> {
        lock(&self.inventory).snapshot_sorted_nonzero()
    }

    pub fn admit_neighbour(&self, name: &str, port: u16, tx: LineSender) -> bool {
        lock(&self.neighbours).try_admit(name, port, tx)
    }

    /// Clone of a neighbour's sink; the lock is released before the caller
    /// sends anything.
    pub fn neighbour_tx(&self, name: &str) -> Option<LineSender> {
        lock(&self.neighbours).find_tx(name)
    }

    pub fn neighbours_snapshot(&self) -> Vec<Neighbour> {
        lock(&self.neighbours).snapshot_sorted()
    }
}

// Critical sections cannot panic, so a poisoned guard still holds
// consistent state.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn seeds_populate_the_ledger() {
        let depot = Depot::new(
            "a".into(),
            4000,
            "127.0.0.1".into(),
            &[("milk".into(), 5), ("bread".into(), 0)],
        );
        let goods = depot.goods_snapshot();
        assert_eq!(goods.len(), 1);
        assert_eq!(goods[0].name, "milk");
        assert_eq!(goods[0].qty, 5);
    }

    #[test]
    fn admission_and_lookup_round_trip() {
        let depot = Depot::new("a".into(), 4000, "127.0.0.1".into(), &[]);
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(depot.admit_neighbour("b", 4001, tx));
        assert!(depot.neighbour_tx("b").is_some());
        assert!(depot.neighbour_tx("c").is_none());
    }
}
