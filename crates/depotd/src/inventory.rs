//! Goods ledger — named quantities with ordered enumeration.
//!
//! Records are created by startup seeding or by the first `Deliver` or
//! `Withdraw` naming the good, and are never removed: a balance may sit at
//! zero or go negative for the life of the process.

use std::collections::BTreeMap;

/// One good as it appears in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Good {
    pub name: String,
    pub qty: i64,
}

#[derive(Debug, Default)]
pub struct Inventory {
    goods: BTreeMap<String, i64>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `qty` of `good`, inserting the record if absent.
    pub fn deliver(&mut self, good: &str, qty: u32) {
        *self.goods.entry(good.to_owned()).or_insert(0) += i64::from(qty);
    }

    /// Remove `qty` of `good`. An absent good is inserted with a negative
    /// balance.
    pub fn withdraw(&mut self, good: &str, qty: u32) {
        *self.goods.entry(good.to_owned()).or_insert(0) -= i64::from(qty);
    }

    /// Seed a good from the command line. Duplicate names merge by
    /// addition so keys stay unique.
    pub fn seed(&mut self, good: &str, qty: i32) {
        *self.goods.entry(good.to_owned()).or_insert(0) += i64::from(qty);
    }

    /// Records with a nonzero balance, ordered by name.
    pub fn snapshot_sorted_nonzero(&self) -> Vec<Good> {
        self.goods
            .iter()
            .filter(|(_, &qty)| qty != 0)
            .map(|(name, &qty)| Good {
                name: name.clone(),
                qty,
            })
            .collect()
    }
}
