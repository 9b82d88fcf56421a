//! Protocol verb dispatch.
//!
//! Every handler checks the separator count of its line shape and the
//! validity of each field, and silently drops anything that fails:
//! byzantine input never produces a reply, a diagnostic above trace
//! level, or a dead process. Until the handshake completes only `IM` is
//! honoured.

use depot_core::validate::{parse_key, parse_port, parse_qty, valid_name};
use depot_core::wire::{self, ParsedLine, Verb};

use crate::connector;
use crate::session::Session;

impl Session {
    /// Dispatch one wire line, freshly read or replayed from the defer
    /// log. Replay re-enters here, so a deferred `Execute` recurses; the
    /// defer log's executed marks bound that recursion.
    pub(crate) fn dispatch_line(&mut self, raw: &str) {
        let line = wire::split_line(raw);
        let Some(verb) = Verb::parse(&line.args[0]) else {
            tracing::trace!(verb = %line.args[0], "unknown verb");
            return;
        };
        if !self.im_received && verb != Verb::Im {
            tracing::trace!(verb = verb.as_str(), "verb before handshake");
            return;
        }
        match verb {
            Verb::Connect => self.on_connect(&line),
            Verb::Im => self.on_im(&line),
            Verb::Deliver => self.on_deliver(&line),
            Verb::Withdraw => self.on_withdraw(&line),
            Verb::Transfer => self.on_transfer(&line),
            Verb::Defer => self.on_defer(&line),
            Verb::Execute => self.on_execute(&line),
        }
    }

    /// `IM:<port>:<name>` — admit the peer and complete the handshake.
    /// A second `IM` on the same session is a no-op, as is one whose name
    /// or port is already taken.
    fn on_im(&mut self, line: &ParsedLine) {
        if line.separators != 2 || self.im_received {
            return;
        }
        let Some(port) = parse_port(&line.args[1]) else {
            return;
        };
        let name = &line.args[2];
        if !valid_name(name) {
            return;
        }
        if self.depot.admit_neighbour(name, port, self.tx.clone()) {
            self.im_received = true;
            tracing::debug!(peer = %name, port, "neighbour admitted");
        }
    }

    /// `Connect:<port>` — dial a new peer on its own task.
    fn on_connect(&self, line: &ParsedLine) {
        if line.separators != 1 {
            return;
        }
        let Some(port) = parse_port(&line.args[1]) else {
            return;
        };
        tokio::spawn(connector::dial(port, self.depot.clone()));
    }

    /// `Deliver:<qty>:<good>` — add to the local ledger.
    fn on_deliver(&self, line: &ParsedLine) {
        if line.separators != 2 {
            return;
        }
        let Some(qty) = parse_qty(&line.args[1]) else {
            return;
        };
        let good = &line.args[2];
        if !valid_name(good) {
            return;
        }
        self.depot.deliver(good, qty);
    }

    /// `Withdraw:<qty>:<good>` — subtract from the local ledger.
    fn on_withdraw(&self, line: &ParsedLine) {
        if line.separators != 2 {
            return;
        }
        let Some(qty) = parse_qty(&line.args[1]) else {
            return;
        };
        let good = &line.args[2];
        if !valid_name(good) {
            return;
        }
        self.depot.withdraw(good, qty);
    }

    /// `Transfer:<qty>:<good>:<dest>` — debit locally and hand the goods
    /// to a neighbour. An unknown destination leaves the ledger alone.
    /// The sink clone is taken under the neighbour lock, the debit under
    /// the inventory lock, and the send outside both.
    fn on_transfer(&self, line: &ParsedLine) {
        if line.separators != 3 {
            return;
        }
        let Some(qty) = parse_qty(&line.args[1]) else {
            return;
        };
        let (good, dest) = (&line.args[2], &line.args[3]);
        if !valid_name(good) || !valid_name(dest) {
            return;
        }
        let Some(tx) = self.depot.neighbour_tx(dest) else {
            tracing::trace!(%dest, "transfer to unknown neighbour");
            return;
        };
        self.depot.withdraw(good, qty);
        // Fire and forget: a dead peer session drops the line silently.
        let _ = tx.send(wire::deliver_line(qty, good));
    }

    /// `Defer:<key>:<verb>:<a1>:<a2>[:<a3>]` — record the inner line for
    /// later replay. The inner command must have the `v:a:b` or `v:a:b:c`
    /// shape with no empty field.
    fn on_defer(&mut self, line: &ParsedLine) {
        if !matches!(line.separators, 4 | 5) {
            return;
        }
        let Some(key) = parse_key(&line.args[1]) else {
            return;
        };
        let inner = &line.args[2..];
        if inner.iter().any(|field| field.is_empty()) {
            return;
        }
        self.defers.record(key, wire::rebuild_line(inner));
    }

    /// `Execute:<key>` — replay every unexecuted record under the key, in
    /// insertion order, through the normal dispatcher. Fields beyond the
    /// key are tolerated, which keeps a deferred `Execute:<k>:<pad>` line
    /// replayable.
    fn on_execute(&mut self, line: &ParsedLine) {
        if line.separators < 1 {
            return;
        }
        let Some(key) = parse_key(&line.args[1]) else {
            return;
        };
        for stored in self.defers.take_pending(key) {
            self.dispatch_line(&stored);
        }
    }
}
