//! Depot wire grammar — the line protocol spoken between depots.
//!
//! This grammar IS the protocol. Every message is one ASCII line: fields
//! separated by `:`, terminated by `\n`, no framing beyond the newline.
//! The verb is the first field. A line carries at most [`MAX_LINE_BYTES`]
//! bytes of content; a peer sending more gets the prefix and loses the rest.

/// Maximum content bytes of a single line, newline excluded. Overflow is
/// truncated here and the remainder up to the newline discarded.
pub const MAX_LINE_BYTES: usize = 255;

/// Field separator within a line.
pub const SEPARATOR: char = ':';

// ── Verbs ─────────────────────────────────────────────────────────────────────

/// The seven protocol verbs. Anything else in the verb field makes the
/// whole line a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Connect,
    Im,
    Deliver,
    Withdraw,
    Transfer,
    Defer,
    Execute,
}

impl Verb {
    /// Map the verb field to a verb. Exact match, case-sensitive.
    pub fn parse(field: &str) -> Option<Verb> {
        match field {
            "Connect" => Some(Verb::Connect),
            "IM" => Some(Verb::Im),
            "Deliver" => Some(Verb::Deliver),
            "Withdraw" => Some(Verb::Withdraw),
            "Transfer" => Some(Verb::Transfer),
            "Defer" => Some(Verb::Defer),
            "Execute" => Some(Verb::Execute),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Connect => "Connect",
            Verb::Im => "IM",
            Verb::Deliver => "Deliver",
            Verb::Withdraw => "Withdraw",
            Verb::Transfer => "Transfer",
            Verb::Defer => "Defer",
            Verb::Execute => "Execute",
        }
    }
}

// ── Lexing ────────────────────────────────────────────────────────────────────

/// A lexed line: the `:`-separated fields plus the separator count the
/// verb handlers use to reject malformed shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub args: Vec<String>,
    pub separators: u8,
}

/// Split a line on `:`. A trailing `\n`, if present, is stripped first;
/// an empty field after a trailing `:` is preserved. A line within
/// [`MAX_LINE_BYTES`] cannot hold more than 255 separators, so the count
/// fits its `u8`.
pub fn split_line(line: &str) -> ParsedLine {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let args: Vec<String> = line.split(SEPARATOR).map(str::to_owned).collect();
    let separators = (args.len() - 1).min(u8::MAX as usize) as u8;
    ParsedLine { args, separators }
}

// ── Line builders ─────────────────────────────────────────────────────────────

/// The handshake greeting each end sends as its first message.
pub fn im_line(port: u16, name: &str) -> String {
    format!("IM:{port}:{name}\n")
}

/// The delivery a `Transfer` dispatches to the destination depot.
pub fn deliver_line(qty: u32, good: &str) -> String {
    format!("Deliver:{qty}:{good}\n")
}

/// Rejoin lexed fields into a wire line. Used to store deferred commands
/// exactly as they will later be replayed.
pub fn rebuild_line(fields: &[String]) -> String {
    let mut line = fields.join(":");
    line.push('\n');
    line
}

// ── Tests ─────────────────────────────────────────────────────────────────────
