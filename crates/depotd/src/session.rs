//! Per-connection session actor.
//!
//! Accepted and dialed sockets run the same actor: send our own `IM`
//! greeting, then read lines until EOF. The first two lines may be
//! anything (only `IM` is acted on before the handshake); from the third
//! line onward the session dies unless both sides have introduced
//! themselves. A session never times out and never reports an error to
//! its peer.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use depot_core::wire::{self, MAX_LINE_BYTES};

use crate::defer::DeferLog;
use crate::depot::SharedDepot;

/// Sink feeding a session's writer task. Clones of this live in the
/// neighbour table; sends to a dead session fail silently.
pub type LineSender = mpsc::UnboundedSender<String>;

/// Per-connection state: the shared depot handle, this session's own sink,
/// the handshake flags, and the session-local defer log.
pub struct Session {
    pub(crate) depot: SharedDepot,
    pub(crate) tx: LineSender,
    pub(crate) im_sent: bool,
    pub(crate) im_received: bool,
    pub(crate) defers: DeferLog,
}

impl Session {
    pub fn new(depot: SharedDepot, tx: LineSender) -> Self {
        Self {
            depot,
            tx,
            im_sent: false,
            im_received: false,
            defers: DeferLog::new(),
        }
    }

    /// Introduce ourselves. Each end sends exactly one of these as its
    /// first message.
    fn send_greeting(&mut self) {
        let _ = self
            .tx
            .send(wire::im_line(self.depot.port, &self.depot.name));
        self.im_sent = true;
    }
}

/// Drive one connection until EOF, socket error, or handshake violation.
pub async fn run(stream: TcpStream, depot: SharedDepot) {
    let peer = stream.peer_addr().ok();
    let (rd, wr) = stream.into_split();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(write_lines(wr, rx));

    let mut session = Session::new(depot, tx);
    session.send_greeting();

    let mut reader = LineReader::new(rd);
    let mut msg_count: u32 = 0;
    loop {
        let line = match reader.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::trace!(?peer, error = %e, "session read failed");
                break;
            }
        };
        if msg_count > 1 && !(session.im_sent && session.im_received) {
            tracing::trace!(?peer, "handshake never completed, dropping session");
            break;
        }
        session.dispatch_line(&line);
        msg_count += 1;
    }
    tracing::debug!(?peer, msg_count, "session closed");
}

/// Writer task: owns the socket's write half, drains the session's sink.
/// A failed write (peer gone mid-write) ends the task; later sends into
/// the sink error out and every caller ignores that.
async fn write_lines(mut wr: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = rx.recv().await {
        if let Err(e) = wr.write_all(line.as_bytes()).await {
            tracing::trace!(error = %e, "peer write failed");
            break;
        }
    }
}

// ── Line framing ──────────────────────────────────────────────────────────────

/// Byte-level framer: yields newline-terminated lines without their
/// newline, capping content at [`MAX_LINE_BYTES`] and discarding the
/// overflow up to the newline. A final unterminated chunk at EOF is
/// yielded as a line of its own.
pub(crate) struct LineReader<R> {
    inner: BufReader<R>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
        }
    }

    pub(crate) async fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line: Vec<u8> = Vec::new();
        loop {
            let buf = self.inner.fill_buf().await?;
            if buf.is_empty() {
                // EOF
                return if line.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
                };
            }
            match buf.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    let take = pos.min(MAX_LINE_BYTES - line.len());
                    line.extend_from_slice(&buf[..take]);
                    self.inner.consume(pos + 1);
                    return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
                }
                None => {
                    let take = buf.len().min(MAX_LINE_BYTES - line.len());
                    line.extend_from_slice(&buf[..take]);
                    let consumed = buf.len();
                    self.inner.consume(consumed);
                }
            }
        }
    }
}
