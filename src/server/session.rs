//! Per-connection protocol handler.
//!
//! A [`Session`] owns one client connection and drives the
//! prompt → read → search → respond loop until the client disconnects,
//! hangs up with a control character, the server shuts down, or an I/O
//! error occurs. Whatever ends the loop, the connection is shut down
//! before [`Session::run`] returns.

use crate::core::config::ServerConfig;
use crate::core::index::Index;
use crate::server::protocol::{parse_request, status_line, Request, CRLF, PROMPT};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
    BufWriter, ReadHalf, WriteHalf,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Failures that end a single session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Query line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("No query received within {0:?}")]
    IdleTimeout(Duration),
}

/// Why a session ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Client closed its side of the connection
    PeerClosed,
    /// Client sent a line starting with a control character
    HangUp,
    /// Server stopped while the session waited for a query
    Shutdown,
}

/// Per-session limits
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_line_length: usize,
    pub idle_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for SessionConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_line_length: config.max_line_length,
            idle_timeout: config.idle_timeout(),
        }
    }
}

enum Incoming {
    Line(Vec<u8>),
    EndOfStream,
    Shutdown,
}

/// One client connection and its conversation state
pub struct Session<I, S> {
    reader: BufReader<ReadHalf<S>>,
    writer: BufWriter<WriteHalf<S>>,
    peer: String,
    index: Arc<I>,
    config: SessionConfig,
    shutdown: CancellationToken,
    queries: u64,
}

impl<I, S> Session<I, S>
where
    I: Index,
    S: AsyncRead + AsyncWrite + Send,
{
    pub fn new(
        stream: S,
        peer: impl Into<String>,
        index: Arc<I>,
        config: SessionConfig,
        shutdown: CancellationToken,
    ) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            peer: peer.into(),
            index,
            config,
            shutdown,
            queries: 0,
        }
    }

    /// Drive the conversation to its end, then close the connection
    pub async fn run(mut self) -> Result<SessionOutcome, SessionError> {
        let result = self.converse().await;

        if let Err(e) = self.writer.shutdown().await {
            debug!("Shutdown of {} failed: {}", self.peer, e);
        }

        match &result {
            Ok(outcome) => info!(
                "Close {} ({:?}, {} queries)",
                self.peer, outcome, self.queries
            ),
            Err(e) => warn!("Close {} after error: {}", self.peer, e),
        }

        result
    }

    async fn converse(&mut self) -> Result<SessionOutcome, SessionError> {
        loop {
            self.writer.write_all(PROMPT).await?;
            self.writer.flush().await?;

            let line = match self.next_line().await? {
                Incoming::Line(line) => line,
                Incoming::EndOfStream => return Ok(SessionOutcome::PeerClosed),
                Incoming::Shutdown => return Ok(SessionOutcome::Shutdown),
            };

            match parse_request(&line) {
                Request::Empty => continue,
                Request::HangUp => return Ok(SessionOutcome::HangUp),
                Request::Search(query) => {
                    info!("From {}: {:?}", self.peer, query);
                    self.queries += 1;
                    let found = self.respond(&query).await?;
                    info!("To {}: {} results.", self.peer, found);
                }
            }
        }
    }

    async fn next_line(&mut self) -> Result<Incoming, SessionError> {
        let shutdown = self.shutdown.clone();
        let limit = self.config.max_line_length;
        let idle_timeout = self.config.idle_timeout;
        let mut line = Vec::new();

        let read = async {
            let read = read_line_bounded(&mut self.reader, &mut line, limit);
            match idle_timeout {
                Some(idle) => match tokio::time::timeout(idle, read).await {
                    Ok(read) => read,
                    Err(_) => Err(SessionError::IdleTimeout(idle)),
                },
                None => read.await,
            }
        };

        let read = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return Ok(Incoming::Shutdown),
            read = read => read?,
        };

        if read == 0 {
            Ok(Incoming::EndOfStream)
        } else {
            Ok(Incoming::Line(line))
        }
    }

    /// Write the result lines and the status line, flushing each
    async fn respond(&mut self, query: &str) -> Result<usize, SessionError> {
        let (found, lines) = {
            let entries = self.index.search(query);
            (entries.len(), self.index.format(&entries))
        };

        for line in &lines {
            self.writer.write_all(line.as_bytes()).await?;
            self.writer.write_all(CRLF).await?;
        }
        self.writer.flush().await?;

        self.writer.write_all(status_line(found).as_bytes()).await?;
        self.writer.write_all(CRLF).await?;
        self.writer.flush().await?;

        Ok(found)
    }
}

/// Read up to and including a newline, at most `limit` bytes
///
/// Returns 0 at end of stream. A final line without a newline is
/// returned as is.
async fn read_line_bounded<R>(
    reader: &mut R,
    line: &mut Vec<u8>,
    limit: usize,
) -> Result<usize, SessionError>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.take(limit as u64).read_until(b'\n', line).await?;
    if read == limit && line.last() != Some(&b'\n') {
        return Err(SessionError::LineTooLong { limit });
    }
    Ok(read)
}
