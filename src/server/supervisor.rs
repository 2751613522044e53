//! Connection acceptor.
//!
//! The [`Supervisor`] owns the listening socket and the accept loop. Every
//! accepted connection gets its own [`Session`] task; the loop never waits
//! for a session before accepting the next connection. Sessions are
//! tracked only so that shutdown can wait for them.

use crate::core::config::ServerConfig;
use crate::core::error::{FinderError, Result};
use crate::core::index::Index;
use crate::server::session::{Session, SessionConfig};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Pause after a failed accept so resource exhaustion cannot spin the loop
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Cloneable handle that stops a running [`Supervisor`]
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    token: CancellationToken,
    active: Arc<AtomicUsize>,
}

impl ShutdownHandle {
    /// Stop accepting connections and release idle sessions
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Sessions currently running
    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// Decrements the active session count when a session task ends
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Listening endpoint plus the accept loop
pub struct Supervisor<I> {
    listener: TcpListener,
    local_addr: SocketAddr,
    index: Arc<I>,
    session_config: SessionConfig,
    max_connections: usize,
    shutdown_grace: Duration,
    shutdown: CancellationToken,
    sessions: TaskTracker,
    active: Arc<AtomicUsize>,
}

impl<I: Index> Supervisor<I> {
    /// Bind `host:port` with default limits
    pub async fn start(index: Arc<I>, host: &str, port: u16) -> Result<Self> {
        let config = ServerConfig {
            host: host.to_string(),
            port,
            ..ServerConfig::default()
        };
        Self::bind(index, &config).await
    }

    /// Bind the endpoint described by `config`
    ///
    /// Fails with [`FinderError::InvalidAddress`] when the host does not
    /// resolve and [`FinderError::Bind`] when the address cannot be bound.
    pub async fn bind(index: Arc<I>, config: &ServerConfig) -> Result<Self> {
        let addr = resolve(&config.host, config.port).await?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| FinderError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        info!("Listening on {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
            index,
            session_config: SessionConfig::from(config),
            max_connections: config.max_connections,
            shutdown_grace: config.shutdown_grace(),
            shutdown: CancellationToken::new(),
            sessions: TaskTracker::new(),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            token: self.shutdown.clone(),
            active: Arc::clone(&self.active),
        }
    }

    /// Accept connections until stopped, then wait for sessions to close
    pub async fn serve(self) -> Result<()> {
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_session(stream, peer),
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }

        let Supervisor {
            listener,
            sessions,
            active,
            shutdown_grace,
            ..
        } = self;
        drop(listener);
        info!("Stopped accepting connections");

        sessions.close();
        if tokio::time::timeout(shutdown_grace, sessions.wait())
            .await
            .is_err()
        {
            warn!(
                "{} session(s) still open after {:?}",
                active.load(Ordering::SeqCst),
                shutdown_grace
            );
        }

        Ok(())
    }

    fn spawn_session(&self, stream: TcpStream, peer: SocketAddr) {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        let guard = ActiveGuard(Arc::clone(&self.active));

        if self.max_connections > 0 && active > self.max_connections {
            warn!(
                "Refusing {}: {} sessions already open",
                peer, self.max_connections
            );
            return;
        }

        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not set TCP_NODELAY for {}: {}", peer, e);
        }

        info!("Accepted {} (active_sessions={})", peer, active);

        let session = Session::new(
            stream,
            peer.to_string(),
            Arc::clone(&self.index),
            self.session_config.clone(),
            self.shutdown.clone(),
        );

        self.sessions.spawn(async move {
            let _guard = guard;
            // Session::run logs its own outcome
            let _ = session.run().await;
        });
    }
}

/// Resolve `host:port` to the first socket address
async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| FinderError::InvalidAddress(format!("{host}:{port}: {e}")))?;

    addrs
        .next()
        .ok_or_else(|| FinderError::InvalidAddress(format!("{host}:{port}: no addresses")))
}
