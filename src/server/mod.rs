//! TCP query server
//!
//! - **protocol**: prompt, line terminator, request classification, status line
//! - **session**: per-connection prompt/read/search/respond loop
//! - **supervisor**: listening socket, accept loop, shutdown

pub mod protocol;
pub mod session;
pub mod supervisor;

pub use session::{Session, SessionConfig, SessionError, SessionOutcome};
pub use supervisor::{ShutdownHandle, Supervisor};
