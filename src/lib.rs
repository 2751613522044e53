//! Mojifinder - find Unicode characters by name over TCP
//!
//! A concurrent, line-oriented query server. Each client connection gets a
//! session that prompts with `?> `, reads one query line, looks every word
//! up in a shared read-only character-name index and streams back the
//! matching characters followed by a status line.
//!
//! # Architecture
//!
//! - **core**: Domain logic (transport-agnostic)
//!   - config, error, xdg
//!   - index (the `Index` trait and `CharIndex`)
//!
//! - **server**: TCP adapter (depends on core)
//!   - protocol, session, supervisor
//!
//! - **cli**: Command-line entry point (depends on core and server)
//!
//! # Example session
//!
//! ```text
//! $ nc 127.0.0.1 2323
//! ?> chess black
//! U+265A  ♚  BLACK CHESS KING
//! ...
//! ────────────────────────────────────────────────────────────────── 6 found
//! ?>
//! ```

// Core domain logic (transport-agnostic)
pub mod core;

// TCP server adapter
pub mod server;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{FinderError, Result};
pub use crate::core::index::{CharIndex, Index};
pub use server::{Session, ShutdownHandle, Supervisor};
