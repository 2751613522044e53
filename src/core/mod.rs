//! Core domain logic (transport-agnostic)
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **xdg**: XDG directory handling
//! - **index**: Index interface and the character-name index

pub mod config;
pub mod error;
pub mod index;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{FinderError, Result};
pub use index::{CharIndex, Index};
