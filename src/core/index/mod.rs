//! Read-only search index consumed by client sessions.
//!
//! Sessions only need two operations from an index: `search` and
//! `format`. Both take `&self`, so one instance behind an `Arc` serves
//! every connection without locking.

mod charindex;
mod names;

pub use charindex::{tokenize, CharIndex};

/// Immutable lookup structure queried once per client request
pub trait Index: Send + Sync + 'static {
    /// One match returned by a search
    type Entry: Send;

    /// Find the entries matching `query`
    fn search(&self, query: &str) -> Vec<Self::Entry>;

    /// Render entries as display lines (no line terminators)
    fn format(&self, entries: &[Self::Entry]) -> Vec<String>;
}
