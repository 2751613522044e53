// Common test utilities and fixtures

pub mod client;
pub mod fixtures;

// Re-export commonly used items
// Note: not every test binary uses every helper
#[allow(unused_imports)]
pub use client::{Client, Response};
#[allow(unused_imports)]
pub use fixtures::{spawn_server, spawn_server_with, MultiLineIndex, StubIndex, TestServer};
