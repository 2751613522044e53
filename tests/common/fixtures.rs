// Test fixtures: stub indexes and a server running on an ephemeral port

use mojifinder::core::config::ServerConfig;
use mojifinder::core::error::Result;
use mojifinder::{Index, ShutdownHandle, Supervisor};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Index with canned answers per query; unknown queries find nothing
#[allow(dead_code)] // Used in integration tests
#[derive(Default)]
pub struct StubIndex {
    answers: HashMap<String, Vec<String>>,
}

impl StubIndex {
    #[allow(dead_code)] // Used in integration tests
    pub fn with(mut self, query: &str, entries: &[&str]) -> Self {
        self.answers.insert(
            query.to_string(),
            entries.iter().map(|e| e.to_string()).collect(),
        );
        self
    }
}

impl Index for StubIndex {
    type Entry = String;

    fn search(&self, query: &str) -> Vec<String> {
        self.answers.get(query).cloned().unwrap_or_default()
    }

    fn format(&self, entries: &[String]) -> Vec<String> {
        entries.to_vec()
    }
}

/// Index whose formatter renders every entry on two lines
#[allow(dead_code)] // Used in integration tests
pub struct MultiLineIndex;

impl Index for MultiLineIndex {
    type Entry = char;

    fn search(&self, query: &str) -> Vec<char> {
        query.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn format(&self, entries: &[char]) -> Vec<String> {
        entries
            .iter()
            .flat_map(|c| [format!("char {c}"), format!("code {}", *c as u32)])
            .collect()
    }
}

/// Running server plus the handles to stop and join it
#[allow(dead_code)] // Used in integration tests
pub struct TestServer {
    pub addr: SocketAddr,
    pub handle: ShutdownHandle,
    pub task: JoinHandle<Result<()>>,
}

impl TestServer {
    /// Stop the server and wait for `serve` to return
    #[allow(dead_code)] // Used in integration tests
    pub async fn stop(self) -> Result<()> {
        self.handle.stop();
        self.task.await.expect("server task panicked")
    }
}

/// Serve `index` on 127.0.0.1 with an ephemeral port
#[allow(dead_code)] // Used in integration tests
pub async fn spawn_server<I: Index>(index: I) -> TestServer {
    spawn_server_with(index, ServerConfig::default()).await
}

/// Serve `index` with custom limits (host and port are forced)
#[allow(dead_code)] // Used in integration tests
pub async fn spawn_server_with<I: Index>(index: I, mut config: ServerConfig) -> TestServer {
    config.host = "127.0.0.1".to_string();
    config.port = 0;

    let supervisor = Supervisor::bind(Arc::new(index), &config)
        .await
        .expect("Failed to bind test server");
    let addr = supervisor.local_addr();
    let handle = supervisor.shutdown_handle();
    let task = tokio::spawn(supervisor.serve());

    TestServer { addr, handle, task }
}
