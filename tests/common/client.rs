// Line-protocol test client

use mojifinder::server::protocol::{PROMPT, RULE_CHAR};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Upper bound for any single read in tests
const READ_TIMEOUT: Duration = Duration::from_secs(5);

async fn bounded<T>(what: &str, fut: impl Future<Output = T>) -> T {
    tokio::time::timeout(READ_TIMEOUT, fut)
        .await
        .unwrap_or_else(|_| panic!("Timed out waiting for {what}"))
}

/// Result lines and the status line of one response
#[allow(dead_code)] // Used in integration tests
#[derive(Debug)]
pub struct Response {
    pub lines: Vec<String>,
    pub status: String,
}

impl Response {
    /// Count reported by the status line
    #[allow(dead_code)] // Used in integration tests
    pub fn found(&self) -> usize {
        self.status
            .trim_start_matches(RULE_CHAR)
            .trim()
            .trim_end_matches("found")
            .trim()
            .parse()
            .expect("Status line carries a count")
    }
}

/// Client connection speaking the query protocol
#[allow(dead_code)] // Used in integration tests
pub struct Client {
    stream: BufReader<TcpStream>,
}

impl Client {
    #[allow(dead_code)] // Used in integration tests
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        Self {
            stream: BufReader::new(stream),
        }
    }

    /// Read exactly one prompt
    #[allow(dead_code)] // Used in integration tests
    pub async fn expect_prompt(&mut self) {
        let mut prompt = [0u8; 3];
        bounded("prompt", self.stream.read_exact(&mut prompt))
            .await
            .expect("Connection closed before prompt");
        assert_eq!(&prompt, PROMPT);
    }

    #[allow(dead_code)] // Used in integration tests
    pub async fn send(&mut self, bytes: &[u8]) {
        self.stream
            .get_mut()
            .write_all(bytes)
            .await
            .expect("Failed to send");
    }

    /// Send one query line and read its response and the next prompt
    #[allow(dead_code)] // Used in integration tests
    pub async fn query(&mut self, query: &str) -> Response {
        self.send(format!("{query}\n").as_bytes()).await;
        let response = self.read_response().await;
        self.expect_prompt().await;
        response
    }

    /// Read CRLF lines up to and including the status line
    #[allow(dead_code)] // Used in integration tests
    pub async fn read_response(&mut self) -> Response {
        let mut lines = Vec::new();
        loop {
            let mut raw = Vec::new();
            let n = bounded("response line", self.stream.read_until(b'\n', &mut raw))
                .await
                .expect("Read failed");
            assert!(n > 0, "Connection closed mid-response");

            let line = String::from_utf8(raw).expect("Response is UTF-8");
            let line = line
                .strip_suffix("\r\n")
                .expect("Lines end in CRLF")
                .to_string();

            if line.starts_with(RULE_CHAR) {
                return Response {
                    lines,
                    status: line,
                };
            }
            lines.push(line);
        }
    }

    /// Everything the server sends until it closes the connection
    #[allow(dead_code)] // Used in integration tests
    pub async fn read_to_close(&mut self) -> Vec<u8> {
        let mut rest = Vec::new();
        bounded("close", self.stream.read_to_end(&mut rest))
            .await
            .expect("Read failed");
        rest
    }

    /// Half-close: the server sees end of stream
    #[allow(dead_code)] // Used in integration tests
    pub async fn shutdown_write(&mut self) {
        self.stream
            .get_mut()
            .shutdown()
            .await
            .expect("Failed to shut down write half");
    }
}
