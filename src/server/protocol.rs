//! Wire protocol shared by the session loop and its tests.
//!
//! The protocol is plain text over TCP. The server sends [`PROMPT`], the
//! client answers with one newline-terminated query line, and the server
//! replies with zero or more result lines followed by one status line.
//! Every server line ends in [`CRLF`]; the prompt does not.

/// Prompt written before every query line is read
pub const PROMPT: &[u8] = b"?> ";

/// Line terminator for every line the server writes
pub const CRLF: &[u8] = b"\r\n";

/// Query substituted for a line that is not valid UTF-8
pub const PLACEHOLDER_QUERY: &str = "\0";

/// Rule character and width of the status line
pub const RULE_CHAR: char = '\u{2500}';
pub const RULE_WIDTH: usize = 66;

/// What the client asked for with one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Blank line; prompt again without searching
    Empty,
    /// Line starting with a control character; the client is hanging up
    HangUp,
    /// Search the index for this trimmed query
    Search(String),
}

/// Decode one raw line into a query string
///
/// Surrounding Unicode whitespace, including the line terminator, is
/// stripped. The separators U+001C..=U+001F are not whitespace and survive,
/// so a line holding one of them hangs up. Bytes that are not valid UTF-8 become [`PLACEHOLDER_QUERY`].
pub fn decode_query(line: &[u8]) -> String {
    match std::str::from_utf8(line) {
        Ok(text) => text.trim().to_string(),
        Err(_) => PLACEHOLDER_QUERY.to_string(),
    }
}

/// Classify a decoded query
pub fn classify(query: String) -> Request {
    match query.chars().next() {
        None => Request::Empty,
        Some(first) if (first as u32) < 32 => Request::HangUp,
        Some(_) => Request::Search(query),
    }
}

/// Decode and classify one raw line
pub fn parse_request(line: &[u8]) -> Request {
    classify(decode_query(line))
}

/// Status line closing every response, without its terminator
///
/// ```
/// use mojifinder::server::protocol::status_line;
///
/// assert!(status_line(2).ends_with(" 2 found"));
/// ```
pub fn status_line(count: usize) -> String {
    let rule: String = std::iter::repeat(RULE_CHAR).take(RULE_WIDTH).collect();
    format!("{rule} {count} found")
}
