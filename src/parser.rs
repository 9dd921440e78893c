use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// A single request extracted from one access log line.
///
/// Every field is kept as the exact text that appeared in the line. Nothing
/// is validated or coerced, so a record never fails to build once the line
/// has matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub client_address: String,
    pub timestamp_text: String,
    pub method: String,
    pub url: String,
    pub protocol: String,
    pub status_code: String,
    pub user_agent: String,
}

/// Expected log format (combined log format):
///   CLIENT - - [TIMESTAMP] "METHOD URL PROTOCOL" STATUS SIZE "REFERRER" "USER_AGENT"
///
/// Example:
///   127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 2326 "-" "Mozilla/5.0"
///
/// Only the start of the line is anchored; anything after the user agent's
/// closing quote (including a line terminator) is ignored. The status is
/// restricted to ASCII digits, unlike a Unicode-aware `\d`.
static COMBINED_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_regex() -> &'static Regex {
    COMBINED_REGEX.get_or_init(|| {
        Regex::new(
            r#"^(?P<client>\S+) - - \[(?P<timestamp>[^\]]*?)\] "(?P<method>\S+) (?P<url>\S+) (?P<protocol>[^"]+)" (?P<status>[0-9]{3}) \S+ "[^"]*" "(?P<agent>[^"]+)""#,
        )
        .expect("hard-coded regex should always compile")
    })
}

/// Parse a single access log line into a [`LogRecord`].
///
/// Returns `None` when the line does not follow the combined log format.
/// That is the normal outcome for noise in a log file and callers are
/// expected to skip such lines rather than treat them as failures.
pub fn parse_log_line(line: &str) -> Option<LogRecord> {
    let caps = get_regex().captures(line)?;

    Some(LogRecord {
        client_address: caps["client"].to_string(),
        timestamp_text: caps["timestamp"].to_string(),
        method: caps["method"].to_string(),
        url: caps["url"].to_string(),
        protocol: caps["protocol"].to_string(),
        status_code: caps["status"].to_string(),
        user_agent: caps["agent"].to_string(),
    })
}

// ─── Unit Tests ──────────────────────────────────────────────────────────────
