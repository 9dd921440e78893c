use crate::analyzer::{self, Summary};
use crate::error::ReportError;
use crate::parser::{self, LogRecord};
use crate::report;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default number of entries kept in each top-N table
pub const DEFAULT_TOP_N: usize = 5;

/// Default file name of the HTML report
pub const DEFAULT_OUTPUT: &str = "report.html";

/// Everything one report run needs
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub top_n: usize,
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
}

/// Records parsed from a log, plus how many non-blank lines did not match
#[derive(Debug, Default)]
pub struct ParsedLog {
    pub records: Vec<LogRecord>,
    pub skipped_lines: usize,
}

/// Parse every line of an in-memory log.
///
/// `\n`, `\r\n` and a bare `\r` all end a line. Blank lines are ignored.
/// Lines that do not match the combined format are dropped and only counted.
pub fn parse_lines(text: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();
    let normalized = text.replace("\r\n", "\n");

    for (line_num, line) in normalized.split(['\n', '\r']).enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parser::parse_log_line(line) {
            Some(record) => parsed.records.push(record),
            None => {
                parsed.skipped_lines += 1;
                let preview: String = line.chars().take(80).collect();
                debug!(line = line_num + 1, text = %preview, "skipping unparsable line");
            }
        }
    }

    parsed
}

/// Read a whole log file into memory and parse it.
///
/// Invalid UTF-8 is replaced rather than rejected so one corrupt line cannot
/// sink the run.
pub fn read_log(path: &Path) -> Result<ParsedLog, ReportError> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_lines(&String::from_utf8_lossy(&bytes)))
}

/// Read, parse, aggregate and write the report(s) for one log file.
///
/// Returns the summary together with the number of skipped lines.
pub fn run(options: &RunOptions) -> Result<(Summary, usize), ReportError> {
    let parsed = read_log(&options.input)?;
    info!(
        path = %options.input.display(),
        records = parsed.records.len(),
        skipped = parsed.skipped_lines,
        "parsed log file"
    );

    let summary = analyzer::analyze(&parsed.records, options.top_n);

    report::write_html(&summary, &options.output)?;
    info!(path = %options.output.display(), "wrote HTML report");

    if let Some(json_path) = &options.json_output {
        report::export_json(&summary, parsed.skipped_lines, json_path)?;
        info!(path = %json_path.display(), "wrote JSON report");
    }

    Ok((summary, parsed.skipped_lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str =
        r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 2326 "-" "Mozilla/5.0""#;

    #[test]
    fn skips_malformed_and_blank_lines() {
        let text = format!("{VALID}\nnot a valid log line\n\n   \n{VALID}\n");
        let parsed = parse_lines(&text);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped_lines, 1);
    }

    #[test]
    fn malformed_lines_do_not_affect_aggregates() {
        let with_noise = parse_lines(&format!("{VALID}\nnot a valid log line\n"));
        let clean = parse_lines(VALID);
        let noisy = analyzer::analyze(&with_noise.records, 5);
        let expected = analyzer::analyze(&clean.records, 5);
        assert_eq!(noisy.top_clients, expected.top_clients);
        assert_eq!(noisy.top_agents, expected.top_agents);
        assert_eq!(noisy.status_counts, expected.status_counts);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let parsed = parse_lines(&format!("{VALID}\r\n{VALID}\r\n"));
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].user_agent, "Mozilla/5.0");
    }

    #[test]
    fn handles_bare_carriage_return_line_endings() {
        let parsed = parse_lines(&format!("{VALID}\r{VALID}\rnot a valid log line\r{VALID}"));
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.skipped_lines, 1);
        assert!(parsed.records.iter().all(|r| r.client_address == "127.0.0.1"));
    }

    #[test]
    fn long_multibyte_line_is_skipped_without_panic() {
        let line = "é".repeat(200);
        let parsed = parse_lines(&line);
        assert_eq!(parsed.skipped_lines, 1);
    }

    #[test]
    fn missing_input_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_log(&dir.path().join("absent.log")).unwrap_err();
        assert!(matches!(err, ReportError::ReadInput { .. }));
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        let mut bytes = VALID.as_bytes().to_vec();
        bytes.extend_from_slice(b"\n\xff\xfe garbage\n");
        std::fs::write(&path, bytes).unwrap();

        let parsed = read_log(&path).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped_lines, 1);
    }
}
