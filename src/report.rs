use crate::analyzer::{Summary, TopNList};
use crate::error::ReportError;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const SEPARATOR: &str =
    "════════════════════════════════════════════════════════════════════";
const THIN_SEP: &str =
    "────────────────────────────────────────────────────────────────────";

const STYLE: &str = r#"        body { font-family: Arial, sans-serif; background-color: #f4f4f4; }
        h1, h2 { color: #333; text-align: center; }
        p { text-align: center; }
        table { border-collapse: collapse; width: 80%; margin: 20px auto; background-color: #fff; }
        th, td { border: 1px solid #999; padding: 8px; text-align: center; }
        th { background-color: #eee; }
        td.agent { text-align: left; word-break: break-all; }"#;

/// Render the full static HTML report.
///
/// Addresses, user agents and status codes all come from the log file and
/// are escaped before they reach the markup.
pub fn render_html(summary: &Summary, generated_at: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <title>Access Log Analysis Report</title>\n");
    let _ = writeln!(html, "    <style>\n{}\n    </style>", STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str("    <h1>Access Log Analysis Report</h1>\n");
    let _ = writeln!(
        html,
        "    <p><b>Generated:</b> {} | <b>Requests analyzed:</b> {}</p>",
        html_escape(generated_at),
        summary.total_records
    );

    push_ranked_table(
        &mut html,
        "Top Client Addresses",
        "Client Address",
        "",
        &summary.top_clients,
        summary.total_records,
    );
    push_ranked_table(
        &mut html,
        "Top User Agents",
        "User Agent",
        " class=\"agent\"",
        &summary.top_agents,
        summary.total_records,
    );

    html.push_str("    <h2>HTTP Status Codes</h2>\n    <table>\n");
    html.push_str("        <tr><th>Status</th><th>Count</th><th>Share</th></tr>\n");
    for (code, count) in summary.status_counts.iter() {
        let _ = writeln!(
            html,
            "        <tr><td>{}</td><td>{}</td><td>{:.2}%</td></tr>",
            html_escape(code),
            count,
            share(count, summary.total_records)
        );
    }
    html.push_str("    </table>\n</body>\n</html>\n");

    html
}

/// Render the report stamped with the current local time and write it to `path`
pub fn write_html(summary: &Summary, path: &Path) -> Result<(), ReportError> {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let html = render_html(summary, &generated_at);
    write_file(path, html.as_bytes())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    skipped_lines: usize,
    #[serde(flatten)]
    summary: &'a Summary,
}

/// Export the summary as pretty-printed JSON to the given path
pub fn export_json(summary: &Summary, skipped_lines: usize, path: &Path) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(&JsonReport {
        skipped_lines,
        summary,
    })?;
    write_file(path, json.as_bytes())
}

/// Print a short summary of the run to stdout
pub fn print_summary(summary: &Summary, skipped_lines: usize, source: &Path, output: &Path) {
    println!("\n{}", SEPARATOR.cyan().bold());
    println!("{}", "  ACCESS LOG SUMMARY".white().bold());
    println!("{}", SEPARATOR.cyan().bold());
    println!("  Source : {}", source.display().to_string().yellow());
    println!(
        "  Requests analyzed : {}",
        summary.total_records.to_string().green().bold()
    );
    println!(
        "  Skipped lines     : {}",
        if skipped_lines > 0 {
            skipped_lines.to_string().yellow().bold()
        } else {
            "0".normal()
        }
    );
    println!();

    print_ranked("TOP CLIENT ADDRESSES", &summary.top_clients);
    print_ranked("TOP USER AGENTS", &summary.top_agents);

    section_header("STATUS CODES");
    if summary.status_counts.is_empty() {
        println!("  (no data)");
    }
    for (code, count) in summary.status_counts.iter() {
        println!("  HTTP {}  {:>8}", color_status(code), count);
    }

    println!("\n{}", SEPARATOR.cyan());
    println!("{} Report saved to '{}'\n", "✓".green(), output.display());
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn push_ranked_table(
    html: &mut String,
    title: &str,
    key_header: &str,
    key_class: &str,
    items: &TopNList,
    total: usize,
) {
    let _ = writeln!(html, "    <h2>{}</h2>\n    <table>", title);
    let _ = writeln!(
        html,
        "        <tr><th>#</th><th>{}</th><th>Requests</th><th>Share</th></tr>",
        key_header
    );
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(
            html,
            "        <tr><td>{}</td><td{}>{}</td><td>{}</td><td>{:.2}%</td></tr>",
            i + 1,
            key_class,
            html_escape(&item.value),
            item.count,
            share(item.count, total)
        );
    }
    html.push_str("    </table>\n");
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    let to_err = |source| ReportError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents).map_err(to_err)?;
    writer.flush().map_err(to_err)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

fn section_header(title: &str) {
    println!("  {} {}", "▶".cyan(), title.white().bold());
    println!("  {}", THIN_SEP);
}

fn print_ranked(title: &str, items: &TopNList) {
    section_header(title);
    if items.is_empty() {
        println!("  (no data)");
    }
    for (i, item) in items.iter().enumerate() {
        let value = if item.value.chars().count() > 48 {
            let truncated: String = item.value.chars().take(47).collect();
            format!("{}…", truncated)
        } else {
            item.value.clone()
        };
        println!(
            "  {:<3}  {:<48}  {:>8}",
            (i + 1).to_string().dimmed(),
            value.cyan(),
            item.count
        );
    }
    println!();
}

/// Colorize an HTTP status code based on its class digit
fn color_status(code: &str) -> colored::ColoredString {
    match code.as_bytes().first() {
        Some(b'2') => code.green(),
        Some(b'3') => code.cyan(),
        Some(b'4') => code.yellow(),
        Some(b'5') => code.red().bold(),
        _ => code.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::parser::parse_log_line;

    fn sample_summary() -> Summary {
        let lines = [
            r#"10.0.0.1 - - [x] "GET / HTTP/1.1" 200 1 "-" "Mozilla/5.0""#,
            r#"10.0.0.1 - - [x] "GET /a HTTP/1.1" 404 1 "-" "Mozilla/5.0""#,
            r#"10.0.0.2 - - [x] "GET / HTTP/1.1" 200 1 "-" "<script>alert('x')</script>""#,
        ];
        let records: Vec<_> = lines.iter().filter_map(|l| parse_log_line(l)).collect();
        analyze(&records, 5)
    }

    #[test]
    fn renders_all_sections() {
        let html = render_html(&sample_summary(), "2024-01-01 00:00:00");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Top Client Addresses</h2>"));
        assert!(html.contains("<h2>Top User Agents</h2>"));
        assert!(html.contains("<h2>HTTP Status Codes</h2>"));
        assert!(html.contains("<b>Generated:</b> 2024-01-01 00:00:00"));
        assert!(html.contains("<td>10.0.0.1</td><td>2</td>"));
        assert!(html.contains("<tr><td>404</td><td>1</td>"));
    }

    #[test]
    fn escapes_untrusted_values() {
        let html = render_html(&sample_summary(), "now");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn html_escape_handles_all_special_characters() {
        assert_eq!(html_escape(r#"&<>"'"#), "&amp;&lt;&gt;&quot;&#39;");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn empty_summary_renders_empty_tables() {
        let html = render_html(&analyze(&[], 5), "now");
        assert!(html.contains("<b>Requests analyzed:</b> 0"));
        assert!(!html.contains("<td>1</td>"));
    }

    #[test]
    fn share_of_empty_total_is_zero() {
        assert_eq!(share(3, 0), 0.0);
        assert_eq!(share(1, 4), 25.0);
    }

    #[test]
    fn writes_html_and_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let html_path = dir.path().join("report.html");
        let json_path = dir.path().join("report.json");
        let summary = sample_summary();

        write_html(&summary, &html_path).unwrap();
        export_json(&summary, 4, &json_path).unwrap();

        let html = std::fs::read_to_string(&html_path).unwrap();
        assert!(html.contains("Access Log Analysis Report"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["skipped_lines"], 4);
        assert_eq!(json["total_records"], 3);
        assert_eq!(json["top_clients"][0]["value"], "10.0.0.1");
        assert_eq!(json["status_counts"]["200"], 2);
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.html");
        let err = write_html(&sample_summary(), &path).unwrap_err();
        assert!(matches!(err, ReportError::WriteOutput { .. }));
    }
}
