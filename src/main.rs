use access_report::logging;
use access_report::pipeline::{self, RunOptions, DEFAULT_OUTPUT, DEFAULT_TOP_N};
use access_report::report;
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

/// Summarize a combined-format access log into a static HTML report
#[derive(Parser, Debug)]
#[command(
    name = "access_report",
    author,
    version,
    about = "Parses combined-format web server access logs and generates an HTML summary report"
)]
struct Args {
    /// Path to the access log to analyze
    #[arg(short = 'f', long = "file", value_name = "LOG_FILE")]
    file: PathBuf,

    /// Number of top client addresses and user agents to report
    #[arg(
        short = 'n',
        long = "top",
        default_value_t = DEFAULT_TOP_N as i64,
        allow_negative_numbers = true,
        value_name = "N"
    )]
    top_n: i64,

    /// Path of the HTML report to write
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT, value_name = "OUTPUT_FILE")]
    output: PathBuf,

    /// Also export the summary as JSON to the specified file path
    #[arg(short = 'j', long = "json-output", value_name = "JSON_FILE")]
    json_output: Option<PathBuf>,

    /// Do not print the terminal summary
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Log level for diagnostics on stderr (RUST_LOG overrides)
    #[arg(long = "log-level", default_value = "warn", value_name = "LEVEL")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init_tracing(&args.log_level) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    let top_n = usize::try_from(args.top_n).unwrap_or(0);
    if top_n == 0 {
        warn!(requested = args.top_n, "top-N is not positive, top lists will be empty");
    }

    let options = RunOptions {
        input: args.file,
        top_n,
        output: args.output,
        json_output: args.json_output,
    };

    match pipeline::run(&options) {
        Ok((summary, skipped_lines)) => {
            if !args.quiet {
                report::print_summary(&summary, skipped_lines, &options.input, &options.output);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
