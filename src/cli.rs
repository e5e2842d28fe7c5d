//! CLI argument definitions using clap derive macros.

use clap::{Parser, ValueEnum};

use icon_audit::{DEFAULT_CONCURRENCY, DEFAULT_COUNT, DEFAULT_EXPECTED_FORMAT, DEFAULT_URL_TEMPLATE};

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `url: ... | type: ...` line per anomaly, then the total.
    Text,
    /// Pretty-printed JSON document.
    Json,
}

/// Bulk-verify the encoded format of remotely hosted icon images.
///
/// Fetches every icon id in [0, COUNT), sniffs the real image format from the
/// bytes and reports icons that are not in the expected format or could not
/// be fetched or decoded.
#[derive(Parser, Debug)]
#[command(name = "icon-audit")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Icon URL template; `{id}` is replaced by the decimal identifier
    #[arg(short = 't', long, env = "ICON_AUDIT_TEMPLATE", default_value = DEFAULT_URL_TEMPLATE)]
    pub template: String,

    /// Number of identifiers to audit, starting at 0
    #[arg(short = 'n', long, env = "ICON_AUDIT_COUNT", default_value_t = DEFAULT_COUNT)]
    pub count: u32,

    /// Maximum concurrent requests (1-1000)
    #[arg(
        short = 'c',
        long,
        default_value_t = DEFAULT_CONCURRENCY as u16,
        value_parser = clap::value_parser!(u16).range(1..=1000)
    )]
    pub concurrency: u16,

    /// Expected image format (png, jpeg or gif)
    #[arg(short = 'e', long, default_value = DEFAULT_EXPECTED_FORMAT)]
    pub expected: String,

    /// Report format written to stdout
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}
