// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Parser and reports for SANE backend description files
#[derive(Parser, Debug)]
#[command(name = "sane-desc")]
#[command(author = "sane-desc contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse SANE backend .desc files and report on supported devices", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Number of files parsed in parallel ("auto" or a number)
    #[arg(short = 'j', long, global = true)]
    pub jobs: Option<String>,

    /// Skip files that fail to parse instead of aborting
    #[arg(short = 'k', long, global = true, default_value_t = false)]
    pub keep_going: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Print shell completion script (bash, zsh, fish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "powershell"])]
    pub completion: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dump parsed descriptions as JSON
    Dump(DumpArgs),

    /// List backends supporting at least one USB device
    UsbBackends(UsbBackendsArgs),

    /// Count distinct interface values across all devices
    Interfaces(InterfacesArgs),

    /// List backends with a device whose interface contains a substring
    Backends(BackendsArgs),

    /// Check .desc file syntax and structure
    Check(CheckArgs),

    /// Show statistics for a single .desc file
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
    /// Files or directories (defaults to the configured description directories)
    pub paths: Vec<PathBuf>,

    /// Dump the flat token stream instead of the document tree
    #[arg(long, default_value_t = false)]
    pub tokens: bool,

    /// Single-line JSON
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Args, Debug, Clone)]
pub struct UsbBackendsArgs {
    /// Files or directories. Defaults to every configured description directory,
    /// doc/descriptions-external included; pass doc/descriptions alone to list
    /// only the backends shipped in the sane-backends tree
    pub paths: Vec<PathBuf>,

    /// Backends to include (extra), comma separated
    #[arg(short = 'i', long)]
    pub include: Option<String>,

    /// Backends to exclude, comma separated
    #[arg(short = 'e', long)]
    pub exclude: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct InterfacesArgs {
    /// Files or directories (defaults to the configured description directories)
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct BackendsArgs {
    /// Substring searched for in device interface values
    #[arg(long, value_name = "TEXT")]
    pub interface: String,

    /// Files or directories (defaults to the configured description directories)
    pub paths: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Files or directories to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// File to inspect
    #[arg(required = true)]
    pub file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}
