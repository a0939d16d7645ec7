// Commands module - handles CLI command execution

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::Cli;
use crate::config::{self, Config, UsbConfig};
use crate::loader::{self, LoadOptions};
use crate::query::DescFile;
use crate::utils::FileUtils;

pub mod check;
pub mod dump;
pub mod inspect;
pub mod interfaces;
pub mod usb;

pub use check::handle_check;
pub use dump::handle_dump;
pub use inspect::handle_inspect;
pub use interfaces::{handle_backends, handle_interfaces};
pub use usb::handle_usb_backends;

/// Effective settings after merging CLI flags, config file, environment and defaults
#[derive(Debug, Clone)]
pub struct Settings {
    pub description_dirs: Vec<PathBuf>,
    pub extension: String,
    pub jobs: usize,
    pub keep_going: bool,
    pub usb: UsbConfig,
}

impl Settings {
    pub fn resolve(cli: &Cli, file_config: Option<&Config>) -> Self {
        let defaults = Config::default();
        let general = file_config.map(|c| &c.general).unwrap_or(&defaults.general);

        let jobs = cli.jobs.as_deref().unwrap_or(&general.jobs);

        Self {
            description_dirs: Config::description_dirs(file_config),
            extension: general.extension.clone(),
            jobs: config::resolve_jobs(jobs),
            keep_going: cli.keep_going || general.keep_going,
            usb: file_config.map(|c| c.usb.clone()).unwrap_or_default(),
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            jobs: self.jobs,
            keep_going: self.keep_going,
        }
    }

    /// Files under `paths`, or under the description directories when none are given
    pub fn discover(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let roots = if paths.is_empty() {
            &self.description_dirs
        } else {
            paths
        };
        let files = FileUtils::collect_from_paths(roots, &self.extension);
        debug!("Discovered {} file(s) under {} root(s)", files.len(), roots.len());
        files
    }

    /// Discover and parse every description file under `paths`
    pub async fn load(&self, paths: &[PathBuf]) -> Result<Vec<DescFile>> {
        let files = self.discover(paths);
        if files.is_empty() {
            anyhow::bail!(
                "No .{} files found (searched: {})",
                self.extension,
                display_paths(if paths.is_empty() {
                    &self.description_dirs
                } else {
                    paths
                })
            );
        }
        loader::load_descriptions(files, self.load_options()).await
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Handle shell completion
pub fn handle_completion(shell_type: &str) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{Shell, generate};

    let shell = match shell_type.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "powershell" => Shell::PowerShell,
        _ => {
            anyhow::bail!(
                "Unsupported shell: {}. Supported: bash, zsh, fish, powershell",
                shell_type
            );
        }
    };

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut stdout = std::io::stdout();

    generate(shell, &mut cmd, name, &mut stdout);

    Ok(())
}
