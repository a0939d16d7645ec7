// Main entry point for sane-desc

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use sane_desc::cli::{Cli, Commands};
use sane_desc::commands::{
    Settings, handle_backends, handle_check, handle_completion, handle_dump, handle_inspect,
    handle_interfaces, handle_usb_backends,
};
use sane_desc::config::{self, Config};
use sane_desc::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let config = Config::load();

    let cli = Cli::parse();

    logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting sane-desc v{}", env!("CARGO_PKG_VERSION"));
    }

    let settings = Settings::resolve(&cli, config.as_ref());

    // Handle config flag
    if cli.config {
        print_config(&settings, config.is_some());
        return Ok(());
    }

    // Handle init_config flag
    if let Some(config_file) = &cli.init_config {
        let toml_content = Config::template().to_toml();
        std::fs::write(config_file, toml_content)?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        print_precedence();
        return Ok(());
    }

    // Handle completion flag
    if let Some(shell_type) = &cli.completion {
        return handle_completion(shell_type);
    }

    match &cli.command {
        Some(Commands::Dump(args)) => handle_dump(args, &settings).await,
        Some(Commands::UsbBackends(args)) => handle_usb_backends(args, &settings).await,
        Some(Commands::Interfaces(args)) => handle_interfaces(args, &settings).await,
        Some(Commands::Backends(args)) => handle_backends(args, &settings).await,
        Some(Commands::Check(args)) => handle_check(args, &settings).await,
        Some(Commands::Inspect(args)) => handle_inspect(args).await,
        None => {
            warn!("No command given. Use 'sane-desc --help' for usage.");
            Ok(())
        }
    }
}

fn print_config(settings: &Settings, file_loaded: bool) {
    println!("Current configuration:");
    println!("\n  Effective settings:");
    let dirs: Vec<String> = settings
        .description_dirs
        .iter()
        .map(|d| d.display().to_string())
        .collect();
    println!("    Description dirs: {}", dirs.join(", "));
    println!("    Extension: {}", settings.extension);
    println!("    Parallel jobs: {}", settings.jobs);
    println!("    Keep going: {}", settings.keep_going);
    if !settings.usb.include.is_empty() {
        println!("    USB include: {}", settings.usb.include.join(", "));
    }
    if !settings.usb.exclude.is_empty() {
        println!("    USB exclude: {}", settings.usb.exclude.join(", "));
    }

    if file_loaded {
        println!("\n  Configuration file loaded");
    } else {
        println!("\n  No configuration file loaded");
        println!(
            "  Create one with: sane-desc --init-config {}",
            config::CONFIG_FILE_NAME
        );
    }

    println!("\n  Environment variables:");
    match std::env::var(config::ENV_SANE_DESC_PATH) {
        Ok(value) => println!("    {}: {}", config::ENV_SANE_DESC_PATH, value),
        Err(_) => println!("    {}: not set", config::ENV_SANE_DESC_PATH),
    }

    print_precedence();
}

fn print_precedence() {
    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Configuration file");
    println!("  3. Environment variables");
    println!("  4. Built-in defaults (lowest)");
}
