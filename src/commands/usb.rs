// usb-backends command - list backends supporting at least one USB device

use anyhow::Result;
use tracing::debug;

use crate::cli::args::UsbBackendsArgs;
use crate::commands::Settings;
use crate::loader;
use crate::query::{self, BackendFilter, FilterDecision};
use crate::utils::FileUtils;

/// Config lists first, then anything given on the command line
pub fn build_filter(args: &UsbBackendsArgs, settings: &Settings) -> BackendFilter {
    let mut filter = BackendFilter {
        include: settings.usb.include.clone(),
        exclude: settings.usb.exclude.clone(),
    };
    if let Some(include) = &args.include {
        filter.include.extend(BackendFilter::parse_list(include));
    }
    if let Some(exclude) = &args.exclude {
        filter.exclude.extend(BackendFilter::parse_list(exclude));
    }
    filter
}

/// Print the USB backend list.
///
/// Without explicit paths every configured description directory is scanned,
/// so external backends (`doc/descriptions-external` by default) are listed
/// next to the ones shipped with sane-backends.
pub async fn handle_usb_backends(args: &UsbBackendsArgs, settings: &Settings) -> Result<()> {
    let filter = build_filter(args, settings);

    // Only files that need their contents looked at are parsed
    let mut listed = Vec::new();
    let mut to_parse = Vec::new();
    for path in settings.discover(&args.paths) {
        let name = FileUtils::backend_name(&path);
        match filter.decide(&name) {
            FilterDecision::Skip => debug!("Excluded {}", name),
            FilterDecision::Include => listed.push(name),
            FilterDecision::Inspect => to_parse.push(path),
        }
    }

    let files = loader::load_descriptions(to_parse, settings.load_options()).await?;
    listed.extend(query::usb_backends(&files, &filter));
    listed.sort();
    listed.dedup();

    println!("{}", listed.join(" "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::Config;
    use clap::Parser;

    #[tokio::test]
    async fn test_default_directories_include_external_descriptions() {
        let root = tempfile::tempdir().unwrap();
        let shipped = root.path().join("descriptions");
        let external = root.path().join("descriptions-external");
        std::fs::create_dir(&shipped).unwrap();
        std::fs::create_dir(&external).unwrap();
        std::fs::write(
            shipped.join("acme.desc"),
            ":backend \"acme\"\n:devicetype :scanner\n:mfg \"A\"\n:model \"1\"\n:status :good\n:interface \"USB\"\n",
        )
        .unwrap();
        std::fs::write(
            external.join("extern.desc"),
            ":backend \"extern\"\n:devicetype :scanner\n:mfg \"E\"\n:model \"1\"\n:status :good\n:interface \"USB\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from(["sane-desc", "usb-backends"]);
        let mut settings = Settings::resolve(&cli, Some(&Config::default()));
        settings.description_dirs = vec![shipped.clone(), external];

        let all = settings.load(&[]).await.unwrap();
        let filter = BackendFilter::default();
        assert_eq!(query::usb_backends(&all, &filter), vec!["acme", "extern"]);

        let shipped_only = settings.load(&[shipped]).await.unwrap();
        assert_eq!(query::usb_backends(&shipped_only, &filter), vec!["acme"]);
    }

    #[test]
    fn test_build_filter_merges_config_and_cli() {
        let cli = Cli::parse_from(["sane-desc", "usb-backends", "-i", "net", "-e", "hp,v4l"]);
        let cfg = Config::parse("[usb]\ninclude = [\"test\"]\nexclude = [\"pnm\"]\n").unwrap();
        let settings = Settings::resolve(&cli, Some(&cfg));
        let args = match &cli.command {
            Some(crate::cli::Commands::UsbBackends(a)) => a.clone(),
            _ => unreachable!(),
        };

        let filter = build_filter(&args, &settings);
        assert_eq!(filter.include, vec!["test", "net"]);
        assert_eq!(filter.exclude, vec!["pnm", "hp", "v4l"]);
    }
}
