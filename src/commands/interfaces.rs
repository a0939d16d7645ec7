// interfaces / backends commands - interface based reports

use anyhow::Result;

use crate::cli::args::{BackendsArgs, InterfacesArgs};
use crate::commands::Settings;
use crate::query;

pub async fn handle_interfaces(args: &InterfacesArgs, settings: &Settings) -> Result<()> {
    let files = settings.load(&args.paths).await?;
    let counts = query::interface_counts(&files);

    if args.format.is_json() {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    let width = counts.values().map(|c| c.to_string().len()).max().unwrap_or(1);
    for (iface, count) in &counts {
        println!("{:>width$}  {}", count, iface, width = width);
    }
    Ok(())
}

pub async fn handle_backends(args: &BackendsArgs, settings: &Settings) -> Result<()> {
    let files = settings.load(&args.paths).await?;
    for backend in query::backends_with_interface(&files, &args.interface) {
        println!("{}", backend);
    }
    Ok(())
}
