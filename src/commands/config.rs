use std::path::Path;

use anyhow::Result;
use clap::Args;
use pixdesk::config::WorkspaceConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Save the effective configuration to the config file
    #[arg(long)]
    pub write: bool,
}

pub fn run(args: &ConfigArgs, config: &WorkspaceConfig, path: Option<&Path>) -> Result<()> {
    println!("{}", config.to_json()?);

    if args.write {
        let written = match path {
            Some(path) => {
                config.save(path)?;
                path.to_path_buf()
            }
            None => config.save_to_default_path()?,
        };
        println!("Wrote {}", written.display());
    } else if let Some(default) = WorkspaceConfig::default_path() {
        log::debug!("Default config location: {}", default.display());
    }
    Ok(())
}
