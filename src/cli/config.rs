use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::Path;

use crate::config::Config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,

    /// Get a config value (e.g. "engine.port")
    Get { key: String },

    /// Set a config value and save
    Set { key: String, value: String },

    /// Print the config file path
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> Result<()> {
    let explicit = config_path.map(Path::new);

    match args.command {
        ConfigCommands::Show => {
            let config = Config::load(explicit)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Get { key } => {
            let config = Config::load(explicit)?;
            println!("{}", config.get_value(&key)?);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load(explicit)?;
            config.set_value(&key, &value)?;
            let path = match explicit {
                Some(path) => path.to_path_buf(),
                None => Config::config_path()?,
            };
            config.save(&path)?;
            println!("{} = {}", key, config.get_value(&key)?);
        }
        ConfigCommands::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }
    Ok(())
}
