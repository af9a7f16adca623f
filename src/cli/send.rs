use anyhow::Result;
use clap::Args;
use serde_json::Value;
use std::path::Path;

use crate::config::Config;
use crate::engine;

#[derive(Args)]
pub struct SendArgs {
    /// Command type (e.g. "get_actors_in_level")
    pub command: String,

    /// Command parameters as a JSON object
    #[arg(short, long, default_value = "{}")]
    pub params: String,
}

pub async fn run(args: SendArgs, config_path: Option<&str>) -> Result<()> {
    let config = Config::load(config_path.map(Path::new))?;

    let params: Value = serde_json::from_str(&args.params)
        .map_err(|e| anyhow::anyhow!("--params is not valid JSON: {}", e))?;

    let bridge = engine::shared(&config);
    let response = bridge.send_command(&args.command, params).await;
    engine::reset_shared().await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if engine::response::is_error(&response) {
        std::process::exit(1);
    }
    Ok(())
}
