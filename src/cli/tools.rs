use anyhow::Result;
use clap::Args;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::engine::EngineBridge;
use crate::tools::create_default_tools;

#[derive(Args)]
pub struct ToolsArgs {
    /// Print full JSON schemas instead of a name/description table
    #[arg(short, long)]
    pub schemas: bool,
}

pub async fn run(args: ToolsArgs, config_path: Option<&str>) -> Result<()> {
    let config = Config::load(config_path.map(Path::new))?;
    let bridge = Arc::new(EngineBridge::new(&config));
    let tools = create_default_tools(bridge);

    if args.schemas {
        let schemas: Vec<_> = tools.iter().map(|t| t.schema()).collect();
        println!("{}", serde_json::to_string_pretty(&schemas)?);
    } else {
        for tool in &tools {
            println!("{:32} {}", tool.name(), tool.schema().description);
        }
        eprintln!("\n{} tools", tools.len());
    }
    Ok(())
}
