pub mod config;
pub mod send;
pub mod tools;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "unreal-bridge")]
#[command(author, version, about = "Drive a live Unreal Editor over its command socket")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(short, long, global = true, env = "UNREAL_BRIDGE_CONFIG")]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a raw command to the engine
    Send(send::SendArgs),

    /// List the tool catalog
    Tools(tools::ToolsArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}
