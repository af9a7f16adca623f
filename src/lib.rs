//! unreal-bridge - expose a live Unreal Editor to tool-calling agents
//!
//! This crate provides:
//! - A robust TCP command transport to the Unreal Editor plugin
//! - A tool layer (actors, materials, Blueprint graphs, landscape)
//! - Procedural structure builders (towers, castles, towns, bridges)
//! - A small operator CLI for sending raw commands and inspecting tools

pub mod builders;
pub mod cli;
pub mod config;
pub mod engine;
pub mod paths;
pub mod tools;

pub use config::Config;
pub use engine::EngineBridge;
