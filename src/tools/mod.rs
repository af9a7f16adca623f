//! Agent-facing tools over the engine bridge.
//!
//! Each tool builds the parameter object for one editor command, dispatches
//! it through `EngineBridge::send_command`, and formats the result for the
//! calling agent. The bridge never raises for expected failures, so tools
//! translate the normalized error mapping into an `Err` the agent can read.

pub mod actor;
pub mod blueprint;
pub mod landscape;
pub mod material;
pub mod structure;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::engine::{EngineBridge, response};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn schema(&self) -> ToolSchema;
    async fn execute(&self, arguments: &str) -> Result<String>;
}

/// All tools backed by the given bridge.
pub fn create_default_tools(bridge: Arc<EngineBridge>) -> Vec<Box<dyn Tool>> {
    let mut tools = Vec::new();
    tools.extend(actor::tools(bridge.clone()));
    tools.extend(material::tools(bridge.clone()));
    tools.extend(blueprint::tools(bridge.clone()));
    tools.extend(landscape::tools(bridge.clone()));
    tools.extend(structure::tools(bridge));
    tools
}

/// Engine error mapping -> Err; otherwise pretty-print the payload
/// (the `result` field when present, the whole response when not).
pub(crate) fn engine_result(resp: Value) -> Result<String> {
    if response::is_error(&resp) {
        let message = resp
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error");
        anyhow::bail!("{}", message);
    }
    Ok(serde_json::to_string_pretty(
        resp.get("result").unwrap_or(&resp),
    )?)
}

/// Deserialize a builder spec from the tool argument string; an empty
/// argument string means "all defaults".
pub(crate) fn parse_spec<T: serde::de::DeserializeOwned>(arguments: &str) -> Result<T> {
    let trimmed = arguments.trim();
    let source = if trimmed.is_empty() { "{}" } else { trimmed };
    Ok(serde_json::from_str(source)?)
}

pub(crate) fn require_str(args: &Value, key: &str) -> Result<String> {
    args[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Missing {}", key))
}

pub(crate) fn str_or(args: &Value, key: &str, default: &str) -> String {
    args[key].as_str().unwrap_or(default).to_string()
}

pub(crate) fn f64_or(args: &Value, key: &str, default: f64) -> f64 {
    args[key].as_f64().unwrap_or(default)
}

pub(crate) fn bool_or(args: &Value, key: &str, default: bool) -> bool {
    args[key].as_bool().unwrap_or(default)
}

pub(crate) fn vec3_or(args: &Value, key: &str, default: [f64; 3]) -> [f64; 3] {
    match args[key].as_array() {
        Some(items) if items.len() == 3 => {
            let mut out = default;
            for (slot, item) in out.iter_mut().zip(items) {
                if let Some(v) = item.as_f64() {
                    *slot = v;
                }
            }
            out
        }
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn engine_result_unwraps_result_field() {
        let out = engine_result(json!({"status":"success","result":{"actors":[]}})).unwrap();
        assert_eq!(out, serde_json::to_string_pretty(&json!({"actors":[]})).unwrap());
    }

    #[test]
    fn engine_result_passes_whole_response_without_result_field() {
        let out = engine_result(json!({"status":"success","name":"Cube_1"})).unwrap();
        assert!(out.contains("Cube_1"));
    }

    #[test]
    fn engine_result_turns_error_mapping_into_err() {
        let err = engine_result(json!({"status":"error","error":"no such actor"})).unwrap_err();
        assert_eq!(err.to_string(), "no such actor");
    }

    #[test]
    fn argument_helpers() {
        let args = json!({"name": "Rock", "count": 2.5, "loc": [1.0, 2.0, 3.0], "flag": false});
        assert_eq!(require_str(&args, "name").unwrap(), "Rock");
        assert!(require_str(&args, "missing").is_err());
        assert_eq!(str_or(&args, "missing", "dflt"), "dflt");
        assert_eq!(f64_or(&args, "count", 0.0), 2.5);
        assert!(!bool_or(&args, "flag", true));
        assert_eq!(vec3_or(&args, "loc", [0.0; 3]), [1.0, 2.0, 3.0]);
        assert_eq!(vec3_or(&args, "missing", [9.0; 3]), [9.0; 3]);
    }

    #[test]
    fn default_tool_catalog_has_unique_names() {
        let bridge = Arc::new(EngineBridge::new(&crate::Config::default()));
        let tools = create_default_tools(bridge);
        let mut names: Vec<_> = tools.iter().map(|t| t.name().to_string()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total, "duplicate tool names");
        // Every tool's schema name matches its name()
        // and parameters is a JSON schema object
        let bridge = Arc::new(EngineBridge::new(&crate::Config::default()));
        for tool in create_default_tools(bridge) {
            let schema = tool.schema();
            assert_eq!(schema.name, tool.name());
            assert_eq!(schema.parameters["type"], "object");
        }
    }
}
