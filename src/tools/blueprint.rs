//! Blueprint tools: class creation, components, and visual-scripting graph
//! editing (nodes, pins, variables, events).

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use super::{Tool, ToolSchema, engine_result, f64_or, require_str, str_or};
use crate::engine::EngineBridge;

pub fn tools(bridge: Arc<EngineBridge>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(CreateBlueprintTool::new(bridge.clone())),
        Box::new(AddComponentTool::new(bridge.clone())),
        Box::new(CompileBlueprintTool::new(bridge.clone())),
        Box::new(AddNodeTool::new(bridge.clone())),
        Box::new(AddEventNodeTool::new(bridge.clone())),
        Box::new(ConnectNodesTool::new(bridge.clone())),
        Box::new(CreateVariableTool::new(bridge.clone())),
        Box::new(DeleteNodeTool::new(bridge)),
    ]
}

// ===========================================================================
// create_blueprint
// ===========================================================================

struct CreateBlueprintTool {
    bridge: Arc<EngineBridge>,
}

impl CreateBlueprintTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateBlueprintTool {
    fn name(&self) -> &str {
        "create_blueprint"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_blueprint".into(),
            description: "Create a new Blueprint class derived from an engine class.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Blueprint name (e.g. \"BP_Door\")" },
                    "parent_class": { "type": "string", "description": "Parent class: Actor, Pawn, Character, ..." }
                },
                "required": ["name", "parent_class"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let params = json!({
            "name": require_str(&args, "name")?,
            "parent_class": require_str(&args, "parent_class")?,
        });
        engine_result(self.bridge.send_command("create_blueprint", params).await)
    }
}

// ===========================================================================
// add_component_to_blueprint
// ===========================================================================

struct AddComponentTool {
    bridge: Arc<EngineBridge>,
}

impl AddComponentTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for AddComponentTool {
    fn name(&self) -> &str {
        "add_component_to_blueprint"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_component_to_blueprint".into(),
            description: "Add a component (StaticMeshComponent, PointLightComponent, ...) to \
                          a Blueprint."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "blueprint_name": { "type": "string" },
                    "component_type": { "type": "string", "description": "Component class name" },
                    "component_name": { "type": "string", "description": "Name for the new component" },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "rotation": { "type": "array", "items": { "type": "number" } },
                    "scale": { "type": "array", "items": { "type": "number" } },
                    "component_properties": { "type": "object" }
                },
                "required": ["blueprint_name", "component_type", "component_name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let params = json!({
            "blueprint_name": require_str(&args, "blueprint_name")?,
            "component_type": require_str(&args, "component_type")?,
            "component_name": require_str(&args, "component_name")?,
            "location": args["location"].as_array().cloned().unwrap_or_default(),
            "rotation": args["rotation"].as_array().cloned().unwrap_or_default(),
            "scale": args["scale"].as_array().cloned().unwrap_or_default(),
            "component_properties": if args["component_properties"].is_object() {
                args["component_properties"].clone()
            } else {
                json!({})
            },
        });
        engine_result(
            self.bridge
                .send_command("add_component_to_blueprint", params)
                .await,
        )
    }
}

// ===========================================================================
// compile_blueprint
// ===========================================================================

struct CompileBlueprintTool {
    bridge: Arc<EngineBridge>,
}

impl CompileBlueprintTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CompileBlueprintTool {
    fn name(&self) -> &str {
        "compile_blueprint"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "compile_blueprint".into(),
            description: "Compile a Blueprint. Required after graph or component edits \
                          before the changes take effect."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "blueprint_name": { "type": "string" }
                },
                "required": ["blueprint_name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let params = json!({ "blueprint_name": require_str(&args, "blueprint_name")? });
        engine_result(self.bridge.send_command("compile_blueprint", params).await)
    }
}

// ===========================================================================
// add_node
// ===========================================================================

struct AddNodeTool {
    bridge: Arc<EngineBridge>,
}

impl AddNodeTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for AddNodeTool {
    fn name(&self) -> &str {
        "add_node"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_node".into(),
            description: "Add a node to a Blueprint graph. Node types include Branch, \
                          Switch, ExecutionSequence, VariableGet, VariableSet, DynamicCast, \
                          Print, CallFunction, Select, SpawnActor, Timeline, Self, and Event."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "blueprint_name": { "type": "string" },
                    "node_type": { "type": "string", "description": "K2 node type to create" },
                    "pos_x": { "type": "number", "default": 0 },
                    "pos_y": { "type": "number", "default": 0 },
                    "message": { "type": "string", "description": "Print nodes: text to print" },
                    "event_type": { "type": "string", "description": "Event nodes: BeginPlay, Tick, ..." },
                    "variable_name": { "type": "string", "description": "Variable nodes: variable to read/write" },
                    "target_function": { "type": "string", "description": "CallFunction nodes: function to call" },
                    "target_class": { "type": "string", "description": "CallFunction nodes: class to search" },
                    "function_name": { "type": "string", "description": "Target function graph (default EventGraph)" }
                },
                "required": ["blueprint_name", "node_type"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let mut params = json!({
            "blueprint_name": require_str(&args, "blueprint_name")?,
            "node_type": require_str(&args, "node_type")?,
            "pos_x": f64_or(&args, "pos_x", 0.0),
            "pos_y": f64_or(&args, "pos_y", 0.0),
        });
        for key in [
            "message",
            "event_type",
            "variable_name",
            "target_function",
            "target_class",
            "function_name",
        ] {
            if let Some(value) = args[key].as_str() {
                if !value.is_empty() {
                    params[key] = json!(value);
                }
            }
        }
        engine_result(self.bridge.send_command("add_node", params).await)
    }
}

// ===========================================================================
// add_event_node
// ===========================================================================

struct AddEventNodeTool {
    bridge: Arc<EngineBridge>,
}

impl AddEventNodeTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for AddEventNodeTool {
    fn name(&self) -> &str {
        "add_event_node"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_event_node".into(),
            description: "Add an engine event node (ReceiveBeginPlay, ReceiveTick, \
                          ReceiveDestroyed, ...) to a Blueprint's event graph."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "blueprint_name": { "type": "string" },
                    "event_name": { "type": "string", "description": "e.g. \"ReceiveBeginPlay\"" },
                    "pos_x": { "type": "number", "default": 0 },
                    "pos_y": { "type": "number", "default": 0 }
                },
                "required": ["blueprint_name", "event_name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let params = json!({
            "blueprint_name": require_str(&args, "blueprint_name")?,
            "event_name": require_str(&args, "event_name")?,
            "pos_x": f64_or(&args, "pos_x", 0.0),
            "pos_y": f64_or(&args, "pos_y", 0.0),
        });
        engine_result(self.bridge.send_command("add_event_node", params).await)
    }
}

// ===========================================================================
// connect_nodes
// ===========================================================================

struct ConnectNodesTool {
    bridge: Arc<EngineBridge>,
}

impl ConnectNodesTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for ConnectNodesTool {
    fn name(&self) -> &str {
        "connect_nodes"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "connect_nodes".into(),
            description: "Wire an output pin of one Blueprint node to an input pin of \
                          another."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "blueprint_name": { "type": "string" },
                    "source_node_id": { "type": "string" },
                    "source_pin_name": { "type": "string" },
                    "target_node_id": { "type": "string" },
                    "target_pin_name": { "type": "string" },
                    "function_name": { "type": "string", "description": "Target function graph (default EventGraph)" }
                },
                "required": ["blueprint_name", "source_node_id", "source_pin_name", "target_node_id", "target_pin_name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let mut params = json!({
            "blueprint_name": require_str(&args, "blueprint_name")?,
            "source_node_id": require_str(&args, "source_node_id")?,
            "source_pin_name": require_str(&args, "source_pin_name")?,
            "target_node_id": require_str(&args, "target_node_id")?,
            "target_pin_name": require_str(&args, "target_pin_name")?,
        });
        if let Some(function) = args["function_name"].as_str() {
            if !function.is_empty() {
                params["function_name"] = json!(function);
            }
        }
        engine_result(self.bridge.send_command("connect_nodes", params).await)
    }
}

// ===========================================================================
// create_variable
// ===========================================================================

struct CreateVariableTool {
    bridge: Arc<EngineBridge>,
}

impl CreateVariableTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateVariableTool {
    fn name(&self) -> &str {
        "create_variable"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_variable".into(),
            description: "Create a Blueprint variable with a type, default value, and \
                          visibility."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "blueprint_name": { "type": "string" },
                    "variable_name": { "type": "string" },
                    "variable_type": { "type": "string", "description": "bool | int | float | string | vector | rotator" },
                    "default_value": { "description": "Initial value (type-dependent)" },
                    "is_public": { "type": "boolean", "default": false, "description": "Expose on instances" },
                    "tooltip": { "type": "string" },
                    "category": { "type": "string", "default": "Default" }
                },
                "required": ["blueprint_name", "variable_name", "variable_type"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let mut params = json!({
            "blueprint_name": require_str(&args, "blueprint_name")?,
            "variable_name": require_str(&args, "variable_name")?,
            "variable_type": require_str(&args, "variable_type")?,
            "is_public": args["is_public"].as_bool().unwrap_or(false),
            "category": str_or(&args, "category", "Default"),
        });
        if !args["default_value"].is_null() {
            params["default_value"] = args["default_value"].clone();
        }
        if let Some(tooltip) = args["tooltip"].as_str() {
            if !tooltip.is_empty() {
                params["tooltip"] = json!(tooltip);
            }
        }
        engine_result(self.bridge.send_command("create_variable", params).await)
    }
}

// ===========================================================================
// delete_node
// ===========================================================================

struct DeleteNodeTool {
    bridge: Arc<EngineBridge>,
}

impl DeleteNodeTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for DeleteNodeTool {
    fn name(&self) -> &str {
        "delete_node"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_node".into(),
            description: "Delete a Blueprint graph node and all its connections.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "blueprint_name": { "type": "string" },
                    "node_id": { "type": "string", "description": "NodeGuid or node name" },
                    "function_name": { "type": "string", "description": "Target function graph (default EventGraph)" }
                },
                "required": ["blueprint_name", "node_id"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let mut params = json!({
            "blueprint_name": require_str(&args, "blueprint_name")?,
            "node_id": require_str(&args, "node_id")?,
        });
        if let Some(function) = args["function_name"].as_str() {
            if !function.is_empty() {
                params["function_name"] = json!(function);
            }
        }
        engine_result(self.bridge.send_command("delete_node", params).await)
    }
}
