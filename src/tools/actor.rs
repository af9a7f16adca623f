//! Actor tools: query, spawn, transform, and delete level actors.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use super::{Tool, ToolSchema, engine_result, require_str, str_or, vec3_or};
use crate::engine::EngineBridge;

pub fn tools(bridge: Arc<EngineBridge>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(GetActorsInLevelTool::new(bridge.clone())),
        Box::new(FindActorsByNameTool::new(bridge.clone())),
        Box::new(SpawnActorTool::new(bridge.clone())),
        Box::new(DeleteActorTool::new(bridge.clone())),
        Box::new(DeleteActorsByPatternTool::new(bridge.clone())),
        Box::new(SetActorTransformTool::new(bridge.clone())),
        Box::new(GetActorPropertiesTool::new(bridge.clone())),
        Box::new(FocusViewportTool::new(bridge)),
    ]
}

// ===========================================================================
// get_actors_in_level
// ===========================================================================

struct GetActorsInLevelTool {
    bridge: Arc<EngineBridge>,
}

impl GetActorsInLevelTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for GetActorsInLevelTool {
    fn name(&self) -> &str {
        "get_actors_in_level"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_actors_in_level".into(),
            description: "List every actor in the current level with its class and transform."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(&self, _arguments: &str) -> Result<String> {
        engine_result(self.bridge.send_command("get_actors_in_level", json!({})).await)
    }
}

// ===========================================================================
// find_actors_by_name
// ===========================================================================

struct FindActorsByNameTool {
    bridge: Arc<EngineBridge>,
}

impl FindActorsByNameTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for FindActorsByNameTool {
    fn name(&self) -> &str {
        "find_actors_by_name"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "find_actors_by_name".into(),
            description: "Find actors whose names match a wildcard pattern.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "pattern": {
                        "type": "string",
                        "description": "Name pattern, * wildcards allowed (e.g. \"Wall_*\")"
                    }
                },
                "required": ["pattern"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let pattern = require_str(&args, "pattern")?;
        engine_result(
            self.bridge
                .send_command("find_actors_by_name", json!({ "pattern": pattern }))
                .await,
        )
    }
}

// ===========================================================================
// spawn_actor
// ===========================================================================

struct SpawnActorTool {
    bridge: Arc<EngineBridge>,
}

impl SpawnActorTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for SpawnActorTool {
    fn name(&self) -> &str {
        "spawn_actor"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "spawn_actor".into(),
            description: "Spawn an actor in the level. Supports StaticMeshActor, lights, \
                          cameras, fog, and other engine actor types."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Unique name for the actor"
                    },
                    "type": {
                        "type": "string",
                        "default": "StaticMeshActor",
                        "description": "Actor class: StaticMeshActor, PointLight, SpotLight, DirectionalLight, CameraActor, ExponentialHeightFog, SkyLight, PostProcessVolume, DecalActor"
                    },
                    "static_mesh": {
                        "type": "string",
                        "description": "Mesh asset path for StaticMeshActor (e.g. \"/Engine/BasicShapes/Cube.Cube\")"
                    },
                    "location": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "[X, Y, Z] in Unreal units"
                    },
                    "rotation": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "[Pitch, Yaw, Roll] in degrees"
                    },
                    "scale": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "[X, Y, Z] scale factors"
                    }
                },
                "required": ["name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let name = require_str(&args, "name")?;
        let mut params = json!({
            "name": name,
            "type": str_or(&args, "type", "StaticMeshActor"),
            "location": vec3_or(&args, "location", [0.0; 3]),
            "rotation": vec3_or(&args, "rotation", [0.0; 3]),
            "scale": vec3_or(&args, "scale", [1.0; 3]),
        });
        if let Some(mesh) = args["static_mesh"].as_str() {
            if !mesh.is_empty() {
                params["static_mesh"] = json!(mesh);
            }
        }
        engine_result(self.bridge.send_command("spawn_actor", params).await)
    }
}

// ===========================================================================
// delete_actor
// ===========================================================================

struct DeleteActorTool {
    bridge: Arc<EngineBridge>,
}

impl DeleteActorTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for DeleteActorTool {
    fn name(&self) -> &str {
        "delete_actor"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_actor".into(),
            description: "Delete a single actor by name.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Actor to delete" }
                },
                "required": ["name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let name = require_str(&args, "name")?;
        engine_result(
            self.bridge
                .send_command("delete_actor", json!({ "name": name }))
                .await,
        )
    }
}

// ===========================================================================
// delete_actors_by_pattern
// ===========================================================================

struct DeleteActorsByPatternTool {
    bridge: Arc<EngineBridge>,
}

impl DeleteActorsByPatternTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for DeleteActorsByPatternTool {
    fn name(&self) -> &str {
        "delete_actors_by_pattern"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_actors_by_pattern".into(),
            description: "Delete every actor whose name matches a wildcard pattern. \
                          Useful for clearing a procedural build before regenerating."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "pattern": { "type": "string", "description": "Name pattern (e.g. \"Castle_*\")" }
                },
                "required": ["pattern"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let pattern = require_str(&args, "pattern")?;
        engine_result(
            self.bridge
                .send_command("delete_actors_by_pattern", json!({ "pattern": pattern }))
                .await,
        )
    }
}

// ===========================================================================
// set_actor_transform
// ===========================================================================

struct SetActorTransformTool {
    bridge: Arc<EngineBridge>,
}

impl SetActorTransformTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for SetActorTransformTool {
    fn name(&self) -> &str {
        "set_actor_transform"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "set_actor_transform".into(),
            description: "Move, rotate, or scale an existing actor. Only the components \
                          you pass are changed."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Actor to modify" },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "rotation": { "type": "array", "items": { "type": "number" } },
                    "scale": { "type": "array", "items": { "type": "number" } }
                },
                "required": ["name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let name = require_str(&args, "name")?;
        let mut params = json!({ "name": name });
        for key in ["location", "rotation", "scale"] {
            if args[key].is_array() {
                params[key] = args[key].clone();
            }
        }
        engine_result(self.bridge.send_command("set_actor_transform", params).await)
    }
}

// ===========================================================================
// get_actor_properties
// ===========================================================================

struct GetActorPropertiesTool {
    bridge: Arc<EngineBridge>,
}

impl GetActorPropertiesTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for GetActorPropertiesTool {
    fn name(&self) -> &str {
        "get_actor_properties"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_actor_properties".into(),
            description: "Get an actor's full property set: transform, components, and \
                          editable properties."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Actor to inspect" }
                },
                "required": ["name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let name = require_str(&args, "name")?;
        engine_result(
            self.bridge
                .send_command("get_actor_properties", json!({ "name": name }))
                .await,
        )
    }
}

// ===========================================================================
// focus_viewport_on_actor
// ===========================================================================

struct FocusViewportTool {
    bridge: Arc<EngineBridge>,
}

impl FocusViewportTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for FocusViewportTool {
    fn name(&self) -> &str {
        "focus_viewport_on_actor"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "focus_viewport_on_actor".into(),
            description: "Point the editor viewport at an actor.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "actor_name": { "type": "string", "description": "Actor to frame" }
                },
                "required": ["actor_name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let actor_name = require_str(&args, "actor_name")?;
        engine_result(
            self.bridge
                .send_command("focus_viewport_on_actor", json!({ "actor_name": actor_name }))
                .await,
        )
    }
}
