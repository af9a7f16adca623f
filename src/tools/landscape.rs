//! Landscape tools: terrain sculpting, layer painting, ground queries, and
//! mesh/foliage scattering.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use super::{Tool, ToolSchema, bool_or, engine_result, f64_or, require_str, str_or, vec3_or};
use crate::engine::EngineBridge;

pub fn tools(bridge: Arc<EngineBridge>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(SculptLandscapeTool::new(bridge.clone())),
        Box::new(PaintLandscapeLayerTool::new(bridge.clone())),
        Box::new(GetHeightAtLocationTool::new(bridge.clone())),
        Box::new(SnapActorToGroundTool::new(bridge.clone())),
        Box::new(ScatterMeshesTool::new(bridge.clone())),
        Box::new(ScatterFoliageTool::new(bridge)),
    ]
}

// ===========================================================================
// sculpt_landscape
// ===========================================================================

struct SculptLandscapeTool {
    bridge: Arc<EngineBridge>,
}

impl SculptLandscapeTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for SculptLandscapeTool {
    fn name(&self) -> &str {
        "sculpt_landscape"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "sculpt_landscape".into(),
            description: "Raise or lower terrain with a round brush at a world location."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "[X, Y, Z] - Z is ignored, terrain height at XY is modified"
                    },
                    "radius": { "type": "number", "default": 500.0, "description": "Brush radius in world units" },
                    "strength": { "type": "number", "default": 0.5, "description": "0.0-1.0" },
                    "raise_terrain": { "type": "boolean", "default": true, "description": "false lowers instead" },
                    "falloff": { "type": "number", "default": 0.5, "description": "0.0-1.0, higher = sharper edge" }
                },
                "required": ["location"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let params = json!({
            "location": vec3_or(&args, "location", [0.0; 3]),
            "radius": f64_or(&args, "radius", 500.0),
            "strength": f64_or(&args, "strength", 0.5),
            "raise": bool_or(&args, "raise_terrain", true),
            "falloff": f64_or(&args, "falloff", 0.5),
        });
        engine_result(self.bridge.send_command("sculpt_landscape", params).await)
    }
}

// ===========================================================================
// paint_landscape_layer
// ===========================================================================

struct PaintLandscapeLayerTool {
    bridge: Arc<EngineBridge>,
}

impl PaintLandscapeLayerTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for PaintLandscapeLayerTool {
    fn name(&self) -> &str {
        "paint_landscape_layer"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "paint_landscape_layer".into(),
            description: "Paint a material layer (Grass, Dirt, Rock, ...) onto the terrain."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "location": { "type": "array", "items": { "type": "number" } },
                    "layer_name": { "type": "string", "description": "Landscape layer to paint" },
                    "radius": { "type": "number", "default": 500.0 },
                    "strength": { "type": "number", "default": 1.0 },
                    "falloff": { "type": "number", "default": 0.5 }
                },
                "required": ["location", "layer_name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let params = json!({
            "location": vec3_or(&args, "location", [0.0; 3]),
            "layer_name": require_str(&args, "layer_name")?,
            "radius": f64_or(&args, "radius", 500.0),
            "strength": f64_or(&args, "strength", 1.0),
            "falloff": f64_or(&args, "falloff", 0.5),
        });
        engine_result(
            self.bridge
                .send_command("paint_landscape_layer", params)
                .await,
        )
    }
}

// ===========================================================================
// get_height_at_location
// ===========================================================================

struct GetHeightAtLocationTool {
    bridge: Arc<EngineBridge>,
}

impl GetHeightAtLocationTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for GetHeightAtLocationTool {
    fn name(&self) -> &str {
        "get_height_at_location"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_height_at_location".into(),
            description: "Query terrain surface height at a world XY position via a \
                          downward line trace."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "x": { "type": "number" },
                    "y": { "type": "number" }
                },
                "required": ["x", "y"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let params = json!({
            "x": f64_or(&args, "x", 0.0),
            "y": f64_or(&args, "y", 0.0),
        });
        engine_result(
            self.bridge
                .send_command("get_height_at_location", params)
                .await,
        )
    }
}

// ===========================================================================
// snap_actor_to_ground
// ===========================================================================

struct SnapActorToGroundTool {
    bridge: Arc<EngineBridge>,
}

impl SnapActorToGroundTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for SnapActorToGroundTool {
    fn name(&self) -> &str {
        "snap_actor_to_ground"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "snap_actor_to_ground".into(),
            description: "Drop an actor onto the surface directly below it, preserving XY \
                          and rotation."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "actor_name": { "type": "string" }
                },
                "required": ["actor_name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let params = json!({ "actor_name": require_str(&args, "actor_name")? });
        engine_result(self.bridge.send_command("snap_actor_to_ground", params).await)
    }
}

// ===========================================================================
// scatter_meshes_on_landscape
// ===========================================================================

struct ScatterMeshesTool {
    bridge: Arc<EngineBridge>,
}

impl ScatterMeshesTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for ScatterMeshesTool {
    fn name(&self) -> &str {
        "scatter_meshes_on_landscape"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "scatter_meshes_on_landscape".into(),
            description: "Place a batch of StaticMeshActors on the terrain, line-tracing \
                          ground height for each so everything sits on the surface."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "center": { "type": "array", "items": { "type": "number" }, "description": "[X, Y] center point" },
                    "items": {
                        "type": "array",
                        "description": "Each item: {name, static_mesh, offset: [dX, dY], rotation?, scale?}",
                        "items": { "type": "object" }
                    },
                    "delete_existing": { "type": "boolean", "default": true },
                    "random_offset": { "type": "number", "default": 0.0, "description": "XY jitter in Unreal units" },
                    "random_yaw": { "type": "boolean", "default": false },
                    "random_scale_variance": { "type": "number", "default": 0.0 }
                },
                "required": ["center", "items"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let items = args["items"]
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Missing items"))?
            .clone();
        let params = json!({
            "center": args["center"].as_array().cloned().unwrap_or_default(),
            "items": items,
            "delete_existing": bool_or(&args, "delete_existing", true),
            "random_offset": f64_or(&args, "random_offset", 0.0),
            "random_yaw": bool_or(&args, "random_yaw", false),
            "random_scale_variance": f64_or(&args, "random_scale_variance", 0.0),
        });
        engine_result(
            self.bridge
                .send_command("scatter_meshes_on_landscape", params)
                .await,
        )
    }
}

// ===========================================================================
// scatter_foliage
// ===========================================================================

struct ScatterFoliageTool {
    bridge: Arc<EngineBridge>,
}

impl ScatterFoliageTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for ScatterFoliageTool {
    fn name(&self) -> &str {
        "scatter_foliage"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "scatter_foliage".into(),
            description: "Scatter vegetation as a single batched HISM component using \
                          Poisson-disk placement with slope filtering."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "mesh_path": { "type": "string", "description": "Static mesh asset path" },
                    "center": { "type": "array", "items": { "type": "number" }, "description": "[X, Y] (or use bounds)" },
                    "radius": { "type": "number", "default": 0 },
                    "count": { "type": "integer", "default": 100, "description": "Target instances (max 50000)" },
                    "min_distance": { "type": "number", "default": 50.0 },
                    "max_slope": { "type": "number", "default": 30.0, "description": "Degrees" },
                    "align_to_surface": { "type": "boolean", "default": false },
                    "random_yaw": { "type": "boolean", "default": true },
                    "scale_range": { "type": "array", "items": { "type": "number" }, "description": "[min, max]" },
                    "z_offset": { "type": "number", "default": 0.0 },
                    "actor_name": { "type": "string", "default": "HISM_Foliage" },
                    "cull_distance": { "type": "number", "default": 0.0 },
                    "material_path": { "type": "string" },
                    "bounds": { "type": "array", "items": { "type": "number" }, "description": "[min_x, max_x, min_y, max_y]" }
                },
                "required": ["mesh_path"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let mut params = json!({
            "mesh_path": require_str(&args, "mesh_path")?,
            "count": args["count"].as_u64().unwrap_or(100),
            "min_distance": f64_or(&args, "min_distance", 50.0),
            "max_slope": f64_or(&args, "max_slope", 30.0),
            "align_to_surface": bool_or(&args, "align_to_surface", false),
            "random_yaw": bool_or(&args, "random_yaw", true),
            "z_offset": f64_or(&args, "z_offset", 0.0),
            "actor_name": str_or(&args, "actor_name", "HISM_Foliage"),
            "cull_distance": f64_or(&args, "cull_distance", 0.0),
        });
        for key in ["center", "scale_range", "bounds"] {
            if args[key].is_array() {
                params[key] = args[key].clone();
            }
        }
        if args["radius"].is_number() {
            params["radius"] = args["radius"].clone();
        }
        if let Some(material) = args["material_path"].as_str() {
            if !material.is_empty() {
                params["material_path"] = json!(material);
            }
        }
        engine_result(self.bridge.send_command("scatter_foliage", params).await)
    }
}
