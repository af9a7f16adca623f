//! Material tools: simple materials, instances, texture import, and the
//! one-shot PBR material graph.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use super::{Tool, ToolSchema, engine_result, f64_or, require_str, str_or};
use crate::engine::EngineBridge;

pub fn tools(bridge: Arc<EngineBridge>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(CreateMaterialTool::new(bridge.clone())),
        Box::new(CreateMaterialInstanceTool::new(bridge.clone())),
        Box::new(ImportTextureTool::new(bridge.clone())),
        Box::new(CreatePbrMaterialTool::new(bridge.clone())),
        Box::new(GetMaterialInfoTool::new(bridge.clone())),
        Box::new(ApplyMaterialToActorTool::new(bridge)),
    ]
}

// ===========================================================================
// create_material
// ===========================================================================

struct CreateMaterialTool {
    bridge: Arc<EngineBridge>,
}

impl CreateMaterialTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateMaterialTool {
    fn name(&self) -> &str {
        "create_material"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_material".into(),
            description: "Create a material asset with flat PBR values (color, roughness, \
                          metallic)."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Material name (e.g. \"M_EarthTone\")" },
                    "path": { "type": "string", "default": "/Game/Materials/", "description": "Content browser folder" },
                    "base_color": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "[R, G, B] or [R, G, B, A], values 0.0-1.0"
                    },
                    "roughness": { "type": "number", "default": 0.5 },
                    "metallic": { "type": "number", "default": 0.0 }
                },
                "required": ["name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let mut params = json!({
            "name": require_str(&args, "name")?,
            "path": str_or(&args, "path", "/Game/Materials/"),
            "roughness": f64_or(&args, "roughness", 0.5),
            "metallic": f64_or(&args, "metallic", 0.0),
        });
        if args["base_color"].is_array() {
            params["base_color"] = args["base_color"].clone();
        }
        engine_result(self.bridge.send_command("create_material", params).await)
    }
}

// ===========================================================================
// create_material_instance
// ===========================================================================

struct CreateMaterialInstanceTool {
    bridge: Arc<EngineBridge>,
}

impl CreateMaterialInstanceTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateMaterialInstanceTool {
    fn name(&self) -> &str {
        "create_material_instance"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_material_instance".into(),
            description: "Create a material instance overriding parameters of a parent \
                          material without duplicating the shader."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Instance name (e.g. \"MI_EarthTone_Red\")" },
                    "parent_material": { "type": "string", "description": "Path to the parent material" },
                    "path": { "type": "string", "description": "Destination folder (defaults to the parent's)" },
                    "scalar_parameters": {
                        "type": "object",
                        "description": "Scalar overrides, e.g. {\"Roughness\": 0.2}"
                    },
                    "vector_parameters": {
                        "type": "object",
                        "description": "Vector overrides, e.g. {\"BaseColor\": [0.8, 0.2, 0.1, 1.0]}"
                    }
                },
                "required": ["name", "parent_material"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let mut params = json!({
            "name": require_str(&args, "name")?,
            "parent_material": require_str(&args, "parent_material")?,
        });
        if let Some(path) = args["path"].as_str() {
            if !path.is_empty() {
                params["path"] = json!(path);
            }
        }
        for key in ["scalar_parameters", "vector_parameters"] {
            if args[key].is_object() {
                params[key] = args[key].clone();
            }
        }
        engine_result(
            self.bridge
                .send_command("create_material_instance", params)
                .await,
        )
    }
}

// ===========================================================================
// import_texture
// ===========================================================================

struct ImportTextureTool {
    bridge: Arc<EngineBridge>,
}

impl ImportTextureTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for ImportTextureTool {
    fn name(&self) -> &str {
        "import_texture"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "import_texture".into(),
            description: "Import an image file (PNG, JPG, TGA, EXR, HDR) into the project \
                          as a texture asset."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "source_path": { "type": "string", "description": "Filesystem path of the image" },
                    "texture_name": { "type": "string", "description": "Asset name (defaults to the filename)" },
                    "destination_path": { "type": "string", "default": "/Game/Textures/" },
                    "compression_type": {
                        "type": "string",
                        "description": "Default | Normalmap | Masks | Grayscale | HDR"
                    },
                    "srgb": { "type": "boolean", "description": "true for color maps, false for normal/ARM/data" },
                    "flip_green_channel": { "type": "boolean", "description": "OpenGL to DirectX normal conversion" }
                },
                "required": ["source_path"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let mut params = json!({
            "source_path": require_str(&args, "source_path")?,
            "destination_path": str_or(&args, "destination_path", "/Game/Textures/"),
        });
        if let Some(name) = args["texture_name"].as_str() {
            if !name.is_empty() {
                params["texture_name"] = json!(name);
            }
        }
        if let Some(compression) = args["compression_type"].as_str() {
            if !compression.is_empty() {
                params["compression_type"] = json!(compression);
            }
        }
        for key in ["srgb", "flip_green_channel"] {
            if args[key].is_boolean() {
                params[key] = args[key].clone();
            }
        }
        engine_result(self.bridge.send_command("import_texture", params).await)
    }
}

// ===========================================================================
// create_pbr_material
// ===========================================================================

struct CreatePbrMaterialTool {
    bridge: Arc<EngineBridge>,
}

impl CreatePbrMaterialTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreatePbrMaterialTool {
    fn name(&self) -> &str {
        "create_pbr_material"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_pbr_material".into(),
            description: "Build a complete PBR material graph in one shot: texture samplers \
                          with correct sampler types (diffuse sRGB, normal linear, packed ARM \
                          masks) wired to the material outputs."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Material name (e.g. \"M_Boulder\")" },
                    "path": { "type": "string", "default": "/Game/Materials/" },
                    "diffuse_texture": { "type": "string", "description": "Base color texture path" },
                    "normal_texture": { "type": "string", "description": "Normal map path" },
                    "arm_texture": { "type": "string", "description": "Packed AO/Roughness/Metallic texture path" },
                    "roughness_texture": { "type": "string" },
                    "metallic_texture": { "type": "string" },
                    "ao_texture": { "type": "string" },
                    "roughness_value": { "type": "number", "description": "Scalar roughness when no texture" },
                    "metallic_value": { "type": "number", "description": "Scalar metallic when no texture" },
                    "two_sided": { "type": "boolean" },
                    "opacity_mask_texture": { "type": "string", "description": "Sets Masked blend mode for foliage" },
                    "blend_mode": { "type": "string", "description": "Opaque | Masked | Translucent | Additive" }
                },
                "required": ["name"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let mut params = json!({
            "name": require_str(&args, "name")?,
            "path": str_or(&args, "path", "/Game/Materials/"),
        });
        for key in [
            "diffuse_texture",
            "normal_texture",
            "arm_texture",
            "roughness_texture",
            "metallic_texture",
            "ao_texture",
            "opacity_mask_texture",
            "blend_mode",
        ] {
            if let Some(value) = args[key].as_str() {
                if !value.is_empty() {
                    params[key] = json!(value);
                }
            }
        }
        for key in ["roughness_value", "metallic_value"] {
            if args[key].is_number() {
                params[key] = args[key].clone();
            }
        }
        if args["two_sided"].as_bool() == Some(true) {
            params["two_sided"] = json!(true);
        }
        engine_result(self.bridge.send_command("create_pbr_material", params).await)
    }
}

// ===========================================================================
// get_material_info
// ===========================================================================

struct GetMaterialInfoTool {
    bridge: Arc<EngineBridge>,
}

impl GetMaterialInfoTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for GetMaterialInfoTool {
    fn name(&self) -> &str {
        "get_material_info"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_material_info".into(),
            description: "Inspect a material asset: parameters, textures, and blend settings."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "material_path": { "type": "string", "description": "Material asset path" }
                },
                "required": ["material_path"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let material_path = require_str(&args, "material_path")?;
        engine_result(
            self.bridge
                .send_command("get_material_info", json!({ "material_path": material_path }))
                .await,
        )
    }
}

// ===========================================================================
// apply_material_to_actor
// ===========================================================================

struct ApplyMaterialToActorTool {
    bridge: Arc<EngineBridge>,
}

impl ApplyMaterialToActorTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for ApplyMaterialToActorTool {
    fn name(&self) -> &str {
        "apply_material_to_actor"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "apply_material_to_actor".into(),
            description: "Apply a material to an actor's mesh. Slot -1 applies to all slots."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "actor_name": { "type": "string" },
                    "material_path": { "type": "string" },
                    "material_slot": { "type": "integer", "default": -1 }
                },
                "required": ["actor_name", "material_path"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments)?;
        let params = json!({
            "actor_name": require_str(&args, "actor_name")?,
            "material_path": require_str(&args, "material_path")?,
            "material_slot": args["material_slot"].as_i64().unwrap_or(-1),
        });
        engine_result(
            self.bridge
                .send_command("apply_material_to_actor", params)
                .await,
        )
    }
}
