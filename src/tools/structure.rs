//! Procedural structure tools: compute block layouts client-side, then
//! spawn them one `spawn_actor` command at a time.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

use super::{Tool, ToolSchema, bool_or, parse_spec};
use crate::builders::bridge::{AqueductSpec, SuspensionBridgeSpec, aqueduct, suspension_bridge};
use crate::builders::castle::{CastleSpec, castle};
use crate::builders::maze::{MazeSpec, maze};
use crate::builders::primitives::{
    ArchSpec, PyramidSpec, StaircaseSpec, TowerSpec, WallSpec, arch, pyramid, staircase, tower,
    wall,
};
use crate::builders::town::{TownSpec, town};
use crate::builders::BlockSpec;
use crate::engine::{EngineBridge, response};

pub fn tools(bridge: Arc<EngineBridge>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(CreatePyramidTool::new(bridge.clone())),
        Box::new(CreateWallTool::new(bridge.clone())),
        Box::new(CreateTowerTool::new(bridge.clone())),
        Box::new(CreateStaircaseTool::new(bridge.clone())),
        Box::new(CreateArchTool::new(bridge.clone())),
        Box::new(CreateMazeTool::new(bridge.clone())),
        Box::new(CreateCastleTool::new(bridge.clone())),
        Box::new(CreateTownTool::new(bridge.clone())),
        Box::new(CreateSuspensionBridgeTool::new(bridge.clone())),
        Box::new(CreateAqueductTool::new(bridge)),
    ]
}

/// Spawn every block, tallying outcomes. One command per block keeps each
/// cycle small and lets a partial build survive a mid-sequence failure.
async fn spawn_blocks(
    bridge: &EngineBridge,
    blocks: Vec<BlockSpec>,
    mut summary: Value,
) -> Result<String> {
    let total = blocks.len();
    let mut spawned = 0usize;
    let mut failed = 0usize;

    for block in blocks {
        let name = block.name.clone();
        let resp = bridge.send_command("spawn_actor", block.to_params()).await;
        if response::is_error(&resp) {
            failed += 1;
            warn!(
                "Failed to spawn {}: {}",
                name,
                resp.get("error").and_then(|v| v.as_str()).unwrap_or("Unknown error")
            );
        } else {
            spawned += 1;
        }
    }
    info!("Spawned {}/{} blocks", spawned, total);

    summary["success"] = json!(failed == 0);
    summary["spawned"] = json!(spawned);
    summary["failed"] = json!(failed);
    summary["total"] = json!(total);
    Ok(serde_json::to_string_pretty(&summary)?)
}

fn dry_run_summary(blocks: &[BlockSpec], mut summary: Value) -> Result<String> {
    summary["success"] = json!(true);
    summary["dry_run"] = json!(true);
    summary["total"] = json!(blocks.len());
    Ok(serde_json::to_string_pretty(&summary)?)
}

// ===========================================================================
// create_pyramid
// ===========================================================================

struct CreatePyramidTool {
    bridge: Arc<EngineBridge>,
}

impl CreatePyramidTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreatePyramidTool {
    fn name(&self) -> &str {
        "create_pyramid"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_pyramid".into(),
            description: "Build a stepped pyramid out of cube actors.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "base_size": { "type": "integer", "default": 3, "description": "Cubes along the base edge" },
                    "block_size": { "type": "number", "default": 100.0, "description": "Cube size in Unreal units" },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "name_prefix": { "type": "string", "default": "PyramidBlock" },
                    "mesh": { "type": "string", "default": "/Engine/BasicShapes/Cube.Cube" }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let spec: PyramidSpec = parse_spec(arguments)?;
        spawn_blocks(&self.bridge, pyramid(&spec), json!({})).await
    }
}

// ===========================================================================
// create_wall
// ===========================================================================

struct CreateWallTool {
    bridge: Arc<EngineBridge>,
}

impl CreateWallTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateWallTool {
    fn name(&self) -> &str {
        "create_wall"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_wall".into(),
            description: "Build a straight wall of cubes along the X or Y axis.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "length": { "type": "integer", "default": 5 },
                    "height": { "type": "integer", "default": 2 },
                    "block_size": { "type": "number", "default": 100.0 },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "orientation": { "type": "string", "enum": ["x", "y"], "default": "x" },
                    "name_prefix": { "type": "string", "default": "WallBlock" },
                    "mesh": { "type": "string", "default": "/Engine/BasicShapes/Cube.Cube" }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let spec: WallSpec = parse_spec(arguments)?;
        spawn_blocks(&self.bridge, wall(&spec), json!({})).await
    }
}

// ===========================================================================
// create_tower
// ===========================================================================

struct CreateTowerTool {
    bridge: Arc<EngineBridge>,
}

impl CreateTowerTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateTowerTool {
    fn name(&self) -> &str {
        "create_tower"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_tower".into(),
            description: "Build a tower in cylindrical, square, or tapered style, with \
                          corner details every few levels."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "height": { "type": "integer", "default": 10, "description": "Levels" },
                    "base_size": { "type": "integer", "default": 4, "description": "Footprint in blocks" },
                    "block_size": { "type": "number", "default": 100.0 },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "name_prefix": { "type": "string", "default": "TowerBlock" },
                    "mesh": { "type": "string", "default": "/Engine/BasicShapes/Cube.Cube" },
                    "tower_style": { "type": "string", "enum": ["cylindrical", "square", "tapered"], "default": "cylindrical" }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let spec: TowerSpec = parse_spec(arguments)?;
        let style = spec.tower_style;
        spawn_blocks(
            &self.bridge,
            tower(&spec),
            json!({ "tower_style": style }),
        )
        .await
    }
}

// ===========================================================================
// create_staircase
// ===========================================================================

struct CreateStaircaseTool {
    bridge: Arc<EngineBridge>,
}

impl CreateStaircaseTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateStaircaseTool {
    fn name(&self) -> &str {
        "create_staircase"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_staircase".into(),
            description: "Build a straight staircase of scaled cube steps.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "steps": { "type": "integer", "default": 5 },
                    "step_size": { "type": "array", "items": { "type": "number" }, "description": "[depth, width, rise]" },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "name_prefix": { "type": "string", "default": "Stair" },
                    "mesh": { "type": "string", "default": "/Engine/BasicShapes/Cube.Cube" }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let spec: StaircaseSpec = parse_spec(arguments)?;
        spawn_blocks(&self.bridge, staircase(&spec), json!({})).await
    }
}

// ===========================================================================
// create_arch
// ===========================================================================

struct CreateArchTool {
    bridge: Arc<EngineBridge>,
}

impl CreateArchTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateArchTool {
    fn name(&self) -> &str {
        "create_arch"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_arch".into(),
            description: "Build a semicircular arch of blocks in the XZ plane.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "radius": { "type": "number", "default": 300.0 },
                    "segments": { "type": "integer", "default": 6 },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "name_prefix": { "type": "string", "default": "ArchBlock" },
                    "mesh": { "type": "string", "default": "/Engine/BasicShapes/Cube.Cube" }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let spec: ArchSpec = parse_spec(arguments)?;
        spawn_blocks(&self.bridge, arch(&spec), json!({})).await
    }
}

// ===========================================================================
// create_maze
// ===========================================================================

struct CreateMazeTool {
    bridge: Arc<EngineBridge>,
}

impl CreateMazeTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateMazeTool {
    fn name(&self) -> &str {
        "create_maze"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_maze".into(),
            description: "Build a solvable maze (recursive backtracking) with entrance and \
                          exit markers."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "rows": { "type": "integer", "default": 8 },
                    "cols": { "type": "integer", "default": 8 },
                    "cell_size": { "type": "number", "default": 300.0 },
                    "wall_height": { "type": "integer", "default": 3, "description": "Stacked blocks per wall" },
                    "location": { "type": "array", "items": { "type": "number" } }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let spec: MazeSpec = parse_spec(arguments)?;
        let blocks = maze(&spec, &mut rand::rng());
        let summary = json!({
            "maze_size": format!("{}x{}", spec.rows, spec.cols),
            "entrance": "Left side (cylinder marker)",
            "exit": "Right side (sphere marker)",
        });
        spawn_blocks(&self.bridge, blocks, summary).await
    }
}

// ===========================================================================
// create_castle_fortress
// ===========================================================================

struct CreateCastleTool {
    bridge: Arc<EngineBridge>,
}

impl CreateCastleTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateCastleTool {
    fn name(&self) -> &str {
        "create_castle_fortress"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_castle_fortress".into(),
            description: "Build a castle fortress: crenellated curtain walls, corner towers \
                          with banners, a gatehouse, and a central keep."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "castle_size": { "type": "string", "enum": ["small", "medium", "large", "epic"], "default": "large" },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "name_prefix": { "type": "string", "default": "Castle" }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let spec: CastleSpec = parse_spec(arguments)?;
        let size = spec.castle_size;
        spawn_blocks(
            &self.bridge,
            castle(&spec),
            json!({ "castle_size": size }),
        )
        .await
    }
}

// ===========================================================================
// create_town
// ===========================================================================

struct CreateTownTool {
    bridge: Arc<EngineBridge>,
}

impl CreateTownTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateTownTool {
    fn name(&self) -> &str {
        "create_town"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_town".into(),
            description: "Build a town on a street grid: density-scaled buildings, street \
                          lamps, and a central plaza."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "town_size": { "type": "string", "enum": ["small", "medium", "large", "metropolis"], "default": "medium" },
                    "building_density": { "type": "number", "default": 0.7, "description": "0.0-1.0" },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "name_prefix": { "type": "string", "default": "Town" },
                    "include_infrastructure": { "type": "boolean", "default": true }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let spec: TownSpec = parse_spec(arguments)?;
        let blocks = town(&spec, &mut rand::rng());
        let summary = json!({
            "town_size": spec.town_size,
            "building_density": spec.building_density,
        });
        spawn_blocks(&self.bridge, blocks, summary).await
    }
}

// ===========================================================================
// create_suspension_bridge
// ===========================================================================

struct CreateSuspensionBridgeTool {
    bridge: Arc<EngineBridge>,
}

impl CreateSuspensionBridgeTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateSuspensionBridgeTool {
    fn name(&self) -> &str {
        "create_suspension_bridge"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_suspension_bridge".into(),
            description: "Build a suspension bridge: twin towers, modular deck, parabolic \
                          main cables, and vertical suspenders."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "span_length": { "type": "number", "default": 6000.0 },
                    "deck_width": { "type": "number", "default": 800.0 },
                    "tower_height": { "type": "number", "default": 4000.0 },
                    "cable_sag_ratio": { "type": "number", "default": 0.12, "description": "Sag as fraction of span" },
                    "module_size": { "type": "number", "default": 200.0, "description": "Segment resolution" },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "orientation": { "type": "string", "enum": ["x", "y"], "default": "x" },
                    "name_prefix": { "type": "string", "default": "Bridge" },
                    "dry_run": { "type": "boolean", "default": false, "description": "Report metrics without spawning" }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments).unwrap_or_default();
        let spec: SuspensionBridgeSpec = parse_spec(arguments)?;
        let blocks = suspension_bridge(&spec);
        let summary = json!({ "span_length": spec.span_length, "tower_height": spec.tower_height });
        if bool_or(&args, "dry_run", false) {
            return dry_run_summary(&blocks, summary);
        }
        spawn_blocks(&self.bridge, blocks, summary).await
    }
}

// ===========================================================================
// create_aqueduct
// ===========================================================================

struct CreateAqueductTool {
    bridge: Arc<EngineBridge>,
}

impl CreateAqueductTool {
    fn new(bridge: Arc<EngineBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Tool for CreateAqueductTool {
    fn name(&self) -> &str {
        "create_aqueduct"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_aqueduct".into(),
            description: "Build a multi-tier Roman aqueduct: repeating arches over tapering \
                          piers with a water channel on top."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "arches": { "type": "integer", "default": 18, "description": "Arches per tier" },
                    "arch_radius": { "type": "number", "default": 600.0 },
                    "pier_width": { "type": "number", "default": 200.0 },
                    "tiers": { "type": "integer", "default": 2 },
                    "deck_width": { "type": "number", "default": 600.0 },
                    "module_size": { "type": "number", "default": 200.0 },
                    "location": { "type": "array", "items": { "type": "number" } },
                    "orientation": { "type": "string", "enum": ["x", "y"], "default": "x" },
                    "name_prefix": { "type": "string", "default": "Aqueduct" },
                    "dry_run": { "type": "boolean", "default": false }
                }
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: Value = serde_json::from_str(arguments).unwrap_or_default();
        let spec: AqueductSpec = parse_spec(arguments)?;
        let blocks = aqueduct(&spec);
        let summary = json!({ "arches": spec.arches, "tiers": spec.tiers });
        if bool_or(&args, "dry_run", false) {
            return dry_run_summary(&blocks, summary);
        }
        spawn_blocks(&self.bridge, blocks, summary).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn mock_engine_counting_spawns() -> (std::net::SocketAddr, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut data = Vec::new();
                let mut chunk = vec![0u8; 8192];
                loop {
                    let n = stream.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    data.extend_from_slice(&chunk[..n]);
                    if serde_json::from_slice::<Value>(&data).is_ok() {
                        break;
                    }
                }
                if let Ok(request) = serde_json::from_slice::<Value>(&data) {
                    if request["type"] == "spawn_actor" {
                        count_clone.fetch_add(1, Ordering::SeqCst);
                    }
                }
                let _ = stream.write_all(br#"{"status":"success"}"#).await;
            }
        });
        (addr, count)
    }

    fn bridge_for(addr: std::net::SocketAddr) -> Arc<EngineBridge> {
        let mut config = crate::Config::default();
        config.engine.host = addr.ip().to_string();
        config.engine.port = addr.port();
        config.transport.max_retries = 0;
        Arc::new(EngineBridge::new(&config))
    }

    #[tokio::test]
    async fn pyramid_tool_spawns_every_block() {
        let (addr, count) = mock_engine_counting_spawns().await;
        let tool = CreatePyramidTool::new(bridge_for(addr));

        let out = tool.execute(r#"{"base_size": 2}"#).await.unwrap();
        let summary: Value = serde_json::from_str(&out).unwrap();
        // base 2: 4 + 1 blocks
        assert_eq!(summary["total"], 5);
        assert_eq!(summary["spawned"], 5);
        assert_eq!(summary["success"], true);
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn dry_run_spawns_nothing() {
        let (addr, count) = mock_engine_counting_spawns().await;
        let tool = CreateAqueductTool::new(bridge_for(addr));

        let out = tool
            .execute(r#"{"arches": 2, "tiers": 1, "dry_run": true}"#)
            .await
            .unwrap();
        let summary: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(summary["dry_run"], true);
        assert!(summary["total"].as_u64().unwrap() > 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_arguments_use_defaults() {
        let (addr, _count) = mock_engine_counting_spawns().await;
        let tool = CreateStaircaseTool::new(bridge_for(addr));

        let out = tool.execute("").await.unwrap();
        let summary: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(summary["total"], 5);
    }

    #[test]
    fn spec_round_trip_from_schema_defaults() {
        let spec: MazeSpec = parse_spec(r#"{"rows": 4, "cols": 4, "wall_height": 1}"#).unwrap();
        assert_eq!(spec.rows, 4);
        assert_eq!(spec.cell_size, 300.0);

        let summary = json!({ "maze_size": format!("{}x{}", spec.rows, spec.cols) });
        assert_eq!(summary["maze_size"], "4x4");
    }
}
