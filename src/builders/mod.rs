//! Procedural structure generators.
//!
//! Every builder is a pure function from a spec struct to a list of
//! `BlockSpec`s; nothing here touches the network. The structure tools
//! spawn the blocks one `spawn_actor` command at a time.
//!
//! Units are Unreal units (centimeters). The engine basic shapes are
//! 100 units across, so scale = desired size / 100.

pub mod bridge;
pub mod castle;
pub mod maze;
pub mod primitives;
pub mod town;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const CUBE_MESH: &str = "/Engine/BasicShapes/Cube.Cube";
pub const CYLINDER_MESH: &str = "/Engine/BasicShapes/Cylinder.Cylinder";
pub const SPHERE_MESH: &str = "/Engine/BasicShapes/Sphere.Sphere";
pub const CONE_MESH: &str = "/Engine/BasicShapes/Cone.Cone";

/// One actor to spawn: the `spawn_actor` command's parameter set.
#[derive(Debug, Clone, Serialize)]
pub struct BlockSpec {
    pub name: String,
    pub static_mesh: String,
    pub location: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl BlockSpec {
    pub fn new(name: impl Into<String>, mesh: impl Into<String>, location: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            static_mesh: mesh.into(),
            location,
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn with_scale(mut self, scale: [f64; 3]) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, scale: f64) -> Self {
        self.with_scale([scale, scale, scale])
    }

    pub fn with_rotation(mut self, rotation: [f64; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Parameters for the `spawn_actor` command.
    pub fn to_params(&self) -> Value {
        json!({
            "name": self.name,
            "type": "StaticMeshActor",
            "location": self.location,
            "rotation": self.rotation,
            "scale": self.scale,
            "static_mesh": self.static_mesh,
        })
    }
}

/// Axis a linear structure runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    X,
    Y,
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::X
    }
}

pub(crate) fn default_cube_mesh() -> String {
    CUBE_MESH.to_string()
}

pub(crate) fn default_cylinder_mesh() -> String {
    CYLINDER_MESH.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_spec_params_shape() {
        let block = BlockSpec::new("Wall_0_0", CUBE_MESH, [100.0, 0.0, 50.0])
            .with_uniform_scale(2.0)
            .with_rotation([0.0, 45.0, 0.0]);
        let params = block.to_params();
        assert_eq!(params["name"], "Wall_0_0");
        assert_eq!(params["type"], "StaticMeshActor");
        assert_eq!(params["location"], json!([100.0, 0.0, 50.0]));
        assert_eq!(params["rotation"], json!([0.0, 45.0, 0.0]));
        assert_eq!(params["scale"], json!([2.0, 2.0, 2.0]));
        assert_eq!(params["static_mesh"], CUBE_MESH);
    }
}
