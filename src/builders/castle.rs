//! Castle fortress: curtain walls with crenellations, corner towers, a
//! gatehouse, and a central keep.

use serde::{Deserialize, Serialize};

use super::primitives::{TowerSpec, TowerStyle, tower};
use super::{BlockSpec, CONE_MESH, CUBE_MESH, default_cube_mesh};

/// Castle block module, larger than the 100-unit default so fortresses
/// read at landscape scale.
const BLOCK: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSize {
    Small,
    Medium,
    Large,
    Epic,
}

impl Default for CastleSize {
    fn default() -> Self {
        CastleSize::Large
    }
}

struct SizeParams {
    /// Blocks per curtain-wall side
    side: u32,
    wall_height: u32,
    tower_height: u32,
    keep_size: u32,
}

fn size_params(size: CastleSize) -> SizeParams {
    match size {
        CastleSize::Small => SizeParams {
            side: 12,
            wall_height: 4,
            tower_height: 7,
            keep_size: 3,
        },
        CastleSize::Medium => SizeParams {
            side: 16,
            wall_height: 5,
            tower_height: 9,
            keep_size: 4,
        },
        CastleSize::Large => SizeParams {
            side: 20,
            wall_height: 6,
            tower_height: 11,
            keep_size: 5,
        },
        CastleSize::Epic => SizeParams {
            side: 28,
            wall_height: 8,
            tower_height: 14,
            keep_size: 6,
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastleSpec {
    #[serde(default)]
    pub castle_size: CastleSize,
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default = "default_castle_prefix")]
    pub name_prefix: String,
}

fn default_castle_prefix() -> String {
    "Castle".to_string()
}

pub fn castle(spec: &CastleSpec) -> Vec<BlockSpec> {
    let params = size_params(spec.castle_size);
    let [ox, oy, oz] = spec.location;
    let half = params.side as f64 / 2.0 * BLOCK;
    let scale = BLOCK / 100.0;
    let mesh = default_cube_mesh();
    let gate_center = params.side / 2;

    let mut blocks = Vec::new();

    // Curtain walls. North and south run the full side; east and west skip
    // the endpoints the other two already cover.
    for i in 0..=params.side {
        let x = ox - half + i as f64 * BLOCK;
        for h in 0..params.wall_height {
            let z = oz + h as f64 * BLOCK;
            blocks.push(
                BlockSpec::new(
                    format!("{}_Wall_N_{}_{}", spec.name_prefix, i, h),
                    &mesh,
                    [x, oy + half, z],
                )
                .with_uniform_scale(scale),
            );
            // South wall carries the gate: a 3-wide, 3-high opening
            let in_gate = i.abs_diff(gate_center) <= 1 && h < 3;
            if !in_gate {
                blocks.push(
                    BlockSpec::new(
                        format!("{}_Wall_S_{}_{}", spec.name_prefix, i, h),
                        &mesh,
                        [x, oy - half, z],
                    )
                    .with_uniform_scale(scale),
                );
            }
        }
        // Crenellations: merlons on every other block
        if i % 2 == 0 {
            let z = oz + params.wall_height as f64 * BLOCK;
            blocks.push(
                BlockSpec::new(
                    format!("{}_Merlon_N_{}", spec.name_prefix, i),
                    &mesh,
                    [x, oy + half, z],
                )
                .with_uniform_scale(scale),
            );
            blocks.push(
                BlockSpec::new(
                    format!("{}_Merlon_S_{}", spec.name_prefix, i),
                    &mesh,
                    [x, oy - half, z],
                )
                .with_uniform_scale(scale),
            );
        }
    }
    for i in 1..params.side {
        let y = oy - half + i as f64 * BLOCK;
        for h in 0..params.wall_height {
            let z = oz + h as f64 * BLOCK;
            blocks.push(
                BlockSpec::new(
                    format!("{}_Wall_E_{}_{}", spec.name_prefix, i, h),
                    &mesh,
                    [ox + half, y, z],
                )
                .with_uniform_scale(scale),
            );
            blocks.push(
                BlockSpec::new(
                    format!("{}_Wall_W_{}_{}", spec.name_prefix, i, h),
                    &mesh,
                    [ox - half, y, z],
                )
                .with_uniform_scale(scale),
            );
        }
        if i % 2 == 0 {
            let z = oz + params.wall_height as f64 * BLOCK;
            blocks.push(
                BlockSpec::new(
                    format!("{}_Merlon_E_{}", spec.name_prefix, i),
                    &mesh,
                    [ox + half, y, z],
                )
                .with_uniform_scale(scale),
            );
            blocks.push(
                BlockSpec::new(
                    format!("{}_Merlon_W_{}", spec.name_prefix, i),
                    &mesh,
                    [ox - half, y, z],
                )
                .with_uniform_scale(scale),
            );
        }
    }

    // Corner towers
    for (label, cx, cy) in [
        ("NE", ox + half, oy + half),
        ("NW", ox - half, oy + half),
        ("SE", ox + half, oy - half),
        ("SW", ox - half, oy - half),
    ] {
        blocks.extend(tower(&TowerSpec {
            height: params.tower_height,
            base_size: 3,
            block_size: BLOCK,
            location: [cx, cy, oz],
            name_prefix: format!("{}_Tower{}", spec.name_prefix, label),
            mesh: CUBE_MESH.to_string(),
            tower_style: TowerStyle::Cylindrical,
        }));
        // Banner on top of each corner tower
        blocks.push(
            BlockSpec::new(
                format!("{}_Flag_{}", spec.name_prefix, label),
                CONE_MESH,
                [cx, cy, oz + params.tower_height as f64 * BLOCK],
            )
            .with_uniform_scale(scale * 0.5),
        );
    }

    // Gatehouse: square towers flanking the opening
    for (label, gx) in [
        ("GateL", ox - 2.5 * BLOCK),
        ("GateR", ox + 2.5 * BLOCK),
    ] {
        blocks.extend(tower(&TowerSpec {
            height: params.wall_height + 2,
            base_size: 2,
            block_size: BLOCK,
            location: [gx, oy - half, oz],
            name_prefix: format!("{}_{}", spec.name_prefix, label),
            mesh: CUBE_MESH.to_string(),
            tower_style: TowerStyle::Square,
        }));
    }

    // Central keep
    blocks.extend(tower(&TowerSpec {
        height: params.tower_height + 2,
        base_size: params.keep_size,
        block_size: BLOCK,
        location: [ox, oy, oz],
        name_prefix: format!("{}_Keep", spec.name_prefix),
        mesh: CUBE_MESH.to_string(),
        tower_style: TowerStyle::Tapered,
    }));

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_spec() -> CastleSpec {
        serde_json::from_str("{}").unwrap()
    }

    #[test]
    fn gate_opening_is_clear() {
        let spec = default_spec();
        let blocks = castle(&spec);
        let half = 20.0 / 2.0 * BLOCK;

        // No south curtain-wall block in the 3x3 opening
        let in_opening = blocks.iter().any(|b| {
            b.name.contains("_Wall_S_")
                && b.location[1] == -half
                && b.location[0].abs() <= BLOCK
                && b.location[2] < 3.0 * BLOCK
        });
        assert!(!in_opening);

        // The wall above the opening is intact
        assert!(blocks.iter().any(|b| {
            b.name.contains("_Wall_S_") && b.location[0].abs() <= BLOCK && b.location[2] >= 3.0 * BLOCK
        }));
    }

    #[test]
    fn four_corner_towers_with_flags() {
        let blocks = castle(&default_spec());
        let flags: Vec<_> = blocks.iter().filter(|b| b.name.contains("_Flag_")).collect();
        assert_eq!(flags.len(), 4);
        for flag in flags {
            assert_eq!(flag.static_mesh, CONE_MESH);
            assert_eq!(flag.location[2], 11.0 * BLOCK);
        }
        for corner in ["NE", "NW", "SE", "SW"] {
            assert!(blocks.iter().any(|b| b.name.contains(&format!("Tower{corner}"))));
        }
    }

    #[test]
    fn keep_stands_in_the_center() {
        let blocks = castle(&default_spec());
        let keep: Vec<_> = blocks
            .iter()
            .filter(|b| b.name.contains("_Keep_") && !b.name.contains("detail"))
            .collect();
        assert!(!keep.is_empty());
        // Tapered: top level is narrower than ground level
        let ground_max = keep
            .iter()
            .filter(|b| b.location[2] == 0.0)
            .map(|b| b.location[0].abs().max(b.location[1].abs()))
            .fold(0.0f64, f64::max);
        let top_z = keep.iter().map(|b| b.location[2]).fold(0.0f64, f64::max);
        let top_max = keep
            .iter()
            .filter(|b| b.location[2] == top_z)
            .map(|b| b.location[0].abs().max(b.location[1].abs()))
            .fold(0.0f64, f64::max);
        assert!(top_max < ground_max);
    }

    #[test]
    fn size_tiers_scale_block_count() {
        let mut small = default_spec();
        small.castle_size = CastleSize::Small;
        let mut epic = default_spec();
        epic.castle_size = CastleSize::Epic;
        assert!(castle(&epic).len() > castle(&small).len());
    }
}
