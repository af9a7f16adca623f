//! Basic block structures: pyramid, wall, tower, staircase, arch.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{BlockSpec, CYLINDER_MESH, Orientation, default_cube_mesh};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PyramidSpec {
    #[serde(default = "default_pyramid_base")]
    pub base_size: u32,
    #[serde(default = "default_block_size")]
    pub block_size: f64,
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default = "default_pyramid_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_cube_mesh")]
    pub mesh: String,
}

fn default_pyramid_base() -> u32 {
    3
}
fn default_block_size() -> f64 {
    100.0
}
fn default_pyramid_prefix() -> String {
    "PyramidBlock".to_string()
}

/// Solid stepped pyramid: each level is a (base - level)^2 grid of cubes
/// centered over the one below.
pub fn pyramid(spec: &PyramidSpec) -> Vec<BlockSpec> {
    let mut blocks = Vec::new();
    let bs = spec.block_size;
    let scale = bs / 100.0;

    for level in 0..spec.base_size {
        let count = spec.base_size - level;
        let half = (count - 1) as f64 / 2.0;
        for x in 0..count {
            for y in 0..count {
                blocks.push(
                    BlockSpec::new(
                        format!("{}_{}_{}_{}", spec.name_prefix, level, x, y),
                        &spec.mesh,
                        [
                            spec.location[0] + (x as f64 - half) * bs,
                            spec.location[1] + (y as f64 - half) * bs,
                            spec.location[2] + level as f64 * bs,
                        ],
                    )
                    .with_uniform_scale(scale),
                );
            }
        }
    }
    blocks
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSpec {
    #[serde(default = "default_wall_length")]
    pub length: u32,
    #[serde(default = "default_wall_height")]
    pub height: u32,
    #[serde(default = "default_block_size")]
    pub block_size: f64,
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_wall_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_cube_mesh")]
    pub mesh: String,
}

fn default_wall_length() -> u32 {
    5
}
fn default_wall_height() -> u32 {
    2
}
fn default_wall_prefix() -> String {
    "WallBlock".to_string()
}

pub fn wall(spec: &WallSpec) -> Vec<BlockSpec> {
    let mut blocks = Vec::new();
    let bs = spec.block_size;
    let scale = bs / 100.0;

    for h in 0..spec.height {
        for i in 0..spec.length {
            let location = match spec.orientation {
                Orientation::X => [
                    spec.location[0] + i as f64 * bs,
                    spec.location[1],
                    spec.location[2] + h as f64 * bs,
                ],
                Orientation::Y => [
                    spec.location[0],
                    spec.location[1] + i as f64 * bs,
                    spec.location[2] + h as f64 * bs,
                ],
            };
            blocks.push(
                BlockSpec::new(
                    format!("{}_{}_{}", spec.name_prefix, h, i),
                    &spec.mesh,
                    location,
                )
                .with_uniform_scale(scale),
            );
        }
    }
    blocks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerStyle {
    Cylindrical,
    Square,
    Tapered,
}

impl Default for TowerStyle {
    fn default() -> Self {
        TowerStyle::Cylindrical
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerSpec {
    #[serde(default = "default_tower_height")]
    pub height: u32,
    #[serde(default = "default_tower_base")]
    pub base_size: u32,
    #[serde(default = "default_block_size")]
    pub block_size: f64,
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default = "default_tower_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_cube_mesh")]
    pub mesh: String,
    #[serde(default)]
    pub tower_style: TowerStyle,
}

fn default_tower_height() -> u32 {
    10
}
fn default_tower_base() -> u32 {
    4
}
fn default_tower_prefix() -> String {
    "TowerBlock".to_string()
}

pub fn tower(spec: &TowerSpec) -> Vec<BlockSpec> {
    let mut blocks = Vec::new();
    let bs = spec.block_size;
    let scale = bs / 100.0;

    for level in 0..spec.height {
        let level_z = spec.location[2] + level as f64 * bs;

        match spec.tower_style {
            TowerStyle::Cylindrical => {
                let radius = spec.base_size as f64 / 2.0 * bs;
                let circumference = 2.0 * PI * radius;
                let num_blocks = ((circumference / bs) as u32).max(8);
                for i in 0..num_blocks {
                    let angle = 2.0 * PI * i as f64 / num_blocks as f64;
                    blocks.push(
                        BlockSpec::new(
                            format!("{}_{}_{}", spec.name_prefix, level, i),
                            &spec.mesh,
                            [
                                spec.location[0] + radius * angle.cos(),
                                spec.location[1] + radius * angle.sin(),
                                level_z,
                            ],
                        )
                        .with_uniform_scale(scale),
                    );
                }
            }
            TowerStyle::Square | TowerStyle::Tapered => {
                let size = match spec.tower_style {
                    TowerStyle::Tapered => (spec.base_size.saturating_sub(level / 2)).max(1),
                    _ => spec.base_size,
                };
                let half = size as f64 / 2.0;
                for side in 0..4u32 {
                    for i in 0..size {
                        let offset = i as f64 - half + 0.5;
                        let (x, y, label) = match side {
                            0 => (
                                spec.location[0] + offset * bs,
                                spec.location[1] - half * bs,
                                "front",
                            ),
                            1 => (
                                spec.location[0] + half * bs,
                                spec.location[1] + offset * bs,
                                "right",
                            ),
                            2 => (
                                spec.location[0] - offset * bs,
                                spec.location[1] + half * bs,
                                "back",
                            ),
                            _ => (
                                spec.location[0] - half * bs,
                                spec.location[1] - offset * bs,
                                "left",
                            ),
                        };
                        blocks.push(
                            BlockSpec::new(
                                format!("{}_{}_{}_{}", spec.name_prefix, level, label, i),
                                &spec.mesh,
                                [x, y, level_z],
                            )
                            .with_uniform_scale(scale),
                        );
                    }
                }
            }
        }

        // Corner details every third level, skipping the crown
        if level % 3 == 2 && level + 1 < spec.height {
            for corner in 0..4u32 {
                let angle = corner as f64 * PI / 2.0;
                let detail_radius = (spec.base_size as f64 / 2.0 + 0.5) * bs;
                blocks.push(
                    BlockSpec::new(
                        format!("{}_{}_detail_{}", spec.name_prefix, level, corner),
                        CYLINDER_MESH,
                        [
                            spec.location[0] + detail_radius * angle.cos(),
                            spec.location[1] + detail_radius * angle.sin(),
                            level_z,
                        ],
                    )
                    .with_uniform_scale(scale * 0.7),
                );
            }
        }
    }
    blocks
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaircaseSpec {
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default = "default_step_size")]
    pub step_size: [f64; 3],
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default = "default_stair_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_cube_mesh")]
    pub mesh: String,
}

fn default_steps() -> u32 {
    5
}
fn default_step_size() -> [f64; 3] {
    [100.0, 100.0, 50.0]
}
fn default_stair_prefix() -> String {
    "Stair".to_string()
}

pub fn staircase(spec: &StaircaseSpec) -> Vec<BlockSpec> {
    let [sx, sy, sz] = spec.step_size;
    (0..spec.steps)
        .map(|i| {
            BlockSpec::new(
                format!("{}_{}", spec.name_prefix, i),
                &spec.mesh,
                [
                    spec.location[0] + i as f64 * sx,
                    spec.location[1],
                    spec.location[2] + i as f64 * sz,
                ],
            )
            .with_scale([sx / 100.0, sy / 100.0, sz / 100.0])
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchSpec {
    #[serde(default = "default_arch_radius")]
    pub radius: f64,
    #[serde(default = "default_arch_segments")]
    pub segments: u32,
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default = "default_arch_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_cube_mesh")]
    pub mesh: String,
}

fn default_arch_radius() -> f64 {
    300.0
}
fn default_arch_segments() -> u32 {
    6
}
fn default_arch_prefix() -> String {
    "ArchBlock".to_string()
}

/// Semicircle of blocks in the XZ plane, feet at ±radius.
pub fn arch(spec: &ArchSpec) -> Vec<BlockSpec> {
    let angle_step = PI / spec.segments as f64;
    let scale = spec.radius / 600.0;
    (0..=spec.segments)
        .map(|i| {
            let theta = angle_step * i as f64;
            BlockSpec::new(
                format!("{}_{}", spec.name_prefix, i),
                &spec.mesh,
                [
                    spec.location[0] + spec.radius * theta.cos(),
                    spec.location[1],
                    spec.location[2] + spec.radius * theta.sin(),
                ],
            )
            .with_uniform_scale(scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_defaults<T: for<'de> Deserialize<'de>>() -> T {
        serde_json::from_str("{}").unwrap()
    }

    #[test]
    fn pyramid_block_count_and_apex() {
        let spec: PyramidSpec = spec_defaults();
        let blocks = pyramid(&spec);
        // base 3: 9 + 4 + 1
        assert_eq!(blocks.len(), 14);

        let apex = blocks.last().unwrap();
        assert_eq!(apex.location, [0.0, 0.0, 200.0]);
        // Every level is centered on the origin
        let sum_x: f64 = blocks.iter().map(|b| b.location[0]).sum();
        assert!(sum_x.abs() < 1e-9);
    }

    #[test]
    fn wall_rows_follow_orientation() {
        let mut spec: WallSpec = spec_defaults();
        spec.length = 4;
        spec.height = 3;
        let blocks = wall(&spec);
        assert_eq!(blocks.len(), 12);
        assert!(blocks.iter().all(|b| b.location[1] == 0.0));

        spec.orientation = Orientation::Y;
        let blocks = wall(&spec);
        assert!(blocks.iter().all(|b| b.location[0] == 0.0));
        assert_eq!(blocks.last().unwrap().location, [0.0, 300.0, 200.0]);
    }

    #[test]
    fn cylindrical_tower_ring_size() {
        let spec: TowerSpec = spec_defaults();
        let blocks = tower(&spec);
        // base 4, block 100: radius 200, circumference ~1256 -> 12 per ring
        let ring: Vec<_> = blocks.iter().filter(|b| b.location[2] == 0.0).collect();
        assert_eq!(ring.len(), 12);
        for block in &ring {
            let r = (block.location[0].powi(2) + block.location[1].powi(2)).sqrt();
            assert!((r - 200.0).abs() < 1e-6);
        }
        // Detail cylinders appear on level 2 (height 10 has room above)
        assert!(blocks.iter().any(|b| b.name.contains("_2_detail_")));
    }

    #[test]
    fn tapered_tower_narrows() {
        let mut spec: TowerSpec = spec_defaults();
        spec.tower_style = TowerStyle::Tapered;
        spec.height = 8;
        let blocks = tower(&spec);
        let width_at = |z: f64| {
            blocks
                .iter()
                .filter(|b| b.location[2] == z && !b.name.contains("detail"))
                .map(|b| b.location[0].abs().max(b.location[1].abs()))
                .fold(0.0f64, f64::max)
        };
        assert!(width_at(700.0) < width_at(0.0));
    }

    #[test]
    fn staircase_rises_monotonically() {
        let spec: StaircaseSpec = spec_defaults();
        let blocks = staircase(&spec);
        assert_eq!(blocks.len(), 5);
        for pair in blocks.windows(2) {
            assert!(pair[1].location[0] > pair[0].location[0]);
            assert!(pair[1].location[2] > pair[0].location[2]);
        }
        assert_eq!(blocks[0].scale, [1.0, 1.0, 0.5]);
    }

    #[test]
    fn arch_feet_and_crown() {
        let spec: ArchSpec = spec_defaults();
        let blocks = arch(&spec);
        assert_eq!(blocks.len(), 7);
        assert_eq!(blocks.first().unwrap().location, [300.0, 0.0, 0.0]);
        let crown = &blocks[3];
        assert!(crown.location[0].abs() < 1e-6);
        assert!((crown.location[2] - 300.0).abs() < 1e-6);
        // Feet end up mirrored
        let last = blocks.last().unwrap();
        assert!((last.location[0] + 300.0).abs() < 1e-6);
        assert!(last.location[2].abs() < 1e-6);
    }
}
