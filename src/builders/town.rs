//! Town generation: a street grid of lots with density-scaled buildings,
//! street lamps at intersections, and a central plaza.

use rand::RngExt;
use serde::{Deserialize, Serialize};

use super::{BlockSpec, CYLINDER_MESH, SPHERE_MESH, default_cube_mesh};

/// Street width between lots, Unreal units.
const STREET_WIDTH: f64 = 400.0;
/// One building storey.
const FLOOR_HEIGHT: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TownSize {
    Small,
    Medium,
    Large,
    Metropolis,
}

impl Default for TownSize {
    fn default() -> Self {
        TownSize::Medium
    }
}

struct SizeParams {
    blocks: u32,
    block_size: f64,
    max_building_height: u32,
    skyscraper_chance: f64,
}

fn size_params(size: TownSize) -> SizeParams {
    match size {
        TownSize::Small => SizeParams {
            blocks: 3,
            block_size: 1500.0,
            max_building_height: 5,
            skyscraper_chance: 0.1,
        },
        TownSize::Medium => SizeParams {
            blocks: 5,
            block_size: 2000.0,
            max_building_height: 10,
            skyscraper_chance: 0.3,
        },
        TownSize::Large => SizeParams {
            blocks: 7,
            block_size: 2500.0,
            max_building_height: 20,
            skyscraper_chance: 0.5,
        },
        TownSize::Metropolis => SizeParams {
            blocks: 10,
            block_size: 3000.0,
            max_building_height: 40,
            skyscraper_chance: 0.7,
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TownSpec {
    #[serde(default)]
    pub town_size: TownSize,
    #[serde(default = "default_density")]
    pub building_density: f64,
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default = "default_town_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_true")]
    pub include_infrastructure: bool,
}

fn default_density() -> f64 {
    0.7
}
fn default_town_prefix() -> String {
    "Town".to_string()
}
fn default_true() -> bool {
    true
}

pub fn town(spec: &TownSpec, rng: &mut impl RngExt) -> Vec<BlockSpec> {
    let params = size_params(spec.town_size);
    let density = spec.building_density.clamp(0.0, 1.0);
    let [ox, oy, oz] = spec.location;
    let mesh = default_cube_mesh();

    let pitch = params.block_size + STREET_WIDTH;
    let extent = params.blocks as f64 * pitch;
    let origin_x = ox - extent / 2.0;
    let origin_y = oy - extent / 2.0;

    let mut blocks = Vec::new();
    let center_lot = params.blocks / 2;

    for gx in 0..params.blocks {
        for gy in 0..params.blocks {
            let lot_x = origin_x + gx as f64 * pitch + pitch / 2.0;
            let lot_y = origin_y + gy as f64 * pitch + pitch / 2.0;

            // Central lot becomes the plaza
            if gx == center_lot && gy == center_lot {
                blocks.push(
                    BlockSpec::new(
                        format!("{}_Plaza", spec.name_prefix),
                        &mesh,
                        [lot_x, lot_y, oz],
                    )
                    .with_scale([
                        params.block_size / 100.0,
                        params.block_size / 100.0,
                        0.2,
                    ]),
                );
                blocks.push(
                    BlockSpec::new(
                        format!("{}_Plaza_Fountain", spec.name_prefix),
                        CYLINDER_MESH,
                        [lot_x, lot_y, oz + 100.0],
                    )
                    .with_scale([3.0, 3.0, 1.0]),
                );
                continue;
            }

            if rng.random::<f64>() >= density {
                continue;
            }

            let is_skyscraper = rng.random::<f64>() < params.skyscraper_chance;
            let floors = if is_skyscraper {
                rng.random_range(params.max_building_height / 2..=params.max_building_height)
            } else {
                rng.random_range(1..=(params.max_building_height / 2).max(1))
            };
            let footprint = params.block_size * rng.random_range(0.5..0.85);
            let body_height = floors as f64 * FLOOR_HEIGHT;

            blocks.push(
                BlockSpec::new(
                    format!("{}_Building_{}_{}", spec.name_prefix, gx, gy),
                    &mesh,
                    [lot_x, lot_y, oz + body_height / 2.0],
                )
                .with_scale([footprint / 100.0, footprint / 100.0, body_height / 100.0]),
            );
            // Flat roof slab gives the skyline a finished edge
            blocks.push(
                BlockSpec::new(
                    format!("{}_Roof_{}_{}", spec.name_prefix, gx, gy),
                    &mesh,
                    [lot_x, lot_y, oz + body_height + 20.0],
                )
                .with_scale([footprint / 100.0 * 1.05, footprint / 100.0 * 1.05, 0.4]),
            );
        }
    }

    if spec.include_infrastructure {
        // Street lamps on the interior intersections
        for ix in 1..params.blocks {
            for iy in 1..params.blocks {
                let x = origin_x + ix as f64 * pitch - STREET_WIDTH / 2.0;
                let y = origin_y + iy as f64 * pitch - STREET_WIDTH / 2.0;
                blocks.push(
                    BlockSpec::new(
                        format!("{}_LampPost_{}_{}", spec.name_prefix, ix, iy),
                        CYLINDER_MESH,
                        [x, y, oz + 200.0],
                    )
                    .with_scale([0.2, 0.2, 4.0]),
                );
                blocks.push(
                    BlockSpec::new(
                        format!("{}_LampHead_{}_{}", spec.name_prefix, ix, iy),
                        SPHERE_MESH,
                        [x, y, oz + 420.0],
                    )
                    .with_uniform_scale(0.5),
                );
            }
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn default_spec() -> TownSpec {
        serde_json::from_str("{}").unwrap()
    }

    #[test]
    fn zero_density_leaves_plaza_and_lamps_only() {
        let mut spec = default_spec();
        spec.building_density = 0.0;
        let blocks = town(&spec, &mut StdRng::seed_from_u64(3));

        assert!(blocks.iter().all(|b| !b.name.contains("_Building_")));
        assert!(blocks.iter().any(|b| b.name.ends_with("_Plaza")));
        // Medium: 4x4 interior intersections, post + head each
        let lamps = blocks.iter().filter(|b| b.name.contains("_Lamp")).count();
        assert_eq!(lamps, 32);
    }

    #[test]
    fn full_density_fills_every_lot() {
        let mut spec = default_spec();
        spec.building_density = 1.0;
        spec.include_infrastructure = false;
        let blocks = town(&spec, &mut StdRng::seed_from_u64(3));

        let buildings = blocks
            .iter()
            .filter(|b| b.name.contains("_Building_"))
            .count();
        // 5x5 lots minus the plaza
        assert_eq!(buildings, 24);
        // Every building has a roof
        let roofs = blocks.iter().filter(|b| b.name.contains("_Roof_")).count();
        assert_eq!(roofs, buildings);
    }

    #[test]
    fn buildings_respect_height_cap() {
        let mut spec = default_spec();
        spec.building_density = 1.0;
        spec.town_size = TownSize::Metropolis;
        let blocks = town(&spec, &mut StdRng::seed_from_u64(9));

        let cap = 40.0 * FLOOR_HEIGHT;
        for b in blocks.iter().filter(|b| b.name.contains("_Building_")) {
            // Centered bodies: top = location.z + half height
            let top = b.location[2] + b.scale[2] * 100.0 / 2.0;
            assert!(top <= cap + 1e-6, "{} tops out at {top}", b.name);
        }
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let spec = default_spec();
        let a = town(&spec, &mut StdRng::seed_from_u64(11));
        let b = town(&spec, &mut StdRng::seed_from_u64(11));
        assert_eq!(a.len(), b.len());
    }
}
