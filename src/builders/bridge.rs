//! Spanning structures: suspension bridge and Roman-style aqueduct.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{BlockSpec, Orientation, default_cube_mesh, default_cylinder_mesh};

/// Map (along-axis, cross-axis, z) to world coordinates for the chosen
/// orientation.
fn place(orientation: Orientation, origin: [f64; 3], along: f64, cross: f64, z: f64) -> [f64; 3] {
    match orientation {
        Orientation::X => [origin[0] + along, origin[1] + cross, origin[2] + z],
        Orientation::Y => [origin[0] + cross, origin[1] + along, origin[2] + z],
    }
}

fn oriented_scale(orientation: Orientation, along: f64, cross: f64, z: f64) -> [f64; 3] {
    match orientation {
        Orientation::X => [along, cross, z],
        Orientation::Y => [cross, along, z],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspensionBridgeSpec {
    #[serde(default = "default_span_length")]
    pub span_length: f64,
    #[serde(default = "default_deck_width")]
    pub deck_width: f64,
    #[serde(default = "default_tower_height")]
    pub tower_height: f64,
    #[serde(default = "default_sag_ratio")]
    pub cable_sag_ratio: f64,
    #[serde(default = "default_module_size")]
    pub module_size: f64,
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_bridge_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_cube_mesh")]
    pub deck_mesh: String,
    #[serde(default = "default_cube_mesh")]
    pub tower_mesh: String,
    #[serde(default = "default_cylinder_mesh")]
    pub cable_mesh: String,
    #[serde(default = "default_cylinder_mesh")]
    pub suspender_mesh: String,
}

fn default_span_length() -> f64 {
    6000.0
}
fn default_deck_width() -> f64 {
    800.0
}
fn default_tower_height() -> f64 {
    4000.0
}
fn default_sag_ratio() -> f64 {
    0.12
}
fn default_module_size() -> f64 {
    200.0
}
fn default_bridge_prefix() -> String {
    "Bridge".to_string()
}

/// Twin towers, modular deck, parabolic main cables, and vertical
/// suspenders. The cable follows z = top - 4*sag*t*(1-t) across the span,
/// the standard suspension profile.
pub fn suspension_bridge(spec: &SuspensionBridgeSpec) -> Vec<BlockSpec> {
    let mut blocks = Vec::new();
    let orientation = spec.orientation;
    let origin = spec.location;
    let half_span = spec.span_length / 2.0;
    let half_width = spec.deck_width / 2.0;
    let sag = spec.span_length * spec.cable_sag_ratio;
    let modules = (spec.span_length / spec.module_size).ceil().max(1.0) as u32;

    // Deck
    for i in 0..modules {
        let along = -half_span + (i as f64 + 0.5) * spec.module_size;
        blocks.push(
            BlockSpec::new(
                format!("{}_Deck_{}", spec.name_prefix, i),
                &spec.deck_mesh,
                place(orientation, origin, along, 0.0, 0.0),
            )
            .with_scale(oriented_scale(
                orientation,
                spec.module_size / 100.0,
                spec.deck_width / 100.0,
                0.5,
            )),
        );
    }

    // Towers: two legs each end plus a crossbeam at the top
    for (end_label, end_along) in [("A", -half_span), ("B", half_span)] {
        for (side_label, cross) in [("L", -half_width), ("R", half_width)] {
            blocks.push(
                BlockSpec::new(
                    format!("{}_Tower{}_{}", spec.name_prefix, end_label, side_label),
                    &spec.tower_mesh,
                    place(orientation, origin, end_along, cross, spec.tower_height / 2.0),
                )
                .with_scale(oriented_scale(
                    orientation,
                    2.0,
                    2.0,
                    spec.tower_height / 100.0,
                )),
            );
        }
        blocks.push(
            BlockSpec::new(
                format!("{}_Crossbeam_{}", spec.name_prefix, end_label),
                &spec.tower_mesh,
                place(orientation, origin, end_along, 0.0, spec.tower_height),
            )
            .with_scale(oriented_scale(
                orientation,
                2.0,
                spec.deck_width / 100.0 + 2.0,
                1.0,
            )),
        );
    }

    // Main cables and suspenders
    for (side_label, cross) in [("L", -half_width), ("R", half_width)] {
        for i in 0..=modules {
            let t = i as f64 / modules as f64;
            let along = -half_span + t * spec.span_length;
            let cable_z = spec.tower_height - 4.0 * sag * t * (1.0 - t);
            blocks.push(
                BlockSpec::new(
                    format!("{}_Cable_{}_{}", spec.name_prefix, side_label, i),
                    &spec.cable_mesh,
                    place(orientation, origin, along, cross, cable_z),
                )
                .with_uniform_scale(0.5),
            );

            // A hanger every fourth module, skipping the tower stations
            if i % 4 == 0 && i != 0 && i != modules {
                let hanger_len = cable_z;
                blocks.push(
                    BlockSpec::new(
                        format!("{}_Suspender_{}_{}", spec.name_prefix, side_label, i),
                        &spec.suspender_mesh,
                        place(orientation, origin, along, cross, hanger_len / 2.0),
                    )
                    .with_scale(oriented_scale(orientation, 0.15, 0.15, hanger_len / 100.0)),
                );
            }
        }
    }

    blocks
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AqueductSpec {
    #[serde(default = "default_arches")]
    pub arches: u32,
    #[serde(default = "default_arch_radius")]
    pub arch_radius: f64,
    #[serde(default = "default_pier_width")]
    pub pier_width: f64,
    #[serde(default = "default_tiers")]
    pub tiers: u32,
    #[serde(default = "default_aqueduct_deck_width")]
    pub deck_width: f64,
    #[serde(default = "default_module_size")]
    pub module_size: f64,
    #[serde(default)]
    pub location: [f64; 3],
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_aqueduct_prefix")]
    pub name_prefix: String,
    #[serde(default = "default_cylinder_mesh")]
    pub arch_mesh: String,
    #[serde(default = "default_cube_mesh")]
    pub pier_mesh: String,
    #[serde(default = "default_cube_mesh")]
    pub deck_mesh: String,
}

fn default_arches() -> u32 {
    18
}
fn default_arch_radius() -> f64 {
    600.0
}
fn default_pier_width() -> f64 {
    200.0
}
fn default_tiers() -> u32 {
    2
}
fn default_aqueduct_deck_width() -> f64 {
    600.0
}
fn default_aqueduct_prefix() -> String {
    "Aqueduct".to_string()
}

/// Repeating arches over tapering piers, stacked in tiers, with a water
/// channel on top. Each tier's piers are 15% slimmer than the one below.
pub fn aqueduct(spec: &AqueductSpec) -> Vec<BlockSpec> {
    let mut blocks = Vec::new();
    let orientation = spec.orientation;
    let origin = spec.location;
    let spacing = 2.0 * spec.arch_radius + spec.pier_width;
    let length = spec.arches as f64 * spacing;
    let tier_height = 2.0 * spec.arch_radius;

    for tier in 0..spec.tiers {
        let tier_base = tier as f64 * tier_height;
        let spring_line = tier_base + spec.arch_radius;
        let pier_w = spec.pier_width * (1.0 - 0.15 * tier as f64);

        // Piers up to the spring line
        for i in 0..=spec.arches {
            blocks.push(
                BlockSpec::new(
                    format!("{}_Pier_{}_{}", spec.name_prefix, tier, i),
                    &spec.pier_mesh,
                    place(
                        orientation,
                        origin,
                        i as f64 * spacing,
                        0.0,
                        tier_base + spec.arch_radius / 2.0,
                    ),
                )
                .with_scale(oriented_scale(
                    orientation,
                    pier_w / 100.0,
                    spec.deck_width / 100.0,
                    spec.arch_radius / 100.0,
                )),
            );
        }

        // Semicircular arch rings between neighboring piers
        let segments = ((PI * spec.arch_radius / spec.module_size) as u32).max(6);
        let segment_scale = spec.arch_radius / 600.0;
        for i in 0..spec.arches {
            let center = i as f64 * spacing + spacing / 2.0;
            for seg in 0..=segments {
                let theta = PI * seg as f64 / segments as f64;
                blocks.push(
                    BlockSpec::new(
                        format!("{}_Arch_{}_{}_{}", spec.name_prefix, tier, i, seg),
                        &spec.arch_mesh,
                        place(
                            orientation,
                            origin,
                            center + spec.arch_radius * theta.cos(),
                            0.0,
                            spring_line + spec.arch_radius * theta.sin(),
                        ),
                    )
                    .with_uniform_scale(segment_scale),
                );
            }
        }
    }

    // Water channel: deck slabs and parapet walls on the top tier
    let deck_z = spec.tiers as f64 * tier_height;
    let deck_modules = (length / spec.module_size).ceil().max(1.0) as u32;
    for i in 0..deck_modules {
        let along = (i as f64 + 0.5) * spec.module_size;
        blocks.push(
            BlockSpec::new(
                format!("{}_Deck_{}", spec.name_prefix, i),
                &spec.deck_mesh,
                place(orientation, origin, along, 0.0, deck_z),
            )
            .with_scale(oriented_scale(
                orientation,
                spec.module_size / 100.0,
                spec.deck_width / 100.0,
                0.5,
            )),
        );
        for (side_label, side) in [("L", -1.0), ("R", 1.0)] {
            blocks.push(
                BlockSpec::new(
                    format!("{}_Parapet_{}_{}", spec.name_prefix, side_label, i),
                    &spec.deck_mesh,
                    place(
                        orientation,
                        origin,
                        along,
                        side * spec.deck_width / 2.0,
                        deck_z + 75.0,
                    ),
                )
                .with_scale(oriented_scale(orientation, spec.module_size / 100.0, 0.3, 1.0)),
            );
        }
    }

    blocks
}
