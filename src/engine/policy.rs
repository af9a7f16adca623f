//! Static command classification: receive-timeout tiers, post-command
//! cooldowns, and the retry backoff schedule.
//!
//! Both tables are hand-maintained. A new engine command that does heavy
//! asynchronous work must be added to BOTH lists or it will run with the
//! default timeout and no cooldown.

use std::time::Duration;

/// Commands that need the extended receive timeout. Matched by substring
/// so variants like "import_texture_batch" inherit the classification.
const LARGE_OPERATION_COMMANDS: &[&str] = &[
    "get_available_materials",
    "create_town",
    "create_castle_fortress",
    "construct_mansion",
    "create_suspension_bridge",
    "create_aqueduct",
    "create_maze",
    "import_texture",
    "import_mesh",
    "import_skeletal_mesh",
    "import_animation",
    "create_pbr_material",
    "create_landscape_material",
    "scatter_meshes_on_landscape",
    "scatter_foliage",
];

pub fn is_large_operation(command: &str) -> bool {
    LARGE_OPERATION_COMMANDS
        .iter()
        .any(|large| command.contains(large))
}

/// Post-execution cooldown for commands that leave the engine doing async
/// work (texture compression, shader recompiles, GC, streaming updates)
/// not reflected in the synchronous response. Issuing the next heavy
/// command immediately can crash the editor or corrupt streaming proxies.
pub fn cooldown(command: &str) -> Option<Duration> {
    let secs = match command {
        "import_texture" => 2.0,
        "import_mesh" => 3.0,
        "import_skeletal_mesh" => 5.0,
        "import_animation" => 3.0,
        "create_pbr_material" => 1.0,
        "create_landscape_material" => 2.0,
        "scatter_meshes_on_landscape" => 2.0,
        "scatter_foliage" => 2.0,
        _ => return None,
    };
    Some(Duration::from_secs_f64(secs))
}

/// Exponential backoff: min(base * 2^attempt, cap).
pub fn retry_delay(attempt: u32, base: Duration, cap: Duration) -> Duration {
    base.saturating_mul(1u32 << attempt.min(16)).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_operation_classification() {
        assert!(is_large_operation("import_texture"));
        assert!(is_large_operation("create_castle_fortress"));
        assert!(is_large_operation("scatter_foliage"));
        // Substring match, as the wire protocol relies on
        assert!(is_large_operation("import_texture_batch"));
        assert!(!is_large_operation("spawn_actor"));
        assert!(!is_large_operation("get_actors_in_level"));
    }

    #[test]
    fn cooldown_table() {
        assert_eq!(cooldown("import_texture"), Some(Duration::from_secs(2)));
        assert_eq!(cooldown("import_skeletal_mesh"), Some(Duration::from_secs(5)));
        assert_eq!(
            cooldown("create_pbr_material"),
            Some(Duration::from_secs(1))
        );
        assert_eq!(cooldown("spawn_actor"), None);
        // Cooldowns are exact-match: a batch variant gets no implicit cooldown
        assert_eq!(cooldown("import_texture_batch"), None);
    }

    #[test]
    fn backoff_schedule() {
        let base = Duration::from_millis(500);
        let cap = Duration::from_secs(5);
        assert_eq!(retry_delay(0, base, cap), Duration::from_millis(500));
        assert_eq!(retry_delay(1, base, cap), Duration::from_secs(1));
        assert_eq!(retry_delay(2, base, cap), Duration::from_secs(2));
        assert_eq!(retry_delay(3, base, cap), Duration::from_secs(4));
        // Capped from here on
        assert_eq!(retry_delay(4, base, cap), cap);
        assert_eq!(retry_delay(30, base, cap), cap);
    }
}
