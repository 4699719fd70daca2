use serde::{Deserialize, Serialize};

/// Data-driven tuning for the simulation.
///
/// Every empirically tuned "feel" constant lives here by name so it can be
/// adjusted from TOML without touching logic. Coordinates are screen-style:
/// y grows downward, so upward impulses are negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Horizontal world extent (units).
    pub world_width: f32,
    /// Vertical world extent (units).
    pub world_height: f32,
    /// Visible camera window width.
    pub view_width: f32,
    /// Visible camera window height.
    pub view_height: f32,
    /// Gravity acceleration (units/s^2, downward).
    pub gravity: f32,
    /// Horizontal move speed, assigned instantaneously (units/s).
    pub move_speed: f32,
    /// First-jump impulse (velocity overwrite).
    pub jump_vy: f32,
    /// Air-jump impulse (velocity overwrite, larger than the first).
    pub double_jump_vy: f32,
    /// Jump charges available before ground contact resets them.
    pub max_jumps: u8,
    /// Grace window after leaving a ledge during which a jump still counts
    /// as grounded (seconds).
    pub ground_grace: f32,
    /// Minimum delay between attack triggers (seconds).
    pub attack_cooldown: f32,
    /// Target acquisition radius for the instant-hit attack.
    pub attack_range: f32,
    /// Cosmetic beam length when no target is in range.
    pub beam_reach: f32,
    /// Invulnerability window after taking damage (seconds).
    pub invuln_duration: f32,
    /// Distance below the world bottom that counts as falling out.
    pub fall_margin: f32,
    /// Starting lives.
    pub lives: u8,
    /// Stomp classification: minimum player vertical velocity (not moving
    /// sharply upward).
    pub stomp_min_vy: f32,
    /// Stomp classification: penetration band lower bound
    /// (player bottom minus enemy top).
    pub stomp_overlap_min: f32,
    /// Stomp classification: penetration band upper bound.
    pub stomp_overlap_max: f32,
    /// Stomp classification: slack below the enemy top still counted as
    /// "from above".
    pub stomp_top_slack: f32,
    /// Upward bounce applied to the player on a successful stomp.
    pub stomp_bounce_vy: f32,
    /// Bounce pad vertical impulse.
    pub bounce_pad_vy: f32,
    /// Bounce pad horizontal boost in the facing direction.
    pub bounce_pad_vx: f32,
    /// Delay between a fragile platform breaking and its removal (seconds).
    pub fragile_break_delay: f32,
    /// Grunt patrol speed (units/s).
    pub grunt_speed: f32,
    /// Grunt chase detection radius (horizontal).
    pub chase_range: f32,
    /// Flat speed bonus while chasing.
    pub chase_bonus: f32,
    /// Vertical window for chase detection.
    pub chase_dy: f32,
    /// Elite patrol speed (units/s).
    pub elite_speed: f32,
    /// Elite chase range (effectively always tracking).
    pub elite_chase_range: f32,
    /// Elite shield hit points.
    pub elite_shield_hp: u8,
    /// Seconds between elite projectile volleys.
    pub elite_fire_interval: f32,
    /// Clamp on elite vertical tracking velocity.
    pub elite_track_vy: f32,
    /// Projectile launch speed (units/s).
    pub projectile_speed: f32,
    /// Projectile vertical oscillation amplitude.
    pub projectile_osc_amp: f32,
    /// Projectile vertical oscillation frequency (rad/s).
    pub projectile_osc_freq: f32,
    /// Maximum cumulative coin value a playthrough can award.
    pub supply_cap: u64,
    /// Value ceiling applied to the first `early_coin_count` coins.
    pub early_coin_cap: u64,
    /// How many leading coins get the early value ceiling.
    pub early_coin_count: u32,
    /// Horizontal gap width above which a fragile bridge is inserted.
    pub gap_bridge_threshold: f32,
    /// Platforms at or below this width get an auto-placed grunt.
    pub small_platform_max_width: f32,
    /// Portal celebration length before level state advances (seconds).
    pub celebration_duration: f32,
    /// Whether a life loss restores all enemies and projectiles to their
    /// manifest-spawned state. Editions differ; this is the dense default.
    pub reset_enemies_on_respawn: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: 18_000.0,
            world_height: 720.0,
            view_width: 960.0,
            view_height: 540.0,
            gravity: 1200.0,
            move_speed: 200.0,
            jump_vy: -460.0,
            double_jump_vy: -620.0,
            max_jumps: 2,
            ground_grace: 0.12,
            attack_cooldown: 0.28,
            attack_range: 900.0,
            beam_reach: 700.0,
            invuln_duration: 1.5,
            fall_margin: 80.0,
            lives: 3,
            stomp_min_vy: -20.0,
            stomp_overlap_min: -6.0,
            stomp_overlap_max: 22.0,
            stomp_top_slack: 22.0,
            stomp_bounce_vy: -360.0,
            bounce_pad_vy: -1860.0,
            bounce_pad_vx: 320.0,
            fragile_break_delay: 0.24,
            grunt_speed: 70.0,
            chase_range: 220.0,
            chase_bonus: 20.0,
            chase_dy: 50.0,
            elite_speed: 100.0,
            elite_chase_range: 1200.0,
            elite_shield_hp: 3,
            elite_fire_interval: 1.2,
            elite_track_vy: 80.0,
            projectile_speed: 180.0,
            projectile_osc_amp: 60.0,
            projectile_osc_freq: 20.0,
            supply_cap: 21_000_000,
            early_coin_cap: 1000,
            early_coin_count: 10,
            gap_bridge_threshold: 200.0,
            small_platform_max_width: 180.0,
            celebration_duration: 1.3,
            reset_enemies_on_respawn: true,
        }
    }
}

impl SimConfig {
    /// Load config from `COINRUN_CONFIG` or `config/coinrun.toml`, falling
    /// back to defaults if the file is missing or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var("COINRUN_CONFIG").unwrap_or_else(|_| "config/coinrun.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<SimConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    SimConfig::default()
                },
            },
            Err(_) => SimConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_playable() {
        let cfg = SimConfig::default();
        assert!(cfg.gravity > 0.0);
        assert!(cfg.jump_vy < 0.0, "Upward impulses are negative in y-down");
        assert!(cfg.double_jump_vy < cfg.jump_vy);
        assert_eq!(cfg.supply_cap, 21_000_000);
        assert_eq!(cfg.max_jumps, 2);
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let cfg: SimConfig = toml::from_str(
            r#"
            lives = 5
            reset_enemies_on_respawn = false
        "#,
        )
        .unwrap();
        assert_eq!(cfg.lives, 5);
        assert!(!cfg.reset_enemies_on_respawn);
        // Untouched fields keep their defaults
        assert_eq!(cfg.move_speed, 200.0);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SimConfig::default();
        let text = toml::to_string(&cfg).unwrap();
        let back: SimConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.stomp_overlap_max, cfg.stomp_overlap_max);
        assert_eq!(back.supply_cap, cfg.supply_cap);
    }
}
