//! Enemy entities and their per-frame drive.
//!
//! Two variants exist: patrolling grunts that may chase, and shielded
//! ranged elites that hover toward the player and fire arcing projectiles.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::physics::{self, Aabb};

pub const GRUNT_W: f32 = 33.6;
pub const GRUNT_H: f32 = 44.8;
pub const ELITE_W: f32 = 40.0;
pub const ELITE_H: f32 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Ground patroller. `chase_enabled` is rolled at spawn; disabled
    /// grunts never break patrol.
    Grunt { chase_enabled: bool },
    /// Hovering shooter. Ignores gravity and tracks the player vertically.
    EliteRanged { shield_hp: u8, last_shot: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub left_bound: f32,
    pub right_bound: f32,
    pub speed: f32,
    /// Patrol direction, +1 or -1.
    pub dir: f32,
    pub active: bool,
}

/// Result of a damaging hit (stomp or beam) landing on an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// A shield layer absorbed the hit.
    ShieldChipped,
    Defeated,
}

impl Enemy {
    /// Spawn a grunt with its foot at (`foot_x`, `foot_y`).
    pub fn grunt(
        foot_x: f32,
        foot_y: f32,
        left_bound: f32,
        right_bound: f32,
        speed: f32,
        chase_enabled: bool,
        dir: f32,
    ) -> Self {
        Self {
            kind: EnemyKind::Grunt { chase_enabled },
            x: foot_x,
            y: foot_y - GRUNT_H / 2.0,
            vx: 0.0,
            vy: 0.0,
            left_bound,
            right_bound,
            speed,
            dir,
            active: true,
        }
    }

    /// Spawn an elite with its foot at (`foot_x`, `foot_y`). Elites roam
    /// the whole world.
    pub fn elite(foot_x: f32, foot_y: f32, speed: f32, config: &SimConfig) -> Self {
        Self {
            kind: EnemyKind::EliteRanged {
                shield_hp: config.elite_shield_hp,
                last_shot: -1000.0,
            },
            x: foot_x,
            y: foot_y - ELITE_H / 2.0,
            vx: 0.0,
            vy: 0.0,
            left_bound: 0.0,
            right_bound: config.world_width,
            speed,
            dir: 1.0,
            active: true,
        }
    }

    pub fn size(&self) -> (f32, f32) {
        match self.kind {
            EnemyKind::Grunt { .. } => (GRUNT_W, GRUNT_H),
            EnemyKind::EliteRanged { .. } => (ELITE_W, ELITE_H),
        }
    }

    pub fn aabb(&self) -> Aabb {
        let (w, h) = self.size();
        Aabb::from_center(self.x, self.y, w, h)
    }

    pub fn is_elite(&self) -> bool {
        matches!(self.kind, EnemyKind::EliteRanged { .. })
    }

    /// Apply one damaging hit. Elites burn shield layers first; the hit
    /// that reaches the last layer defeats them.
    pub fn apply_hit(&mut self) -> HitOutcome {
        match &mut self.kind {
            EnemyKind::EliteRanged { shield_hp, .. } if *shield_hp > 1 => {
                *shield_hp -= 1;
                HitOutcome::ShieldChipped
            },
            _ => {
                self.active = false;
                self.vx = 0.0;
                self.vy = 0.0;
                HitOutcome::Defeated
            },
        }
    }
}

/// Muzzle position for an elite volley queued during [`drive_enemies`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireRequest {
    pub x: f32,
    pub y: f32,
}

/// Advance every active enemy by `dt`. Grunts patrol their bounds, chase
/// when rolled and near, and fall under gravity; elites always chase,
/// track the player vertically and queue volleys on their cadence.
pub fn drive_enemies(
    enemies: &mut [Enemy],
    player_x: f32,
    player_y: f32,
    now: f32,
    dt: f32,
    config: &SimConfig,
    solids: &[(usize, Aabb)],
) -> Vec<FireRequest> {
    let mut volleys = Vec::new();

    for enemy in enemies.iter_mut() {
        if !enemy.active {
            continue;
        }

        let (chase_enabled, chase_range) = match enemy.kind {
            EnemyKind::Grunt { chase_enabled } => (chase_enabled, config.chase_range),
            EnemyKind::EliteRanged { .. } => (true, config.elite_chase_range),
        };
        let near_player = (enemy.x - player_x).abs() < chase_range
            && (enemy.y - player_y).abs() < config.chase_dy;

        if chase_enabled && near_player {
            let toward = if player_x >= enemy.x { 1.0 } else { -1.0 };
            enemy.vx = toward * (enemy.speed + config.chase_bonus);
        } else {
            if enemy.x <= enemy.left_bound {
                enemy.dir = 1.0;
            } else if enemy.x >= enemy.right_bound {
                enemy.dir = -1.0;
            }
            enemy.vx = enemy.dir * enemy.speed;
        }

        match &mut enemy.kind {
            EnemyKind::Grunt { .. } => {
                enemy.vy += config.gravity * dt;
            },
            EnemyKind::EliteRanged { last_shot, .. } => {
                enemy.vy =
                    (player_y - enemy.y).clamp(-config.elite_track_vy, config.elite_track_vy);
                if now - *last_shot > config.elite_fire_interval {
                    *last_shot = now;
                    volleys.push(FireRequest {
                        x: enemy.x,
                        y: enemy.y - 20.0,
                    });
                }
            },
        }

        let moved = physics::step_body(enemy.aabb(), enemy.vx, enemy.vy, dt, solids);
        enemy.x = moved.x;
        enemy.y = moved.y;
        enemy.vx = moved.vx;
        enemy.vy = moved.vy;
        let (w, _) = enemy.size();
        enemy.x = physics::clamp_to_world(enemy.x, w / 2.0, config.world_width);
    }

    volleys
}

/// Index of the closest active enemy within `max_range` of the player.
pub fn nearest_enemy(enemies: &[Enemy], player_x: f32, player_y: f32, max_range: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, enemy) in enemies.iter().enumerate() {
        if !enemy.active {
            continue;
        }
        let dist = ((enemy.x - player_x).powi(2) + (enemy.y - player_y).powi(2)).sqrt();
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((idx, dist));
        }
    }
    best.filter(|&(_, d)| d <= max_range).map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SimConfig {
        SimConfig::default()
    }

    fn floor() -> Vec<(usize, Aabb)> {
        vec![(0, Aabb::from_center(9000.0, 520.0, 18_000.0, 36.0))]
    }

    #[test]
    fn grunt_patrols_and_reverses_at_bounds() {
        let config = cfg();
        let mut enemies = vec![Enemy::grunt(
            1000.0, 502.0, 950.0, 1050.0, 70.0, false, 1.0,
        )];
        // Walk right until the bound flips the direction.
        for frame in 0..120 {
            let now = frame as f32 / 60.0;
            drive_enemies(&mut enemies, 5000.0, 0.0, now, 1.0 / 60.0, &config, &floor());
            assert!(enemies[0].x <= 1052.0);
        }
        assert_eq!(enemies[0].dir, -1.0);
    }

    #[test]
    fn chase_disabled_grunt_ignores_nearby_player() {
        let config = cfg();
        let mut enemies = vec![Enemy::grunt(
            1000.0, 502.0, 900.0, 1100.0, 70.0, false, -1.0,
        )];
        let player_y = enemies[0].y;
        drive_enemies(
            &mut enemies,
            1050.0,
            player_y,
            0.0,
            1.0 / 60.0,
            &config,
            &floor(),
        );
        assert!(enemies[0].vx < 0.0, "Patrol continues away from the player");
    }

    #[test]
    fn chasing_grunt_moves_toward_player_with_bonus() {
        let config = cfg();
        let mut enemies = vec![Enemy::grunt(
            1000.0, 502.0, 900.0, 1100.0, 70.0, true, -1.0,
        )];
        let player_y = enemies[0].y;
        drive_enemies(&mut enemies, 1100.0, player_y, 0.0, 1.0 / 60.0, &config, &floor());
        // Landed this frame, so vx survives unless a wall blocked it.
        assert!(enemies[0].x > 1000.0);
    }

    #[test]
    fn grunt_outside_vertical_window_does_not_chase() {
        let config = cfg();
        let mut enemies = vec![Enemy::grunt(
            1000.0, 502.0, 900.0, 1100.0, 70.0, true, -1.0,
        )];
        let player_y = enemies[0].y - 200.0;
        drive_enemies(&mut enemies, 1010.0, player_y, 0.0, 1.0 / 60.0, &config, &floor());
        assert!(enemies[0].vx < 0.0);
    }

    #[test]
    fn elite_tracks_player_vertically_with_clamp() {
        let config = cfg();
        let mut enemies = vec![Enemy::elite(2500.0, 360.0, 100.0, &config)];
        let start_y = enemies[0].y;
        drive_enemies(&mut enemies, 2500.0, start_y + 500.0, 0.0, 1.0 / 60.0, &config, &[]);
        let moved = enemies[0].y - start_y;
        assert!(moved > 0.0);
        assert!(moved <= config.elite_track_vy / 60.0 + 1e-3);
    }

    #[test]
    fn elite_fires_on_cadence_only() {
        let config = cfg();
        let mut enemies = vec![Enemy::elite(2500.0, 360.0, 100.0, &config)];
        let first = drive_enemies(&mut enemies, 3000.0, 325.0, 0.0, 1.0 / 60.0, &config, &[]);
        assert_eq!(first.len(), 1);
        let too_soon = drive_enemies(&mut enemies, 3000.0, 325.0, 0.5, 1.0 / 60.0, &config, &[]);
        assert!(too_soon.is_empty());
        let ready = drive_enemies(&mut enemies, 3000.0, 325.0, 1.3, 1.0 / 60.0, &config, &[]);
        assert_eq!(ready.len(), 1);
    }

    #[test]
    fn grunt_dies_to_a_single_hit() {
        let mut enemy = Enemy::grunt(100.0, 502.0, 0.0, 200.0, 70.0, false, 1.0);
        assert_eq!(enemy.apply_hit(), HitOutcome::Defeated);
        assert!(!enemy.active);
    }

    #[test]
    fn elite_shield_absorbs_two_hits_third_kills() {
        let config = cfg();
        let mut enemy = Enemy::elite(2500.0, 360.0, 100.0, &config);
        assert_eq!(enemy.apply_hit(), HitOutcome::ShieldChipped);
        assert_eq!(enemy.apply_hit(), HitOutcome::ShieldChipped);
        assert!(enemy.active);
        assert_eq!(enemy.apply_hit(), HitOutcome::Defeated);
        assert!(!enemy.active);
    }

    #[test]
    fn nearest_enemy_skips_inactive_and_respects_range() {
        let config = cfg();
        let far = Enemy::elite(5000.0, 360.0, 100.0, &config);
        let mut dead = Enemy::grunt(120.0, 502.0, 0.0, 200.0, 70.0, false, 1.0);
        dead.active = false;
        let near = Enemy::grunt(300.0, 502.0, 200.0, 400.0, 70.0, false, 1.0);
        let enemies = vec![far, dead, near];
        assert_eq!(nearest_enemy(&enemies, 100.0, 480.0, 900.0), Some(2));
        assert_eq!(nearest_enemy(&enemies, 100.0, 480.0, 50.0), None);
        // An active enemy beyond range is still ignored.
        assert_eq!(nearest_enemy(&enemies[..1], 100.0, 480.0, 900.0), None);
    }
}
