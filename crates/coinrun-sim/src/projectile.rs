//! Elite projectiles: launched at the player, then wobbled vertically by a
//! sine term so they are dodgeable but unsettling.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::physics::Aabb;

pub const PROJECTILE_W: f32 = 30.0;
pub const PROJECTILE_H: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    /// Launch vertical velocity; the oscillation rides on top of it.
    pub base_vy: f32,
    /// Per-projectile phase offset so volleys do not wobble in lockstep.
    pub phase: f32,
    pub active: bool,
}

impl Projectile {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.x, self.y, PROJECTILE_W, PROJECTILE_H)
    }
}

/// Launch a projectile from `(x, y)` aimed at the target point.
pub fn spawn_projectile(
    x: f32,
    y: f32,
    target_x: f32,
    target_y: f32,
    config: &SimConfig,
    rng: &mut StdRng,
) -> Projectile {
    let angle = (target_y - y).atan2(target_x - x);
    Projectile {
        x,
        y,
        vx: angle.cos() * config.projectile_speed,
        base_vy: angle.sin() * config.projectile_speed,
        phase: rng.random::<f32>() * std::f32::consts::TAU,
        active: true,
    }
}

/// Advance projectiles and cull any that left the play area or drifted far
/// outside the camera window.
pub fn drive_projectiles(
    projectiles: &mut [Projectile],
    now: f32,
    dt: f32,
    camera_x: f32,
    config: &SimConfig,
) {
    for projectile in projectiles.iter_mut() {
        if !projectile.active {
            continue;
        }
        let vy = projectile.base_vy
            + (now * config.projectile_osc_freq + projectile.phase).sin() * config.projectile_osc_amp;
        projectile.x += projectile.vx * dt;
        projectile.y += vy * dt;

        let off_camera = projectile.x < camera_x - 200.0
            || projectile.x > camera_x + config.view_width + 200.0;
        let out_of_world = projectile.x > config.world_width + 100.0
            || projectile.y > config.world_height + 200.0
            || projectile.y < -200.0;
        if off_camera || out_of_world {
            projectile.active = false;
        }
    }
}
