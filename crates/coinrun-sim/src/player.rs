//! Player body and movement: instant horizontal speed, double jump with a
//! coyote-time grace window, gravity and platform resolution.

use coinrun_core::input::InputIntents;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::physics::{self, Aabb, SurfaceContact};

pub const PLAYER_W: f32 = 37.0;
pub const PLAYER_H: f32 = 56.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// +1 facing right, -1 facing left. Persists while idle.
    pub facing: f32,
    pub jumps_used: u8,
    /// Simulation time of the last grounded frame.
    pub last_on_ground: f32,
    /// Simulation time of the last attack trigger.
    pub last_shot: f32,
    pub invulnerable_until: f32,
    pub on_ground: bool,
}

impl PlayerState {
    pub fn spawn(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            facing: 1.0,
            jumps_used: 0,
            last_on_ground: -1000.0,
            last_shot: -1000.0,
            invulnerable_until: 0.0,
            on_ground: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.x, self.y, PLAYER_W, PLAYER_H)
    }

    pub fn is_invulnerable(&self, now: f32) -> bool {
        now < self.invulnerable_until
    }
}

/// Facts about one player step the caller needs for contact responses.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFrame {
    pub contacts: Vec<SurfaceContact>,
    /// Vertical velocity entering the solver, before landing zeroed it.
    /// Bounce pads and stomp classification key off this.
    pub approach_vy: f32,
    pub jumped: bool,
    pub double_jumped: bool,
}

/// Advance the player one frame against the given solids.
pub fn drive_player(
    player: &mut PlayerState,
    intents: &InputIntents,
    now: f32,
    dt: f32,
    config: &SimConfig,
    solids: &[(usize, Aabb)],
) -> PlayerFrame {
    if intents.move_left {
        player.vx = -config.move_speed;
        player.facing = -1.0;
    } else if intents.move_right {
        player.vx = config.move_speed;
        player.facing = 1.0;
    } else {
        player.vx = 0.0;
    }

    let mut jumped = false;
    let mut double_jumped = false;
    if intents.jump_pressed {
        let grounded = player.on_ground || now - player.last_on_ground <= config.ground_grace;
        if grounded && player.jumps_used < config.max_jumps {
            player.jumps_used = 1;
            player.vy = config.jump_vy;
            jumped = true;
        } else if !grounded && player.jumps_used < config.max_jumps {
            player.jumps_used += 1;
            player.vy = config.double_jump_vy;
            double_jumped = true;
        }
    }

    player.vy += config.gravity * dt;
    let approach_vy = player.vy;

    let moved = physics::step_body(player.aabb(), player.vx, player.vy, dt, solids);
    player.x = physics::clamp_to_world(moved.x, PLAYER_W / 2.0, config.world_width);
    player.y = moved.y;
    player.vx = moved.vx;
    player.vy = moved.vy;
    player.on_ground = moved.blocked_down;
    if moved.blocked_down {
        player.last_on_ground = now;
        player.jumps_used = 0;
    }

    PlayerFrame {
        contacts: moved.contacts,
        approach_vy,
        jumped,
        double_jumped,
    }
}
