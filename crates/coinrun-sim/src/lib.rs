//! Deterministic side-scroller simulation core.
//!
//! [`Simulation`] owns the whole gameplay state and advances it one frame
//! at a time from abstract input intents, emitting [`SimEvent`]s for the
//! presentation adapter. All randomness flows through one seeded RNG, so a
//! seed plus an input script reproduces a run exactly.

pub mod collision;
pub mod config;
pub mod content;
pub mod enemy;
pub mod level;
pub mod physics;
pub mod player;
pub mod progression;
pub mod projectile;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use coinrun_core::events::SimEvent;
use coinrun_core::input::InputIntents;
use coinrun_core::snapshot::{FrameSnapshot, SimPhase};

use collision::Contact;
use config::SimConfig;
use content::{Coin, SpawnTriggers};
use enemy::{Enemy, HitOutcome};
use level::{Level, PlatformKind};
use player::PlayerState;
use progression::{ActionKind, LifeOutcome, Progression};
use projectile::Projectile;

/// Serializable snapshot of everything the simulation mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub seed: u64,
    /// Simulation time in seconds since the run started.
    pub now: f32,
    pub level: Level,
    pub player: PlayerState,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub triggers: SpawnTriggers,
    pub progression: Progression,
    pub camera_x: f32,
}

/// The gameplay simulation.
pub struct Simulation {
    config: SimConfig,
    state: SimState,
    rng: StdRng,
    paused: bool,
}

impl Simulation {
    pub fn new(seed: u64, config: SimConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let level = Level::generate(&config);
        let coins = content::place_coins(&config, &mut rng);
        let enemies = content::populate_enemies(&level, &config, &mut rng);
        let player = PlayerState::spawn(level.spawn_x, level.spawn_y);
        let progression = Progression::new(&config, level.spawn_x, level.spawn_y);
        tracing::debug!(seed, coins = coins.len(), enemies = enemies.len(), "level populated");

        Self {
            state: SimState {
                seed,
                now: 0.0,
                level,
                player,
                coins,
                enemies,
                projectiles: Vec::new(),
                triggers: SpawnTriggers::default(),
                progression,
                camera_x: 0.0,
            },
            config,
            rng,
            paused: false,
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Rebuild the run from its seed.
    pub fn restart(&mut self) {
        *self = Simulation::new(self.state.seed, self.config.clone());
    }

    pub fn serialize_state(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.state).expect("simulation state serialization must succeed")
    }

    /// Replace the state from serialized bytes; malformed input is ignored.
    /// The RNG stream restarts from the run seed.
    pub fn apply_state(&mut self, bytes: &[u8]) {
        if let Ok(state) = rmp_serde::from_slice::<SimState>(bytes) {
            self.rng = StdRng::seed_from_u64(state.seed);
            self.state = state;
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            btc_total: self.state.progression.stats.btc_total,
            lives: self.state.progression.lives,
            btc_history: self.state.progression.stats.btc_history.clone(),
            player_x: self.state.player.x,
            player_y: self.state.player.y,
            camera_x: self.state.camera_x,
            level_index: self.state.progression.level_number,
            phase: self.state.progression.phase,
        }
    }

    /// Advance the simulation by `dt` seconds. Returns the frame's events.
    /// No-op while paused or once the run has ended.
    pub fn update(&mut self, dt: f32, intents: &InputIntents) -> Vec<SimEvent> {
        let mut events = Vec::new();
        if self.paused
            || matches!(
                self.state.progression.phase,
                SimPhase::GameOver | SimPhase::Won
            )
        {
            return events;
        }

        self.state.now += dt;
        let now = self.state.now;

        for action in self.state.progression.due_actions(now) {
            match action {
                ActionKind::EndCelebration { level_index } => {
                    if level_index >= 3 {
                        self.state.progression.phase = SimPhase::Won;
                        events.push(SimEvent::LevelWon);
                    } else {
                        self.state.progression.level_number = level_index + 1;
                        self.state.progression.phase = SimPhase::Playing;
                    }
                },
                ActionKind::DestroyPlatform { index } => {
                    self.state.level.platforms[index].active = false;
                },
            }
        }
        if self.state.progression.phase == SimPhase::Won {
            return events;
        }

        let solids = self.state.level.player_solids();
        let frame = player::drive_player(
            &mut self.state.player,
            intents,
            now,
            dt,
            &self.config,
            &solids,
        );
        self.respond_to_surfaces(&frame, now, &mut events);
        self.state.camera_x = (self.state.player.x - self.config.view_width / 2.0)
            .clamp(0.0, self.config.world_width - self.config.view_width);
        self.fire_attack(intents, now, &mut events);

        let enemy_solids = self.state.level.enemy_solids();
        let volleys = enemy::drive_enemies(
            &mut self.state.enemies,
            self.state.player.x,
            self.state.player.y,
            now,
            dt,
            &self.config,
            &enemy_solids,
        );
        for volley in volleys {
            self.state.projectiles.push(projectile::spawn_projectile(
                volley.x,
                volley.y,
                self.state.player.x,
                self.state.player.y,
                &self.config,
                &mut self.rng,
            ));
        }
        content::run_spawn_triggers(
            &mut self.state.triggers,
            self.state.player.x,
            self.state.player.y,
            self.state.progression.level_number,
            &self.config,
            &mut self.rng,
            &mut self.state.enemies,
        );

        projectile::drive_projectiles(
            &mut self.state.projectiles,
            now,
            dt,
            self.state.camera_x,
            &self.config,
        );
        self.state.level.update_moving(now);

        let contacts = collision::gather_contacts(
            &self.state.player,
            frame.approach_vy,
            &self.state.coins,
            &self.state.enemies,
            &self.state.projectiles,
            &self.state.level.checkpoint,
            &self.state.level.portals,
            &self.config,
        );
        self.resolve_contacts(&contacts, now, &mut events);

        if self.state.progression.phase != SimPhase::GameOver
            && self.state.player.y > self.config.world_height + self.config.fall_margin
        {
            self.hit_player(now, true, &mut events);
        }

        self.state.coins.retain(|c| c.active);
        self.state.enemies.retain(|e| e.active);
        self.state.projectiles.retain(|p| p.active);

        events
    }

    /// Bounce pads and fragile planks react to the player's step contacts.
    fn respond_to_surfaces(&mut self, frame: &player::PlayerFrame, now: f32, events: &mut Vec<SimEvent>) {
        for contact in &frame.contacts {
            let platform = &mut self.state.level.platforms[contact.solid];
            match platform.kind {
                PlatformKind::Bouncy if frame.approach_vy >= 0.0 => {
                    self.state.player.vx = self.state.player.facing * self.config.bounce_pad_vx;
                    self.state.player.vy = self.config.bounce_pad_vy;
                    self.state.player.on_ground = false;
                    events.push(SimEvent::PlayerBounced);
                },
                PlatformKind::Fragile { breaking: false } => {
                    platform.kind = PlatformKind::Fragile { breaking: true };
                    self.state.progression.schedule(
                        now + self.config.fragile_break_delay,
                        ActionKind::DestroyPlatform {
                            index: contact.solid,
                        },
                    );
                },
                _ => {},
            }
        }
    }

    /// Instant-hit beam: locks onto the nearest enemy in range, otherwise
    /// fires a cosmetic miss in the facing direction. The reported endpoint
    /// is clamped to the visible window.
    fn fire_attack(&mut self, intents: &InputIntents, now: f32, events: &mut Vec<SimEvent>) {
        if !intents.attack_pressed
            || now - self.state.player.last_shot <= self.config.attack_cooldown
        {
            return;
        }
        self.state.player.last_shot = now;

        let margin = 24.0;
        let min_x = self.state.camera_x + margin;
        let max_x = self.state.camera_x + self.config.view_width - margin;
        let player = &self.state.player;

        match enemy::nearest_enemy(
            &self.state.enemies,
            player.x,
            player.y,
            self.config.attack_range,
        ) {
            Some(idx) => {
                let (x, y) = (self.state.enemies[idx].x.clamp(min_x, max_x), self.state.enemies[idx].y);
                match self.state.enemies[idx].apply_hit() {
                    HitOutcome::ShieldChipped => events.push(SimEvent::ShieldChipped),
                    HitOutcome::Defeated => {
                        self.state.progression.stats.kills += 1;
                        events.push(SimEvent::EnemyDefeated);
                    },
                }
                events.push(SimEvent::BeamFired { x, y, hit: true });
            },
            None => {
                let x = (player.x + player.facing * self.config.beam_reach).clamp(min_x, max_x);
                events.push(SimEvent::BeamFired {
                    x,
                    y: player.y - 10.0,
                    hit: false,
                });
            },
        }
    }

    fn resolve_contacts(&mut self, contacts: &[Contact], now: f32, events: &mut Vec<SimEvent>) {
        for &contact in contacts {
            if self.state.progression.phase == SimPhase::GameOver {
                break;
            }
            match contact {
                Contact::Coin(idx) => {
                    let coin = &mut self.state.coins[idx];
                    if !coin.active {
                        continue;
                    }
                    coin.active = false;
                    let value = coin.value;
                    let gain = self
                        .state
                        .progression
                        .stats
                        .award_coins(value, self.config.supply_cap);
                    events.push(SimEvent::CoinCollected { value: gain });
                },
                Contact::Checkpoint => {
                    let checkpoint = &mut self.state.level.checkpoint;
                    if checkpoint.activated {
                        continue;
                    }
                    checkpoint.activated = true;
                    let (rx, ry) = checkpoint.respawn_point();
                    self.state.progression.respawn_x = rx;
                    self.state.progression.respawn_y = ry;
                    events.push(SimEvent::CheckpointReached);
                },
                Contact::Portal(idx) => {
                    if self.state.progression.phase != SimPhase::Playing {
                        continue;
                    }
                    let portal = &mut self.state.level.portals[idx];
                    if portal.claimed {
                        continue;
                    }
                    portal.claimed = true;
                    let level_index = portal.level_index;
                    // A claimed portal doubles as a checkpoint.
                    self.state.level.checkpoint.activated = true;
                    self.state.progression.respawn_x = portal.x;
                    self.state.progression.respawn_y = portal.y - 60.0;
                    self.state.progression.phase = SimPhase::Celebrating;
                    self.state.player.vx = 0.0;
                    self.state.player.vy = 0.0;
                    self.state.progression.schedule(
                        now + self.config.celebration_duration,
                        ActionKind::EndCelebration { level_index },
                    );
                    events.push(SimEvent::PortalClaimed { level_index });
                },
                Contact::Projectile(idx) => {
                    if !self.state.projectiles[idx].active {
                        continue;
                    }
                    if self.hit_player(now, false, events) {
                        break;
                    }
                },
                Contact::Enemy { index, stomp } => {
                    if !self.state.enemies[index].active {
                        continue;
                    }
                    if stomp {
                        match self.state.enemies[index].apply_hit() {
                            HitOutcome::ShieldChipped => events.push(SimEvent::ShieldChipped),
                            HitOutcome::Defeated => {
                                self.state.progression.stats.kills += 1;
                                events.push(SimEvent::EnemyDefeated);
                            },
                        }
                        self.state.player.vy = self.config.stomp_bounce_vy;
                        self.state.player.on_ground = false;
                    } else if self.hit_player(now, false, events) {
                        break;
                    }
                },
            }
        }
    }

    /// Damage the player. Returns true when a life was actually lost;
    /// callers stop resolving stale contacts in that case.
    fn hit_player(&mut self, now: f32, forced: bool, events: &mut Vec<SimEvent>) -> bool {
        if !forced && self.state.player.is_invulnerable(now) {
            return false;
        }

        match self.state.progression.lose_life() {
            LifeOutcome::GameOver => {
                self.state.player.vx = 0.0;
                self.state.player.vy = 0.0;
                events.push(SimEvent::PlayerDamaged {
                    lives_left: 0,
                    forced,
                });
                events.push(SimEvent::GameOver);
            },
            LifeOutcome::Respawn { lives_left } => {
                events.push(SimEvent::PlayerDamaged { lives_left, forced });
                let player = &mut self.state.player;
                player.invulnerable_until = now + self.config.invuln_duration;
                player.vx = 0.0;
                player.vy = 0.0;
                player.x = self.state.progression.respawn_x;
                player.y = self.state.progression.respawn_y;
                if self.config.reset_enemies_on_respawn {
                    self.state.enemies = content::populate_enemies(
                        &self.state.level,
                        &self.config,
                        &mut self.rng,
                    );
                    self.state.projectiles.clear();
                    self.state.triggers = SpawnTriggers::default();
                }
            },
        }
        true
    }
}
