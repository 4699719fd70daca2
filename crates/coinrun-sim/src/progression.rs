//! Run progression: the coin ledger, lives, the level state machine and
//! the scheduled-action list that replaces ad-hoc timers.

use coinrun_core::snapshot::SimPhase;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// HUD chart keeps at most this many history points.
const HISTORY_POINTS: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub btc_total: u64,
    pub kills: u32,
    /// Total after each pickup, seeded with 0 and bounded; the oldest
    /// points fall off.
    pub btc_history: Vec<u64>,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            btc_total: 0,
            kills: 0,
            btc_history: vec![0],
        }
    }

    /// Credit a pickup, clamped so the running total never passes the
    /// supply cap. Returns the amount actually credited.
    pub fn award_coins(&mut self, value: u64, supply_cap: u64) -> u64 {
        let gain = value.min(supply_cap.saturating_sub(self.btc_total));
        self.btc_total += gain;
        self.btc_history.push(self.btc_total);
        if self.btc_history.len() > HISTORY_POINTS {
            self.btc_history.remove(0);
        }
        gain
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Portal celebration ends; advance or win.
    EndCelebration { level_index: u8 },
    /// A broken fragile platform finally gives way.
    DestroyPlatform { index: usize },
}

/// An action queued to run at an absolute simulation time. Timestamps make
/// the queue survive save/restore without drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub at: f32,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub lives: u8,
    pub level_number: u8,
    pub respawn_x: f32,
    pub respawn_y: f32,
    pub phase: SimPhase,
    pub scheduled: Vec<ScheduledAction>,
    pub stats: Stats,
}

/// What a life loss means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeOutcome {
    Respawn { lives_left: u8 },
    GameOver,
}

impl Progression {
    pub fn new(config: &SimConfig, spawn_x: f32, spawn_y: f32) -> Self {
        Self {
            lives: config.lives,
            level_number: 1,
            respawn_x: spawn_x,
            respawn_y: spawn_y,
            phase: SimPhase::Playing,
            scheduled: Vec::new(),
            stats: Stats::new(),
        }
    }

    pub fn schedule(&mut self, at: f32, kind: ActionKind) {
        self.scheduled.push(ScheduledAction { at, kind });
    }

    /// Remove and return every action due at or before `now`, oldest first.
    pub fn due_actions(&mut self, now: f32) -> Vec<ActionKind> {
        let mut due: Vec<ScheduledAction> = Vec::new();
        self.scheduled.retain(|action| {
            if action.at <= now {
                due.push(*action);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.at.total_cmp(&b.at));
        due.into_iter().map(|action| action.kind).collect()
    }

    /// Spend one life. The caller handles the respawn or freeze.
    pub fn lose_life(&mut self) -> LifeOutcome {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = SimPhase::GameOver;
            LifeOutcome::GameOver
        } else {
            LifeOutcome::Respawn {
                lives_left: self.lives,
            }
        }
    }
}
