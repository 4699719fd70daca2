use serde::{Deserialize, Serialize};

/// Simulation lifecycle phase.
///
/// `GameOver` and `Won` are terminal: updates are no-ops until an explicit
/// restart. `Celebrating` keeps simulating but guards portal re-triggering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    Playing,
    Celebrating,
    GameOver,
    Won,
}

/// Read-only per-frame view of the simulation for the presentation adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub btc_total: u64,
    pub lives: u8,
    /// Rolling total history for the HUD chart (bounded, oldest dropped).
    pub btc_history: Vec<u64>,
    pub player_x: f32,
    pub player_y: f32,
    /// Camera scroll target, clamped to world bounds.
    pub camera_x: f32,
    pub level_index: u8,
    pub phase: SimPhase,
}
