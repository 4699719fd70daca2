use serde::{Deserialize, Serialize};

/// Notifications emitted by the simulation during a frame.
///
/// The presentation adapter maps these onto renders and sounds; the core
/// never calls rendering or audio APIs itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A coin was collected. `value` is the amount actually credited after
    /// clamping against the supply cap.
    CoinCollected { value: u64 },
    /// An enemy was removed from play.
    EnemyDefeated,
    /// A shielded enemy absorbed a hit without dying (flicker cue).
    ShieldChipped,
    /// The attack beam fired. `hit` is false for a cosmetic miss; `x`/`y` is
    /// the beam endpoint, clamped to the visible camera window.
    BeamFired { x: f32, y: f32, hit: bool },
    /// The player was launched by a bounce pad.
    PlayerBounced,
    /// The checkpoint was activated for the first time.
    CheckpointReached,
    /// A portal was claimed, advancing level state.
    PortalClaimed { level_index: u8 },
    /// The player took damage. `forced` damage bypassed invulnerability.
    PlayerDamaged { lives_left: u8, forced: bool },
    /// Lives are exhausted; the simulation is frozen awaiting restart.
    GameOver,
    /// The final portal's celebration finished; the run is won.
    LevelWon,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<SimEvent> {
        vec![
            SimEvent::CoinCollected { value: 1500 },
            SimEvent::EnemyDefeated,
            SimEvent::ShieldChipped,
            SimEvent::BeamFired {
                x: 820.0,
                y: 410.0,
                hit: false,
            },
            SimEvent::PlayerBounced,
            SimEvent::CheckpointReached,
            SimEvent::PortalClaimed { level_index: 2 },
            SimEvent::PlayerDamaged {
                lives_left: 1,
                forced: true,
            },
            SimEvent::GameOver,
            SimEvent::LevelWon,
        ]
    }

    #[test]
    fn event_json_roundtrip() {
        for event in sample_events() {
            let json = serde_json::to_string(&event).unwrap();
            let back: SimEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(event, back);
        }
    }

    #[test]
    fn event_msgpack_roundtrip() {
        for event in sample_events() {
            let bytes = rmp_serde::to_vec(&event).unwrap();
            let back: SimEvent = rmp_serde::from_slice(&bytes).unwrap();
            assert_eq!(event, back);
        }
    }
}
