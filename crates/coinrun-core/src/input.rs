use serde::{Deserialize, Serialize};

/// Abstract input intents for one simulation frame.
///
/// `move_left`/`move_right` are level-triggered (held). `jump_pressed` and
/// `attack_pressed` are edge-triggered: true only on the frame the control
/// went down. Holding a key does not repeat them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntents {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_pressed: bool,
    pub attack_pressed: bool,
}

/// Converts raw per-frame held-key state into edge-triggered intents.
///
/// Edge detection is the only input buffering the core performs; intents are
/// sampled once per frame and never queued.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentSampler {
    jump_was_down: bool,
    attack_was_down: bool,
}

impl IntentSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, left: bool, right: bool, jump: bool, attack: bool) -> InputIntents {
        let intents = InputIntents {
            move_left: left,
            move_right: right,
            jump_pressed: jump && !self.jump_was_down,
            attack_pressed: attack && !self.attack_was_down,
        };
        self.jump_was_down = jump;
        self.attack_was_down = attack;
        intents
    }
}
