pub mod events;
pub mod input;
pub mod snapshot;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::input::InputIntents;

    /// No input this frame.
    pub fn idle() -> InputIntents {
        InputIntents::default()
    }

    /// Held directional input.
    pub fn held(left: bool, right: bool) -> InputIntents {
        InputIntents {
            move_left: left,
            move_right: right,
            ..InputIntents::default()
        }
    }

    /// Edge-triggered jump press.
    pub fn press_jump() -> InputIntents {
        InputIntents {
            jump_pressed: true,
            ..InputIntents::default()
        }
    }

    /// Edge-triggered attack press.
    pub fn press_attack() -> InputIntents {
        InputIntents {
            attack_pressed: true,
            ..InputIntents::default()
        }
    }
}
