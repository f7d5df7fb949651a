use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Quit,
    TogglePause,
    SpeedUp,
    SlowDown,
    ToggleGrid,
    ToggleHud,
}

const ACTION_COUNT: usize = 6;

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::Quit,
        InputAction::TogglePause,
        InputAction::SpeedUp,
        InputAction::SlowDown,
        InputAction::ToggleGrid,
        InputAction::ToggleHud,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::Quit => 0,
            InputAction::TogglePause => 1,
            InputAction::SpeedUp => 2,
            InputAction::SlowDown => 3,
            InputAction::ToggleGrid => 4,
            InputAction::ToggleHud => 5,
        }
    }

    pub fn from_physical_key(key: PhysicalKey) -> Option<InputAction> {
        let PhysicalKey::Code(code) = key else {
            return None;
        };
        match code {
            KeyCode::Escape => Some(InputAction::Quit),
            KeyCode::Space => Some(InputAction::TogglePause),
            KeyCode::Equal | KeyCode::NumpadAdd | KeyCode::ArrowUp => Some(InputAction::SpeedUp),
            KeyCode::Minus | KeyCode::NumpadSubtract | KeyCode::ArrowDown => {
                Some(InputAction::SlowDown)
            }
            KeyCode::KeyG => Some(InputAction::ToggleGrid),
            KeyCode::F3 => Some(InputAction::ToggleHud),
            _ => None,
        }
    }
}

/// Held state per action plus a press edge that fires once per physical press.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
    pressed_edge: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        let index = action.index();
        if is_down && !self.down[index] {
            self.pressed_edge[index] = true;
        }
        self.down[index] = is_down;
    }

    pub(crate) fn take_pressed(&mut self, action: InputAction) -> bool {
        let index = action.index();
        let was_pressed = self.pressed_edge[index];
        self.pressed_edge[index] = false;
        was_pressed
    }

    /// Press edges since the last call, in [`InputAction::ALL`] order.
    pub(crate) fn drain_pressed(&mut self) -> Vec<InputAction> {
        InputAction::ALL
            .into_iter()
            .filter(|action| self.take_pressed(*action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_edge_triggered_once() {
        let mut states = ActionStates::default();
        states.set(InputAction::TogglePause, true);

        assert!(states.take_pressed(InputAction::TogglePause));
        assert!(!states.take_pressed(InputAction::TogglePause));
    }

    #[test]
    fn held_key_repeat_does_not_retrigger() {
        let mut states = ActionStates::default();
        states.set(InputAction::SpeedUp, true);
        assert!(states.take_pressed(InputAction::SpeedUp));

        states.set(InputAction::SpeedUp, true);
        states.set(InputAction::SpeedUp, true);
        assert!(!states.take_pressed(InputAction::SpeedUp));

        states.set(InputAction::SpeedUp, false);
        states.set(InputAction::SpeedUp, true);
        assert!(states.take_pressed(InputAction::SpeedUp));
    }

    #[test]
    fn drain_returns_pressed_actions_in_order() {
        let mut states = ActionStates::default();
        states.set(InputAction::ToggleHud, true);
        states.set(InputAction::Quit, true);

        assert_eq!(
            states.drain_pressed(),
            vec![InputAction::Quit, InputAction::ToggleHud]
        );
        assert!(states.drain_pressed().is_empty());
    }

    #[test]
    fn keys_map_to_actions() {
        let action = |code| InputAction::from_physical_key(PhysicalKey::Code(code));
        assert_eq!(action(KeyCode::Escape), Some(InputAction::Quit));
        assert_eq!(action(KeyCode::Space), Some(InputAction::TogglePause));
        assert_eq!(action(KeyCode::Equal), Some(InputAction::SpeedUp));
        assert_eq!(action(KeyCode::ArrowUp), Some(InputAction::SpeedUp));
        assert_eq!(action(KeyCode::Minus), Some(InputAction::SlowDown));
        assert_eq!(action(KeyCode::ArrowDown), Some(InputAction::SlowDown));
        assert_eq!(action(KeyCode::KeyG), Some(InputAction::ToggleGrid));
        assert_eq!(action(KeyCode::F3), Some(InputAction::ToggleHud));
        assert_eq!(action(KeyCode::KeyW), None);
    }
}
