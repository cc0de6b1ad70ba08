use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Per-frame input signals consumed by the observer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub debug: bool,
}

impl Controls {
    /// W/S move, A/D turn, E dumps observer state.
    pub fn from_keys(keys_down: &HashSet<KeyCode>) -> Self {
        Self {
            forward: keys_down.contains(&KeyCode::KeyW),
            backward: keys_down.contains(&KeyCode::KeyS),
            turn_left: keys_down.contains(&KeyCode::KeyA),
            turn_right: keys_down.contains(&KeyCode::KeyD),
            debug: keys_down.contains(&KeyCode::KeyE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_held_keys() {
        let keys: HashSet<KeyCode> = [KeyCode::KeyW, KeyCode::KeyD, KeyCode::KeyQ].into();
        let c = Controls::from_keys(&keys);
        assert_eq!(
            c,
            Controls {
                forward: true,
                turn_right: true,
                ..Default::default()
            }
        );
        assert_eq!(Controls::from_keys(&HashSet::new()), Controls::default());
    }
}
