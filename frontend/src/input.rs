use std::collections::HashMap;

use cathode_core::core::machine::InputButton;
use sdl2::keyboard::Scancode;

/// Maps SDL scancodes to machine button IDs.
pub struct KeyMap {
    map: HashMap<Scancode, u8>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind a scancode to a machine button ID.
    pub fn bind(&mut self, scancode: Scancode, button_id: u8) {
        self.map.insert(scancode, button_id);
    }

    /// Look up the machine button ID for a scancode.
    pub fn get(&self, scancode: Scancode) -> Option<u8> {
        self.map.get(&scancode).copied()
    }
}

/// Build a default key map for a machine's input buttons, by button name.
/// The Invaders cabinet bindings: SPACE for the coin slot, 1/2 for the
/// start buttons, A/D to move, J to fire.
pub fn default_key_map(buttons: &[InputButton]) -> KeyMap {
    let mut km = KeyMap::new();

    for button in buttons {
        let scancode = match button.name {
            "Coin" => Some(Scancode::Space),
            "P1 Start" => Some(Scancode::Num1),
            "P2 Start" => Some(Scancode::Num2),
            "Left" => Some(Scancode::A),
            "Right" => Some(Scancode::D),
            "Fire" => Some(Scancode::J),
            _ => None,
        };

        if let Some(sc) = scancode {
            km.bind(sc, button.id);
        }
    }

    km
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_button_names() {
        let buttons = [
            InputButton { id: 0, name: "Coin" },
            InputButton { id: 5, name: "Fire" },
            InputButton { id: 9, name: "Hyperspace" },
        ];
        let km = default_key_map(&buttons);
        assert_eq!(km.get(Scancode::Space), Some(0));
        assert_eq!(km.get(Scancode::J), Some(5));
        // Unknown names get no default binding
        assert_eq!(km.get(Scancode::H), None);
    }
}
