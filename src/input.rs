use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keys the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Pressed,
    Released,
}

impl Key {
    pub fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::ArrowLeft => Some(Key::Left),
            KeyCode::ArrowRight => Some(Key::Right),
            KeyCode::ArrowUp => Some(Key::Up),
            KeyCode::Escape => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Translate a winit key event. OS auto-repeat presses are dropped so a held
/// key reads as one press and one release.
pub fn translate(event: &KeyEvent) -> Option<(Key, KeyAction)> {
    if event.repeat {
        return None;
    }
    let PhysicalKey::Code(code) = event.physical_key else {
        return None;
    };
    let key = Key::from_code(code)?;
    let action = match event.state {
        ElementState::Pressed => KeyAction::Pressed,
        ElementState::Released => KeyAction::Released,
    };
    Some((key, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_escape_are_mapped() {
        assert_eq!(Key::from_code(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(Key::from_code(KeyCode::ArrowRight), Some(Key::Right));
        assert_eq!(Key::from_code(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(Key::from_code(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(Key::from_code(KeyCode::KeyA), None);
    }
}
