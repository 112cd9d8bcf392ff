//! Input simulation module for keyboard and mouse control

use std::fmt;
use std::time::Duration;

#[cfg(windows)]
use enigo::{Button, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use crate::clock::SharedClock;
use crate::error::{FishingError, Result};
use crate::utils::keybinds::{resolve_key, resolve_mouse_button, MouseButton};

/// Time between down and up of a short press.
/// The game drops presses that are shorter than ~1/32 s.
pub const KEY_PRESS_DURATION: Duration = Duration::from_millis(50);

/// A keyboard key or a mouse button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Key(String),
    Mouse(MouseButton),
}

impl Control {
    /// Keyboard key by name, see [`resolve_key`]
    pub fn key(name: &str) -> Result<Self> {
        resolve_key(name)
            .map(Control::Key)
            .ok_or_else(|| FishingError::Config(format!("Invalid key: {:?}", name)))
    }

    /// Mouse button by name, see [`resolve_mouse_button`]
    pub fn mouse(name: &str) -> Result<Self> {
        resolve_mouse_button(name)
            .map(Control::Mouse)
            .ok_or_else(|| FishingError::Config(format!("Invalid mouse button: {:?}", name)))
    }

    pub fn from_config(name: &str, is_mouse_button: bool) -> Result<Self> {
        if is_mouse_button {
            Self::mouse(name)
        } else {
            Self::key(name)
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Key(k) => write!(f, "key {}", k),
            Control::Mouse(b) => write!(f, "mouse {:?}", b),
        }
    }
}

/// Low-level input device: puts a control down or up.
pub trait InputBackend {
    fn set(&mut self, control: &Control, pressed: bool) -> Result<()>;
}

/// Issues presses and holds over an [`InputBackend`]
pub struct Actuator {
    backend: Box<dyn InputBackend>,
    clock: SharedClock,
}

impl Actuator {
    pub fn new(backend: Box<dyn InputBackend>, clock: SharedClock) -> Self {
        Self { backend, clock }
    }

    /// Down, short hold, up
    pub fn press(&mut self, control: &Control) -> Result<()> {
        self.hold(control, KEY_PRESS_DURATION)
    }

    /// Down, wait `duration`, up
    pub fn hold(&mut self, control: &Control, duration: Duration) -> Result<()> {
        tracing::trace!("[INPUT] {} down for {:?}", control, duration);
        self.backend.set(control, true)?;
        self.clock.sleep(duration);
        self.backend.set(control, false)
    }
}

/// enigo-driven backend
#[cfg(windows)]
pub struct EnigoBackend {
    enigo: Enigo,
}

#[cfg(windows)]
impl EnigoBackend {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| FishingError::Input(format!("Failed to create Enigo: {:?}", e)))?;
        Ok(Self { enigo })
    }
}

#[cfg(windows)]
impl InputBackend for EnigoBackend {
    fn set(&mut self, control: &Control, pressed: bool) -> Result<()> {
        let direction = if pressed {
            Direction::Press
        } else {
            Direction::Release
        };

        let result = match control {
            Control::Key(name) => {
                let key = string_to_enigo_key(name)
                    .ok_or_else(|| FishingError::Input(format!("Unmapped key '{}'", name)))?;
                self.enigo.key(key, direction)
            }
            Control::Mouse(button) => {
                let button = match button {
                    MouseButton::Left => Button::Left,
                    MouseButton::Right => Button::Right,
                    MouseButton::Middle => Button::Middle,
                };
                self.enigo.button(button, direction)
            }
        };

        result.map_err(|e| FishingError::Input(format!("Failed to send {}: {:?}", control, e)))
    }
}

/// Backend for the current platform
#[cfg(windows)]
pub fn platform_backend() -> Result<Box<dyn InputBackend>> {
    Ok(Box::new(EnigoBackend::new()?))
}

#[cfg(not(windows))]
pub fn platform_backend() -> Result<Box<dyn InputBackend>> {
    Err(FishingError::Unsupported("input simulation requires Windows"))
}

/// Convert canonical key name to enigo Key
#[cfg(windows)]
fn string_to_enigo_key(key: &str) -> Option<Key> {
    // Lowercase single characters to avoid keyboard layout mapping issues
    if key.len() == 1 {
        let c = key.chars().next()?.to_ascii_lowercase();
        return Some(Key::Unicode(c));
    }

    match key.to_uppercase().as_str() {
        "F1" => Some(Key::F1),
        "F2" => Some(Key::F2),
        "F3" => Some(Key::F3),
        "F4" => Some(Key::F4),
        "F5" => Some(Key::F5),
        "F6" => Some(Key::F6),
        "F7" => Some(Key::F7),
        "F8" => Some(Key::F8),
        "F9" => Some(Key::F9),
        "F10" => Some(Key::F10),
        "F11" => Some(Key::F11),
        "F12" => Some(Key::F12),
        "ESC" | "ESCAPE" => Some(Key::Escape),
        "ENTER" | "RETURN" => Some(Key::Return),
        "SPACE" => Some(Key::Space),
        "TAB" => Some(Key::Tab),
        "BACKSPACE" => Some(Key::Backspace),
        "UP" => Some(Key::UpArrow),
        "DOWN" => Some(Key::DownArrow),
        "LEFT" => Some(Key::LeftArrow),
        "RIGHT" => Some(Key::RightArrow),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "PAGEUP" => Some(Key::PageUp),
        "PAGEDOWN" => Some(Key::PageDown),
        "DELETE" => Some(Key::Delete),
        "SHIFT" => Some(Key::Shift),
        "CTRL" | "CONTROL" => Some(Key::Control),
        "ALT" => Some(Key::Alt),
        "CAPSLOCK" => Some(Key::CapsLock),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Instant;

    struct Recorder {
        clock: Arc<ManualClock>,
        events: Arc<Mutex<Vec<(Control, bool, Instant)>>>,
    }

    impl InputBackend for Recorder {
        fn set(&mut self, control: &Control, pressed: bool) -> Result<()> {
            self.events
                .lock()
                .push((control.clone(), pressed, self.clock.now()));
            Ok(())
        }
    }

    #[test]
    fn test_press_and_hold_durations() {
        let clock = Arc::new(ManualClock::new());
        let events = Arc::new(Mutex::new(Vec::new()));
        let backend = Recorder {
            clock: clock.clone(),
            events: events.clone(),
        };
        let mut actuator = Actuator::new(Box::new(backend), clock.clone());
        let e = Control::key("e").unwrap();

        actuator.press(&e).unwrap();
        actuator.hold(&e, Duration::from_secs(1)).unwrap();

        let events = events.lock();
        assert_eq!(events.len(), 4);
        assert!(events[0].1 && !events[1].1);
        assert_eq!(events[1].2 - events[0].2, KEY_PRESS_DURATION);
        assert_eq!(events[3].2 - events[2].2, Duration::from_secs(1));
    }

    #[test]
    fn test_control_from_config() {
        assert_eq!(
            Control::from_config("e", false).unwrap(),
            Control::Key("E".to_string())
        );
        assert_eq!(
            Control::from_config("left", true).unwrap(),
            Control::Mouse(MouseButton::Left)
        );
        assert_eq!(
            Control::from_config("left", false).unwrap(),
            Control::Key("LEFT".to_string())
        );
        assert!(Control::from_config("e", true).is_err());
        assert!(Control::from_config("mouse4", false).is_err());
    }

    #[test]
    #[cfg(windows)]
    fn test_string_to_enigo_key() {
        assert!(string_to_enigo_key("E").is_some());
        assert!(string_to_enigo_key("F1").is_some());
        assert!(string_to_enigo_key("ESC").is_some());
        assert!(string_to_enigo_key("INVALID_KEY_NAME").is_none());
    }
}
