//! Key and mouse button names accepted by the configuration

/// Keys pressed by the anti-AFK sequence
pub const ANTI_AFK_MENU_KEY: &str = "F1";
pub const ANTI_AFK_TAB_KEY: &str = "D";

/// Special key names understood by the input backend
const SPECIAL_KEYS: &[&str] = &[
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
    "ESC", "ESCAPE", "ENTER", "RETURN", "SPACE", "TAB", "BACKSPACE",
    "UP", "DOWN", "LEFT", "RIGHT",
    "HOME", "END", "PAGEUP", "PAGEDOWN", "DELETE",
    "SHIFT", "CTRL", "CONTROL", "ALT", "CAPSLOCK",
];

/// Mouse buttons that can be used as the interact control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Resolve a key name string to its canonical upper-case form.
///
/// Single letters and digits are accepted as well as the names in `SPECIAL_KEYS`.
pub fn resolve_key(key_name: &str) -> Option<String> {
    let key_upper = key_name.trim().to_uppercase();
    if key_upper.is_empty() {
        return None;
    }

    if SPECIAL_KEYS.contains(&key_upper.as_str()) {
        return Some(key_upper);
    }

    let mut chars = key_upper.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(key_upper),
        _ => None,
    }
}

/// Resolve a mouse button name (`left`, `right`, `middle`)
pub fn resolve_mouse_button(name: &str) -> Option<MouseButton> {
    match name.trim().to_lowercase().as_str() {
        "left" => Some(MouseButton::Left),
        "right" => Some(MouseButton::Right),
        "middle" => Some(MouseButton::Middle),
        _ => None,
    }
}
