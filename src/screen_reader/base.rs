//! Predefined capture origins per game localization and screen resolution

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Screen position where the interact prompt starts for a localization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localization {
    pub bbox_x0: u32,
    pub bbox_y0: u32,
}

/// Known localizations, keyed `<language>_<width>x<height>`
pub static LOCALIZATIONS: Lazy<HashMap<&'static str, Localization>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("english_1920x1080", Localization { bbox_x0: 884, bbox_y0: 729 });
    m.insert("russian_1920x1080", Localization { bbox_x0: 859, bbox_y0: 729 });
    m
});

/// Look up a localization preset, case insensitive
pub fn get_localization(name: &str) -> Option<Localization> {
    LOCALIZATIONS.get(name.trim().to_lowercase().as_str()).copied()
}

/// Preset names, sorted, for error messages
pub fn available_localizations() -> Vec<&'static str> {
    let mut names: Vec<_> = LOCALIZATIONS.keys().copied().collect();
    names.sort_unstable();
    names
}
