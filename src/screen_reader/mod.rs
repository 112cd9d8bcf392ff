//! Screen reader module for capturing and comparing screen content

pub mod base;
pub mod image_service;
pub mod screen_service;

pub use base::{get_localization, Localization};
pub use image_service::{difference, load_reference, matches, MatchDetector, MatchResult};
pub use screen_service::{to_intensity, Region, Sampler, ScreenService};
