//! Detection strategies and their registry
//!
//! A fishing method answers one question per poll cycle: can the fish be
//! caught right now? Strategies are looked up by name in [`METHODS`].

pub mod image;

use std::path::PathBuf;

use crate::clock::SharedClock;
use crate::error::{FishingError, Result};
use crate::log_main::PollLog;
use crate::screen_reader::Sampler;

pub use self::image::{ImageMethod, ImageMethodConfig};

/// A detection strategy. Each call to [`poll`](Self::poll) is one cycle of the
/// endless catchability sequence, paced by the strategy itself.
pub trait FishingMethod {
    fn name(&self) -> &'static str;
    fn poll(&mut self) -> Result<bool>;
}

/// Shared collaborators handed to a strategy factory
pub struct MethodContext {
    pub clock: SharedClock,
    pub sampler: Box<dyn Sampler>,
    pub poll_log: Option<PollLog>,
    /// Directory used to resolve relative file paths (the config file's directory)
    pub base_dir: Option<PathBuf>,
}

/// Builds a strategy from its `[fishing-method.<name>]` table
pub type MethodFactory = fn(&toml::Value, MethodContext) -> Result<Box<dyn FishingMethod>>;

/// Registered strategies
pub static METHODS: &[(&str, MethodFactory)] = &[(image::NAME, image::from_config)];

/// Registered strategy names
pub fn method_names() -> Vec<&'static str> {
    METHODS.iter().map(|(name, _)| *name).collect()
}

pub fn find_factory(name: &str) -> Option<MethodFactory> {
    METHODS
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, factory)| *factory)
}

/// Build the strategy registered as `name` from its parameter table
pub fn build_method(
    name: &str,
    params: Option<&toml::Value>,
    ctx: MethodContext,
) -> Result<Box<dyn FishingMethod>> {
    let factory = find_factory(name).ok_or_else(|| {
        FishingError::Config(format!(
            "Unknown fishing method {:?}. Possible values: {}",
            name,
            method_names().join(", ")
        ))
    })?;

    let params = params.ok_or_else(|| {
        FishingError::Config(format!("Missing [fishing-method.{}] section", name))
    })?;

    factory(params, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::screen_reader::ScreenService;
    use std::sync::Arc;

    fn ctx() -> MethodContext {
        MethodContext {
            clock: Arc::new(ManualClock::new()),
            sampler: Box::new(ScreenService::new()),
            poll_log: None,
            base_dir: None,
        }
    }

    #[test]
    fn test_registry_contains_image() {
        assert_eq!(method_names(), vec!["image"]);
        assert!(find_factory("image").is_some());
        assert!(find_factory("sound").is_none());
    }

    #[test]
    fn test_build_unknown_method() {
        let err = build_method("sound", None, ctx()).err().unwrap();
        assert!(err.to_string().contains("Possible values: image"));
    }

    #[test]
    fn test_build_without_section() {
        let err = build_method("image", None, ctx()).err().unwrap();
        assert!(err.to_string().contains("[fishing-method.image]"));
    }
}
