//! Auto fishing for Destiny 2
//!
//! Samples a small screen region, compares it with a reference image of the
//! interact prompt and sends the catch input when they match. An optional
//! anti-AFK scheduler keeps the character from being flagged as idle.

pub mod anti_afk;
pub mod clock;
pub mod config;
pub mod error;
pub mod fishing;
pub mod input;
pub mod log_main;
pub mod methods;
pub mod screen_reader;
pub mod utils;

// Re-exports for convenience
pub use anti_afk::{AntiAfk, AntiAfkSettings};
pub use clock::{system_clock, Clock, ManualClock, SharedClock, SystemClock};
pub use config::Config;
pub use error::{FishingError, Result};
pub use fishing::{run_session, Fisher, FishingEvent, SessionEnd, SessionSettings, SessionSummary, StopReason};
pub use input::{Actuator, Control, InputBackend};
pub use methods::{build_method, FishingMethod, MethodContext, METHODS};
pub use screen_reader::{MatchDetector, Region, Sampler, ScreenService};
pub use utils::{path::get_data_dir, CancelToken};
