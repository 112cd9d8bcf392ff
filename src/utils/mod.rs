//! Shared helpers: paths, key names and cancellation

pub mod cancel;
pub mod keybinds;
pub mod path;

pub use cancel::CancelToken;
