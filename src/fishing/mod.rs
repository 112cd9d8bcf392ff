//! Fishing control loop and the session that drives it

pub mod fisher;
pub mod session;

pub use fisher::{Fisher, FisherSettings, FishingEvent, StopReason};
pub use session::{run_session, start_countdown, SessionEnd, SessionSettings, SessionSummary};
