//! One fishing run: counts catches and decides when to stop

use std::fmt;
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::time::Duration;

use super::fisher::{Fisher, StopReason};
use crate::clock::SharedClock;
use crate::error::FishingError;
use crate::utils::cancel::CancelToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// `None` fishes until cancelled
    pub fish_limit: Option<u64>,
    pub do_initial_cast: bool,
}

#[derive(Debug)]
pub enum SessionEnd {
    LimitReached,
    Cancelled,
    Failed(FishingError),
}

impl SessionEnd {
    /// Short label stored in the session history
    pub fn label(&self) -> String {
        match self {
            SessionEnd::LimitReached => "fish limit reached".to_string(),
            SessionEnd::Cancelled => "cancelled".to_string(),
            SessionEnd::Failed(e) => format!("error: {}", e),
        }
    }
}

#[derive(Debug)]
pub struct SessionSummary {
    pub fish_caught: u64,
    pub end: SessionEnd,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script is terminated. {} fish caught", self.fish_caught)
    }
}

/// Count down `seconds` so the game window can be focused.
/// Returns `false` as soon as `cancel` is set.
pub fn start_countdown(seconds: u64, cancel: &CancelToken, clock: &SharedClock) -> bool {
    println!("\nSwitch to Destiny 2 window. Ensure it is active while script is running");
    for left in (1..=seconds).rev() {
        if cancel.is_cancelled() {
            println!();
            return false;
        }
        print!("\rStarting in {}s", left);
        let _ = io::stdout().flush();
        clock.sleep(Duration::from_secs(1));
    }
    print!("\r");
    let _ = io::stdout().flush();
    !cancel.is_cancelled()
}

/// Fish until the limit is reached or `cancel` is set.
///
/// When the limit is reached and anti-AFK is enabled, only the anti-AFK
/// actions keep running until `cancel` is set. The summary is printed on
/// every exit path.
pub fn run_session(fisher: &mut Fisher, settings: &SessionSettings, cancel: &CancelToken) -> SessionSummary {
    let mut fish_caught = 0u64;

    let result = fisher.run(settings.do_initial_cast, cancel, |event| {
        if event.is_catch() {
            fish_caught += 1;
            tracing::info!("[SESSION] Fish caught: {}", fish_caught);
            if settings.fish_limit.is_some_and(|limit| fish_caught >= limit) {
                return ControlFlow::Break(StopReason::LimitReached);
            }
        }
        if cancel.is_cancelled() {
            return ControlFlow::Break(StopReason::Cancelled);
        }
        ControlFlow::Continue(())
    });

    let end = match result {
        Ok(StopReason::LimitReached) => {
            println!("Fish limit is reached; collect it and restart the script");
            if fisher.anti_afk_enabled() {
                println!("Anti-AFK is enabled; the script continues to run until terminated manually");
            }
            match fisher.idle_until_cancelled(cancel) {
                Ok(_) => SessionEnd::LimitReached,
                Err(e) => SessionEnd::Failed(e),
            }
        }
        Ok(StopReason::Cancelled) => SessionEnd::Cancelled,
        Err(e) => SessionEnd::Failed(e),
    };

    if let SessionEnd::Failed(e) = &end {
        tracing::error!("[SESSION] Fishing stopped by error: {}", e);
    }

    let summary = SessionSummary { fish_caught, end };
    println!("{}", summary);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::error::Result;
    use crate::fishing::FisherSettings;
    use crate::input::{Actuator, Control, InputBackend};
    use crate::methods::FishingMethod;
    use std::sync::Arc;
    use std::time::Duration;

    struct Always(bool);

    impl FishingMethod for Always {
        fn name(&self) -> &'static str {
            "always"
        }

        fn poll(&mut self) -> Result<bool> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl FishingMethod for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn poll(&mut self) -> Result<bool> {
            Err(FishingError::Capture("screen lost".into()))
        }
    }

    struct Null;

    impl InputBackend for Null {
        fn set(&mut self, _control: &Control, _pressed: bool) -> Result<()> {
            Ok(())
        }
    }

    fn fisher(method: Box<dyn FishingMethod>) -> Fisher {
        let clock: SharedClock = Arc::new(ManualClock::new());
        Fisher::new(
            method,
            Actuator::new(Box::new(Null), clock.clone()),
            FisherSettings {
                interact: Control::key("e").unwrap(),
                cast_duration: Duration::from_secs(1),
                delay_after_catch: Duration::from_secs(3),
            },
            None,
            clock,
        )
    }

    #[test]
    fn test_countdown_runs_to_zero() {
        let manual = Arc::new(ManualClock::new());
        let clock: SharedClock = manual.clone();
        let start = manual.now();
        assert!(start_countdown(5, &CancelToken::new(), &clock));
        assert_eq!(manual.now() - start, Duration::from_secs(5));
    }

    #[test]
    fn test_countdown_stops_when_cancelled() {
        let manual = Arc::new(ManualClock::new());
        let clock: SharedClock = manual.clone();
        let start = manual.now();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(!start_countdown(5, &cancel, &clock));
        assert_eq!(manual.now(), start);
    }

    #[test]
    fn test_cancel_before_start_skips_initial_cast() {
        let mut fisher = fisher(Box::new(Always(true)));
        let cancel = CancelToken::new();
        cancel.cancel();
        let settings = SessionSettings {
            fish_limit: Some(5),
            do_initial_cast: true,
        };
        let summary = run_session(&mut fisher, &settings, &cancel);
        assert_eq!(summary.fish_caught, 0);
        assert!(matches!(summary.end, SessionEnd::Cancelled));
        assert_eq!(summary.to_string(), "Script is terminated. 0 fish caught");
    }

    #[test]
    fn test_limit_stops_session() {
        let mut fisher = fisher(Box::new(Always(true)));
        let settings = SessionSettings {
            fish_limit: Some(3),
            do_initial_cast: true,
        };
        let summary = run_session(&mut fisher, &settings, &CancelToken::new());
        assert_eq!(summary.fish_caught, 3);
        assert!(matches!(summary.end, SessionEnd::LimitReached));
        assert_eq!(summary.to_string(), "Script is terminated. 3 fish caught");
    }

    #[test]
    fn test_cancelled_session() {
        let mut fisher = fisher(Box::new(Always(false)));
        let cancel = CancelToken::new();
        cancel.cancel();
        let settings = SessionSettings {
            fish_limit: None,
            do_initial_cast: false,
        };
        let summary = run_session(&mut fisher, &settings, &cancel);
        assert_eq!(summary.fish_caught, 0);
        assert!(matches!(summary.end, SessionEnd::Cancelled));
    }

    #[test]
    fn test_error_still_produces_summary() {
        let mut fisher = fisher(Box::new(Broken));
        let settings = SessionSettings {
            fish_limit: Some(5),
            do_initial_cast: false,
        };
        let summary = run_session(&mut fisher, &settings, &CancelToken::new());
        assert_eq!(summary.fish_caught, 0);
        assert!(summary.end.label().contains("screen lost"));
    }
}
