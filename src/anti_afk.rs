//! Anti-AFK scheduler
//!
//! Periodically sends a short input sequence so the game does not flag the
//! player as inactive. The sequence is:
//!
//! 1. Press `F1`.
//! 2. Wait 1 second.
//! 3. Press `D`.
//! 4. Wait 1 second.
//! 5. Press `F1`.

use std::time::{Duration, Instant};

use crate::clock::SharedClock;
use crate::error::{FishingError, Result};
use crate::input::{Actuator, Control};
use crate::utils::cancel::CancelToken;
use crate::utils::keybinds::{ANTI_AFK_MENU_KEY, ANTI_AFK_TAB_KEY};

/// Allowed range for both thresholds, in seconds
pub const THRESHOLD_RANGE_SECS: std::ops::RangeInclusive<u64> = 30..=300;

const ACTION_STEP_DELAY: Duration = Duration::from_secs(1);
const LOOP_INTERVAL: Duration = Duration::from_secs(1);

/// Anti-AFK timing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntiAfkSettings {
    /// How often the action sequence may run
    pub action_period: Duration,
    /// Inactivity after which the sequence runs without waiting for a cast
    pub no_cast_threshold: Duration,
}

impl Default for AntiAfkSettings {
    fn default() -> Self {
        Self {
            action_period: Duration::from_secs(120),
            no_cast_threshold: Duration::from_secs(150),
        }
    }
}

impl AntiAfkSettings {
    pub fn from_secs(action_period: u64, no_cast_threshold: u64) -> Result<Self> {
        for (name, value) in [
            ("action_period", action_period),
            ("no_cast_threshold", no_cast_threshold),
        ] {
            if !THRESHOLD_RANGE_SECS.contains(&value) {
                return Err(FishingError::Config(format!(
                    "anti-afk {} must be within [{}, {}] seconds, got {}",
                    name,
                    THRESHOLD_RANGE_SECS.start(),
                    THRESHOLD_RANGE_SECS.end(),
                    value
                )));
            }
        }

        Ok(Self {
            action_period: Duration::from_secs(action_period),
            no_cast_threshold: Duration::from_secs(no_cast_threshold),
        })
    }
}

enum Step {
    Press(&'static str),
    Wait(Duration),
}

const ACTIONS: &[Step] = &[
    Step::Press(ANTI_AFK_MENU_KEY),
    Step::Wait(ACTION_STEP_DELAY),
    Step::Press(ANTI_AFK_TAB_KEY),
    Step::Wait(ACTION_STEP_DELAY),
    Step::Press(ANTI_AFK_MENU_KEY),
];

pub struct AntiAfk {
    settings: AntiAfkSettings,
    last_action_time: Instant,
    last_cast_time: Instant,
    clock: SharedClock,
}

impl AntiAfk {
    pub fn new(settings: AntiAfkSettings, clock: SharedClock) -> Self {
        let now = clock.now();
        Self {
            settings,
            last_action_time: now,
            last_cast_time: now,
            clock,
        }
    }

    /// Run the action sequence if `action_period` has passed since the last run.
    /// Returns whether it ran.
    pub fn tick(&mut self, now: Instant, input: &mut Actuator) -> Result<bool> {
        if now.saturating_duration_since(self.last_action_time) < self.settings.action_period {
            return Ok(false);
        }

        self.last_action_time = now;
        tracing::info!("[ANTI-AFK] Performing anti-AFK actions");
        for step in ACTIONS {
            match step {
                Step::Press(key) => input.press(&Control::key(key)?)?,
                Step::Wait(delay) => self.clock.sleep(*delay),
            }
        }
        Ok(true)
    }

    /// Feed whether the rod was cast. A cast, or a cast-less stretch of at
    /// least `no_cast_threshold`, lets [`tick`](Self::tick) run.
    pub fn on_activity(&mut self, rod_cast: bool, now: Instant, input: &mut Actuator) -> Result<bool> {
        if rod_cast {
            self.last_cast_time = now;
        }

        let stalled =
            now.saturating_duration_since(self.last_cast_time) >= self.settings.no_cast_threshold;
        if rod_cast || stalled {
            return self.tick(now, input);
        }
        Ok(false)
    }

    /// Tick roughly once a second until `cancel` is set
    pub fn run_until_cancelled(&mut self, input: &mut Actuator, cancel: &CancelToken) -> Result<()> {
        loop {
            let now = self.clock.now();
            self.tick(now, input)?;
            if cancel.is_cancelled() {
                return Ok(());
            }
            self.clock.sleep(LOOP_INTERVAL);
        }
    }
}
