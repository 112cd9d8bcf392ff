//! Fishing state machine: cast, poll, catch, wait, recast

use std::ops::ControlFlow;
use std::time::Duration;

use crate::anti_afk::AntiAfk;
use crate::clock::SharedClock;
use crate::config::Config;
use crate::error::Result;
use crate::input::{Actuator, Control, InputBackend};
use crate::log_main::PollLog;
use crate::methods::{build_method, FishingMethod, MethodContext};
use crate::screen_reader::Sampler;
use crate::utils::cancel::CancelToken;

/// What happened during one step of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishingEvent {
    /// The rod was cast before the first poll
    InitialCast,
    /// The catch input was sent
    Caught,
    /// `delay_after_catch` elapsed; the rod is recast next
    DelayElapsed,
    /// One detection cycle finished
    Polled { catchable: bool },
}

impl FishingEvent {
    pub fn is_catch(&self) -> bool {
        matches!(self, FishingEvent::Caught)
    }
}

/// Why [`Fisher::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    LimitReached,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct FisherSettings {
    /// Used both to cast (held) and to catch (pressed)
    pub interact: Control,
    pub cast_duration: Duration,
    pub delay_after_catch: Duration,
}

macro_rules! emit {
    ($on_event:ident, $event:expr) => {
        if let ControlFlow::Break(reason) = $on_event($event) {
            return Ok(reason);
        }
    };
}

pub struct Fisher {
    method: Box<dyn FishingMethod>,
    input: Actuator,
    settings: FisherSettings,
    anti_afk: Option<AntiAfk>,
    clock: SharedClock,
}

impl Fisher {
    pub fn new(
        method: Box<dyn FishingMethod>,
        input: Actuator,
        settings: FisherSettings,
        anti_afk: Option<AntiAfk>,
        clock: SharedClock,
    ) -> Self {
        Self {
            method,
            input,
            settings,
            anti_afk,
            clock,
        }
    }

    /// Wire a fisher from configuration and the given devices
    pub fn from_config(
        config: &Config,
        backend: Box<dyn InputBackend>,
        sampler: Box<dyn Sampler>,
        clock: SharedClock,
    ) -> Result<Self> {
        let poll_log = match config.log_directory() {
            Some(dir) => {
                let log = PollLog::create_in(dir)?;
                tracing::info!("[FISHER] Poll log: {:?}", log.path());
                Some(log)
            }
            None => None,
        };

        let method = build_method(
            &config.fishing_method.method_name,
            config.method_params(),
            MethodContext {
                clock: clock.clone(),
                sampler,
                poll_log,
                base_dir: config.source_dir().map(|p| p.to_path_buf()),
            },
        )?;

        let anti_afk = config
            .anti_afk_settings()?
            .map(|settings| AntiAfk::new(settings, clock.clone()));

        let settings = FisherSettings {
            interact: config.interact_control()?,
            cast_duration: config.cast_duration(),
            delay_after_catch: config.delay_after_catch(),
        };

        Ok(Self::new(
            method,
            Actuator::new(backend, clock.clone()),
            settings,
            anti_afk,
            clock,
        ))
    }

    pub fn method_name(&self) -> &'static str {
        self.method.name()
    }

    pub fn anti_afk_enabled(&self) -> bool {
        self.anti_afk.is_some()
    }

    /// Hold interact to throw the line
    pub fn cast(&mut self) -> Result<()> {
        tracing::debug!("[FISHER] Casting rod");
        self.input
            .hold(&self.settings.interact, self.settings.cast_duration)
    }

    /// Tap interact to reel the fish in
    pub fn catch(&mut self) -> Result<()> {
        tracing::debug!("[FISHER] Catching fish");
        self.input.press(&self.settings.interact)
    }

    /// Fish until `on_event` breaks or `cancel` is seen before the initial
    /// cast or at the start of a detection cycle.
    ///
    /// Every step is sequential: a catch is followed by the post-catch delay
    /// and the recast before the next poll.
    pub fn run<F>(&mut self, do_initial_cast: bool, cancel: &CancelToken, mut on_event: F) -> Result<StopReason>
    where
        F: FnMut(FishingEvent) -> ControlFlow<StopReason>,
    {
        if cancel.is_cancelled() {
            return Ok(StopReason::Cancelled);
        }

        if do_initial_cast {
            self.cast()?;
            emit!(on_event, FishingEvent::InitialCast);
        }

        loop {
            if cancel.is_cancelled() {
                return Ok(StopReason::Cancelled);
            }

            let catchable = self.method.poll()?;
            if catchable {
                self.catch()?;
                emit!(on_event, FishingEvent::Caught);
                self.clock.sleep(self.settings.delay_after_catch);
                emit!(on_event, FishingEvent::DelayElapsed);
                self.cast()?;
            }

            // a catch is always followed by a cast, so `catchable` doubles as "rod cast"
            if let Some(anti_afk) = self.anti_afk.as_mut() {
                anti_afk.on_activity(catchable, self.clock.now(), &mut self.input)?;
            }

            emit!(on_event, FishingEvent::Polled { catchable });
        }
    }

    /// Keep only the anti-AFK actions going until `cancel` is set.
    /// Returns `false` right away when anti-AFK is disabled.
    pub fn idle_until_cancelled(&mut self, cancel: &CancelToken) -> Result<bool> {
        match self.anti_afk.as_mut() {
            Some(anti_afk) => {
                anti_afk.run_until_cancelled(&mut self.input, cancel)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::FishingError;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct Script(VecDeque<bool>);

    impl FishingMethod for Script {
        fn name(&self) -> &'static str {
            "script"
        }

        fn poll(&mut self) -> Result<bool> {
            self.0
                .pop_front()
                .ok_or_else(|| FishingError::Capture("script exhausted".into()))
        }
    }

    #[derive(Clone, Default)]
    struct Downs(Arc<Mutex<u32>>);

    impl InputBackend for Downs {
        fn set(&mut self, _control: &Control, pressed: bool) -> Result<()> {
            if pressed {
                *self.0.lock() += 1;
            }
            Ok(())
        }
    }

    fn fisher(script: &[bool]) -> (Fisher, Downs) {
        let clock: SharedClock = Arc::new(ManualClock::new());
        let downs = Downs::default();
        let fisher = Fisher::new(
            Box::new(Script(script.iter().copied().collect())),
            Actuator::new(Box::new(downs.clone()), clock.clone()),
            FisherSettings {
                interact: Control::key("e").unwrap(),
                cast_duration: Duration::from_secs(1),
                delay_after_catch: Duration::from_secs(3),
            },
            None,
            clock,
        );
        (fisher, downs)
    }

    #[test]
    fn test_event_order_around_a_catch() {
        let (mut fisher, downs) = fisher(&[false, true]);
        let mut events = Vec::new();
        let result = fisher.run(true, &CancelToken::new(), |e| {
            events.push(e);
            ControlFlow::Continue(())
        });
        assert!(result.is_err());
        assert_eq!(
            events,
            vec![
                FishingEvent::InitialCast,
                FishingEvent::Polled { catchable: false },
                FishingEvent::Caught,
                FishingEvent::DelayElapsed,
                FishingEvent::Polled { catchable: true },
            ]
        );
        // initial cast, catch, recast
        assert_eq!(*downs.0.lock(), 3);
    }

    #[test]
    fn test_callback_break_stops_immediately() {
        let (mut fisher, downs) = fisher(&[true, true]);
        let reason = fisher
            .run(false, &CancelToken::new(), |e| {
                if e.is_catch() {
                    ControlFlow::Break(StopReason::LimitReached)
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(reason, StopReason::LimitReached);
        // catch only, no recast
        assert_eq!(*downs.0.lock(), 1);
    }

    #[test]
    fn test_cancelled_before_first_poll() {
        let (mut fisher, downs) = fisher(&[true]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let reason = fisher.run(true, &cancel, |_| ControlFlow::Continue(())).unwrap();
        assert_eq!(reason, StopReason::Cancelled);
        assert_eq!(*downs.0.lock(), 0);
    }

    #[test]
    fn test_idle_without_anti_afk() {
        let (mut fisher, _) = fisher(&[]);
        assert!(!fisher.anti_afk_enabled());
        assert!(!fisher.idle_until_cancelled(&CancelToken::new()).unwrap());
    }
}
