//! Image fishing method: polls a small screen region and compares it with the
//! interact-prompt reference image.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Deserialize;

use super::{FishingMethod, MethodContext};
use crate::clock::SharedClock;
use crate::error::{FishingError, Result};
use crate::log_main::{current_datetime_ms_str, PollLog};
use crate::screen_reader::base::available_localizations;
use crate::screen_reader::{get_localization, load_reference, to_intensity, MatchDetector, Region, Sampler};
use crate::utils::path::resolve_relative;

pub const NAME: &str = "image";

/// The catch prompt is fully solid for only ~3 frames at 30 FPS.
pub const DEFAULT_SCREEN_GRAB_PERIOD: f64 = 1.0 / 30.0;

fn default_screen_grab_period() -> f64 {
    DEFAULT_SCREEN_GRAB_PERIOD
}

/// `[fishing-method.image]` parameters
#[derive(Debug, Clone, Deserialize)]
pub struct ImageMethodConfig {
    /// Screen X where the capture box starts
    pub bbox_x0: Option<u32>,
    /// Screen Y where the capture box starts
    pub bbox_y0: Option<u32>,
    /// Preset used when the coordinates are not given
    pub localization: Option<String>,
    /// Reference image of the interact prompt
    pub key_image_path: String,
    pub tolerance: u32,
    /// Seconds between captures; capturing can take longer than this
    #[serde(default = "default_screen_grab_period")]
    pub screen_grab_period: f64,
    /// Directory for snapshots saved on each catch, empty to disable
    #[serde(default)]
    pub image_debug_path: String,
}

impl ImageMethodConfig {
    /// Capture box origin in screen coordinates, from explicit coordinates or
    /// the localization preset
    pub fn origin(&self) -> Result<(i32, i32)> {
        let (x, y) = match (self.bbox_x0, self.bbox_y0, &self.localization) {
            (Some(x), Some(y), _) => (x, y),
            (None, None, Some(name)) => get_localization(name)
                .map(|l| (l.bbox_x0, l.bbox_y0))
                .ok_or_else(|| {
                    FishingError::Config(format!(
                        "Unknown localization {:?}. Available: {}",
                        name,
                        available_localizations().join(", ")
                    ))
                })?,
            (None, None, None) => {
                return Err(FishingError::Config(
                    "image method needs bbox_x0 and bbox_y0 or a localization".into(),
                ))
            }
            _ => {
                return Err(FishingError::Config(
                    "bbox_x0 and bbox_y0 must be given together".into(),
                ))
            }
        };

        let to_screen = |name: &str, value: u32| {
            i32::try_from(value).map_err(|_| {
                FishingError::Config(format!("{} {} is outside the screen coordinate range", name, value))
            })
        };
        Ok((to_screen("bbox_x0", x)?, to_screen("bbox_y0", y)?))
    }

    pub fn screen_grab_period(&self) -> Result<Duration> {
        if !(self.screen_grab_period.is_finite() && self.screen_grab_period >= 0.0) {
            return Err(FishingError::Config(format!(
                "screen_grab_period must be a non-negative number, got {}",
                self.screen_grab_period
            )));
        }
        Ok(Duration::from_secs_f64(self.screen_grab_period))
    }
}

/// Registry factory for [`ImageMethod`]
pub fn from_config(params: &toml::Value, ctx: MethodContext) -> Result<Box<dyn FishingMethod>> {
    let config: ImageMethodConfig = params.clone().try_into()?;

    let (x0, y0) = config.origin()?;
    let period = config.screen_grab_period()?;
    let key_image = resolve_relative(&config.key_image_path, ctx.base_dir.as_deref())
        .ok_or_else(|| {
            FishingError::Config(format!(
                "key_image_path {:?} does not point to a file",
                config.key_image_path
            ))
        })?;

    let reference = load_reference(&key_image)?;
    tracing::info!(
        "[IMAGE] Reference {:?} loaded: {}x{}, tolerance {}",
        key_image,
        reference.width(),
        reference.height(),
        config.tolerance
    );

    let image_debug_dir = match config.image_debug_path.as_str() {
        "" => None,
        path => {
            let dir = PathBuf::from(path);
            std::fs::create_dir_all(&dir)?;
            Some(dir)
        }
    };

    let method = ImageMethod::new(
        MatchDetector::new(reference, config.tolerance),
        (x0, y0),
        ctx.sampler,
        period,
        ctx.clock,
    )
    .with_poll_log(ctx.poll_log)
    .with_image_debug_dir(image_debug_dir);

    Ok(Box::new(method))
}

pub struct ImageMethod {
    detector: MatchDetector,
    region: Region,
    sampler: Box<dyn Sampler>,
    screen_grab_period: Duration,
    clock: SharedClock,
    poll_log: Option<PollLog>,
    image_debug_dir: Option<PathBuf>,
    cycle_start: Option<Instant>,
}

impl ImageMethod {
    /// The capture region starts at `origin` and has the reference's size.
    pub fn new(
        detector: MatchDetector,
        origin: (i32, i32),
        sampler: Box<dyn Sampler>,
        screen_grab_period: Duration,
        clock: SharedClock,
    ) -> Self {
        let (width, height) = detector.reference().dimensions();
        Self {
            region: Region::new(origin.0, origin.1, width, height),
            detector,
            sampler,
            screen_grab_period,
            clock,
            poll_log: None,
            image_debug_dir: None,
            cycle_start: None,
        }
    }

    pub fn with_poll_log(mut self, poll_log: Option<PollLog>) -> Self {
        self.poll_log = poll_log;
        self
    }

    pub fn with_image_debug_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.image_debug_dir = dir;
        self
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Sleep what is left of the period since the previous capture started.
    /// An overrun is not caught up.
    fn pace(&mut self) {
        if let Some(start) = self.cycle_start {
            let elapsed = self.clock.now().saturating_duration_since(start);
            self.clock.sleep(self.screen_grab_period.saturating_sub(elapsed));
        }
        self.cycle_start = Some(self.clock.now());
    }
}

impl FishingMethod for ImageMethod {
    fn name(&self) -> &'static str {
        NAME
    }

    fn poll(&mut self) -> Result<bool> {
        self.pace();

        let frame = self.sampler.capture(&self.region)?;
        let result = self.detector.evaluate(&to_intensity(&frame))?;

        if let Some(log) = &self.poll_log {
            let line = format!(
                "Difference: {}; do catch: {}",
                result.difference, result.matched
            );
            if let Err(e) = log.append(&line) {
                tracing::warn!("[IMAGE] Failed to write poll log: {}", e);
            }
        }

        if result.matched {
            if let Some(dir) = &self.image_debug_dir {
                let name = format!(
                    "{:03} {}.png",
                    result.difference,
                    current_datetime_ms_str().replace(':', "-")
                );
                if let Err(e) = frame.save(dir.join(name)) {
                    tracing::warn!("[IMAGE] Failed to save debug image: {}", e);
                }
            }
        }

        Ok(result.matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use image::{DynamicImage, GrayImage, Luma};
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Returns queued frames and advances the clock by a fixed capture latency
    struct FakeScreen {
        frames: VecDeque<GrayImage>,
        clock: Arc<ManualClock>,
        latency: Duration,
        regions: Vec<Region>,
    }

    impl Sampler for FakeScreen {
        fn capture(&mut self, region: &Region) -> Result<DynamicImage> {
            self.regions.push(*region);
            self.clock.advance(self.latency);
            let frame = self
                .frames
                .pop_front()
                .ok_or_else(|| FishingError::Capture("no frames left".into()))?;
            Ok(DynamicImage::ImageLuma8(frame))
        }
    }

    fn method(frames: Vec<u8>, latency_ms: u64) -> (ImageMethod, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let screen = FakeScreen {
            frames: frames
                .into_iter()
                .map(|v| GrayImage::from_pixel(2, 2, Luma([v])))
                .collect(),
            clock: clock.clone(),
            latency: Duration::from_millis(latency_ms),
            regions: Vec::new(),
        };
        let detector = MatchDetector::new(GrayImage::from_pixel(2, 2, Luma([100])), 60);
        let method = ImageMethod::new(
            detector,
            (884, 729),
            Box::new(screen),
            Duration::from_millis(50),
            clock.clone(),
        );
        (method, clock)
    }

    #[test]
    fn test_region_uses_reference_size() {
        let (method, _) = method(vec![], 0);
        assert_eq!(method.region(), Region::new(884, 729, 2, 2));
    }

    #[test]
    fn test_poll_yields_match_results() {
        let (mut method, _) = method(vec![140, 200, 100], 10);
        assert!(method.poll().unwrap());
        assert!(!method.poll().unwrap());
        assert!(method.poll().unwrap());
        assert!(method.poll().is_err());
    }

    #[test]
    fn test_poll_is_paced_to_period() {
        let (mut method, clock) = method(vec![100; 4], 10);
        let start = clock.now();
        for _ in 0..4 {
            method.poll().unwrap();
        }
        // three full periods plus the last capture
        assert_eq!(clock.now() - start, Duration::from_millis(160));
    }

    #[test]
    fn test_capture_overrun_is_not_caught_up() {
        let (mut method, clock) = method(vec![100; 3], 80);
        let start = clock.now();
        for _ in 0..3 {
            method.poll().unwrap();
        }
        assert_eq!(clock.now() - start, Duration::from_millis(240));
    }

    #[test]
    fn test_origin_from_localization() {
        let config: ImageMethodConfig = toml::from_str(
            "localization = 'english_1920x1080'\nkey_image_path = 'E.png'\ntolerance = 85",
        )
        .unwrap();
        assert_eq!(config.origin().unwrap(), (884, 729));
        assert_eq!(config.screen_grab_period().unwrap(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn test_origin_requires_both_coordinates() {
        let config: ImageMethodConfig =
            toml::from_str("bbox_x0 = 10\nkey_image_path = 'E.png'\ntolerance = 85").unwrap();
        assert!(config.origin().is_err());
    }

    #[test]
    fn test_origin_beyond_screen_range_is_rejected() {
        let config: ImageMethodConfig = toml::from_str(
            "bbox_x0 = 3000000000\nbbox_y0 = 729\nkey_image_path = 'E.png'\ntolerance = 85",
        )
        .unwrap();
        let err = config.origin().unwrap_err().to_string();
        assert!(err.contains("bbox_x0 3000000000"));
    }

    #[test]
    fn test_negative_tolerance_is_rejected() {
        let parsed: std::result::Result<ImageMethodConfig, _> =
            toml::from_str("bbox_x0 = 1\nbbox_y0 = 1\nkey_image_path = 'E.png'\ntolerance = -1");
        assert!(parsed.is_err());
    }
}
