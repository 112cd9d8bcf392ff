//! Screen capture service

use image::{DynamicImage, GrayImage, Luma};
#[cfg(windows)]
use screenshots::Screen;

use crate::error::{FishingError, Result};

/// Screen rectangle sampled every poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self { left, top, width, height }
    }
}

/// Something that can grab a region of the screen
pub trait Sampler {
    fn capture(&mut self, region: &Region) -> Result<DynamicImage>;
}

/// Sampler backed by the OS screen
#[derive(Debug, Default)]
pub struct ScreenService;

impl ScreenService {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl Sampler for ScreenService {
    fn capture(&mut self, region: &Region) -> Result<DynamicImage> {
        let screen = Screen::from_point(region.left, region.top)
            .map_err(|e| FishingError::Capture(format!("No screen at region origin: {}", e)))?;

        // capture_area takes coordinates local to the monitor
        let (origin_x, origin_y) = (screen.display_info.x, screen.display_info.y);
        let image = screen
            .capture_area(
                region.left - origin_x,
                region.top - origin_y,
                region.width,
                region.height,
            )
            .map_err(|e| FishingError::Capture(format!("Failed to capture area: {}", e)))?;

        let rgba_image = image::RgbaImage::from_raw(image.width(), image.height(), image.to_vec())
            .ok_or_else(|| FishingError::Capture("Failed to create image from raw data".into()))?;

        Ok(DynamicImage::ImageRgba8(rgba_image))
    }
}

#[cfg(not(windows))]
impl Sampler for ScreenService {
    fn capture(&mut self, _region: &Region) -> Result<DynamicImage> {
        Err(FishingError::Unsupported("screen capture requires Windows"))
    }
}

/// Convert an image to single-channel intensity.
///
/// Uses the ITU-R 601-2 luma transform in 16-bit fixed point; alpha is ignored.
pub fn to_intensity(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}
