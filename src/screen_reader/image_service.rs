//! Reference matrix loading and the max-difference match test

use std::path::Path;

use image::GrayImage;

use super::screen_service::to_intensity;
use crate::error::{FishingError, Result};

/// Load a reference image and convert it to an intensity matrix
pub fn load_reference(path: &Path) -> Result<GrayImage> {
    let image = image::open(path)?;
    Ok(to_intensity(&image))
}

/// Maximum absolute per-pixel difference between two matrices of equal shape.
pub fn difference(reference: &GrayImage, sample: &GrayImage) -> Result<u8> {
    if reference.dimensions() != sample.dimensions() {
        return Err(FishingError::ShapeMismatch {
            expected: reference.dimensions(),
            actual: sample.dimensions(),
        });
    }

    Ok(reference
        .as_raw()
        .iter()
        .zip(sample.as_raw())
        .map(|(a, b)| a.abs_diff(*b))
        .max()
        .unwrap_or(0))
}

/// `true` iff the max difference is within `tolerance`
pub fn matches(reference: &GrayImage, sample: &GrayImage, tolerance: u32) -> Result<bool> {
    Ok(difference(reference, sample)? as u32 <= tolerance)
}

/// Outcome of comparing one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub difference: u8,
    pub matched: bool,
}

/// Reference matrix and tolerance fixed for a session
#[derive(Debug, Clone)]
pub struct MatchDetector {
    reference: GrayImage,
    tolerance: u32,
}

impl MatchDetector {
    pub fn new(reference: GrayImage, tolerance: u32) -> Self {
        Self { reference, tolerance }
    }

    pub fn reference(&self) -> &GrayImage {
        &self.reference
    }

    pub fn evaluate(&self, sample: &GrayImage) -> Result<MatchResult> {
        let difference = difference(&self.reference, sample)?;
        Ok(MatchResult {
            difference,
            matched: difference as u32 <= self.tolerance,
        })
    }
}
