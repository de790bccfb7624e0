// THEORY:
// The `segmenter` is the first layer of the gesture engine. It turns a color `Frame`
// into a binary `Mask` that isolates hand-colored pixels, then cleans that mask so the
// shape layer sees solid blobs instead of speckle.
//
// Key architectural principles:
// 1.  **Per-pixel classification**: Every sample is converted to HSV and tested against
//     a fixed, inclusive range. There is no adaptation across frames; the thresholds are
//     configuration.
// 2.  **Morphological cleanup**: An opening (erode, then dilate) with a disk removes
//     isolated noise pixels, and a closing (dilate, then erode) with the same disk fills
//     small holes inside the hand.
// 3.  **Pluggable strategy**: The rest of the pipeline only sees the `Segmenter` trait,
//     so a calibrated or learned segmenter can replace the skin-range one.
// 4.  **Stateless**: Given the same frame, the output mask is identical.

use crate::core_modules::frame::Frame;
use crate::core_modules::pixel::pixel::{HUE_MAX, Hsv};
use crate::error::{Result, VisionError};
use image::{GrayImage, Luma};
use imageproc::morphology::{Mask as StructuringElement, grayscale_close, grayscale_open};
use serde::{Deserialize, Serialize};

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// A binary foreground/background grid with the same dimensions as its source frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    /// An all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Wraps a grayscale image, treating every non-zero sample as foreground.
    pub fn from_image(mut image: GrayImage) -> Self {
        for pixel in image.pixels_mut() {
            pixel.0[0] = if pixel.0[0] > 0 { FOREGROUND } else { BACKGROUND };
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y).0[0] == FOREGROUND
    }

    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        let value = if foreground { FOREGROUND } else { BACKGROUND };
        self.image.put_pixel(x, y, Luma([value]));
    }

    pub fn foreground_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] == FOREGROUND).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }
}

/// Inclusive HSV bounds for skin-colored pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinThresholds {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl Default for SkinThresholds {
    fn default() -> Self {
        Self {
            lower: Hsv::new(0, 30, 60),
            upper: Hsv::new(20, 150, 255),
        }
    }
}

impl SkinThresholds {
    pub fn contains(&self, hsv: Hsv) -> bool {
        (self.lower.hue..=self.upper.hue).contains(&hsv.hue)
            && (self.lower.saturation..=self.upper.saturation).contains(&hsv.saturation)
            && (self.lower.value..=self.upper.value).contains(&hsv.value)
    }

    pub fn validate(&self) -> Result<()> {
        if self.upper.hue > HUE_MAX {
            return Err(VisionError::InvalidConfig(format!(
                "upper hue {} exceeds {HUE_MAX}",
                self.upper.hue
            )));
        }
        if self.lower.hue > self.upper.hue
            || self.lower.saturation > self.upper.saturation
            || self.lower.value > self.upper.value
        {
            return Err(VisionError::InvalidConfig(format!(
                "skin range is inverted: lower {:?}, upper {:?}",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

/// Turns a color frame into a cleaned binary hand mask.
pub trait Segmenter {
    fn segment(&self, frame: &Frame) -> Mask;
}

/// Fixed-range HSV skin segmenter with disk-shaped morphological cleanup.
#[derive(Debug, Clone)]
pub struct SkinSegmenter {
    thresholds: SkinThresholds,
    element: StructuringElement,
}

impl SkinSegmenter {
    pub fn new(thresholds: SkinThresholds, morphology_radius: u8) -> Self {
        Self {
            thresholds,
            element: StructuringElement::disk(morphology_radius),
        }
    }

    /// Raw per-pixel threshold, before any morphology.
    pub fn threshold(&self, frame: &Frame) -> Mask {
        let image = GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
            if self.thresholds.contains(frame.pixel(x, y).to_hsv()) {
                Luma([FOREGROUND])
            } else {
                Luma([BACKGROUND])
            }
        });
        Mask { image }
    }
}

impl Default for SkinSegmenter {
    fn default() -> Self {
        Self::new(SkinThresholds::default(), 4)
    }
}

impl Segmenter for SkinSegmenter {
    fn segment(&self, frame: &Frame) -> Mask {
        if frame.is_empty() {
            return Mask::new(frame.width(), frame.height());
        }
        let raw = self.threshold(frame);
        let opened = grayscale_open(&raw.image, &self.element);
        let closed = grayscale_close(&opened, &self.element);
        Mask { image: closed }
    }
}
