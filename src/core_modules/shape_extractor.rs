// THEORY:
// The `ShapeExtractor` bridges the spatial layer and the gesture layer. Given a cleaned
// mask it picks the dominant blob (largest enclosed area), rejects it if it is too small
// to be a hand at the expected working distance, and summarizes it as a `HandShape`:
// where the hand is (centroid) and how many fingers it shows.
//
// "No hand" is always `None`. The extractor never invents a placeholder centroid.

use crate::core_modules::contour_detector::contour_detector;
use crate::core_modules::finger_counter::{ConvexityFingerCounter, FingerCounter};
use crate::core_modules::region::{Centroid, Region};
use crate::core_modules::segmenter::Mask;

/// The per-frame summary of a detected hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandShape {
    pub centroid: Centroid,
    /// Always within `[0, 5]`.
    pub finger_count: u8,
    /// Enclosed area of the hand's border polygon.
    pub area: f64,
}

/// A detected hand together with the region it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub shape: HandShape,
    pub region: Region,
}

pub struct ShapeExtractor<F: FingerCounter = ConvexityFingerCounter> {
    counter: F,
    min_hand_area: f64,
}

impl ShapeExtractor<ConvexityFingerCounter> {
    pub fn with_default_counter(min_hand_area: f64) -> Self {
        Self::new(ConvexityFingerCounter::default(), min_hand_area)
    }
}

impl<F: FingerCounter> ShapeExtractor<F> {
    pub fn new(counter: F, min_hand_area: f64) -> Self {
        Self {
            counter,
            min_hand_area,
        }
    }

    pub fn counter(&self) -> &F {
        &self.counter
    }

    /// Finds the dominant hand in the mask, if any.
    pub fn extract(&self, mask: &Mask) -> Option<HandShape> {
        self.detect(mask).map(|detection| detection.shape)
    }

    /// Like `extract`, but also hands back the winning region.
    pub fn detect(&self, mask: &Mask) -> Option<Detection> {
        let region = contour_detector::largest_region(mask)?;
        self.shape_of(region)
    }

    /// Summarizes an already selected region.
    pub fn shape_of(&self, region: Region) -> Option<Detection> {
        if region.is_empty() || region.area < self.min_hand_area {
            return None;
        }
        let centroid = region.centroid()?;
        let finger_count = self.counter.count_fingers(&region);
        Some(Detection {
            shape: HandShape {
                centroid,
                finger_count,
                area: region.area,
            },
            region,
        })
    }
}
