// THEORY:
// The `GestureClassifier` reads a `HandShape` two ways at once:
// 1.  **Static**: what the hand looks like. The finger count maps straight onto a label.
// 2.  **Motion**: what the hand is doing. The displacement of the centroid since the
//     previous detection, if large enough, maps onto one of four directions.
// The two readings are resolved into a single label for the frame, with motion taking
// priority: a deliberate sweep is a stronger signal than a held shape, and a hand that
// keeps its shape while moving must not flicker between the two.
//
// The classifier itself is stateless. The previous centroid lives in `MotionState`,
// which the owning pipeline carries from one cycle to the next.

use crate::core_modules::gesture::GestureLabel;
use crate::core_modules::region::Centroid;
use crate::core_modules::shape_extractor::HandShape;

/// The three readings produced for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub static_label: GestureLabel,
    pub motion_label: GestureLabel,
    pub resolved: GestureLabel,
}

/// Maps a finger count onto its static gesture.
pub fn static_label(finger_count: u8) -> GestureLabel {
    match finger_count {
        1 => GestureLabel::ZoomOut,
        2 => GestureLabel::RotateRight,
        3 => GestureLabel::RotateLeft,
        4 => GestureLabel::RotateUp,
        5 => GestureLabel::ZoomIn,
        _ => GestureLabel::None,
    }
}

/// Maps a centroid displacement onto a direction. Displacements within `threshold` on
/// both axes are not intentional motion. Ties between the axes resolve horizontally.
pub fn motion_label(
    current: Option<Centroid>,
    previous: Option<Centroid>,
    threshold: f64,
) -> GestureLabel {
    let (Some(current), Some(previous)) = (current, previous) else {
        return GestureLabel::None;
    };
    let (dx, dy) = current.displacement_from(&previous);
    if dx.abs() <= threshold && dy.abs() <= threshold {
        return GestureLabel::None;
    }
    if dx.abs() >= dy.abs() {
        if dx > 0.0 {
            GestureLabel::RotateRight
        } else {
            GestureLabel::RotateLeft
        }
    } else if dy > 0.0 {
        GestureLabel::RotateDown
    } else {
        GestureLabel::RotateUp
    }
}

/// Motion wins whenever it says anything at all.
pub fn resolve(static_label: GestureLabel, motion_label: GestureLabel) -> GestureLabel {
    if motion_label.is_none() {
        static_label
    } else {
        motion_label
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureClassifier {
    motion_threshold: f64,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl GestureClassifier {
    pub fn new(motion_threshold: f64) -> Self {
        Self { motion_threshold }
    }

    pub fn classify(&self, shape: Option<&HandShape>, previous: Option<Centroid>) -> Classification {
        let Some(shape) = shape else {
            return Classification::default();
        };
        let static_label = static_label(shape.finger_count);
        let motion_label = motion_label(Some(shape.centroid), previous, self.motion_threshold);
        Classification {
            static_label,
            motion_label,
            resolved: resolve(static_label, motion_label),
        }
    }
}

/// Cross-cycle memory for motion classification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    previous_centroid: Option<Centroid>,
}

impl MotionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_centroid(&self) -> Option<Centroid> {
        self.previous_centroid
    }

    /// Records the centroid of the latest detection. Cycles without a detection leave
    /// the last known position in place.
    pub fn observe(&mut self, shape: Option<&HandShape>) {
        if let Some(shape) = shape {
            self.previous_centroid = Some(shape.centroid);
        }
    }

    pub fn reset(&mut self) {
        self.previous_centroid = None;
    }
}
