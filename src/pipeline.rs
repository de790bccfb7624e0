// THEORY:
// The `pipeline` module is the top-level API for the gesture engine. It owns one
// instance of every stage plus the two pieces of cross-cycle memory (the motion state
// and the debouncer) and runs them strictly forward for each frame:
//
//   frame -> mask -> dominant region -> (centroid, fingers) -> (static, motion)
//         -> resolved label -> optional debounced event
//
// A `GesturePipeline` is a plain owned value with no globals and no locking, so any
// number of them can coexist (one per camera). Timestamps are supplied by the caller;
// the pipeline never reads the clock itself, which keeps replays and tests exact.

use crate::core_modules::classifier::{Classification, GestureClassifier, MotionState};
use crate::core_modules::debouncer::{DebounceDecision, DebounceState, Debouncer};
use crate::core_modules::finger_counter::{ConvexityFingerCounter, FingerCounter};
use crate::core_modules::frame::Frame;
use crate::core_modules::region::Centroid;
use crate::core_modules::segmenter::{Mask, Segmenter, SkinSegmenter};
use crate::core_modules::shape_extractor::{HandShape, ShapeExtractor};
use crate::error::Result;
use std::time::Instant;
use tracing::trace;

// Re-export key data structures for the public API.
pub use crate::config::PipelineConfig;
pub use crate::core_modules::gesture::{GestureEvent, GestureLabel};

/// Everything the pipeline learned from a single frame.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub frame_index: u64,
    /// The cleaned mask the shape stage worked on.
    pub mask: Mask,
    pub shape: Option<HandShape>,
    pub classification: Classification,
    pub decision: DebounceDecision,
    pub event: Option<GestureEvent>,
}

/// The main, top-level struct for the gesture engine.
pub struct GesturePipeline<S: Segmenter = SkinSegmenter, F: FingerCounter = ConvexityFingerCounter>
{
    segmenter: S,
    extractor: ShapeExtractor<F>,
    classifier: GestureClassifier,
    motion: MotionState,
    debouncer: Debouncer,
    frame_counter: u64,
}

impl GesturePipeline {
    /// Builds the standard skin/convexity pipeline from a validated config.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let segmenter = SkinSegmenter::new(config.skin, config.morphology_radius);
        let counter = ConvexityFingerCounter::new(config.finger_count_params());
        Ok(Self::with_strategies(segmenter, counter, &config))
    }
}

impl<S: Segmenter, F: FingerCounter> GesturePipeline<S, F> {
    /// Builds a pipeline around caller-supplied segmentation and finger counting.
    /// Only the area, motion and cooldown settings of `config` are used.
    pub fn with_strategies(segmenter: S, counter: F, config: &PipelineConfig) -> Self {
        Self {
            segmenter,
            extractor: ShapeExtractor::new(counter, config.min_hand_area),
            classifier: GestureClassifier::new(config.motion_threshold),
            motion: MotionState::new(),
            debouncer: Debouncer::new(config.cooldown()),
            frame_counter: 0,
        }
    }

    /// Runs one cycle and returns the debounced event, if any.
    pub fn process_frame(&mut self, frame: &Frame, now: Instant) -> Option<GestureEvent> {
        self.analyze_frame(frame, now).and_then(|analysis| analysis.event)
    }

    /// Runs one cycle and returns the full breakdown. An empty frame skips the cycle
    /// entirely and leaves all state untouched.
    pub fn analyze_frame(&mut self, frame: &Frame, now: Instant) -> Option<FrameAnalysis> {
        if frame.is_empty() {
            trace!("empty frame, cycle skipped");
            return None;
        }
        let frame_index = self.frame_counter;
        self.frame_counter += 1;

        // Stage 1: Segmentation
        let mask = self.segmenter.segment(frame);

        // Stage 2: Shape Extraction
        let shape = self.extractor.extract(&mask);

        // Stage 3: Classification, against the position remembered from earlier cycles
        let classification = self
            .classifier
            .classify(shape.as_ref(), self.motion.previous_centroid());
        self.motion.observe(shape.as_ref());

        // Stage 4: Debouncing
        let decision = self.debouncer.decide(classification.resolved, now);
        let event = decision.emitted().map(|label| GestureEvent {
            label,
            timestamp: now,
            frame_index,
        });

        trace!(
            frame = frame_index,
            fingers = ?shape.map(|s| s.finger_count),
            static_label = %classification.static_label,
            motion_label = %classification.motion_label,
            gesture = %classification.resolved,
            "cycle complete"
        );

        Some(FrameAnalysis {
            frame_index,
            mask,
            shape,
            classification,
            decision,
            event,
        })
    }

    /// Number of non-empty frames processed so far.
    pub fn frames_processed(&self) -> u64 {
        self.frame_counter
    }

    pub fn previous_centroid(&self) -> Option<Centroid> {
        self.motion.previous_centroid()
    }

    pub fn debounce_state(&self) -> &DebounceState {
        self.debouncer.state()
    }
}
