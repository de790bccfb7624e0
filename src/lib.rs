// THEORY:
// This file is the main entry point for the `gesture_vision` library crate.
// It exports the `GesturePipeline` and its associated data structures
// (`PipelineConfig`, `FrameAnalysis`, `GestureEvent`, ...) as the high-level interface
// for the gesture engine, the `CameraPool` for running several cameras at once, and the
// sinks that carry events to a consumer.
//
// The individual stages live in `core_modules` and stay public so a caller can swap
// in its own `Segmenter` or `FingerCounter`, or run a single stage in isolation.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod sink;

pub use crate::config::PipelineConfig;
pub use crate::core_modules::frame::Frame;
pub use crate::core_modules::gesture::{GestureEvent, GestureLabel};
pub use crate::error::{Result, VisionError};
pub use crate::parallel_pipeline::{CameraEvent, CameraId, CameraPool};
pub use crate::pipeline::{FrameAnalysis, GesturePipeline};
pub use crate::sink::{ChannelSink, GestureSink, LineSink};
