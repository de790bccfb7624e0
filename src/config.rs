// THEORY:
// Every threshold in the engine is configuration, never a literal buried in a stage.
// `PipelineConfig` gathers them in one serializable struct whose `Default` reproduces
// the tuned values the detector ships with, so a JSON file only needs to name the fields
// it overrides. `validate` is the single gate between untrusted input and the stages;
// once a config passes, construction of the pipeline cannot fail.

use crate::core_modules::finger_counter::FingerCountParams;
use crate::core_modules::segmenter::SkinThresholds;
use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the GesturePipeline, allowing for tunable behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Inclusive HSV range accepted as skin. Hue is in half-degrees (0..=179).
    pub skin: SkinThresholds,
    /// Radius of the disk used for the morphological open and close.
    pub morphology_radius: u8,
    /// Regions with a smaller enclosed area are not hands.
    pub min_hand_area: f64,
    pub min_contour_points: usize,
    /// Defects must be deeper than this to be considered at all.
    pub defect_depth_gate: f64,
    /// ...and deeper than this, with an acute enough angle, to count as a finger gap.
    pub finger_gap_depth: f64,
    pub finger_gap_max_angle: f64,
    /// Centroid displacement, in pixels per frame, that counts as deliberate motion.
    pub motion_threshold: f64,
    /// Minimum gap between two emitted gestures.
    pub cooldown_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let params = FingerCountParams::default();
        Self {
            skin: SkinThresholds::default(),
            morphology_radius: 4,
            min_hand_area: 5000.0,
            min_contour_points: params.min_contour_points,
            defect_depth_gate: params.defect_depth_gate,
            finger_gap_depth: params.finger_gap_depth,
            finger_gap_max_angle: params.finger_gap_max_angle,
            motion_threshold: 30.0,
            cooldown_ms: 500,
        }
    }
}

impl PipelineConfig {
    /// Reads a (possibly partial) JSON config and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.skin.validate()?;

        if self.min_contour_points == 0 {
            return Err(VisionError::InvalidConfig(
                "min_contour_points must be at least 1".to_string(),
            ));
        }

        let thresholds = [
            ("min_hand_area", self.min_hand_area),
            ("defect_depth_gate", self.defect_depth_gate),
            ("finger_gap_depth", self.finger_gap_depth),
            ("finger_gap_max_angle", self.finger_gap_max_angle),
            ("motion_threshold", self.motion_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(VisionError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn finger_count_params(&self) -> FingerCountParams {
        FingerCountParams {
            min_contour_points: self.min_contour_points,
            defect_depth_gate: self.defect_depth_gate,
            finger_gap_depth: self.finger_gap_depth,
            finger_gap_max_angle: self.finger_gap_max_angle,
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_tuned_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.morphology_radius, 4);
        assert_eq!(config.min_hand_area, 5000.0);
        assert_eq!(config.min_contour_points, 10);
        assert_eq!(config.defect_depth_gate, 20.0);
        assert_eq!(config.finger_gap_depth, 30.0);
        assert_eq!(config.finger_gap_max_angle, 90.0);
        assert_eq!(config.motion_threshold, 30.0);
        assert_eq!(config.cooldown(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config =
            PipelineConfig::from_json_str(r#"{ "cooldown_ms": 250, "motion_threshold": 12.5 }"#)
                .expect("valid config");
        assert_eq!(config.cooldown_ms, 250);
        assert_eq!(config.motion_threshold, 12.5);
        assert_eq!(config.skin, SkinThresholds::default());
        assert_eq!(config.min_hand_area, 5000.0);
    }

    #[test]
    fn skin_range_can_be_overridden() {
        let json = r#"{
            "skin": {
                "lower": { "hue": 2, "saturation": 40, "value": 50 },
                "upper": { "hue": 25, "saturation": 170, "value": 250 }
            }
        }"#;
        let config = PipelineConfig::from_json_str(json).expect("valid config");
        assert_eq!(config.skin.lower.hue, 2);
        assert_eq!(config.skin.upper.saturation, 170);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = PipelineConfig {
            finger_gap_depth: 42.0,
            ..PipelineConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(PipelineConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let result = PipelineConfig::from_json_str("{ cooldown_ms: 1 ");
        assert!(matches!(result, Err(VisionError::Json(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let broken = [
            PipelineConfig {
                min_contour_points: 0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                motion_threshold: -1.0,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                finger_gap_max_angle: f64::NAN,
                ..PipelineConfig::default()
            },
            PipelineConfig {
                min_hand_area: f64::INFINITY,
                ..PipelineConfig::default()
            },
        ];
        for config in broken {
            assert!(
                matches!(config.validate(), Err(VisionError::InvalidConfig(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn defect_gates_need_not_be_ordered() {
        let config = PipelineConfig {
            defect_depth_gate: 40.0,
            finger_gap_depth: 10.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = PipelineConfig::from_json_file("/definitely/not/here/config.json");
        assert!(matches!(result, Err(VisionError::Io(_))));
    }

    #[test]
    fn finger_params_follow_config() {
        let config = PipelineConfig {
            finger_gap_max_angle: 75.0,
            ..PipelineConfig::default()
        };
        let params = config.finger_count_params();
        assert_eq!(params.finger_gap_max_angle, 75.0);
        assert_eq!(params.min_contour_points, 10);
    }
}
