// THEORY:
// `GestureLabel` is the closed vocabulary every later stage speaks. The names are the
// wire format: a downstream consumer reads exactly these strings, one per line.
// `None` is a real member of the enumeration (a frame can legitimately classify as
// "nothing"), but it is never delivered as an event.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureLabel {
    #[default]
    None,
    ZoomIn,
    ZoomOut,
    RotateLeft,
    RotateRight,
    RotateUp,
    RotateDown,
}

impl GestureLabel {
    pub const ALL: [GestureLabel; 7] = [
        GestureLabel::None,
        GestureLabel::ZoomIn,
        GestureLabel::ZoomOut,
        GestureLabel::RotateLeft,
        GestureLabel::RotateRight,
        GestureLabel::RotateUp,
        GestureLabel::RotateDown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::ZoomIn => "ZOOM_IN",
            Self::ZoomOut => "ZOOM_OUT",
            Self::RotateLeft => "ROTATE_LEFT",
            Self::RotateRight => "ROTATE_RIGHT",
            Self::RotateUp => "ROTATE_UP",
            Self::RotateDown => "ROTATE_DOWN",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gesture label: {0}")]
pub struct UnknownGesture(pub String);

impl FromStr for GestureLabel {
    type Err = UnknownGesture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GestureLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s.trim())
            .ok_or_else(|| UnknownGesture(s.to_string()))
    }
}

/// A debounced gesture, as delivered to a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub label: GestureLabel,
    /// When the cycle that produced this event was observed.
    pub timestamp: Instant,
    /// Index of the frame that produced this event, counted from the pipeline's start.
    pub frame_index: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_display_and_parse() {
        for label in GestureLabel::ALL {
            assert_eq!(label.to_string().parse::<GestureLabel>(), Ok(label));
        }
        assert_eq!(GestureLabel::RotateDown.to_string(), "ROTATE_DOWN");
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!("zoom_in".parse::<GestureLabel>().is_err());

        let err = "WAVE".parse::<GestureLabel>().unwrap_err();
        assert_eq!(err, UnknownGesture("WAVE".to_string()));
        assert_eq!(err.to_string(), "unknown gesture label: WAVE");

        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&GestureLabel::ZoomIn).expect("serialize");
        assert_eq!(json, "\"ZOOM_IN\"");
    }
}
