// THEORY:
// The `Debouncer` is the only stage with a sense of time. Upstream, every frame yields a
// raw label; a held hand would repeat the same label thirty times a second, and a hand
// in transit can flip between labels on consecutive frames. Downstream consumers want
// neither. The debouncer turns the per-frame stream into edge-triggered, rate-limited
// events:
// - `NONE` is never delivered.
// - A label equal to the last delivered one is a repeat and is swallowed.
// - Nothing at all is delivered within `cooldown` of the previous delivery, whatever
//   the label.
// State changes only on delivery, so a suppressed label is simply re-evaluated on the
// next frame.

use crate::core_modules::gesture::GestureLabel;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// What the debouncer remembers between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebounceState {
    pub last_emitted: GestureLabel,
    /// `None` until something has been delivered (or a start time was given).
    pub last_emission: Option<Instant>,
}

/// The outcome of presenting one label to the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceDecision {
    Emitted(GestureLabel),
    /// The label was `NONE`.
    Idle,
    /// The label equals the last delivered one.
    Repeat,
    /// A new label arrived inside the cooldown window.
    CoolingDown { remaining: Duration },
}

impl DebounceDecision {
    pub fn emitted(&self) -> Option<GestureLabel> {
        match self {
            Self::Emitted(label) => Some(*label),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    cooldown: Duration,
    state: DebounceState,
}

impl Debouncer {
    /// A debouncer with no history: the first non-`NONE` label is delivered immediately.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            state: DebounceState::default(),
        }
    }

    /// A debouncer whose cooldown window opens at `started`, as if `NONE` had been
    /// delivered then.
    pub fn starting_at(cooldown: Duration, started: Instant) -> Self {
        Self {
            cooldown,
            state: DebounceState {
                last_emitted: GestureLabel::None,
                last_emission: Some(started),
            },
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    /// Evaluates one frame's resolved label at time `now`.
    pub fn decide(&mut self, label: GestureLabel, now: Instant) -> DebounceDecision {
        if label.is_none() {
            trace!("debounce: idle");
            return DebounceDecision::Idle;
        }
        if label == self.state.last_emitted {
            trace!(%label, "debounce: repeat");
            return DebounceDecision::Repeat;
        }
        if let Some(last) = self.state.last_emission {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.cooldown {
                let remaining = self.cooldown - elapsed;
                debug!(%label, ?remaining, "debounce: suppressed inside cooldown");
                return DebounceDecision::CoolingDown { remaining };
            }
        }

        self.state = DebounceState {
            last_emitted: label,
            last_emission: Some(now),
        };
        debug!(%label, "debounce: emitted");
        DebounceDecision::Emitted(label)
    }

    /// Shorthand for `decide(..).emitted()`.
    pub fn observe(&mut self, label: GestureLabel, now: Instant) -> Option<GestureLabel> {
        self.decide(label, now).emitted()
    }
}
