//! PIR edge detection.
//!
//! Feed exactly one raw sample per control-loop tick; only changes
//! between consecutive samples produce an edge.

/// Transition of the PIR output between two ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionEdge {
    Started,
    Stopped,
}

impl MotionEdge {
    /// One-byte payload sent on the motion characteristic.
    pub fn notify_byte(self) -> u8 {
        match self {
            MotionEdge::Started => 1,
            MotionEdge::Stopped => 0,
        }
    }
}

/// Current and previous PIR sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct MotionDebouncer {
    current: bool,
    last: bool,
}

impl MotionDebouncer {
    pub const fn new() -> Self {
        Self {
            current: false,
            last: false,
        }
    }

    /// Whether motion was present at the latest sample.
    pub fn current(&self) -> bool {
        self.current
    }

    pub fn update(&mut self, raw: bool) -> Option<MotionEdge> {
        self.current = raw;
        if self.current == self.last {
            return None;
        }
        self.last = self.current;
        Some(if self.current {
            MotionEdge::Started
        } else {
            MotionEdge::Stopped
        })
    }
}
