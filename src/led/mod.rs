//! LED outputs.
//!
//! Two RGB LEDs: the external actuator LED (driven by toggle, motion and
//! light) and the on-board status LED (driven by the link state).

pub mod mapper;
pub mod rgb;
