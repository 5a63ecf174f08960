//! Colour selection for the actuator LED and the status LED.
//!
//! Actuator priority, highest first:
//!   1. toggle disabled        -> off
//!   2. motion present         -> white
//!   3. light tier High/Mid/Low -> blue / green / red

use crate::ble::connection::ConnectionState;
use crate::sensor::light::{LightLevel, LightTier};

/// Three independent LED channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(false, false, false);
    pub const WHITE: Rgb = Rgb::new(true, true, true);
    pub const RED: Rgb = Rgb::new(true, false, false);
    pub const GREEN: Rgb = Rgb::new(false, true, false);
    pub const BLUE: Rgb = Rgb::new(false, false, true);
    pub const YELLOW: Rgb = Rgb::new(true, true, false);

    pub const fn new(red: bool, green: bool, blue: bool) -> Self {
        Self { red, green, blue }
    }
}

/// Status LED colour once a setup step has failed.
pub const ERROR_COLOR: Rgb = Rgb::RED;

/// Actuator output for the current toggle, motion and light readings.
pub fn compute(enabled: bool, motion: bool, light: LightLevel) -> Rgb {
    if !enabled {
        return Rgb::OFF;
    }
    if motion {
        return Rgb::WHITE;
    }
    match light.tier() {
        LightTier::High => Rgb::BLUE,
        LightTier::Mid => Rgb::GREEN,
        LightTier::Low => Rgb::RED,
    }
}

/// Status LED colour for the link state.
pub fn status_color(state: ConnectionState) -> Rgb {
    match state {
        ConnectionState::Connected => Rgb::BLUE,
        ConnectionState::Advertising => Rgb::GREEN,
        ConnectionState::Disconnected => Rgb::YELLOW,
    }
}
