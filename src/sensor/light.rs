//! Ambient light level and its colour tiers.

use crate::config::{ADC_RESOLUTION_BITS, LIGHT_HIGH_THRESHOLD, LIGHT_MID_THRESHOLD};

/// Raw light sample scaled to the full 16-bit range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightLevel(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightTier {
    High,
    Mid,
    Low,
}

impl LightLevel {
    /// Convert a single-ended SAADC result.
    ///
    /// Single-ended conversions can read slightly below zero near ground;
    /// those clamp to 0.
    pub fn from_saadc(raw: i16) -> Self {
        let full_scale = ((1u16 << ADC_RESOLUTION_BITS) - 1) as i16;
        let clamped = raw.clamp(0, full_scale) as u16;
        LightLevel(clamped << (16 - ADC_RESOLUTION_BITS as u32))
    }

    pub fn tier(self) -> LightTier {
        if self.0 > LIGHT_HIGH_THRESHOLD {
            LightTier::High
        } else if self.0 > LIGHT_MID_THRESHOLD {
            LightTier::Mid
        } else {
            LightTier::Low
        }
    }
}
