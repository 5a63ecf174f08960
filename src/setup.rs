//! Bring-up steps guarded by the status LED.
//!
//! The error colour is lit before a step runs and cleared only once it
//! succeeds. A step that panics (the SoftDevice enable path does, through
//! panic-probe) therefore halts with the error colour latched on the pins.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

use crate::error::{Error, SetupError};
use crate::led::mapper::{Rgb, ERROR_COLOR};
use crate::led::rgb::RgbLed;

/// Run one fatal bring-up step.
///
/// On failure the status LED is left in the error colour and the step is
/// reported as [`Error::Setup`]. The caller logs the step-specific cause
/// inside `run`.
pub fn guarded<P, T, E>(
    status: &mut RgbLed<P>,
    step: SetupError,
    run: impl FnOnce() -> Result<T, E>,
) -> Result<T, Error>
where
    P: OutputPin<Error = Infallible>,
{
    status.show(ERROR_COLOR);
    let value = run().map_err(|_| Error::from(step))?;
    status.show(Rgb::OFF);
    Ok(value)
}
