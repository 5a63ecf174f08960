//! Three-pin RGB LED driver.
//!
//! Generic over `embedded_hal::digital::OutputPin` so the same code drives
//! Embassy `Output`s on target and recording pins in tests.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

use crate::led::mapper::Rgb;

pub struct RgbLed<P> {
    red: P,
    green: P,
    blue: P,
    active_low: bool,
}

impl<P: OutputPin> RgbLed<P> {
    /// Wrap the three pins. The LED is switched off immediately.
    pub fn new(red: P, green: P, blue: P, active_low: bool) -> Result<Self, P::Error> {
        let mut led = Self {
            red,
            green,
            blue,
            active_low,
        };
        led.set(Rgb::OFF)?;
        Ok(led)
    }

    pub fn set(&mut self, color: Rgb) -> Result<(), P::Error> {
        let active_low = self.active_low;
        drive(&mut self.red, color.red, active_low)?;
        drive(&mut self.green, color.green, active_low)?;
        drive(&mut self.blue, color.blue, active_low)
    }
}

impl<P: OutputPin<Error = Infallible>> RgbLed<P> {
    /// `set` for pins that cannot fail, such as Embassy GPIO outputs.
    pub fn show(&mut self, color: Rgb) {
        self.set(color).unwrap_or_else(|never| match never {})
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool, active_low: bool) -> Result<(), P::Error> {
    if on != active_low {
        pin.set_high()
    } else {
        pin.set_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct MockPin {
        high: Option<bool>,
        writes: usize,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = Some(false);
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = Some(true);
            self.writes += 1;
            Ok(())
        }
    }

    fn levels(led: &RgbLed<MockPin>) -> [Option<bool>; 3] {
        [led.red.high, led.green.high, led.blue.high]
    }

    #[test]
    fn starts_off_active_high() {
        let led = RgbLed::new(MockPin::default(), MockPin::default(), MockPin::default(), false)
            .unwrap();
        assert_eq!(levels(&led), [Some(false); 3]);
    }

    #[test]
    fn starts_off_active_low() {
        let led =
            RgbLed::new(MockPin::default(), MockPin::default(), MockPin::default(), true).unwrap();
        assert_eq!(levels(&led), [Some(true); 3]);
    }

    #[test]
    fn active_high_colour() {
        let mut led = RgbLed::new(MockPin::default(), MockPin::default(), MockPin::default(), false)
            .unwrap();
        led.set(Rgb::BLUE).unwrap();
        assert_eq!(levels(&led), [Some(false), Some(false), Some(true)]);
    }

    #[test]
    fn active_low_colour_is_inverted() {
        let mut led =
            RgbLed::new(MockPin::default(), MockPin::default(), MockPin::default(), true).unwrap();
        led.set(Rgb::YELLOW).unwrap();
        assert_eq!(levels(&led), [Some(false), Some(false), Some(true)]);
    }

    #[test]
    fn every_set_drives_all_three_pins() {
        let mut led = RgbLed::new(MockPin::default(), MockPin::default(), MockPin::default(), false)
            .unwrap();
        led.set(Rgb::WHITE).unwrap();
        led.set(Rgb::WHITE).unwrap();
        assert_eq!(led.red.writes, 3);
        assert_eq!(led.green.writes, 3);
        assert_eq!(led.blue.writes, 3);
    }

    #[test]
    fn show_matches_set() {
        let mut led =
            RgbLed::new(MockPin::default(), MockPin::default(), MockPin::default(), true).unwrap();
        led.show(Rgb::RED);
        assert_eq!(levels(&led), [Some(false), Some(true), Some(true)]);
        led.show(Rgb::OFF);
        assert_eq!(levels(&led), [Some(true); 3]);
    }
}
