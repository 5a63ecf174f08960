//! Sensor inputs: LDR on the SAADC, PIR output, push button.

pub mod light;
pub mod motion;

use embassy_nrf::gpio::Input;
use embassy_nrf::saadc::Saadc;

use crate::control_logic::Samples;
use light::LightLevel;

pub struct Sensors<'d> {
    adc: Saadc<'d, 1>,
    /// Active-low with pull-up.
    button: Input<'d>,
    pir: Input<'d>,
}

impl<'d> Sensors<'d> {
    pub fn new(adc: Saadc<'d, 1>, button: Input<'d>, pir: Input<'d>) -> Self {
        Self { adc, button, pir }
    }

    /// Offset calibration; run once before the first sample.
    pub async fn calibrate(&mut self) {
        self.adc.calibrate().await;
    }

    pub async fn sample(&mut self) -> Samples {
        let mut buf = [0i16; 1];
        self.adc.sample(&mut buf).await;
        Samples {
            light: LightLevel::from_saadc(buf[0]),
            button_pressed: self.button.is_low(),
            motion: self.pir.is_high(),
        }
    }
}
