//! Control loop task - samples sensors and drives LEDs every tick.
//!
//! The decisions live in `control_logic`; this module binds them to the
//! board: SAADC + GPIO inputs, the two RGB LEDs, the read characteristic
//! and the motion-edge channel towards the BLE task.

use defmt::{debug, error, info, warn};
use embassy_nrf::gpio::Output;
use embassy_time::{Duration, Instant, Ticker};

use crate::ble::server::Server;
use crate::ble::MotionChannel;
use crate::config::{PIR_WARMUP_SECS, TICK_PERIOD_MS};
use crate::control_logic::{Controller, NodeIo, StepOutcome};
use crate::error::Error;
use crate::led::mapper::Rgb;
use crate::led::rgb::RgbLed;
use crate::sensor::motion::MotionEdge;
use crate::sensor::Sensors;
use crate::state::NodeContext;

pub type BoardLed = RgbLed<Output<'static>>;

/// Board-side outputs of the control loop.
pub struct BoardIo {
    pub server: &'static Server,
    pub ctx: &'static NodeContext,
    pub motion_edges: &'static MotionChannel,
    pub status: BoardLed,
    pub actuator: BoardLed,
}

impl NodeIo for BoardIo {
    fn publish_toggle(&mut self, value: u8) -> Result<(), Error> {
        self.server.sensor.toggle_set(&value).map_err(|e| {
            warn!("toggle_set: {:?}", e);
            Error::CharacteristicUpdate
        })
    }

    fn notify_motion(&mut self, edge: MotionEdge) {
        if !self.ctx.connection.is_connected() {
            return;
        }
        // try_send keeps the loop non-blocking; if the BLE task is behind, we drop.
        if self.motion_edges.try_send(edge).is_err() {
            warn!("motion edge channel full - dropping {}", edge);
        }
    }

    fn drive_status(&mut self, color: Rgb) {
        self.status.show(color);
    }

    fn drive_actuator(&mut self, color: Rgb) {
        self.actuator.show(color);
    }
}

/// Status-only refresh for the ticks before sampling starts.
async fn show_status(controller: &Controller<'_>, io: &mut BoardIo) {
    if let Err(e) = controller.show_status(io) {
        error!("{} - control loop halted", e);
        crate::park().await
    }
}

pub async fn run(ctx: &'static NodeContext, mut sensors: Sensors<'static>, mut io: BoardIo) -> ! {
    let mut controller = Controller::new(ctx);
    let mut ticker = Ticker::every(Duration::from_millis(TICK_PERIOD_MS));

    show_status(&controller, &mut io).await;
    sensors.calibrate().await;

    info!("waiting {} s for PIR warm-up", PIR_WARMUP_SECS);
    let ready = Instant::now() + Duration::from_secs(PIR_WARMUP_SECS);
    while Instant::now() < ready {
        ticker.next().await;
        show_status(&controller, &mut io).await;
    }
    info!("PIR sensor ready");

    loop {
        match controller.flush(&mut io) {
            Ok(Some(value)) => info!("toggle mirror published: {}", value),
            Ok(None) => {}
            Err(e) => warn!("{} - retrying next tick", e),
        }

        let samples = sensors.sample().await;
        debug!("light: {}", samples.light.0);
        if samples.button_pressed {
            info!("button pressed");
        }

        match controller.step(samples, &mut io) {
            StepOutcome::Ran {
                edge: Some(edge),
                actuator,
                ..
            } => info!("motion {} - led {}", edge, actuator),
            StepOutcome::Ran { .. } => {}
            StepOutcome::Halted(e) => {
                error!("{} - control loop halted", e);
                crate::park().await
            }
        }

        ticker.next().await;
    }
}
