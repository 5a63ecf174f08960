//! Per-tick control logic, independent of the hardware.
//!
//! A tick is split in two so the caller can sample (asynchronously, on
//! target) between them:
//!
//! 1. [`Controller::flush`] - publish a pending toggle mirror.
//! 2. caller samples light, button and PIR.
//! 3. [`Controller::step`] - status LED, motion edge, actuator LED.

use crate::ble::connection::ConnectionState;
use crate::error::Error;
use crate::led::mapper::{self, Rgb, ERROR_COLOR};
use crate::sensor::light::LightLevel;
use crate::sensor::motion::{MotionDebouncer, MotionEdge};
use crate::state::NodeContext;

/// One tick's worth of sensor readings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Samples {
    pub light: LightLevel,
    /// Logged only; has no effect on state.
    pub button_pressed: bool,
    pub motion: bool,
}

/// Outputs the control loop drives.
pub trait NodeIo {
    /// Store the toggle mirror in the peer-readable characteristic.
    fn publish_toggle(&mut self, value: u8) -> Result<(), Error>;
    /// Queue a motion notification for the peer.
    fn notify_motion(&mut self, edge: MotionEdge);
    fn drive_status(&mut self, color: Rgb);
    fn drive_actuator(&mut self, color: Rgb);
}

/// What `step` did, for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    Ran {
        link: ConnectionState,
        edge: Option<MotionEdge>,
        actuator: Rgb,
    },
    /// A fatal setup error was reported; outputs show the error state.
    Halted(Error),
}

pub struct Controller<'a> {
    ctx: &'a NodeContext,
    motion: MotionDebouncer,
}

impl<'a> Controller<'a> {
    pub fn new(ctx: &'a NodeContext) -> Self {
        Self {
            ctx,
            motion: MotionDebouncer::new(),
        }
    }

    /// Publish the toggle mirror if the write callback changed it.
    ///
    /// Returns the published byte.  On failure the flag is re-armed so
    /// the next tick tries again.
    pub fn flush<IO: NodeIo>(&self, io: &mut IO) -> Result<Option<u8>, Error> {
        let Some(value) = self.ctx.toggle.take_pending() else {
            return Ok(None);
        };
        match io.publish_toggle(value) {
            Ok(()) => Ok(Some(value)),
            Err(e) => {
                self.ctx.toggle.retry_pending();
                Err(e)
            }
        }
    }

    /// Drive the status LED from the link state, or show the error state
    /// if a setup failure was reported.
    ///
    /// Also used before the first tick, while the PIR sensor warms up.
    pub fn show_status<IO: NodeIo>(&self, io: &mut IO) -> Result<ConnectionState, Error> {
        if let Some(err) = self.ctx.fault() {
            io.drive_actuator(Rgb::OFF);
            io.drive_status(ERROR_COLOR);
            return Err(err);
        }

        let link = self.ctx.connection.state();
        io.drive_status(mapper::status_color(link));
        Ok(link)
    }

    pub fn step<IO: NodeIo>(&mut self, samples: Samples, io: &mut IO) -> StepOutcome {
        let link = match self.show_status(io) {
            Ok(link) => link,
            Err(err) => return StepOutcome::Halted(err),
        };

        let edge = self.motion.update(samples.motion);
        if let Some(edge) = edge {
            io.notify_motion(edge);
        }

        let actuator = mapper::compute(
            self.ctx.toggle.enabled(),
            self.motion.current(),
            samples.light,
        );
        io.drive_actuator(actuator);

        StepOutcome::Ran {
            link,
            edge,
            actuator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::command::Command;
    use crate::ble::connection::Advertiser;
    use crate::error::SetupError;

    #[derive(Default)]
    struct RecordingIo {
        published: Vec<u8>,
        notified: Vec<MotionEdge>,
        status: Option<Rgb>,
        actuator: Option<Rgb>,
        fail_publish: bool,
    }

    impl NodeIo for RecordingIo {
        fn publish_toggle(&mut self, value: u8) -> Result<(), Error> {
            if self.fail_publish {
                return Err(Error::CharacteristicUpdate);
            }
            self.published.push(value);
            Ok(())
        }

        fn notify_motion(&mut self, edge: MotionEdge) {
            self.notified.push(edge);
        }

        fn drive_status(&mut self, color: Rgb) {
            self.status = Some(color);
        }

        fn drive_actuator(&mut self, color: Rgb) {
            self.actuator = Some(color);
        }
    }

    struct NullRadio;

    impl Advertiser for NullRadio {
        fn start_advertisement(&self) {}
    }

    fn samples(light: u16, motion: bool) -> Samples {
        Samples {
            light: LightLevel(light),
            button_pressed: false,
            motion,
        }
    }

    #[test]
    fn flush_is_noop_when_clean() {
        let ctx = NodeContext::new(true);
        let controller = Controller::new(&ctx);
        let mut io = RecordingIo::default();
        assert_eq!(controller.flush(&mut io), Ok(None));
        assert!(io.published.is_empty());
    }

    #[test]
    fn flush_publishes_once() {
        let ctx = NodeContext::new(true);
        let controller = Controller::new(&ctx);
        let mut io = RecordingIo::default();

        ctx.toggle.apply(Command::SetOff);
        assert_eq!(controller.flush(&mut io), Ok(Some(0)));
        assert_eq!(controller.flush(&mut io), Ok(None));
        assert_eq!(io.published, [0]);
    }

    #[test]
    fn failed_publish_is_retried_next_tick() {
        let ctx = NodeContext::new(false);
        let controller = Controller::new(&ctx);
        let mut io = RecordingIo {
            fail_publish: true,
            ..Default::default()
        };

        ctx.toggle.apply(Command::SetOn);
        assert_eq!(controller.flush(&mut io), Err(Error::CharacteristicUpdate));
        assert!(ctx.toggle.is_dirty());

        io.fail_publish = false;
        assert_eq!(controller.flush(&mut io), Ok(Some(1)));
        assert!(!ctx.toggle.is_dirty());
    }

    #[test]
    fn status_follows_link_state() {
        let ctx = NodeContext::new(true);
        let mut controller = Controller::new(&ctx);
        let mut io = RecordingIo::default();

        controller.step(samples(0, false), &mut io);
        assert_eq!(io.status, Some(Rgb::YELLOW));

        ctx.connection.start_advertising(&NullRadio);
        controller.step(samples(0, false), &mut io);
        assert_eq!(io.status, Some(Rgb::GREEN));

        ctx.connection.on_connect();
        controller.step(samples(0, false), &mut io);
        assert_eq!(io.status, Some(Rgb::BLUE));
    }

    #[test]
    fn steady_motion_notifies_once() {
        let ctx = NodeContext::new(true);
        let mut controller = Controller::new(&ctx);
        let mut io = RecordingIo::default();

        for _ in 0..4 {
            controller.step(samples(10_000, true), &mut io);
            assert_eq!(io.actuator, Some(Rgb::WHITE));
        }
        assert_eq!(io.notified, [MotionEdge::Started]);
    }

    #[test]
    fn disabled_toggle_still_reports_motion() {
        let ctx = NodeContext::new(false);
        let mut controller = Controller::new(&ctx);
        let mut io = RecordingIo::default();

        let outcome = controller.step(samples(60_000, true), &mut io);
        assert_eq!(
            outcome,
            StepOutcome::Ran {
                link: ConnectionState::Disconnected,
                edge: Some(MotionEdge::Started),
                actuator: Rgb::OFF,
            }
        );
        assert_eq!(io.notified, [MotionEdge::Started]);
    }

    #[test]
    fn fault_halts_with_error_colour() {
        let ctx = NodeContext::new(true);
        let mut controller = Controller::new(&ctx);
        let mut io = RecordingIo::default();

        ctx.fail(SetupError::StartAdvertisement);
        assert_eq!(
            controller.step(samples(0, true), &mut io),
            StepOutcome::Halted(Error::Setup(SetupError::StartAdvertisement))
        );
        assert_eq!(io.status, Some(ERROR_COLOR));
        assert_eq!(io.actuator, Some(Rgb::OFF));
        assert!(io.notified.is_empty());
    }

    #[test]
    fn status_shown_before_first_tick() {
        let ctx = NodeContext::new(true);
        let controller = Controller::new(&ctx);
        let mut io = RecordingIo::default();

        ctx.connection.start_advertising(&NullRadio);
        assert_eq!(controller.show_status(&mut io), Ok(ConnectionState::Advertising));
        assert_eq!(io.status, Some(Rgb::GREEN));
        // Warm-up leaves the actuator alone.
        assert_eq!(io.actuator, None);
        assert!(io.published.is_empty());
    }

    #[test]
    fn advertise_fault_shows_during_warm_up() {
        let ctx = NodeContext::new(true);
        let controller = Controller::new(&ctx);
        let mut io = RecordingIo::default();

        ctx.fail(SetupError::StartAdvertisement);
        assert_eq!(
            controller.show_status(&mut io),
            Err(Error::Setup(SetupError::StartAdvertisement))
        );
        assert_eq!(io.status, Some(ERROR_COLOR));
        assert_eq!(io.actuator, Some(Rgb::OFF));
    }
}
