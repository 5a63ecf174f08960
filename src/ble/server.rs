//! GATT server - the sensor service and its write routing.
//!
//! The service is declared with `#[nrf_softdevice::gatt_service]`, but the
//! server trait is implemented by hand: the generated one decodes control
//! writes into the attribute type and drops the write offset, which the
//! command grammar needs.

use nrf_softdevice::ble::gatt_server::{self, RegisterError, Service as _, WriteOp};
use nrf_softdevice::ble::Connection;
use nrf_softdevice::Softdevice;

use crate::ble::command::{self, Command};
use crate::config::CONTROL_MAX_LEN;

/// Sensor service. UUID must stay in sync with
/// `config::SENSOR_SERVICE_UUID`.
#[nrf_softdevice::gatt_service(uuid = "7b1e0001-4c2d-4f1a-9e37-5a0c3d2b1f00")]
pub struct SensorService {
    /// Motion edges: `1` = started, `0` = stopped.
    #[characteristic(uuid = "7b1e0002-4c2d-4f1a-9e37-5a0c3d2b1f00", notify)]
    pub motion: u8,

    /// Mirror of the toggle, `0` / `1`.
    #[characteristic(uuid = "7b1e0003-4c2d-4f1a-9e37-5a0c3d2b1f00", read)]
    pub toggle: u8,

    /// Control writes; see `ble::command` for the grammar.
    #[characteristic(
        uuid = "7b1e0004-4c2d-4f1a-9e37-5a0c3d2b1f00",
        write,
        write_without_response
    )]
    pub control: heapless::Vec<u8, CONTROL_MAX_LEN>,
}

pub struct Server {
    pub sensor: SensorService,
}

impl Server {
    pub fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        Ok(Self {
            sensor: SensorService::new(sd)?,
        })
    }
}

pub enum ServerEvent {
    /// Decoded control write, delivered from the write callback.
    Control(Command),
    /// Anything else the service reports (CCCD writes).
    Sensor(SensorServiceEvent),
}

impl gatt_server::Server for Server {
    type Event = ServerEvent;

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        offset: usize,
        data: &[u8],
    ) -> Option<Self::Event> {
        if handle == self.sensor.control_value_handle {
            return Some(ServerEvent::Control(command::parse(offset, data)));
        }
        self.sensor.on_write(handle, data).map(ServerEvent::Sensor)
    }
}
