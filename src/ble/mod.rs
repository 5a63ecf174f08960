//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Server** - one custom service with three characteristics:
//!    motion (notify), toggle mirror (read) and control (write /
//!    write-without-response).
//! 2. **Command parser** - decodes raw control writes.
//! 3. **Connection tracker** - Disconnected / Advertising / Connected,
//!    re-advertising automatically after every disconnect.
//! 4. **Peripheral task** - advertises when asked, serves GATT while a
//!    central is connected, and forwards motion edges as notifications.
//!
//! The control loop talks to this task through the statics declared in
//! `main.rs` (advertise signal, motion-edge channel) and the shared
//! `NodeContext`.

pub mod command;
pub mod connection;
pub mod peripheral;
pub mod server;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::config::MOTION_EDGE_QUEUE;
use crate::sensor::motion::MotionEdge;
use connection::Advertiser;

/// Raised whenever the tracker enters `Advertising`.
pub type AdvertiseSignal = Signal<CriticalSectionRawMutex, ()>;

/// Motion edges waiting to be notified to the connected central.
pub type MotionChannel = Channel<CriticalSectionRawMutex, MotionEdge, MOTION_EDGE_QUEUE>;

/// [`Advertiser`] that wakes the peripheral task instead of touching the
/// radio directly, so tracker transitions never wait on the SoftDevice.
pub struct SignalAdvertiser(pub &'static AdvertiseSignal);

impl Advertiser for SignalAdvertiser {
    fn start_advertisement(&self) {
        self.0.signal(());
    }
}
