//! Peripheral connection state machine.
//!
//! ```text
//!  Disconnected --start_advertising--> Advertising --on_connect--> Connected
//!        ^                                                            |
//!        +----------------------- on_disconnect ----------------------+
//!                    (immediately re-enters Advertising)
//! ```
//!
//! The state is written by the BLE task and read by the control loop, so
//! it lives in an atomic.  Every transition is a single compare-exchange
//! plus a non-blocking request to the radio.

use core::sync::atomic::{AtomicU8, Ordering};

/// Link state as seen by this node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Advertising = 1,
    Connected = 2,
}

impl ConnectionState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => ConnectionState::Advertising,
            2 => ConnectionState::Connected,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Radio side of `start_advertising`. Must return without waiting for
/// the advertisement to actually go out.
pub trait Advertiser {
    fn start_advertisement(&self);
}

/// Tracks [`ConnectionState`]; initial state is `Disconnected`.
pub struct ConnectionTracker {
    state: AtomicU8,
}

impl ConnectionTracker {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Disconnected as u8),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_raw(self.state.load(Ordering::Acquire))
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Disconnected → Advertising, asking the radio to advertise.
    ///
    /// Returns `false` (and leaves the radio alone) from any other state.
    pub fn start_advertising<A: Advertiser + ?Sized>(&self, radio: &A) -> bool {
        if self.transition(ConnectionState::Disconnected, ConnectionState::Advertising) {
            radio.start_advertisement();
            true
        } else {
            false
        }
    }

    /// Advertising → Connected.
    pub fn on_connect(&self) -> bool {
        self.transition(ConnectionState::Advertising, ConnectionState::Connected)
    }

    /// Connected → Disconnected, then straight back to Advertising.
    pub fn on_disconnect<A: Advertiser + ?Sized>(&self, radio: &A) -> bool {
        if !self.transition(ConnectionState::Connected, ConnectionState::Disconnected) {
            return false;
        }
        self.start_advertising(radio)
    }

    fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
