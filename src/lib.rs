//! Test-only library interface for lightwatch.
//!
//! This module re-exports the pure logic modules that can be tested
//! on the host (no embedded hardware required).
//!
//! Usage: `cargo test --lib`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! This lib.rs provides a separate entry point for host-based testing.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control_logic;
pub mod error;
pub mod state;

// Internal module paths for the actual implementations
#[path = "ble/command.rs"]
mod ble_command_impl;
#[path = "ble/connection.rs"]
mod ble_connection_impl;

#[path = "sensor/light.rs"]
mod sensor_light_impl;
#[path = "sensor/motion.rs"]
mod sensor_motion_impl;

pub mod ble {
    pub mod command {
        pub use crate::ble_command_impl::{parse, Command};
    }
    pub mod connection {
        pub use crate::ble_connection_impl::{Advertiser, ConnectionState, ConnectionTracker};
    }
}

pub mod sensor {
    pub mod light {
        pub use crate::sensor_light_impl::{LightLevel, LightTier};
    }
    pub mod motion {
        pub use crate::sensor_motion_impl::{MotionDebouncer, MotionEdge};
    }
}

pub mod led;
pub mod setup;

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module tests - write path, edge path and LED priority together
// ═══════════════════════════════════════════════════════════════════════════
