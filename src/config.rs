//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, thresholds and
//! protocol constants live here so they can be tuned in one place.

// BLE

/// Complete local name put in the advertisement and the GAP device name.
pub const DEVICE_NAME: &str = "Lightwatch";

/// 128-bit UUID of the sensor service. Must match the literal in
/// `ble::server::SensorService`.
pub const SENSOR_SERVICE_UUID: u128 = 0x7b1e0001_4c2d_4f1a_9e37_5a0c3d2b1f00;

/// Advertising interval (in 0.625 ms units). 400 = 250 ms.
pub const BLE_ADV_INTERVAL: u32 = 400;

/// Largest write payload handed to the command parser. Longer writes are
/// rejected by the stack before they reach us.
pub const CONTROL_MAX_LEN: usize = 20;

/// Motion edges buffered between the control loop and the BLE task.
pub const MOTION_EDGE_QUEUE: usize = 4;

// Control loop

/// Nominal control-loop period (ms).
pub const TICK_PERIOD_MS: u64 = 500;

/// The PIR output is unreliable until it has settled after power-up.
pub const PIR_WARMUP_SECS: u64 = 5;

/// Initial value of the remote toggle. `true` with no peer connected
/// behaves like the plain threshold/motion lamp.
pub const TOGGLE_DEFAULT_ENABLED: bool = true;

// Light sensor (LDR divider on the SAADC)

/// Samples strictly above this are the High tier.
pub const LIGHT_HIGH_THRESHOLD: u16 = 50_000;

/// Samples strictly above this (and not High) are the Mid tier.
pub const LIGHT_MID_THRESHOLD: u16 = 40_000;

/// SAADC resolution. Samples are shifted up to the 16-bit light range.
pub const ADC_RESOLUTION_BITS: u8 = 12;

// GPIO pin assignments (Seeed XIAO nRF52840)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom wiring.
//
//   LDR divider (A5)   → P0.31 / AIN7
//   Actuator red (D0)  → P0.02
//   Actuator green (D1)→ P0.03
//   Actuator blue (D2) → P0.28
//   Button (D6)        → P1.11   active-low, internal pull-up
//   PIR OUT (D7)       → P1.12
//   Status LED R/G/B   → P0.26 / P0.30 / P0.06   (on-board, active-low)

/// External RGB LED is common-cathode: driving a line high lights it.
pub const ACTUATOR_ACTIVE_LOW: bool = false;

/// The on-board RGB LED sinks current: driving a line low lights it.
pub const STATUS_ACTIVE_LOW: bool = true;
