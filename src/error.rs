//! Unified error type for lightwatch.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A fatal bring-up step failed. The node halts.
    Setup(SetupError),

    /// Writing the toggle mirror into the read characteristic failed.
    CharacteristicUpdate,

    /// Motion notification could not be sent to the peer.
    Notify,
}

/// Bring-up steps whose failure leaves the node unable to do its job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    /// The SoftDevice could not be enabled.
    Enable,
    /// Advertisement payload could not be configured.
    ///
    /// The payloads in `ble::peripheral` are const-built, so on this board
    /// an oversized payload is a build error rather than a run-time one.
    ConfigureAdvertisement,
    /// GATT service registration failed.
    AddService,
    /// Connectable advertising could not be started.
    StartAdvertisement,
}

impl SetupError {
    /// Short action name, as logged on success ("<action> OK").
    pub fn action(self) -> &'static str {
        match self {
            SetupError::Enable => "enable BLE stack",
            SetupError::ConfigureAdvertisement => "configure advertisement",
            SetupError::AddService => "add service",
            SetupError::StartAdvertisement => "start advertisement",
        }
    }
}

// Convenience conversions

impl From<SetupError> for Error {
    fn from(e: SetupError) -> Self {
        Error::Setup(e)
    }
}
