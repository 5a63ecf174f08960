//! Control-characteristic write decoding.
//!
//! Existing clients send any of the following as a single, complete write
//! (offset 0):
//!
//! ```text
//! 1 byte : 0x00 | '0'  -> off      0x01 | '1' -> on
//! 2 bytes: "on"  (any case)        -> on
//! 3 bytes: "off" (any case)        -> off
//! ```
//!
//! Everything else is rejected.  Runs inside the GATT write callback, so
//! it must not allocate or block.

/// Decoded control write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SetOn,
    SetOff,
    Invalid,
}

impl Command {
    /// Target toggle value, or `None` for an invalid write.
    pub fn target(self) -> Option<bool> {
        match self {
            Command::SetOn => Some(true),
            Command::SetOff => Some(false),
            Command::Invalid => None,
        }
    }
}

/// Decode a raw write at `offset`.
pub fn parse(offset: usize, payload: &[u8]) -> Command {
    if offset != 0 {
        return Command::Invalid;
    }

    match payload {
        [0x00] | [b'0'] => Command::SetOff,
        [0x01] | [b'1'] => Command::SetOn,
        [o, n] if o.eq_ignore_ascii_case(&b'o') && n.eq_ignore_ascii_case(&b'n') => {
            Command::SetOn
        }
        [o, f1, f2]
            if o.eq_ignore_ascii_case(&b'o')
                && f1.eq_ignore_ascii_case(&b'f')
                && f2.eq_ignore_ascii_case(&b'f') =>
        {
            Command::SetOff
        }
        _ => Command::Invalid,
    }
}
