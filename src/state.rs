//! State shared between the GATT write callback and the control loop.
//!
//! One [`NodeContext`] is created at start-up and handed by reference to
//! both execution contexts.  Nothing in here locks: each field has a
//! single writer and the dirty flag carries the release/acquire handoff.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::ble::command::Command;
use crate::ble::connection::ConnectionTracker;
use crate::error::{Error, SetupError};

const NO_FAULT: u8 = 0;

/// Remote toggle and its published mirror.
///
/// The write callback is the only writer of `enabled`, `mirrored` and the
/// setting of `dirty`; the control loop is the only one that clears it.
pub struct ToggleState {
    enabled: AtomicBool,
    mirrored: AtomicU8,
    dirty: AtomicBool,
}

impl ToggleState {
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            mirrored: AtomicU8::new(enabled as u8),
            dirty: AtomicBool::new(false),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Apply a decoded write.
    ///
    /// Returns `true` when the toggle changed.  Invalid commands and
    /// writes matching the current value change nothing.
    pub fn apply(&self, command: Command) -> bool {
        let Some(target) = command.target() else {
            return false;
        };
        if self.enabled.load(Ordering::Relaxed) == target {
            return false;
        }

        self.enabled.store(target, Ordering::Relaxed);
        self.mirrored.store(target as u8, Ordering::Relaxed);
        // Publishes the two stores above to whoever observes `dirty`.
        self.dirty.store(true, Ordering::Release);
        true
    }

    /// Take the pending mirror byte, clearing `dirty`.
    ///
    /// The flag is cleared before the byte is read, so a write landing in
    /// between re-arms it and is picked up on the next call.
    pub fn take_pending(&self) -> Option<u8> {
        if self.dirty.swap(false, Ordering::AcqRel) {
            Some(self.mirrored.load(Ordering::Acquire))
        } else {
            None
        }
    }

    /// Re-arm after a failed publish so the next tick retries it.
    pub fn retry_pending(&self) {
        self.dirty.store(true, Ordering::Release);
    }
}

/// Everything both contexts need, created once and never dropped.
pub struct NodeContext {
    pub toggle: ToggleState,
    pub connection: ConnectionTracker,
    /// `NO_FAULT`, or the failed step as encoded by `fault_code`.
    fault: AtomicU8,
}

impl NodeContext {
    pub const fn new(toggle_enabled: bool) -> Self {
        Self {
            toggle: ToggleState::new(toggle_enabled),
            connection: ConnectionTracker::new(),
            fault: AtomicU8::new(NO_FAULT),
        }
    }

    /// Record a fatal setup failure; the control loop halts on its next
    /// tick. The first failure reported wins.
    pub fn fail(&self, step: SetupError) {
        let _ = self.fault.compare_exchange(
            NO_FAULT,
            fault_code(step),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub fn fault(&self) -> Option<Error> {
        let step = match self.fault.load(Ordering::Acquire) {
            1 => SetupError::Enable,
            2 => SetupError::ConfigureAdvertisement,
            3 => SetupError::AddService,
            4 => SetupError::StartAdvertisement,
            _ => return None,
        };
        Some(step.into())
    }
}

fn fault_code(step: SetupError) -> u8 {
    match step {
        SetupError::Enable => 1,
        SetupError::ConfigureAdvertisement => 2,
        SetupError::AddService => 3,
        SetupError::StartAdvertisement => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_clean() {
        let toggle = ToggleState::new(true);
        assert!(toggle.enabled());
        assert!(!toggle.is_dirty());
        assert_eq!(toggle.take_pending(), None);
    }

    #[test]
    fn change_marks_dirty_with_mirror() {
        let toggle = ToggleState::new(false);
        assert!(toggle.apply(Command::SetOn));
        assert!(toggle.enabled());
        assert!(toggle.is_dirty());
        assert_eq!(toggle.take_pending(), Some(1));
        assert!(!toggle.is_dirty());
        assert_eq!(toggle.take_pending(), None);
    }

    #[test]
    fn repeated_set_on_is_dirty_once() {
        let toggle = ToggleState::new(false);
        assert!(toggle.apply(Command::SetOn));
        assert!(!toggle.apply(Command::SetOn));
        assert_eq!(toggle.take_pending(), Some(1));

        // Same value again after the flush: still a no-op.
        assert!(!toggle.apply(Command::SetOn));
        assert!(!toggle.is_dirty());
    }

    #[test]
    fn invalid_command_changes_nothing() {
        let toggle = ToggleState::new(true);
        assert!(!toggle.apply(Command::Invalid));
        assert!(toggle.enabled());
        assert!(!toggle.is_dirty());
    }

    #[test]
    fn flip_flop_before_flush_publishes_latest() {
        let toggle = ToggleState::new(true);
        assert!(toggle.apply(Command::SetOff));
        assert!(toggle.apply(Command::SetOn));
        assert_eq!(toggle.take_pending(), Some(1));
    }

    #[test]
    fn retry_republishes_current_mirror() {
        let toggle = ToggleState::new(true);
        toggle.apply(Command::SetOff);
        assert_eq!(toggle.take_pending(), Some(0));
        toggle.retry_pending();
        assert_eq!(toggle.take_pending(), Some(0));
    }

    #[test]
    fn write_during_publish_is_taken_next_tick() {
        let toggle = ToggleState::new(true);
        assert!(toggle.apply(Command::SetOff));
        assert_eq!(toggle.take_pending(), Some(0));

        // Lands after the flag was cleared but before the publish finished.
        assert!(toggle.apply(Command::SetOn));
        assert!(toggle.is_dirty());
        assert_eq!(toggle.take_pending(), Some(1));
        assert_eq!(toggle.take_pending(), None);
    }

    #[test]
    fn fault_flag() {
        let ctx = NodeContext::new(true);
        assert_eq!(ctx.fault(), None);
        ctx.fail(SetupError::StartAdvertisement);
        assert_eq!(ctx.fault(), Some(Error::Setup(SetupError::StartAdvertisement)));
    }

    #[test]
    fn first_fault_is_kept() {
        let ctx = NodeContext::new(true);
        ctx.fail(SetupError::Enable);
        ctx.fail(SetupError::AddService);
        assert_eq!(ctx.fault(), Some(Error::Setup(SetupError::Enable)));
    }

    #[test]
    fn every_setup_step_survives_the_fault_slot() {
        for step in [
            SetupError::Enable,
            SetupError::ConfigureAdvertisement,
            SetupError::AddService,
            SetupError::StartAdvertisement,
        ] {
            let ctx = NodeContext::new(false);
            ctx.fail(step);
            assert_eq!(ctx.fault(), Some(Error::Setup(step)));
        }
    }
}
