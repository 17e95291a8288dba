//! Status indicator signals

bitflags::bitflags! {
    /// Status signals.
    ///
    /// The bit values match a status port with the idle (green) LED on
    /// bit 1, and the pending (orange) LED on bit 2. If your indicator
    /// is wired that way, write [`bits()`](Status::bits) straight to the port.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        /// No commit is waiting.
        const IDLE = 1 << 1;
        /// A commit is waiting for transmission.
        const PENDING = 1 << 2;
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::IDLE
    }
}

#[cfg(feature = "defmt-03")]
impl defmt::Format for Status {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Status({=u8:#x})", self.bits())
    }
}

/// A sink for status changes.
///
/// Purely observational. Nothing reads the indicator back.
pub trait StatusIndicator {
    /// Show the new status.
    fn show(&mut self, status: Status);
}

/// No indicator.
impl StatusIndicator for () {
    fn show(&mut self, _: Status) {}
}

/// A latch that remembers the last status.
impl StatusIndicator for Status {
    fn show(&mut self, status: Status) {
        *self = status;
    }
}

impl<S: StatusIndicator + ?Sized> StatusIndicator for &mut S {
    fn show(&mut self, status: Status) {
        (**self).show(status)
    }
}
