//! The inter-frame guard timer.
//!
//! WS2812 LEDs latch their data after the line has been idle for at least
//! [`GUARD_INTERVAL_US`]. Starting the next frame any earlier corrupts both
//! frames. The bridge starts a guard timer after every transmission attempt,
//! and never transmits while the timer is running.
//!
//! A guard timer is a one-shot countdown with two states, *running* and
//! *elapsed*. There's no cancel; restarting a running timer replaces the
//! countdown.
//!
//! # Example
//!
//! [`GuardFlag`] is the state shared with the expiry interrupt. Keep it in a
//! `static`, and let the interrupt handler call [`expire()`](GuardFlag::expire).
//!
//! ```
//! use usbd_ws2812::guard::{GuardFlag, GuardTimer, GUARD_INTERVAL_US};
//!
//! static FLAG: GuardFlag = GuardFlag::new();
//!
//! struct Countdown;
//! impl GuardTimer for Countdown {
//!     fn start(&mut self, us: u32) {
//!         FLAG.arm();
//!         // Load `us` into your hardware countdown, and let it run...
//! #       let _ = us;
//!     }
//!     fn is_elapsed(&self) -> bool {
//!         FLAG.is_elapsed()
//!     }
//! }
//!
//! let mut timer = Countdown;
//! timer.start(GUARD_INTERVAL_US);
//! assert!(!timer.is_elapsed());
//!
//! // In the interrupt handler...
//! FLAG.expire();
//! assert!(timer.is_elapsed());
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

/// Minimum idle time between frames, in microseconds.
pub const GUARD_INTERVAL_US: u32 = 50;

/// A one-shot countdown that gates transmissions.
pub trait GuardTimer {
    /// Start counting down `us` microseconds.
    ///
    /// The timer is running when this returns. Calling `start` on a running
    /// timer restarts the countdown.
    fn start(&mut self, us: u32);

    /// Indicates if the countdown has elapsed.
    ///
    /// Must not have side effects.
    fn is_elapsed(&self) -> bool;
}

impl<G: GuardTimer + ?Sized> GuardTimer for &mut G {
    fn start(&mut self, us: u32) {
        (**self).start(us)
    }
    fn is_elapsed(&self) -> bool {
        (**self).is_elapsed()
    }
}

/// The elapsed flag, shared between the main loop and the expiry interrupt.
///
/// The main loop [`arm()`](GuardFlag::arm)s the flag right before it starts
/// the countdown. The interrupt [`expire()`](GuardFlag::expire)s it. Nothing
/// else is shared with the interrupt.
#[derive(Debug)]
pub struct GuardFlag {
    elapsed: AtomicBool,
}

impl GuardFlag {
    /// Create a flag in the running state.
    ///
    /// Nothing transmits until the first countdown elapses.
    pub const fn new() -> Self {
        Self {
            elapsed: AtomicBool::new(false),
        }
    }

    /// Mark the countdown as running.
    pub fn arm(&self) {
        self.elapsed.store(false, Ordering::SeqCst);
    }

    /// Mark the countdown as elapsed.
    ///
    /// Safe to call from an interrupt at any time.
    pub fn expire(&self) {
        self.elapsed.store(true, Ordering::SeqCst);
    }

    /// Indicates if the countdown has elapsed.
    pub fn is_elapsed(&self) -> bool {
        self.elapsed.load(Ordering::SeqCst)
    }
}

impl Default for GuardFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{GuardFlag, GuardTimer};

    #[test]
    fn flag_states() {
        let flag = GuardFlag::new();
        assert!(!flag.is_elapsed());
        flag.expire();
        assert!(flag.is_elapsed());
        assert!(flag.is_elapsed(), "polling has no side effects");
        flag.arm();
        assert!(!flag.is_elapsed());
    }

    #[test]
    fn expire_twice() {
        let flag = GuardFlag::new();
        flag.expire();
        flag.expire();
        assert!(flag.is_elapsed());
    }

    struct Manual<'a>(&'a GuardFlag, Option<u32>);

    impl GuardTimer for Manual<'_> {
        fn start(&mut self, us: u32) {
            self.0.arm();
            self.1 = Some(us);
        }
        fn is_elapsed(&self) -> bool {
            self.0.is_elapsed()
        }
    }

    #[test]
    fn restart_replaces_countdown() {
        let flag = GuardFlag::new();
        let mut timer = Manual(&flag, None);
        timer.start(50);
        flag.expire();
        assert!(timer.is_elapsed());

        fn restart(mut timer: impl GuardTimer) -> bool {
            timer.start(75);
            timer.is_elapsed()
        }
        assert!(!restart(&mut timer));
        assert_eq!(timer.1, Some(75));
    }
}
