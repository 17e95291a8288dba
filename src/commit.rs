//! The commit loop
//!
//! The commit loop decides when the staged frame goes out to the strip. A
//! commit needs two things: a pending commit request, and an elapsed guard
//! timer. Every transmission attempt, successful or not, restarts the guard
//! timer, so two attempts are always separated by at least
//! [`GUARD_INTERVAL_US`].
//!
//! ```text
//!            update-LEDs            guard elapsed
//!   Idle ----------------> Pending ---------------> ReadyToFire
//!    ^                        ^                          |
//!    |                        |  Err(Interrupted)        v
//!    +------------------------+---------------------- Transmitting
//!               Ok(())
//! ```
//!
//! Transmission failure isn't fatal. The commit stays pending, and the loop
//! retries once the guard timer elapses again.
//!
//! # Example
//!
//! ```
//! use usbd_ws2812::bridge::Bridge;
//! use usbd_ws2812::commit::{CommitLoop, Interrupted, Outcome};
//! use usbd_ws2812::guard::GuardTimer;
//! use usbd_ws2812::request::Setup;
//!
//! /// A guard timer that's always elapsed. Use a real timer!
//! struct NoGuard;
//! impl GuardTimer for NoGuard {
//!     fn start(&mut self, _: u32) {}
//!     fn is_elapsed(&self) -> bool { true }
//! }
//!
//! let mut bridge: Bridge = Bridge::new();
//! let transmit = |_frame: &[u8]| -> Result<(), Interrupted> { Ok(()) };
//! let mut commit = CommitLoop::new(NoGuard, transmit, ());
//!
//! assert_eq!(commit.poll(&mut bridge), Outcome::Idle);
//! bridge.setup(&Setup::update_leds());
//! assert_eq!(commit.poll(&mut bridge), Outcome::Committed);
//! assert!(!bridge.is_commit_pending());
//! ```

use crate::bridge::Bridge;
use crate::guard::{GuardTimer, GUARD_INTERVAL_US};
use crate::status::{Status, StatusIndicator};

/// A transmission was interrupted, and the strip didn't get the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Interrupted;

impl core::fmt::Display for Interrupted {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("LED transmission interrupted")
    }
}

/// Sends a frame to the LED strip.
///
/// The caller guarantees that at least [`GUARD_INTERVAL_US`] have passed since
/// the previous call returned, whatever its result. An implementation either
/// sends the whole frame, or returns [`Interrupted`]. There's no partial
/// success.
pub trait Transmit {
    /// Send `frame`.
    fn transmit(&mut self, frame: &[u8]) -> Result<(), Interrupted>;
}

impl<F> Transmit for F
where
    F: FnMut(&[u8]) -> Result<(), Interrupted>,
{
    fn transmit(&mut self, frame: &[u8]) -> Result<(), Interrupted> {
        self(frame)
    }
}

/// Commit loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum CommitState {
    /// No commit requested.
    Idle,
    /// A commit is requested, and the guard timer is running.
    Pending,
    /// A commit is requested, and the guard timer has elapsed.
    ReadyToFire,
    /// The frame is on the wire.
    Transmitting,
}

/// The result of one [`poll()`](CommitLoop::poll).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Outcome {
    /// Nothing to commit.
    Idle,
    /// A commit is waiting on the guard timer.
    Waiting,
    /// The frame was sent, and the commit is complete.
    Committed,
    /// The transmission was interrupted. The commit is still pending.
    Retry,
}

/// Gates transmissions on the commit flag and the guard timer.
///
/// `G` is the guard timer, `T` the transmitter, and `S` the status indicator.
/// Use `()` if you don't have a status indicator.
pub struct CommitLoop<G, T, S = ()> {
    guard: G,
    transmitter: T,
    indicator: S,
    state: CommitState,
    shown: Option<Status>,
}

impl<G, T, S> CommitLoop<G, T, S>
where
    G: GuardTimer,
    T: Transmit,
    S: StatusIndicator,
{
    /// Create the commit loop, and start the guard timer.
    ///
    /// Nothing is sent until the first guard interval elapses.
    pub fn new(mut guard: G, transmitter: T, indicator: S) -> Self {
        guard.start(GUARD_INTERVAL_US);
        Self {
            guard,
            transmitter,
            indicator,
            state: CommitState::Idle,
            shown: None,
        }
    }

    /// Returns the state computed by the most recent [`poll()`](CommitLoop::poll).
    pub fn state(&self) -> CommitState {
        self.state
    }

    /// Returns the guard timer.
    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// Returns the status indicator.
    pub fn indicator(&self) -> &S {
        &self.indicator
    }

    /// Run one commit check.
    ///
    /// Never blocks, except for the transmission itself. Call this on every
    /// pass of your main loop, after servicing the transport.
    pub fn poll<const N: usize>(&mut self, bridge: &mut Bridge<N>) -> Outcome {
        self.show(bridge.status());

        match (bridge.is_commit_pending(), self.guard.is_elapsed()) {
            (false, _) => {
                self.state = CommitState::Idle;
                Outcome::Idle
            }
            (true, false) => {
                self.state = CommitState::Pending;
                Outcome::Waiting
            }
            (true, true) => {
                self.state = CommitState::ReadyToFire;
                self.fire(bridge)
            }
        }
    }

    /// Service the transport, then poll once.
    ///
    /// `service` runs first, whatever the commit state: while the guard timer
    /// runs, and before a retry.
    pub fn step<const N: usize>(
        &mut self,
        bridge: &mut Bridge<N>,
        service: impl FnOnce(&mut Bridge<N>),
    ) -> Outcome {
        service(bridge);
        self.poll(bridge)
    }

    /// [`step()`](CommitLoop::step) forever.
    ///
    /// Poll your USB device in `service`, and forward control requests to
    /// the bridge.
    pub fn run<const N: usize>(
        &mut self,
        bridge: &mut Bridge<N>,
        mut service: impl FnMut(&mut Bridge<N>),
    ) -> ! {
        loop {
            self.step(bridge, &mut service);
        }
    }

    fn fire<const N: usize>(&mut self, bridge: &mut Bridge<N>) -> Outcome {
        self.state = CommitState::Transmitting;
        let result = self.transmitter.transmit(bridge.buffer().as_bytes());
        // Always, whatever the result.
        self.guard.start(GUARD_INTERVAL_US);

        match result {
            Ok(()) => {
                bridge.complete_commit();
                self.show(bridge.status());
                self.state = CommitState::Idle;
                Outcome::Committed
            }
            Err(Interrupted) => {
                self.state = CommitState::Pending;
                Outcome::Retry
            }
        }
    }

    fn show(&mut self, status: Status) {
        if self.shown != Some(status) {
            self.indicator.show(status);
            self.shown = Some(status);
        }
    }
}
