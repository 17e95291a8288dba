//! A guard timer backed by the Cortex-M SysTick counter.
//!
//! SysTick is a 24-bit down counter clocked by the core. [`SysTickGuard`]
//! uses it as a one-shot countdown: every [`start()`](GuardTimer::start)
//! loads the counter and enables the SysTick exception, and the exception
//! handler calls [`SysTickGuard::on_interrupt`], which expires the shared
//! [`GuardFlag`] and stops the counter.
//!
//! # Example
//!
//! ```no_run
//! use usbd_ws2812::guard::{GuardFlag, GuardTimer, GUARD_INTERVAL_US};
//! use usbd_ws2812::systick::SysTickGuard;
//!
//! static GUARD_FLAG: GuardFlag = GuardFlag::new();
//!
//! let cortex_m::Peripherals { SYST, .. } = cortex_m::Peripherals::take().unwrap();
//! let mut guard = SysTickGuard::new(SYST, 48_000_000, &GUARD_FLAG);
//! guard.start(GUARD_INTERVAL_US);
//!
//! // In your runtime's SysTick exception handler:
//! //
//! //   SysTickGuard::on_interrupt(&GUARD_FLAG);
//! ```

use crate::guard::{GuardFlag, GuardTimer};
use cortex_m::peripheral::{syst::SystClkSource, SCB, SYST};

/// Largest SysTick reload value.
const MAX_RELOAD: u32 = 0xFF_FFFF;

const CSR_ENABLE: u32 = 1 << 0;
const CSR_TICKINT: u32 = 1 << 1;

/// Compute the reload value that counts at least `us` microseconds at `core_hz`.
///
/// Rounds up, so the countdown is never shorter than requested. Saturates at the
/// 24-bit counter width. A countdown always lasts at least two core ticks; a reload
/// value of zero would stop the counter.
fn reload(core_hz: u32, us: u32) -> u32 {
    let ticks = (u64::from(core_hz) * u64::from(us)).div_ceil(1_000_000);
    let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
    ticks.saturating_sub(1).clamp(1, MAX_RELOAD)
}

/// A [`GuardTimer`] that owns the SysTick peripheral.
pub struct SysTickGuard {
    syst: SYST,
    core_hz: u32,
    flag: &'static GuardFlag,
}

impl SysTickGuard {
    /// Take the SysTick counter, clocked from the core at `core_hz`.
    ///
    /// The counter is stopped until the first [`start()`](GuardTimer::start).
    /// `flag` must be the same flag that the SysTick exception handler passes
    /// to [`on_interrupt()`](SysTickGuard::on_interrupt).
    pub fn new(mut syst: SYST, core_hz: u32, flag: &'static GuardFlag) -> Self {
        syst.disable_interrupt();
        syst.disable_counter();
        syst.set_clock_source(SystClkSource::Core);
        debug!("SYSTICK GUARD {} HZ", core_hz);
        Self {
            syst,
            core_hz,
            flag,
        }
    }

    /// Release the SysTick peripheral.
    pub fn release(mut self) -> SYST {
        self.syst.disable_interrupt();
        self.syst.disable_counter();
        self.syst
    }

    /// Handle the SysTick exception.
    ///
    /// Call this, and only this, from your SysTick exception handler. It
    /// touches the shared flag and the SysTick control register, and nothing else.
    pub fn on_interrupt(flag: &GuardFlag) {
        flag.expire();
        // Safety: the exception handler can't be preempted by the main loop. The
        // main loop masks TICKINT before it touches the counter, so there's no
        // exception pending while it reconfigures SysTick.
        unsafe {
            (*SYST::PTR)
                .csr
                .modify(|csr| csr & !(CSR_ENABLE | CSR_TICKINT));
        }
    }
}

impl GuardTimer for SysTickGuard {
    fn start(&mut self, us: u32) {
        self.syst.disable_interrupt();
        self.syst.disable_counter();
        SCB::clear_pendst();

        self.flag.arm();
        self.syst.set_reload(reload(self.core_hz, us));
        self.syst.clear_current();
        self.syst.enable_interrupt();
        self.syst.enable_counter();
    }

    fn is_elapsed(&self) -> bool {
        self.flag.is_elapsed()
    }
}
