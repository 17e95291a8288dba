//! A USB-to-WS2812 bridge
//!
//! `usbd-ws2812` turns a microcontroller into a USB LED frame buffer. The host
//! writes an LED frame into a staging buffer with vendor control requests, then
//! asks the device to commit it. The device sends the frame to the strip once
//! the WS2812 inter-frame guard interval has passed.
//!
//! The crate has three parts:
//!
//! - the [`Bridge`](bridge::Bridge), which owns the staging buffer and decodes
//!   requests. [`BridgeClass`](class::BridgeClass) connects it to [`usb-device`].
//! - a [`GuardTimer`](guard::GuardTimer), a one-shot countdown that runs
//!   between transmissions. [`SysTickGuard`](systick::SysTickGuard) implements
//!   it with the Cortex-M SysTick counter.
//! - the [`CommitLoop`](commit::CommitLoop), which sends the frame when a
//!   commit is pending and the guard timer has elapsed.
//!
//! The bit-level LED transmission is yours to provide; see
//! [`Transmit`](commit::Transmit).
//!
//! # Protocol
//!
//! All requests are host-to-device vendor requests.
//!
//! | `bRequest` | `wIndex` | Data stage | Effect                                     |
//! |------------|----------|------------|--------------------------------------------|
//! | 0          | offset   | frame bytes | write bytes into the frame, starting at `offset` |
//! | 1          | -        | none       | commit the frame to the strip              |
//! | other      | -        | ignored    | nothing                                    |
//!
//! Writes that run past the end of the frame are truncated. Writes that start
//! past the end of the frame are dropped.
//!
//! [`usb-device`]: https://crates.io/crates/usb-device

#![no_std]

#[cfg(feature = "defmt-03")]
extern crate defmt_03 as defmt;

#[macro_use]
mod log;

pub mod bridge;
pub mod buffer;
pub mod class;
pub mod commit;
pub mod cursor;
pub mod guard;
pub mod request;
pub mod status;
pub mod systick;

pub use bridge::Bridge;
pub use buffer::{StagingBuffer, FRAME_LEN};
pub use commit::{CommitLoop, Interrupted, Transmit};
pub use guard::{GuardFlag, GuardTimer, GUARD_INTERVAL_US};
pub use status::{Status, StatusIndicator};
