//! A `usb-device` class for the bridge
//!
//! [`BridgeClass`] forwards vendor control requests to a [`Bridge`]. It
//! doesn't allocate any endpoints; everything happens on endpoint 0.
//! Only requests addressed to the device recipient reach the bridge. Vendor
//! requests sent to an interface or an endpoint are left for other classes.
//!
//! `usb-device` collects the whole data stage before it calls the class,
//! so each write-buffer request arrives as a single chunk. The data stage is
//! limited by the `usb-device` control buffer (128 bytes, unless you enable
//! one of its `control-buffer-*` features). Hosts write a full frame with
//! several write-buffer requests at increasing offsets, then one update-LEDs
//! request.
//!
//! # Example
//!
//! Borrow the bridge for each device poll, and let the commit loop have it
//! in between.
//!
//! ```no_run
//! # fn example<B: usb_device::bus::UsbBus>(
//! #     device: &mut usb_device::device::UsbDevice<'_, B>,
//! #     mut commit: usbd_ws2812::commit::CommitLoop<
//! #         impl usbd_ws2812::guard::GuardTimer,
//! #         impl usbd_ws2812::commit::Transmit,
//! #     >,
//! # ) -> ! {
//! use usbd_ws2812::{bridge::Bridge, class::BridgeClass};
//!
//! let mut bridge: Bridge = Bridge::new();
//! commit.run(&mut bridge, |bridge| {
//!     device.poll(&mut [&mut BridgeClass::new(bridge)]);
//! })
//! # }
//! ```

use crate::bridge::Bridge;
use crate::buffer::FRAME_LEN;
use crate::request::{Response, Setup};
use usb_device::class_prelude::*;
use usb_device::control::{Recipient, RequestType};

/// Routes vendor OUT requests to a [`Bridge`].
///
/// Standard and class requests, and vendor requests for an interface or
/// endpoint, are left for `usb-device` and other classes. Vendor requests
/// with an unknown opcode are accepted, and do nothing.
pub struct BridgeClass<'a, const N: usize = FRAME_LEN> {
    bridge: &'a mut Bridge<N>,
}

impl<'a, const N: usize> BridgeClass<'a, N> {
    /// Borrow the bridge for a device poll.
    pub fn new(bridge: &'a mut Bridge<N>) -> Self {
        Self { bridge }
    }
}

impl<B: UsbBus, const N: usize> UsbClass<B> for BridgeClass<'_, N> {
    fn control_out(&mut self, xfer: ControlOut<B>) {
        let request = xfer.request();
        if request.request_type != RequestType::Vendor || request.recipient != Recipient::Device {
            return;
        }

        let setup = Setup {
            request: request.request,
            index: request.index,
            length: request.length,
        };
        if let Response::ReceiveData { .. } = self.bridge.setup(&setup) {
            self.bridge.data(xfer.data());
        }

        if xfer.accept().is_err() {
            warn!("VENDOR REQUEST {} NOT ACCEPTED", setup.request);
        }
    }
}
