//! Vendor control requests understood by the bridge

/// `bRequest` values.
///
/// | Opcode | Parameters                         | Data stage     |
/// |--------|------------------------------------|----------------|
/// | 0      | `wIndex`: offset, `wLength`: bytes | `wLength` bytes |
/// | 1      | none                               | none           |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Opcode {
    /// Stage bytes into the frame, starting at an offset.
    WriteBuffer,
    /// Commit the frame to the strip.
    UpdateLeds,
    /// Anything else. Accepted, and ignored.
    Unknown(u8),
}

impl Opcode {
    /// `bRequest` for [`Opcode::WriteBuffer`].
    pub const WRITE_BUFFER: u8 = 0;
    /// `bRequest` for [`Opcode::UpdateLeds`].
    pub const UPDATE_LEDS: u8 = 1;

    /// Returns the raw `bRequest` value.
    pub const fn raw(self) -> u8 {
        match self {
            Opcode::WriteBuffer => Self::WRITE_BUFFER,
            Opcode::UpdateLeds => Self::UPDATE_LEDS,
            Opcode::Unknown(raw) => raw,
        }
    }
}

impl From<u8> for Opcode {
    fn from(raw: u8) -> Self {
        match raw {
            Self::WRITE_BUFFER => Opcode::WriteBuffer,
            Self::UPDATE_LEDS => Opcode::UpdateLeds,
            raw => Opcode::Unknown(raw),
        }
    }
}

/// The fields of a setup packet that the bridge looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Setup {
    /// `bRequest`
    pub request: u8,
    /// `wIndex`
    pub index: u16,
    /// `wLength`
    pub length: u16,
}

impl Setup {
    /// A write-buffer request for `length` bytes at `offset`.
    pub const fn write_buffer(offset: u16, length: u16) -> Self {
        Self {
            request: Opcode::WRITE_BUFFER,
            index: offset,
            length,
        }
    }

    /// An update-LEDs request.
    pub const fn update_leds() -> Self {
        Self {
            request: Opcode::UPDATE_LEDS,
            index: 0,
            length: 0,
        }
    }

    /// Decode the opcode.
    pub fn opcode(&self) -> Opcode {
        Opcode::from(self.request)
    }
}

/// What the transport should do after the setup stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Response {
    /// There's no data stage, or any data will be dropped.
    NoData,
    /// Deliver the data stage. Only the first `accepted` bytes are kept.
    ReceiveData {
        /// Bytes that will be written, after clamping to the frame end.
        accepted: u16,
    },
}
