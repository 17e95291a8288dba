//! The staging buffer, and the frame geometry it represents

use crate::cursor::WriteCursor;

/// LEDs on each strip.
pub const LEDS_PER_STRIP: usize = 27;

/// Bit slots per LED. Each LED takes 24 bits, GRB, MSB first.
pub const BITS_PER_LED: usize = 24;

/// The number of strips driven in parallel.
///
/// Each staging buffer byte is written to an 8-bit output port, so
/// one bit of every byte belongs to each strip.
pub const STRIPS: usize = 8;

/// Size of the default frame, in bytes.
pub const FRAME_LEN: usize = LEDS_PER_STRIP * BITS_PER_LED;

/// A fixed-size LED frame, addressable by byte offset.
///
/// The buffer is bit-sliced. Byte `led * 24 + bit` holds bit `bit`
/// of LED `led` for all strips; bit `s` of that byte goes to strip `s`.
/// Use [`set_pixel()`](StagingBuffer::set_pixel) to pack a single LED
/// if you're building frames on the device.
///
/// Host writes land through a [`WriteCursor`]. Device-side code changes the
/// buffer with `set_pixel()`, reached through
/// [`Bridge::buffer_mut()`](crate::bridge::Bridge::buffer_mut).
pub struct StagingBuffer<const N: usize = FRAME_LEN> {
    bytes: [u8; N],
}

impl<const N: usize> StagingBuffer<N> {
    /// Allocate a zeroed buffer.
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    /// Returns the buffer size, in bytes.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns `true` if the buffer holds no bytes.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Returns the whole frame, for transmission.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Start a write of `requested` bytes at `offset`.
    ///
    /// Returns `None` if `offset` is at or beyond the end of the buffer.
    /// Otherwise, the cursor's window is clamped to the end of the buffer.
    pub fn begin_write(&self, offset: usize, requested: usize) -> Option<WriteCursor> {
        WriteCursor::new(N, offset, requested)
    }

    /// Mutable access for the cursor.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Pack one LED of one strip into the frame.
    ///
    /// `grb` is in wire order. Does nothing if `strip` or `led` are
    /// out of range for this buffer.
    pub fn set_pixel(&mut self, strip: usize, led: usize, grb: [u8; 3]) {
        let Some(slots) = self.slots_mut(strip, led) else {
            return;
        };
        let mask = 1u8 << strip;
        let bits = u32::from_be_bytes([0, grb[0], grb[1], grb[2]]);
        for (idx, slot) in slots.iter_mut().enumerate() {
            if bits & (1 << (BITS_PER_LED - 1 - idx)) != 0 {
                *slot |= mask;
            } else {
                *slot &= !mask;
            }
        }
    }

    /// Unpack one LED of one strip from the frame.
    ///
    /// Returns `None` if `strip` or `led` are out of range for this buffer.
    pub fn pixel(&self, strip: usize, led: usize) -> Option<[u8; 3]> {
        let start = Self::slot_start(strip, led)?;
        let bits = self.bytes[start..start + BITS_PER_LED]
            .iter()
            .fold(0u32, |acc, slot| (acc << 1) | u32::from((*slot >> strip) & 1));
        let [_, g, r, b] = bits.to_be_bytes();
        Some([g, r, b])
    }

    fn slot_start(strip: usize, led: usize) -> Option<usize> {
        if strip >= STRIPS {
            return None;
        }
        let start = led.checked_mul(BITS_PER_LED)?;
        (start.checked_add(BITS_PER_LED)? <= N).then_some(start)
    }

    fn slots_mut(&mut self, strip: usize, led: usize) -> Option<&mut [u8]> {
        let start = Self::slot_start(strip, led)?;
        Some(&mut self.bytes[start..start + BITS_PER_LED])
    }
}

impl<const N: usize> Default for StagingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
