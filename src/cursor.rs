//! Transport write cursor
//!
//! A control transfer that carries frame data is split in two: the setup
//! stage declares an offset and a length, and the data stage delivers the
//! bytes in one or more chunks. The cursor is the state held between those
//! two stages.

use crate::buffer::StagingBuffer;

/// A write window into a [`StagingBuffer`].
///
/// The window is `[offset, offset + accepted)`, and it never extends past
/// the end of the buffer that created it. Bytes that arrive after the window
/// is consumed are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct WriteCursor {
    /// Next byte to write.
    position: usize,
    /// Bytes left in the window.
    remaining: usize,
    /// Length of the whole window.
    accepted: usize,
}

impl WriteCursor {
    /// A cursor that accepts nothing.
    pub const fn exhausted() -> Self {
        Self {
            position: 0,
            remaining: 0,
            accepted: 0,
        }
    }

    /// Open a window of up to `requested` bytes at `offset`, in a buffer of
    /// `len` bytes.
    pub(crate) fn new(len: usize, offset: usize, requested: usize) -> Option<Self> {
        if offset >= len {
            return None;
        }
        let accepted = requested.min(len - offset);
        Some(Self {
            position: offset,
            remaining: accepted,
            accepted,
        })
    }

    /// The number of bytes this cursor will write, after clamping.
    pub const fn accepted(&self) -> usize {
        self.accepted
    }

    /// The number of bytes this cursor will still write.
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Indicates if the window is fully written.
    pub const fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Copy the next chunk of data into the buffer.
    ///
    /// At most `remaining()` bytes are taken from `data`; the rest are
    /// ignored. Returns `true` when the window is fully written, including
    /// when it was already complete before this call.
    pub fn write<const N: usize>(&mut self, buffer: &mut StagingBuffer<N>, data: &[u8]) -> bool {
        let len = data.len().min(self.remaining);
        let end = self.position + len;
        let Some(dst) = buffer.bytes_mut().get_mut(self.position..end) else {
            // Cursor came from a smaller buffer. Close the window.
            self.remaining = 0;
            return true;
        };
        dst.copy_from_slice(&data[..len]);
        self.position = end;
        self.remaining -= len;
        trace!("CURSOR WROTE {} REMAINING {}", len, self.remaining);
        self.is_complete()
    }
}

impl Default for WriteCursor {
    fn default() -> Self {
        Self::exhausted()
    }
}

#[cfg(test)]
mod tests {
    use super::WriteCursor;
    use crate::buffer::{StagingBuffer, FRAME_LEN};

    #[test]
    fn clamps_to_buffer_end() {
        for (offset, requested, accepted) in [
            (0, 648, 648),
            (0, 10, 10),
            (640, 100, 8),
            (647, 2, 1),
            (100, 0, 0),
            (0, usize::MAX, 648),
        ] {
            let cursor = WriteCursor::new(FRAME_LEN, offset, requested).unwrap();
            assert_eq!(cursor.accepted(), accepted, "offset {offset} len {requested}");
            assert_eq!(cursor.remaining(), accepted);
        }
    }

    #[test]
    fn rejects_offset_at_or_past_end() {
        assert!(WriteCursor::new(FRAME_LEN, FRAME_LEN, 1).is_none());
        assert!(WriteCursor::new(FRAME_LEN, 700, 0).is_none());
        assert!(WriteCursor::new(0, 0, 0).is_none());
    }

    #[test]
    fn writes_only_inside_window() {
        let mut buffer = StagingBuffer::<16>::new();
        let mut cursor = buffer.begin_write(4, 6).unwrap();

        assert!(!cursor.write(&mut buffer, &[1, 2, 3]));
        assert!(cursor.write(&mut buffer, &[4, 5, 6, 7, 8, 9]));

        assert_eq!(
            buffer.as_bytes(),
            &[0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn write_after_complete_is_a_no_op() {
        let mut buffer = StagingBuffer::<8>::new();
        let mut cursor = buffer.begin_write(0, 2).unwrap();
        assert!(cursor.write(&mut buffer, &[0xAA, 0xBB]));
        assert!(cursor.write(&mut buffer, &[0xCC]));
        assert_eq!(buffer.as_bytes(), &[0xAA, 0xBB, 0, 0, 0, 0, 0, 0]);

        let mut cursor = WriteCursor::exhausted();
        assert!(cursor.write(&mut buffer, &[0xDD; 8]));
        assert_eq!(buffer.as_bytes(), &[0xAA, 0xBB, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn empty_chunk_makes_no_progress() {
        let mut buffer = StagingBuffer::<8>::new();
        let mut cursor = buffer.begin_write(0, 2).unwrap();
        assert!(!cursor.write(&mut buffer, &[]));
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn mismatched_buffer_closes_window() {
        let mut small = StagingBuffer::<4>::new();
        let mut cursor = WriteCursor::new(16, 8, 4).unwrap();
        assert!(cursor.write(&mut small, &[1, 2, 3, 4]));
        assert!(cursor.is_complete());
        assert_eq!(small.as_bytes(), &[0; 4]);
    }

    #[test]
    fn every_window_touches_only_its_bytes() {
        const LEN: usize = 24;
        for offset in 0..LEN {
            for requested in [0, 1, 5, LEN, LEN * 2] {
                let mut buffer = StagingBuffer::<LEN>::new();
                let mut cursor = buffer.begin_write(offset, requested).unwrap();
                let accepted = cursor.accepted();
                assert_eq!(accepted, requested.min(LEN - offset));

                let payload = [0xFFu8; LEN * 2];
                for chunk in payload.chunks(7) {
                    if cursor.write(&mut buffer, chunk) {
                        break;
                    }
                }

                for (idx, &byte) in buffer.as_bytes().iter().enumerate() {
                    let inside = idx >= offset && idx < offset + accepted;
                    assert_eq!(byte == 0xFF, inside, "offset {offset} len {requested} idx {idx}");
                }
            }
        }
    }
}
