//! Device state, and the request dispatcher
//!
//! [`Bridge`] owns everything that the transport and the commit loop share:
//! the staging buffer, the write cursor, the commit flag, and the status
//! signals. The transport drives it with [`setup()`](Bridge::setup) and
//! [`data()`](Bridge::data); the [`CommitLoop`](crate::commit::CommitLoop)
//! reads the frame and clears the commit flag.

use crate::buffer::{StagingBuffer, FRAME_LEN};
use crate::cursor::WriteCursor;
use crate::request::{Opcode, Response, Setup};
use crate::status::Status;

/// The bridge's device state.
///
/// There's one `Bridge` per LED frame. Allocate it once, and pass it by
/// reference to the transport and to the commit loop.
pub struct Bridge<const N: usize = FRAME_LEN> {
    buffer: StagingBuffer<N>,
    cursor: WriteCursor,
    commit: bool,
    status: Status,
}

impl<const N: usize> Bridge<N> {
    /// Create an idle bridge with a zeroed frame.
    pub const fn new() -> Self {
        Self {
            buffer: StagingBuffer::new(),
            cursor: WriteCursor::exhausted(),
            commit: false,
            status: Status::IDLE,
        }
    }

    /// Handle the setup stage of a request.
    ///
    /// A write-buffer request with an offset past the end of the frame is
    /// rejected with [`Response::NoData`], and changes nothing. Unknown
    /// requests are accepted and ignored.
    pub fn setup(&mut self, setup: &Setup) -> Response {
        match setup.opcode() {
            Opcode::WriteBuffer => {
                let Some(cursor) = self
                    .buffer
                    .begin_write(setup.index.into(), setup.length.into())
                else {
                    warn!("WRITE_BUFFER OFFSET {} OUT OF RANGE", setup.index);
                    return Response::NoData;
                };
                debug!(
                    "WRITE_BUFFER OFFSET {} LENGTH {} ACCEPTED {}",
                    setup.index,
                    setup.length,
                    cursor.accepted()
                );
                self.cursor = cursor;
                Response::ReceiveData {
                    // Window is a subrange of wLength.
                    accepted: cursor.accepted() as u16,
                }
            }
            Opcode::UpdateLeds => {
                debug!("UPDATE_LEDS");
                self.request_commit();
                Response::NoData
            }
            Opcode::Unknown(_request) => {
                debug!("IGNORED REQUEST {}", _request);
                Response::NoData
            }
        }
    }

    /// Handle one chunk of a data stage.
    ///
    /// Returns `true` once the accepted window is fully written. Bytes past
    /// the window are dropped.
    pub fn data(&mut self, chunk: &[u8]) -> bool {
        self.cursor.write(&mut self.buffer, chunk)
    }

    /// Mark the frame for transmission.
    ///
    /// Commits don't queue. Requesting a commit while one is pending
    /// changes nothing.
    pub fn request_commit(&mut self) {
        self.commit = true;
        self.status = Status::PENDING;
    }

    /// Clear the commit flag after a successful transmission.
    pub(crate) fn complete_commit(&mut self) {
        self.commit = false;
        self.status = Status::IDLE;
    }

    /// Indicates if a commit is pending.
    pub fn is_commit_pending(&self) -> bool {
        self.commit
    }

    /// Returns the status signals.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the staging buffer.
    pub fn buffer(&self) -> &StagingBuffer<N> {
        &self.buffer
    }

    /// Returns the staging buffer, for building frames on the device.
    ///
    /// Writes here race with host writes. Don't mix the two.
    pub fn buffer_mut(&mut self) -> &mut StagingBuffer<N> {
        &mut self.buffer
    }

    /// Returns the write cursor of the current, or last, data stage.
    pub fn cursor(&self) -> &WriteCursor {
        &self.cursor
    }
}

impl<const N: usize> Default for Bridge<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Bridge;
    use crate::buffer::FRAME_LEN;
    use crate::request::{Response, Setup};
    use crate::status::Status;

    fn pattern() -> [u8; FRAME_LEN] {
        let mut bytes = [0; FRAME_LEN];
        for (idx, byte) in bytes.iter_mut().enumerate() {
            *byte = (idx % 251) as u8 + 1;
        }
        bytes
    }

    #[test]
    fn full_frame_in_one_request() {
        let mut bridge = Bridge::<FRAME_LEN>::new();
        let response = bridge.setup(&Setup::write_buffer(0, 648));
        assert_eq!(response, Response::ReceiveData { accepted: 648 });

        let bytes = pattern();
        let count = bytes.chunks(8).count();
        for (idx, chunk) in bytes.chunks(8).enumerate() {
            // Complete on the final chunk, and no sooner.
            assert_eq!(bridge.data(chunk), idx + 1 == count);
        }
        assert_eq!(bridge.buffer().as_bytes(), &bytes[..]);
    }

    #[test]
    fn full_frame_in_many_requests() {
        let mut bridge = Bridge::<FRAME_LEN>::new();
        let bytes = pattern();
        for (idx, chunk) in bytes.chunks(128).enumerate() {
            let offset = (idx * 128) as u16;
            let response = bridge.setup(&Setup::write_buffer(offset, chunk.len() as u16));
            assert_eq!(
                response,
                Response::ReceiveData {
                    accepted: chunk.len() as u16
                }
            );
            assert!(bridge.data(chunk));
        }
        assert_eq!(bridge.buffer().as_bytes(), &bytes[..]);
    }

    #[test]
    fn over_length_write_is_clamped() {
        let mut bridge = Bridge::<FRAME_LEN>::new();
        let response = bridge.setup(&Setup::write_buffer(640, 100));
        assert_eq!(response, Response::ReceiveData { accepted: 8 });

        assert!(bridge.data(&[0xEE; 100]));
        assert!(bridge.data(&[0xDD; 100]));

        let frame = bridge.buffer().as_bytes();
        assert!(frame[..640].iter().all(|&b| b == 0));
        assert!(frame[640..].iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let mut bridge = Bridge::<FRAME_LEN>::new();
        bridge.setup(&Setup::write_buffer(0, 4));
        bridge.data(&[1, 2]);

        let response = bridge.setup(&Setup::write_buffer(700, 4));
        assert_eq!(response, Response::NoData);
        let response = bridge.setup(&Setup::write_buffer(648, 1));
        assert_eq!(response, Response::NoData);

        // The rejected request doesn't disturb the transfer in progress.
        assert_eq!(bridge.cursor().remaining(), 2);
        assert!(bridge.data(&[3, 4]));
        assert_eq!(&bridge.buffer().as_bytes()[..5], &[1, 2, 3, 4, 0]);
        assert!(!bridge.is_commit_pending());
    }

    #[test]
    fn update_leds_is_idempotent() {
        let mut bridge = Bridge::<FRAME_LEN>::new();
        assert_eq!(bridge.status(), Status::IDLE);

        assert_eq!(bridge.setup(&Setup::update_leds()), Response::NoData);
        assert!(bridge.is_commit_pending());
        assert_eq!(bridge.status(), Status::PENDING);

        assert_eq!(bridge.setup(&Setup::update_leds()), Response::NoData);
        assert!(bridge.is_commit_pending());
        assert_eq!(bridge.status(), Status::PENDING);

        bridge.complete_commit();
        assert!(!bridge.is_commit_pending());
        assert_eq!(bridge.status(), Status::IDLE);
    }

    #[test]
    fn unknown_requests_are_ignored() {
        let mut bridge = Bridge::<FRAME_LEN>::new();
        for request in 2..=u8::MAX {
            let setup = Setup {
                request,
                index: 0,
                length: 16,
            };
            assert_eq!(bridge.setup(&setup), Response::NoData);
        }
        assert!(!bridge.is_commit_pending());
        assert!(bridge.cursor().is_complete());
        assert!(bridge.data(&[0xFF; 16]));
        assert!(bridge.buffer().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn data_without_setup_is_dropped() {
        let mut bridge = Bridge::<FRAME_LEN>::new();
        assert!(bridge.data(&[0xFF; 32]));
        assert!(bridge.buffer().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn device_side_frames_bypass_the_cursor() {
        let mut bridge = Bridge::<FRAME_LEN>::new();
        bridge.buffer_mut().set_pixel(2, 0, [0xFF, 0x00, 0x00]);

        assert_eq!(bridge.buffer().pixel(2, 0), Some([0xFF, 0x00, 0x00]));
        assert!(bridge.cursor().is_complete());
        assert!(!bridge.is_commit_pending());
    }
}
