//! Binary frame encoding and decoding
//!
//! Frame format:
//! - HEADER (1 byte): 0xEF synchronization byte
//! - DEVICE_ID, SYSTEM_ID, MSG_ID, SEQ (1 byte each)
//! - LEN (1 byte): payload length, must be below [`MAX_PAYLOAD`]
//! - PAYLOAD (LEN bytes)
//! - CHECKSUM (1 byte): wrapping sum of HEADER, the four IDs, LEN and PAYLOAD

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_HEADER: u8 = 0xEF;

/// Exclusive upper bound for the LEN field
///
/// A LEN byte at or above this value aborts the frame.
pub const MAX_PAYLOAD: usize = 255;

/// Largest payload a frame can carry
pub const MAX_PAYLOAD_SIZE: usize = MAX_PAYLOAD - 1;

/// Maximum complete frame size (HEADER + 4 IDs + LEN + payload + CHECKSUM)
pub const MAX_FRAME_SIZE: usize = 1 + 4 + 1 + MAX_PAYLOAD_SIZE + 1;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// LEN byte is at or above [`MAX_PAYLOAD`]
    PayloadTooLarge { len: usize },
    /// Received checksum does not match the accumulated one
    ChecksumMismatch { computed: u8, received: u8 },
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A decoded or constructed binary frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub device_id: u8,
    pub system_id: u8,
    pub msg_id: u8,
    pub sequence: u8,
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame
    pub fn new(
        device_id: u8,
        system_id: u8,
        msg_id: u8,
        sequence: u8,
        payload: &[u8],
    ) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge {
            len: payload.len(),
        })?;

        Ok(Self {
            device_id,
            system_id,
            msg_id,
            sequence,
            payload,
        })
    }

    /// Payload length as carried in the LEN byte
    pub fn payload_len(&self) -> u8 {
        self.payload.len() as u8
    }

    /// Checksum this frame is sent with
    pub fn checksum(&self) -> u8 {
        let header = [
            FRAME_HEADER,
            self.device_id,
            self.system_id,
            self.msg_id,
            self.sequence,
            self.payload_len(),
        ];
        header
            .iter()
            .chain(self.payload.iter())
            .fold(0u8, |sum, &byte| sum.wrapping_add(byte))
    }

    /// Number of bytes [`encode`](Frame::encode) writes
    pub fn encoded_len(&self) -> usize {
        7 + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let payload_end = 6 + self.payload.len();
        buffer[0] = FRAME_HEADER;
        buffer[1] = self.device_id;
        buffer[2] = self.system_id;
        buffer[3] = self.msg_id;
        buffer[4] = self.sequence;
        buffer[5] = self.payload_len();
        buffer[6..payload_end].copy_from_slice(&self.payload);
        buffer[payload_end] = self.checksum();

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Receiver of checksum-verified frames
///
/// The frame is only borrowed for the duration of the call; the parser
/// reuses its storage for the next frame.
pub trait FrameHandler {
    fn on_frame(&mut self, frame: &Frame);
}

/// Result of feeding one byte to the [`FrameParser`]
#[derive(Debug, PartialEq, Eq)]
pub enum FrameStatus<'a> {
    /// The frame is still being received (or no frame has started)
    Pending,
    /// A frame completed and its checksum matched
    Complete(&'a Frame),
    /// The frame was discarded
    Rejected(FrameError),
}

impl FrameStatus<'_> {
    /// True on the byte that completes or aborts a frame
    pub fn is_finished(&self) -> bool {
        !matches!(self, FrameStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum ParseState {
    /// Discarding bytes until HEADER
    WaitHeader,
    /// Reading DEVICE_ID, SYSTEM_ID, MSG_ID, SEQ; holds how many are done
    ReadIds(u8),
    /// Waiting for LEN
    ReadLen,
    /// Reading payload bytes
    ReadPayload,
    /// Waiting for CHECKSUM
    ReadChecksum,
}

/// State machine for parsing incoming binary frames
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    frame: Frame,
    expected_len: usize,
    checksum: u8,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitHeader,
            frame: Frame::default(),
            expected_len: 0,
            checksum: 0,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitHeader;
        self.frame = Frame::default();
        self.expected_len = 0;
        self.checksum = 0;
    }

    /// Whether the parser is between frames
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitHeader
    }

    /// Feed a single byte to the parser
    ///
    /// Returns [`FrameStatus::Pending`] for every byte that does not end a
    /// frame, including the HEADER byte itself.
    pub fn feed(&mut self, byte: u8) -> FrameStatus<'_> {
        match self.state {
            ParseState::WaitHeader => {
                // Silently ignore non-HEADER bytes while waiting
                if byte == FRAME_HEADER {
                    self.checksum = FRAME_HEADER;
                    self.frame.payload.clear();
                    self.state = ParseState::ReadIds(0);
                }
                FrameStatus::Pending
            }
            ParseState::ReadIds(index) => {
                match index {
                    0 => self.frame.device_id = byte,
                    1 => self.frame.system_id = byte,
                    2 => self.frame.msg_id = byte,
                    _ => self.frame.sequence = byte,
                }
                self.checksum = self.checksum.wrapping_add(byte);
                self.state = if index >= 3 {
                    ParseState::ReadLen
                } else {
                    ParseState::ReadIds(index + 1)
                };
                FrameStatus::Pending
            }
            ParseState::ReadLen => {
                self.checksum = self.checksum.wrapping_add(byte);
                let len = byte as usize;
                if len >= MAX_PAYLOAD {
                    self.state = ParseState::WaitHeader;
                    return FrameStatus::Rejected(FrameError::PayloadTooLarge { len });
                }

                self.expected_len = len;
                self.state = if len == 0 {
                    ParseState::ReadChecksum
                } else {
                    ParseState::ReadPayload
                };
                FrameStatus::Pending
            }
            ParseState::ReadPayload => {
                // Cannot fail: expected_len < MAX_PAYLOAD was checked above
                let _ = self.frame.payload.push(byte);
                self.checksum = self.checksum.wrapping_add(byte);
                if self.frame.payload.len() >= self.expected_len {
                    self.state = ParseState::ReadChecksum;
                }
                FrameStatus::Pending
            }
            ParseState::ReadChecksum => {
                self.state = ParseState::WaitHeader;
                if byte == self.checksum {
                    FrameStatus::Complete(&self.frame)
                } else {
                    FrameStatus::Rejected(FrameError::ChecksumMismatch {
                        computed: self.checksum,
                        received: byte,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry() -> Frame {
        Frame::new(1, 2, 0x51, 7, &[0xAA, 0xBB]).unwrap()
    }

    /// Feed bytes, collecting every completed frame and every rejection
    fn run(parser: &mut FrameParser, bytes: &[u8]) -> (std::vec::Vec<Frame>, std::vec::Vec<FrameError>) {
        let mut frames = std::vec::Vec::new();
        let mut errors = std::vec::Vec::new();
        for &byte in bytes {
            match parser.feed(byte) {
                FrameStatus::Pending => {}
                FrameStatus::Complete(frame) => frames.push(frame.clone()),
                FrameStatus::Rejected(e) => errors.push(e),
            }
        }
        (frames, errors)
    }

    #[test]
    fn test_encode_layout() {
        let encoded = telemetry().encode_to_vec().unwrap();
        let sum = (0xEFu32 + 1 + 2 + 0x51 + 7 + 2 + 0xAA + 0xBB) as u8;
        assert_eq!(
            encoded.as_slice(),
            &[FRAME_HEADER, 1, 2, 0x51, 7, 2, 0xAA, 0xBB, sum]
        );
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut buf = [0u8; 8];
        assert_eq!(telemetry().encode(&mut buf), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let payload = [0u8; MAX_PAYLOAD];
        assert_eq!(
            Frame::new(0, 0, 0, 0, &payload),
            Err(FrameError::PayloadTooLarge { len: MAX_PAYLOAD })
        );
    }

    #[test]
    fn test_frame_roundtrip() {
        let encoded = telemetry().encode_to_vec().unwrap();
        let mut parser = FrameParser::new();

        let last = encoded.len() - 1;
        for &byte in &encoded[..last] {
            assert_eq!(parser.feed(byte), FrameStatus::Pending);
        }

        match parser.feed(encoded[last]) {
            FrameStatus::Complete(frame) => {
                assert_eq!(frame.device_id, 1);
                assert_eq!(frame.system_id, 2);
                assert_eq!(frame.msg_id, 0x51);
                assert_eq!(frame.sequence, 7);
                assert_eq!(frame.payload.as_slice(), &[0xAA, 0xBB]);
            }
            other => panic!("expected a complete frame, got {:?}", other),
        }
        assert!(parser.is_idle());
    }

    #[test]
    fn test_corrupted_payload_fails_checksum() {
        let encoded = telemetry().encode_to_vec().unwrap();

        let last = encoded.len() - 1;

        for index in 6..last {
            let mut corrupted = encoded.clone();
            corrupted[index] ^= 0x01;
            let computed = corrupted[..last]
                .iter()
                .fold(0u8, |sum, &byte| sum.wrapping_add(byte));

            let mut parser = FrameParser::new();
            let (frames, errors) = run(&mut parser, &corrupted);
            assert!(frames.is_empty());
            assert_eq!(
                errors,
                std::vec![FrameError::ChecksumMismatch {
                    computed,
                    received: encoded[last],
                }]
            );
        }
    }

    #[test]
    fn test_empty_payload_skips_to_checksum() {
        let frame = Frame::new(9, 9, 0x01, 0, &[]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();
        assert_eq!(encoded.len(), 7);

        let mut parser = FrameParser::new();
        let (frames, errors) = run(&mut parser, &encoded);
        assert!(errors.is_empty());
        assert_eq!(frames, std::vec![frame]);
    }

    #[test]
    fn test_length_guard_aborts_after_len_byte() {
        let mut parser = FrameParser::new();
        for &byte in &[FRAME_HEADER, 1, 2, 3, 4] {
            assert_eq!(parser.feed(byte), FrameStatus::Pending);
        }

        assert_eq!(
            parser.feed(255),
            FrameStatus::Rejected(FrameError::PayloadTooLarge { len: 255 })
        );
        assert!(parser.is_idle());

        // Trailing bytes are ignored until the next header
        assert_eq!(parser.feed(0x00), FrameStatus::Pending);
        assert!(parser.is_idle());
    }

    #[test]
    fn test_largest_valid_payload() {
        let payload = [0x5Au8; MAX_PAYLOAD_SIZE];
        let frame = Frame::new(1, 1, 0x20, 3, &payload).unwrap();
        let encoded = frame.encode_to_vec().unwrap();
        assert_eq!(encoded.len(), MAX_FRAME_SIZE);

        let mut parser = FrameParser::new();
        let (frames, errors) = run(&mut parser, &encoded);
        assert!(errors.is_empty());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload.len(), MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn test_resync_after_garbage() {
        let encoded = telemetry().encode_to_vec().unwrap();
        let mut data = std::vec![0x00, 0x12, 0x34, 0xFF];
        data.extend_from_slice(&encoded);

        let mut parser = FrameParser::new();
        let (frames, errors) = run(&mut parser, &data);
        assert!(errors.is_empty());
        assert_eq!(frames, std::vec![telemetry()]);
    }

    #[test]
    fn test_back_to_back_frames() {
        let first = telemetry();
        let second = Frame::new(3, 4, 0x10, 8, &[1]).unwrap();
        let mut data = first.encode_to_vec().unwrap().to_vec();
        data.extend_from_slice(&second.encode_to_vec().unwrap());

        let mut parser = FrameParser::new();
        let (frames, _) = run(&mut parser, &data);
        assert_eq!(frames, std::vec![first, second]);
    }

    #[test]
    fn test_reset_mid_frame() {
        let encoded = telemetry().encode_to_vec().unwrap();
        let mut parser = FrameParser::new();
        for &byte in &encoded[..4] {
            parser.feed(byte);
        }
        assert!(!parser.is_idle());

        parser.reset();
        assert!(parser.is_idle());

        let (frames, errors) = run(&mut parser, &encoded);
        assert!(errors.is_empty());
        assert_eq!(frames.len(), 1);
    }
}
