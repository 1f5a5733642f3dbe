//! Binary message catalogue
//!
//! The `msg_id` field of a [`Frame`] selects the message:
//!
//! | ID     | Name      | Payload        | Effect                       |
//! |--------|-----------|----------------|------------------------------|
//! | `0x01` | PING      | none           | answered with PONG           |
//! | `0x02` | PONG      | none           | sent, never received         |
//! | `0x10` | LED       | `[state]`      | 0 = off, anything else = on  |
//! | `0x11` | SERVO     | `[angle]`      | servo angle in degrees       |
//! | `0x51` | TELEMETRY | opaque         | counted                      |

use heapless::Vec;
use serialmux_protocol::Frame;

// Message type IDs: host -> board
pub const MSG_PING: u8 = 0x01;
pub const MSG_LED: u8 = 0x10;
pub const MSG_SERVO: u8 = 0x11;
pub const MSG_TELEMETRY: u8 = 0x51;

// Message type IDs: board -> host
pub const MSG_PONG: u8 = 0x02;

/// Reasons a checksum-valid frame carries no usable command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// No message is defined for this id
    UnknownMessage { msg_id: u8 },
    /// The message needs a payload byte and the frame has none
    MissingPayload { msg_id: u8 },
}

/// Commands decoded from host frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BinaryCommand {
    /// Liveness check
    Ping { sequence: u8 },
    /// Switch the status LED
    Led { on: bool },
    /// Move the servo
    Servo { angle: u8 },
    /// Telemetry sample, only its shape is kept
    Telemetry { sequence: u8, len: u8 },
}

impl BinaryCommand {
    /// Parse a command from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        let msg_id = frame.msg_id;
        let first = || {
            frame
                .payload
                .first()
                .copied()
                .ok_or(MessageError::MissingPayload { msg_id })
        };

        match msg_id {
            MSG_PING => Ok(BinaryCommand::Ping {
                sequence: frame.sequence,
            }),
            MSG_LED => Ok(BinaryCommand::Led { on: first()? != 0 }),
            MSG_SERVO => Ok(BinaryCommand::Servo { angle: first()? }),
            MSG_TELEMETRY => Ok(BinaryCommand::Telemetry {
                sequence: frame.sequence,
                len: frame.payload_len(),
            }),
            _ => Err(MessageError::UnknownMessage { msg_id }),
        }
    }
}

/// Answer to a PING: same addressing and sequence, no payload
pub fn pong(request: &Frame) -> Frame {
    Frame {
        device_id: request.device_id,
        system_id: request.system_id,
        msg_id: MSG_PONG,
        sequence: request.sequence,
        payload: Vec::new(),
    }
}
