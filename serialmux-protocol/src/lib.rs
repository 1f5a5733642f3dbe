//! Serial receive path and protocol demultiplexer
//!
//! This crate turns a circular-DMA UART byte stream into decoded frames and
//! executed commands. Two protocols share the wire:
//!
//! ```text
//! Line protocol (human typed):
//!   LED ON\r\n
//!   └┬┘ └┬┘└┬─┘
//!  name args terminator (\r or \n)
//!
//! Binary protocol:
//! ┌────────┬────────┬────────┬────────┬─────┬─────┬─────────────┬──────────┐
//! │ HEADER │ DEV_ID │ SYS_ID │ MSG_ID │ SEQ │ LEN │ PAYLOAD     │ CHECKSUM │
//! │ 0xEF   │ 1B     │ 1B     │ 1B     │ 1B  │ 1B  │ 0–254B      │ 1B       │
//! └────────┴────────┴────────┴────────┴─────┴─────┴─────────────┴──────────┘
//!   CHECKSUM = wrapping 8-bit sum of every preceding byte, HEADER included
//! ```
//!
//! Data path:
//!
//! ```text
//! DMA write position ──► DmaWindow ──► RingBuffer ──► Dispatcher ─┬─► FrameParser ──► FrameHandler
//!        (producer context, never blocks)   (consumer context)    └─► LineParser ───► CommandTable
//! ```
//!
//! The dispatcher classifies a frame from its first byte only and assumes the
//! two protocols never interleave on the wire.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod dispatch;
pub mod frame;
pub mod line;
pub mod ring;
pub mod window;

pub use command::{Command, CommandError, CommandTable, Handler};
pub use dispatch::{DispatchState, Dispatcher, Outcome};
pub use frame::{
    Frame, FrameError, FrameHandler, FrameParser, FrameStatus, FRAME_HEADER, MAX_FRAME_SIZE,
    MAX_PAYLOAD, MAX_PAYLOAD_SIZE,
};
pub use line::{LineOutcome, LineParser, DEFAULT_LINE_CAPACITY};
pub use ring::RingBuffer;
pub use window::{DmaWindow, Extraction};
