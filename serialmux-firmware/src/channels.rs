//! Inter-task communication
//!
//! The receive task is the only writer of [`RX_RING`] and the console task
//! the only reader. [`DATA_READY`] wakes the console after each receive
//! event; several events before the console runs collapse into one wake-up.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use serialmux_protocol::RingBuffer;

use crate::board::RING_CAPACITY;

/// Bytes received but not yet dispatched
pub static RX_RING: RingBuffer<RING_CAPACITY> = RingBuffer::new();

/// Signal that new bytes were pushed into [`RX_RING`]
pub static DATA_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
