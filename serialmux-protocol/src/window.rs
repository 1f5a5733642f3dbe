//! Circular DMA window extraction
//!
//! A circular DMA channel keeps writing into a fixed buffer and only tells
//! us where it is now. On every receive event (idle line, half transfer,
//! transfer complete) the window computes which bytes appeared since the
//! previous event and pushes them into the [`RingBuffer`] in wire order:
//!
//! ```text
//! reported > last:           reported < last (wrapped):
//! ┌─────┬══════════┬─────┐   ┌══════┬───────────┬══════┐
//! │     │ new data │     │   │ new 2│           │ new 1│
//! └─────┴══════════┴─────┘   └══════┴───────────┴══════┘
//!       ▲          ▲                ▲           ▲
//!     last     reported          reported      last
//! ```
//!
//! The window runs in the receive context: it never blocks and never
//! retries. Bytes that do not fit in the ring are dropped and counted.

use serialmux_hal::uart::DmaRx;

use crate::ring::RingBuffer;

/// Result of processing one receive event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Extraction {
    /// Bytes pushed into the ring
    pub pushed: usize,
    /// Bytes discarded because the ring was full
    pub dropped: usize,
}

impl Extraction {
    /// Whether the event carried any new bytes at all
    pub fn is_empty(&self) -> bool {
        self.pushed == 0 && self.dropped == 0
    }
}

/// Tracks the last observed DMA write position
///
/// After the hardware receiver is restarted its position is back at 0; the
/// window must be [`reset`](DmaWindow::reset) at the same moment or the next
/// delta duplicates or skips bytes. [`recover`](DmaWindow::recover) does both.
#[derive(Debug)]
pub struct DmaWindow {
    capacity: usize,
    last: usize,
    dropped: u32,
}

impl DmaWindow {
    /// Create a window over a hardware buffer of `capacity` bytes
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            last: 0,
            dropped: 0,
        }
    }

    /// Hardware buffer size this window was created for
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Position the next extraction starts from
    pub fn last_position(&self) -> usize {
        self.last
    }

    /// Total bytes dropped since creation (wrapping)
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Forget the tracked position
    ///
    /// Must be called together with restarting the hardware receiver.
    pub fn reset(&mut self) {
        self.last = 0;
    }

    /// Push the bytes written since the last event into `ring`
    ///
    /// `dma` is the hardware buffer and `reported` the position the hardware
    /// will write next. A position equal to the buffer size is treated as
    /// the wrap boundary, i.e. as 0.
    pub fn extract<const N: usize>(
        &mut self,
        dma: &[u8],
        reported: usize,
        ring: &RingBuffer<N>,
    ) -> Extraction {
        let capacity = self.capacity.min(dma.len());
        let reported = reported.min(capacity);
        let mut extraction = Extraction::default();

        // Duplicate or spurious event: nothing new
        if reported == self.last {
            return extraction;
        }

        if reported > self.last {
            self.push_range(&dma[self.last..reported], ring, &mut extraction);
        } else {
            self.push_range(&dma[self.last..capacity], ring, &mut extraction);
            self.push_range(&dma[..reported], ring, &mut extraction);
        }

        self.last = if reported == capacity { 0 } else { reported };
        extraction
    }

    /// Extract using the receiver's current buffer and write position
    pub fn poll<R: DmaRx, const N: usize>(&mut self, rx: &R, ring: &RingBuffer<N>) -> Extraction {
        let reported = rx.write_position();
        self.extract(rx.buffer(), reported, ring)
    }

    /// Restart the receiver after an error and resynchronise the window
    ///
    /// The tracked position is reset even when the restart fails, since the
    /// hardware position is no longer meaningful either way.
    pub fn recover<R: DmaRx>(&mut self, rx: &mut R) -> Result<(), R::Error> {
        let result = rx.restart();
        self.reset();
        result
    }

    fn push_range<const N: usize>(
        &mut self,
        bytes: &[u8],
        ring: &RingBuffer<N>,
        extraction: &mut Extraction,
    ) {
        for &byte in bytes {
            if ring.write(byte) {
                extraction.pushed += 1;
            } else {
                extraction.dropped += 1;
                self.dropped = self.dropped.wrapping_add(1);
            }
        }
    }
}
