//! Lock-free single-producer / single-consumer byte ring
//!
//! The ring sits between the receive context (which must never block) and
//! the parsing task. One slot is always left unused so that "empty"
//! (`write == read`) and "full" (`write + 1 == read`) are distinguishable;
//! a ring declared with `N` slots therefore holds at most `N - 1` bytes.
//!
//! ```text
//!            read               write
//!              ▼                  ▼
//! ┌──────────┬──────────────────┬───────────────────┐
//! │ consumed │   readable data  │  free (one spare) │
//! └──────────┴──────────────────┴───────────────────┘
//! ```
//!
//! # Concurrency
//!
//! Only the producer stores `write` and only the consumer stores `read`.
//! Each side publishes its index with `Release` and observes the other's
//! with `Acquire`, so a slot is never read before it is written nor
//! overwritten before it is read. Calling [`write`](RingBuffer::write) from
//! more than one context at a time is not supported.

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Fixed-capacity SPSC byte queue with `N` slots (`N - 1` usable)
pub struct RingBuffer<const N: usize> {
    slots: [AtomicU8; N],
    write: AtomicUsize,
    read: AtomicUsize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty ring
    ///
    /// `const` so the ring can live in a `static` shared by both contexts.
    pub const fn new() -> Self {
        const { assert!(N >= 2, "a ring needs at least two slots") };
        Self {
            slots: [const { AtomicU8::new(0) }; N],
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
        }
    }

    /// Return both indices to 0, discarding any buffered bytes
    ///
    /// Only valid while neither the producer nor the consumer is running.
    pub fn reset(&self) {
        self.read.store(0, Ordering::Release);
        self.write.store(0, Ordering::Release);
    }

    #[inline]
    const fn advance(index: usize) -> usize {
        let next = index + 1;
        if next >= N {
            0
        } else {
            next
        }
    }

    /// Push one byte (producer side)
    ///
    /// Returns `false` and leaves the ring untouched when it is full.
    pub fn write(&self, byte: u8) -> bool {
        let write = self.write.load(Ordering::Relaxed);
        let next = Self::advance(write);

        if next == self.read.load(Ordering::Acquire) {
            return false;
        }

        self.slots[write].store(byte, Ordering::Relaxed);
        self.write.store(next, Ordering::Release);
        true
    }

    /// Pop one byte (consumer side)
    ///
    /// Returns `None` when the ring is empty.
    pub fn read(&self) -> Option<u8> {
        let read = self.read.load(Ordering::Relaxed);

        if read == self.write.load(Ordering::Acquire) {
            return None;
        }

        let byte = self.slots[read].load(Ordering::Relaxed);
        self.read.store(Self::advance(read), Ordering::Release);
        Some(byte)
    }

    /// Push bytes in order until the ring fills up
    ///
    /// Returns the number of bytes accepted; the rest were not written.
    pub fn write_slice(&self, bytes: &[u8]) -> usize {
        let mut written = 0;
        for &byte in bytes {
            if !self.write(byte) {
                break;
            }
            written += 1;
        }
        written
    }

    /// Drain up to `buf.len()` bytes into `buf`
    ///
    /// Returns the number of bytes copied.
    pub fn read_into(&self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.read() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Check whether there is nothing to read
    pub fn is_empty(&self) -> bool {
        self.write.load(Ordering::Acquire) == self.read.load(Ordering::Acquire)
    }

    /// Check whether the next write would be rejected
    pub fn is_full(&self) -> bool {
        Self::advance(self.write.load(Ordering::Acquire)) == self.read.load(Ordering::Acquire)
    }

    /// Number of buffered bytes (a snapshot when the other side is active)
    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        (write + N - read) % N
    }

    /// Usable capacity, `N - 1`
    pub const fn capacity(&self) -> usize {
        N - 1
    }
}
