//! Fixed-capacity circular buffer for single-producer/single-consumer streams.
//!
//! [`RingBuf`] is a FIFO queue over a fixed array with wraparound head/tail
//! offsets. It performs no heap allocation and is `no_std`, which makes it
//! suitable for sharing a byte stream between mainline code and an interrupt
//! service routine: one side only pushes (moving `head`), the other only pops
//! (moving `tail`), so each single-word offset is written from exactly one
//! context.
//!
//! # Capacity
//!
//! The backing array has `N` slots but the usable capacity is `N - 1`: one
//! slot stays permanently unused so that `head == tail` unambiguously means
//! empty and `(head + 1) % N == tail` means full. A consequence is that
//! [`spare`](RingBuf::spare) never reports less than 1 — a return of 1 means
//! the buffer is full.
//!
//! # Examples
//!
//! ```
//! use muon_ringbuf::RingBuf;
//!
//! let mut buf = RingBuf::<u8, 8>::new();
//! buf.try_push(b'a').unwrap();
//! buf.try_push(b'b').unwrap();
//!
//! assert_eq!(buf.pop(), Some(b'a'));
//! assert_eq!(buf.pop(), Some(b'b'));
//! assert_eq!(buf.pop(), None);
//! ```

#![no_std]

use core::mem::MaybeUninit;

/// A fixed-capacity FIFO circular buffer with wraparound offsets.
///
/// `head` is the next write slot, `tail` the next read slot; both stay in
/// `[0, N)`. Usable capacity is `N - 1` (see the crate docs for why).
///
/// The offsets are plain `usize` updated by exactly one side each under the
/// SPSC discipline; on a preemptible multi-core target the *caller* must
/// serialize access, the buffer itself carries no synchronization.
pub struct RingBuf<T: Copy, const N: usize> {
    slots: [MaybeUninit<T>; N],
    /// Next slot to write. Advanced only by the producer.
    head: usize,
    /// Next slot to read. Advanced only by the consumer.
    tail: usize,
}

impl<T: Copy, const N: usize> Default for RingBuf<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> RingBuf<T, N> {
    /// Creates an empty buffer. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { MaybeUninit::uninit() }; N],
            head: 0,
            tail: 0,
        }
    }

    /// Returns the usable capacity, `N - 1`.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Returns `true` if no elements are buffered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns `true` if the buffer holds `N - 1` elements.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        (self.head + 1) % N == self.tail
    }

    /// Returns the number of buffered elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.head + N - self.tail) % N
    }

    /// Returns the number of free slots, counting the reserved one.
    ///
    /// Reports `N - len()`, so the minimum is 1: a return of 1 means the
    /// buffer is full. This matches what a flow-control threshold compares
    /// against.
    #[must_use]
    pub const fn spare(&self) -> usize {
        N - self.len()
    }

    /// Appends an element at `head`.
    ///
    /// # Errors
    ///
    /// Returns the element back if the buffer is full; the offsets are left
    /// unchanged.
    pub fn try_push(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        self.slots[self.head].write(value);
        self.head = (self.head + 1) % N;
        Ok(())
    }

    /// Removes and returns the oldest element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: head != tail, so the slot at `tail` was written by an
        // earlier `try_push` and has not been popped since.
        let value = unsafe { self.slots[self.tail].assume_init_read() };
        self.tail = (self.tail + 1) % N;
        Some(value)
    }

    /// Discards all buffered elements by resetting both offsets to zero.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let buf = RingBuf::<u8, 16>::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 15);
    }

    #[test]
    fn fifo_order() {
        let mut buf = RingBuf::<u8, 8>::new();
        for byte in [10, 20, 30] {
            buf.try_push(byte).unwrap();
        }
        assert_eq!(buf.pop(), Some(10));
        assert_eq!(buf.pop(), Some(20));
        assert_eq!(buf.pop(), Some(30));
        assert_eq!(buf.pop(), None);
    }

    #[test]
    fn full_detection() {
        let mut buf = RingBuf::<u8, 4>::new();
        buf.try_push(1).unwrap();
        buf.try_push(2).unwrap();
        assert!(!buf.is_full());
        buf.try_push(3).unwrap();
        assert!(buf.is_full());
        assert_eq!(buf.try_push(4), Err(4));
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn spare_is_never_zero() {
        let mut buf = RingBuf::<u8, 32>::new();
        assert_eq!(buf.spare(), 32);
        for i in 0..31 {
            buf.try_push(i).unwrap();
        }
        assert!(buf.is_full());
        assert_eq!(buf.spare(), 1);
    }

    #[test]
    fn spare_tracks_occupancy() {
        let mut buf = RingBuf::<u8, 64>::new();
        for i in 0..48 {
            buf.try_push(i).unwrap();
        }
        assert_eq!(buf.spare(), 16);
        let _ = buf.pop();
        assert_eq!(buf.spare(), 17);
    }

    #[test]
    fn wraps_around_repeatedly() {
        let mut buf = RingBuf::<u8, 4>::new();
        for round in 0u8..10 {
            buf.try_push(round).unwrap();
            buf.try_push(round.wrapping_add(1)).unwrap();
            assert_eq!(buf.pop(), Some(round));
            assert_eq!(buf.pop(), Some(round.wrapping_add(1)));
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn clear_resets_offsets() {
        let mut buf = RingBuf::<u8, 8>::new();
        for i in 0..5 {
            buf.try_push(i).unwrap();
        }
        let _ = buf.pop();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.spare(), 8);
        // Offsets are back at zero, so a fresh fill works as from new.
        buf.try_push(42).unwrap();
        assert_eq!(buf.pop(), Some(42));
    }
}
