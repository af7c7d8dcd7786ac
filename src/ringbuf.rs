//! Fixed-capacity ring buffer for sample streams.
//!
//! Retains the last N pushed samples, N being the capacity chosen at
//! construction. Samples are stored in one contiguous block that is treated
//! as circular:
//! * Pushing more than the free space overwrites the oldest samples
//! * Pushing more than the capacity keeps only the trailing samples
//! * Popping drains from the oldest end and may return fewer samples than
//!   requested
//!
//! # Segments
//!
//! Because storage is contiguous but logically circular, any run of samples
//! maps onto at most two physical spans: a bottom segment ending at the
//! physical end of storage and a wrap segment starting at index 0. Both
//! `push` and `pop` therefore perform at most two bulk copies and run in
//! time proportional to the number of samples moved, never to the capacity.
//!
//! # Example
//!
//! ```rust
//! use sample_ring::RingBuffer;
//!
//! let mut ring = RingBuffer::<i16>::new(4)?;
//! ring.push(&[1, 2, 3, 4, 5, 6]);
//!
//! let mut out = [0; 8];
//! assert_eq!(ring.pop(&mut out), 4);
//! assert_eq!(out[..4], [3, 4, 5, 6]);
//! ```

use std::{fmt, ops::Range};

use crate::error::{Error, Result};

/// A fixed-capacity circular buffer of copyable samples.
///
/// Keeps the most recent `capacity` samples in FIFO order:
/// * `push` appends, overwriting the oldest samples when full
/// * `pop` copies out and removes the oldest samples
/// * Never allocates after construction
///
/// The buffer has a single owner; both mutating operations take `&mut self`,
/// so sharing it between a producer and a consumer requires an external lock.
#[derive(Clone)]
pub struct RingBuffer<T> {
    /// Physical storage, exactly `capacity` samples long.
    storage: Box<[T]>,

    /// Number of valid samples.
    len: usize,

    /// Physical index of the oldest valid sample.
    read: usize,

    /// Physical index where the next pushed sample lands.
    ///
    /// Equals `read` whenever the buffer is empty or full.
    write: usize,
}

impl<T> RingBuffer<T>
where
    T: Copy + Default,
{
    /// Creates an empty ring buffer with storage initialized to `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InvalidConfiguration` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::filled(capacity, T::default())
    }

    /// Resets the buffer to its initial state.
    ///
    /// Sets all storage to `T::default()` and both offsets to 0.
    pub fn reset(&mut self) {
        debug!("resetting ring buffer holding {} samples", self.len);
        self.storage.fill(T::default());
        self.len = 0;
        self.read = 0;
        self.write = 0;
    }
}

impl<T> RingBuffer<T>
where
    T: Copy,
{
    /// Creates an empty ring buffer with storage initialized to `value`.
    ///
    /// For element types without a sensible default.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InvalidConfiguration` if `capacity` is zero.
    pub fn filled(capacity: usize, value: T) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_configuration(
                "ring buffer capacity must be at least one sample",
            ));
        }

        debug!("allocating ring buffer for {capacity} samples");
        Ok(Self {
            storage: vec![value; capacity].into_boxed_slice(),
            len: 0,
            read: 0,
            write: 0,
        })
    }

    /// Maximum number of samples the buffer retains.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of valid samples currently stored.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Number of samples that can be pushed before the oldest are overwritten.
    #[must_use]
    #[inline]
    pub fn available(&self) -> usize {
        self.capacity() - self.len
    }

    /// Physical index of the oldest valid sample.
    #[must_use]
    #[inline]
    pub fn read_offset(&self) -> usize {
        self.read
    }

    /// Physical index where the next pushed sample will be written.
    #[must_use]
    #[inline]
    pub fn write_offset(&self) -> usize {
        self.write
    }

    /// Raw physical storage, including slots that hold no valid sample.
    #[must_use]
    #[inline]
    pub fn storage(&self) -> &[T] {
        &self.storage
    }

    /// Splits `count` slots starting at physical index `start` into the
    /// bottom and wrap segments.
    ///
    /// `count` must not exceed the capacity.
    #[inline]
    fn segments(&self, start: usize, count: usize) -> (Range<usize>, Range<usize>) {
        let bottom = count.min(self.capacity() - start);
        (start..start + bottom, 0..count - bottom)
    }

    /// Pushes samples at the logical end of the buffer.
    ///
    /// When `samples` is longer than the capacity, only its last `capacity`
    /// samples are written: the earlier ones would be overwritten before they
    /// could ever be read. When the push exceeds the free space, the oldest
    /// samples are overwritten and the read offset follows the write offset.
    ///
    /// Pushing an empty slice is a no-op.
    ///
    /// # Arguments
    ///
    /// * `samples` - Samples to append, oldest first
    pub fn push(&mut self, samples: &[T]) {
        let capacity = self.capacity();
        let skipped = samples.len().saturating_sub(capacity);
        let samples = &samples[skipped..];
        let count = samples.len();
        if count == 0 {
            return;
        }

        if skipped > 0 {
            trace!("push exceeds capacity of {capacity}: dropping {skipped} leading samples");
        }

        let (bottom, wrap) = self.segments(self.write, count);
        let (head, tail) = samples.split_at(bottom.len());
        self.storage[bottom].copy_from_slice(head);
        self.storage[wrap].copy_from_slice(tail);
        self.write = (self.write + count) % capacity;

        // Fullness is decided after the whole push: whatever survived starts
        // right where the next write will land.
        let overwritten = (self.len + count).saturating_sub(capacity);
        if overwritten > 0 {
            trace!("overwrote {overwritten} unread samples");
        }
        self.len = (self.len + count).min(capacity);
        if self.len == capacity {
            self.read = self.write;
        }
    }

    /// Copies the oldest samples into `out` and removes them from the buffer.
    ///
    /// Copies `min(out.len(), self.len())` samples; the rest of `out` is left
    /// untouched. Requesting more than is available is not an error.
    ///
    /// # Returns
    ///
    /// The number of samples written to the start of `out`.
    pub fn pop(&mut self, out: &mut [T]) -> usize {
        if self.len == 0 {
            return 0;
        }

        let count = self.copy_oldest(out);
        self.read = (self.read + count) % self.capacity();
        self.len -= count;
        count
    }

    /// Copies the oldest samples into `out` without removing them.
    ///
    /// # Returns
    ///
    /// The number of samples written to the start of `out`.
    pub fn peek(&self, out: &mut [T]) -> usize {
        if self.len == 0 {
            return 0;
        }

        self.copy_oldest(out)
    }

    /// Removes up to `count` of the oldest samples without copying them.
    ///
    /// # Returns
    ///
    /// The number of samples removed.
    pub fn discard(&mut self, count: usize) -> usize {
        let count = count.min(self.len);
        self.read = (self.read + count) % self.capacity();
        self.len -= count;
        count
    }

    fn copy_oldest(&self, out: &mut [T]) -> usize {
        let count = out.len().min(self.len);
        let (bottom, wrap) = self.segments(self.read, count);

        let mut copied = 0;
        for segment in [bottom, wrap] {
            let run = segment.len();
            out[copied..copied + run].copy_from_slice(&self.storage[segment]);
            copied += run;
        }

        copied
    }

    /// Retrieves a sample by age.
    ///
    /// Index 0 returns the most recently pushed sample, index 1 the one
    /// before it, and so on.
    ///
    /// # Returns
    ///
    /// The sample, or `None` if `index` is not less than `len()`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }

        let capacity = self.capacity();
        Some(self.storage[(self.write + capacity - 1 - index) % capacity])
    }

    /// Returns the valid samples as two contiguous slices.
    ///
    /// The first slice holds the oldest samples; the second is empty unless
    /// the contents wrap around the physical end of storage.
    #[must_use]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (bottom, wrap) = self.segments(self.read, self.len);
        (&self.storage[bottom], &self.storage[wrap])
    }

    /// Iterates over the valid samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (older, newer) = self.as_slices();
        older.iter().chain(newer).copied()
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.storage.len())
            .field("len", &self.len)
            .field("read", &self.read)
            .field("write", &self.write)
            .finish_non_exhaustive()
    }
}
