//! Fixed-capacity ring buffer for sample streams.
//!
//! Retains the N most recently pushed samples of a stream, overwriting the
//! oldest once full. Built for audio-style workloads where producers push
//! blocks of samples and consumers drain whatever is available.
//!
//! # Modules
//!
//! * [`ringbuf`] - The [`RingBuffer`] itself
//! * [`error`] - Error type and result alias
//! * [`soak`] - Randomized consistency checks against a reference queue
//!
//! # Logging
//!
//! Logs through the [`log`] facade:
//! * `debug` - Allocation and reset
//! * `trace` - Truncated pushes and overwritten samples
//!
//! No logger is installed by the library.

#[macro_use]
extern crate log;

pub mod error;
pub mod ringbuf;
pub mod soak;

pub use error::{Error, ErrorKind, Result};
pub use ringbuf::RingBuffer;
