//! Randomized soak testing of the ring buffer.
//!
//! Drives a [`RingBuffer`] with random push and pop traffic and mirrors every
//! operation on a `VecDeque` reference model. After each step it verifies:
//! * Popped samples match the model
//! * The buffer holds exactly the model's samples, oldest first
//! * Read and write offsets agree with the buffer length
//!
//! Runs are reproducible: the same [`Config`] always produces the same
//! traffic.

use std::collections::VecDeque;

use crate::{
    error::{Error, Result},
    ringbuf::RingBuffer,
};

/// Fill value for pop destinations, used to detect writes past the returned count.
const UNTOUCHED: u32 = u32::MAX;

/// Soak run settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Ring buffer capacity in samples.
    pub capacity: usize,

    /// Number of push or pop operations to perform.
    pub iterations: u64,

    /// Largest push or pop request, in samples.
    ///
    /// May exceed the capacity to exercise truncation.
    pub max_chunk: usize,

    /// Seed for the traffic generator.
    pub seed: u64,
}

impl Config {
    /// Default ring buffer capacity: one second of 48 kHz stereo audio.
    pub const DEFAULT_CAPACITY: usize = 96_000;

    /// Default number of operations.
    pub const DEFAULT_ITERATIONS: u64 = 100_000;

    /// Default largest request: a typical audio callback period.
    pub const DEFAULT_MAX_CHUNK: usize = 4_096;

    /// Default traffic seed.
    pub const DEFAULT_SEED: u64 = 0x5EED;

    /// Checks that the settings describe a runnable soak.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InvalidConfiguration` if the capacity, iteration
    /// count or maximum chunk size is zero.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::invalid_configuration("capacity must be positive"));
        }
        if self.iterations == 0 {
            return Err(Error::invalid_configuration("iterations must be positive"));
        }
        if self.max_chunk == 0 {
            return Err(Error::invalid_configuration("max chunk must be positive"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            iterations: Self::DEFAULT_ITERATIONS,
            max_chunk: Self::DEFAULT_MAX_CHUNK,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// Counters collected during a soak run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Number of push operations.
    pub pushes: u64,

    /// Number of pop operations.
    pub pops: u64,

    /// Samples handed to `push`, including truncated ones.
    pub samples_pushed: u64,

    /// Samples returned by `pop`.
    pub samples_popped: u64,

    /// Samples lost to truncation or overwrite before being popped.
    pub samples_overwritten: u64,

    /// Times the write offset wrapped past the physical end of storage.
    pub laps: u64,
}

/// Runs a soak with the given settings.
///
/// # Errors
///
/// * `ErrorKind::InvalidConfiguration` - Settings failed validation
/// * `ErrorKind::Internal` - Buffer diverged from the reference model
pub fn run(config: &Config) -> Result<Report> {
    config.validate()?;
    debug!("starting soak: {config:?}");

    let mut ring = RingBuffer::<u32>::new(config.capacity)?;
    let mut model = VecDeque::<u32>::with_capacity(config.capacity);
    let mut rng = fastrand::Rng::with_seed(config.seed);
    let mut report = Report::default();

    let mut chunk = vec![0; config.max_chunk];
    let mut next_sample = 0u32;

    for iteration in 0..config.iterations {
        let request = rng.usize(0..=config.max_chunk);

        if rng.bool() {
            for slot in &mut chunk[..request] {
                *slot = next_sample;
                next_sample = (next_sample + 1) % UNTOUCHED;
            }

            let write_before = ring.write_offset();
            ring.push(&chunk[..request]);

            report.pushes += 1;
            report.samples_pushed += request as u64;
            let wrapped = write_before + request.min(config.capacity);
            report.laps += (wrapped / config.capacity) as u64;

            model.extend(&chunk[..request]);
            while model.len() > config.capacity {
                model.pop_front();
                report.samples_overwritten += 1;
            }
        } else {
            chunk.fill(UNTOUCHED);
            let popped = ring.pop(&mut chunk[..request]);

            report.pops += 1;
            report.samples_popped += popped as u64;

            let expected = request.min(model.len());
            if popped != expected {
                return Err(diverged(
                    iteration,
                    format!("popped {popped} samples, expected {expected}"),
                ));
            }
            if chunk[popped..request].iter().any(|&sample| sample != UNTOUCHED) {
                return Err(diverged(
                    iteration,
                    "pop wrote past the returned count".to_string(),
                ));
            }
            if !chunk[..popped].iter().copied().eq(model.drain(..popped)) {
                return Err(diverged(iteration, "popped samples out of order".to_string()));
            }
        }

        check_consistency(&ring, &model).map_err(|reason| diverged(iteration, reason))?;

        if (iteration + 1) % 10_000 == 0 {
            trace!(
                "soak iteration {}: {} of {} samples buffered",
                iteration + 1,
                ring.len(),
                ring.capacity()
            );
        }
    }

    debug!("soak finished: {report:?}");
    Ok(report)
}

/// Verifies the buffer against the reference model and its offset rules.
///
/// # Errors
///
/// Returns a description of the first mismatch found.
pub fn check_consistency(
    ring: &RingBuffer<u32>,
    model: &VecDeque<u32>,
) -> std::result::Result<(), String> {
    let capacity = ring.capacity();
    let len = ring.len();
    let read = ring.read_offset();
    let write = ring.write_offset();

    if len > capacity {
        return Err(format!("length {len} exceeds capacity {capacity}"));
    }
    if read >= capacity || write >= capacity {
        return Err(format!(
            "offsets out of range: read {read}, write {write}, capacity {capacity}"
        ));
    }
    if (write + capacity - read) % capacity != len % capacity {
        return Err(format!(
            "offsets disagree with length {len}: read {read}, write {write}"
        ));
    }
    if len != model.len() {
        return Err(format!("length {len}, expected {}", model.len()));
    }
    if !ring.iter().eq(model.iter().copied()) {
        return Err("contents differ from reference".to_string());
    }

    Ok(())
}

fn diverged(iteration: u64, reason: String) -> Error {
    error!("soak diverged at iteration {iteration}: {reason}");
    Error::internal(format!("iteration {iteration}: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn rejects_zero_settings() {
        let zero_capacity = Config {
            capacity: 0,
            ..Config::default()
        };
        assert_eq!(
            run(&zero_capacity).unwrap_err().kind,
            ErrorKind::InvalidConfiguration
        );

        let zero_chunk = Config {
            max_chunk: 0,
            ..Config::default()
        };
        assert_eq!(
            zero_chunk.validate().unwrap_err().kind,
            ErrorKind::InvalidConfiguration
        );

        let zero_iterations = Config {
            iterations: 0,
            ..Config::default()
        };
        assert!(zero_iterations.validate().is_err());
    }

    #[test]
    fn small_buffer_with_oversized_chunks() {
        let config = Config {
            capacity: 7,
            iterations: 5_000,
            max_chunk: 20,
            seed: 1,
        };
        let report = run(&config).unwrap();
        assert_eq!(report.pushes + report.pops, config.iterations);
        assert!(report.samples_overwritten > 0);
        assert!(report.laps > 0);
        assert!(report.samples_popped + report.samples_overwritten <= report.samples_pushed);
    }

    #[test]
    fn runs_are_reproducible() {
        let config = Config {
            capacity: 64,
            iterations: 2_000,
            max_chunk: 48,
            seed: 42,
        };
        assert_eq!(run(&config).unwrap(), run(&config).unwrap());
    }

    #[test]
    fn consistency_check_flags_mismatch() {
        let mut ring = RingBuffer::<u32>::new(4).unwrap();
        ring.push(&[1, 2, 3]);

        let model: VecDeque<u32> = [1, 2, 3].into_iter().collect();
        assert!(check_consistency(&ring, &model).is_ok());

        let wrong: VecDeque<u32> = [1, 2, 4].into_iter().collect();
        assert!(check_consistency(&ring, &wrong).is_err());

        let short: VecDeque<u32> = [1, 2].into_iter().collect();
        assert!(check_consistency(&ring, &short).is_err());
    }
}
