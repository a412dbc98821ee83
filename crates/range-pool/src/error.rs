use crate::{Limit, WorkerId};

/// A result type defaulting to the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `range-pool` can produce.
///
/// Every fallible operation reports its error synchronously and leaves the
/// pool and its workers exactly as they were before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A constructor, setter or record was given a value outside its domain.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input.
        reason: &'static str,
    },

    /// Advancing would move a worker's cursor past its limit.
    #[error("cannot advance {steps} steps, only {remaining} remaining")]
    OutOfRange {
        /// The rejected step count.
        steps: u64,
        /// What the worker had left.
        remaining: Limit,
    },

    /// A worker was requested from a pool whose every index is completed.
    #[error("pool of length {length} is exhausted")]
    PoolExhausted {
        /// Length of the exhausted pool.
        length: u64,
    },

    /// No parked worker can be resumed and the laziest active worker cannot
    /// be split any further.
    ///
    /// Raised when the split would produce a chunk smaller than
    /// [`PoolConfig::min_chunk`], or when the pool already holds
    /// [`PoolConfig::max_workers`] workers.
    ///
    /// [`PoolConfig::min_chunk`]: crate::PoolConfig::min_chunk
    /// [`PoolConfig::max_workers`]: crate::PoolConfig::max_workers
    #[error("pool is saturated, laziest worker has {remaining} remaining")]
    PoolSaturated {
        /// Remaining span of the laziest active worker.
        remaining: u64,
    },

    /// The handle does not address a worker of this pool, either because it
    /// came from another pool or because the pool was disposed since.
    #[error("unknown worker {0}")]
    UnknownWorker(WorkerId),
}

impl Error {
    pub(crate) const fn invalid(reason: &'static str) -> Self {
        Self::InvalidArgument { reason }
    }
}
