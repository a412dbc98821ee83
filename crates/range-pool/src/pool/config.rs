use core::num::{NonZeroU64, NonZeroUsize};

/// Allocation tuning for a [`RangePool`].
///
/// The defaults reproduce the plain split-the-laziest policy: any worker with
/// two or more remaining indices may be split, and the number of workers is
/// unbounded.
///
/// # Example
/// ```
/// use core::num::{NonZeroU64, NonZeroUsize};
/// use range_pool::{PoolConfig, RangePool};
///
/// let config = PoolConfig::default()
///     .with_min_chunk(NonZeroU64::new(64).unwrap())
///     .with_max_workers(NonZeroUsize::new(8));
/// let pool = RangePool::with_config(4096, config)?;
/// assert_eq!(pool.config().max_workers, NonZeroUsize::new(8));
/// # Ok::<(), range_pool::Error>(())
/// ```
///
/// [`RangePool`]: crate::RangePool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    /// Smallest span a split may hand to a new worker.
    ///
    /// A laziest worker whose upper half would fall below this is not split
    /// and [`RangePool::get_worker`] reports [`Error::PoolSaturated`].
    ///
    /// [`RangePool::get_worker`]: crate::RangePool::get_worker
    /// [`Error::PoolSaturated`]: crate::Error::PoolSaturated
    pub min_chunk: NonZeroU64,

    /// Cap on the number of workers a pool may hold, `None` for no cap.
    ///
    /// Parked workers still count, and can still be resumed once the cap is
    /// reached.
    pub max_workers: Option<NonZeroUsize>,
}

impl PoolConfig {
    #[must_use]
    pub const fn with_min_chunk(mut self, min_chunk: NonZeroU64) -> Self {
        self.min_chunk = min_chunk;
        self
    }

    #[must_use]
    pub const fn with_max_workers(mut self, max_workers: Option<NonZeroUsize>) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub(crate) fn admits(&self, workers: usize) -> bool {
        self.max_workers.is_none_or(|max| workers < max.get())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_chunk: NonZeroU64::MIN,
            max_workers: None,
        }
    }
}
