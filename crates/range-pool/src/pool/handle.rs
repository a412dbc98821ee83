use core::fmt;

use portable_atomic::{AtomicU64, Ordering};

/// Source of process-unique pool identities.
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_pool_id() -> u64 {
    NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a worker registered in a [`RangePool`].
///
/// Returned by [`RangePool::get_worker`] and accepted by every per-worker pool
/// operation. A handle only resolves on the pool that issued it, and only
/// until that pool is disposed. Clones and restored copies of a pool are
/// separate pools with their own handles.
///
/// [`RangePool`]: crate::RangePool
/// [`RangePool::get_worker`]: crate::RangePool::get_worker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId {
    pub(crate) pool: u64,
    pub(crate) generation: u64,
    pub(crate) index: usize,
}

impl WorkerId {
    pub(crate) const fn new(pool: u64, generation: u64, index: usize) -> Self {
        Self {
            pool,
            generation,
            index,
        }
    }

    /// Registration order of the worker within its pool generation.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}.{}", self.pool, self.generation, self.index)
    }
}
