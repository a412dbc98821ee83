use alloc::vec::Vec;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Limit, Metadata, PoolConfig, PoolRecord, RangeWorker, Result, WorkerId,
    pool::handle::next_pool_id, worker::percentage,
};

/// A live partition of `[0, length)` among [`RangeWorker`]s.
///
/// Workers are created lazily by [`RangePool::get_worker`]. Once the first one
/// exists, the workers' sub-ranges are disjoint and together cover the index
/// space exactly, completed sub-ranges included. Splitting only moves the tail
/// of one worker's remaining span into a new worker, so the total span never
/// changes.
///
/// ## Allocation policy
/// 1. A pool whose every index is completed refuses with
///    [`Error::PoolExhausted`].
/// 2. An empty pool creates one worker spanning the whole range.
/// 3. A parked (disposed) incomplete worker is resumed before anything new is
///    created.
/// 4. Otherwise the *laziest* active worker (most remaining, first registered
///    wins ties) is split at `current + ceil(remaining / 2)` and the upper
///    half goes to a new worker.
///
/// ## Features
/// - ❌ Not thread-safe, wrap it in a mutex to share it
/// - ✅ Parked workers keep their progress
/// - ✅ Serializable through [`PoolRecord`]
///
/// # Example
/// ```
/// use range_pool::RangePool;
///
/// let mut pool = RangePool::new(90)?;
/// let a = pool.get_worker()?;
/// pool.advance(a, 50)?;
/// pool.dispose_worker(a)?;
///
/// // The parked worker is handed out again, cursor untouched.
/// let b = pool.get_worker()?;
/// assert_eq!(a, b);
/// assert_eq!(pool.worker(b).map(|w| w.current_index()), Some(50));
/// # Ok::<(), range_pool::Error>(())
/// ```
#[derive(Debug)]
pub struct RangePool {
    id: u64,
    length: u64,
    pub(super) workers: Vec<RangeWorker>,
    pub(super) generation: u64,
    config: PoolConfig,
    metadata: Metadata,
}

impl RangePool {
    /// Creates an empty pool over `[0, length)` with the default
    /// [`PoolConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `length` is zero or unbounded.
    /// Open-ended work should be modelled as a sequence of finite pools.
    pub fn new(length: impl Into<Limit>) -> Result<Self> {
        Self::with_config(length, PoolConfig::default())
    }

    /// Creates an empty pool over `[0, length)` with the given allocation
    /// tuning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `length` is zero or unbounded.
    pub fn with_config(length: impl Into<Limit>, config: PoolConfig) -> Result<Self> {
        Ok(Self {
            id: next_pool_id(),
            length: validate_length(length.into())?,
            workers: Vec::new(),
            generation: 0,
            config,
            metadata: Metadata::new(),
        })
    }

    /// Rebuilds a pool from its serialized record.
    ///
    /// Workers keep the record's order and active flags. The pool gets the
    /// default [`PoolConfig`] and a fresh identity, so handles issued by the
    /// pool that produced the record do not resolve on it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if:
    /// - `length` is zero or unbounded
    /// - any worker record is invalid on its own
    /// - a worker reaches past `length`
    /// - a non-empty worker set does not tile `[0, length)` exactly
    pub fn from_record(record: PoolRecord) -> Result<Self> {
        let length = validate_length(record.length)?;
        let workers = record
            .workers
            .iter()
            .map(RangeWorker::from_record)
            .collect::<Result<Vec<_>>>()?;
        check_partition(length, &workers)?;
        Ok(Self {
            id: next_pool_id(),
            length,
            workers,
            generation: 0,
            config: PoolConfig::default(),
            metadata: record.metadata,
        })
    }

    /// Captures the length, every worker in registration order, and the
    /// metadata.
    #[must_use]
    pub fn to_record(&self) -> PoolRecord {
        PoolRecord {
            length: Limit::Finite(self.length),
            workers: self.workers.iter().map(RangeWorker::to_record).collect(),
            metadata: self.metadata.clone(),
        }
    }

    /// Claims a worker for the caller. See the type-level docs for the
    /// policy.
    ///
    /// The returned worker is always active. Drive it with
    /// [`RangePool::advance`] and hand it back with
    /// [`RangePool::dispose_worker`].
    ///
    /// # Errors
    ///
    /// - [`Error::PoolExhausted`] if every index is already completed
    /// - [`Error::PoolSaturated`] if nothing can be resumed and the laziest
    ///   worker cannot be split under the pool's [`PoolConfig`]
    ///
    /// The pool is left untouched on error.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(length = self.length)))]
    pub fn get_worker(&mut self) -> Result<WorkerId> {
        if self.has_completed() {
            return Err(Error::PoolExhausted {
                length: self.length,
            });
        }

        if self.workers.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(length = self.length, "creating initial worker");
            return self.register(0);
        }

        let mut laziest: Option<(usize, Limit)> = None;
        for (index, worker) in self.workers.iter_mut().enumerate() {
            if worker.has_completed() {
                continue;
            }
            if !worker.is_active() {
                #[cfg(feature = "tracing")]
                tracing::debug!(index, current = worker.current_index(), "resuming parked worker");
                worker.set_active(true);
                return Ok(WorkerId::new(self.id, self.generation, index));
            }
            let remaining = worker.remaining();
            if laziest.is_none_or(|(_, most)| remaining > most) {
                laziest = Some((index, remaining));
            }
        }

        match laziest {
            Some((index, remaining)) => self.split(index, remaining),
            None => {
                // Every worker is done yet the pool is not, so some trailing
                // span has no owner.
                let completed = self.completed();
                #[cfg(feature = "tracing")]
                tracing::warn!(completed, length = self.length, "reclaiming unowned trailing span");
                self.register(completed)
            }
        }
    }

    fn split(&mut self, index: usize, remaining: Limit) -> Result<WorkerId> {
        let saturated = Error::PoolSaturated {
            remaining: remaining.finite().unwrap_or(u64::MAX),
        };
        if !self.config.admits(self.workers.len()) {
            #[cfg(feature = "tracing")]
            tracing::debug!(workers = self.workers.len(), "worker cap reached");
            return Err(saturated);
        }
        let Some(mut tail) = self.workers[index].split(self.config.min_chunk.get()) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(index, %remaining, "laziest worker too small to split");
            return Err(saturated);
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            index,
            split_at = tail.start_index(),
            limit = %tail.limit_index(),
            "splitting laziest worker"
        );
        tail.set_active(true);
        self.workers.push(tail);
        Ok(WorkerId::new(self.id, self.generation, self.workers.len() - 1))
    }

    fn register(&mut self, start_index: u64) -> Result<WorkerId> {
        let mut worker = RangeWorker::new(start_index, self.length)?;
        worker.set_active(true);
        self.workers.push(worker);
        Ok(WorkerId::new(self.id, self.generation, self.workers.len() - 1))
    }

    /// Looks up a worker by handle.
    #[must_use]
    pub fn worker(&self, id: WorkerId) -> Option<&RangeWorker> {
        self.slot(id).map(|index| &self.workers[index])
    }

    fn worker_mut(&mut self, id: WorkerId) -> Result<&mut RangeWorker> {
        let index = self.slot(id).ok_or(Error::UnknownWorker(id))?;
        Ok(&mut self.workers[index])
    }

    fn slot(&self, id: WorkerId) -> Option<usize> {
        (id.pool == self.id && id.generation == self.generation && id.index < self.workers.len())
            .then_some(id.index)
    }

    /// All workers of the current generation in registration order.
    pub fn workers(&self) -> impl ExactSizeIterator<Item = (WorkerId, &RangeWorker)> {
        let (pool, generation) = (self.id, self.generation);
        self.workers
            .iter()
            .enumerate()
            .map(move |(index, worker)| (WorkerId::new(pool, generation, index), worker))
    }

    /// Advances the worker behind `id` by `steps`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownWorker`] for a stale handle, otherwise whatever
    /// [`RangeWorker::advance`] reports.
    pub fn advance(&mut self, id: WorkerId, steps: u64) -> Result<()> {
        self.worker_mut(id)?.advance(steps)
    }

    /// Parks the worker behind `id`, keeping its unfinished remainder for the
    /// next [`RangePool::get_worker`] call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownWorker`] for a stale handle.
    pub fn dispose_worker(&mut self, id: WorkerId) -> Result<()> {
        self.worker_mut(id)?.dispose();
        Ok(())
    }

    /// Drops every worker. The length, configuration and metadata are kept
    /// and the next [`RangePool::get_worker`] starts from the full range.
    /// Handles issued before this call stop resolving.
    pub fn dispose(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(workers = self.workers.len(), "disposing pool");
        self.workers.clear();
        self.generation += 1;
    }

    #[must_use]
    pub const fn length(&self) -> u64 {
        self.length
    }

    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Indices completed across all workers.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.workers.iter().map(RangeWorker::completed).sum()
    }

    /// Indices not yet completed, `length - completed`.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.length.saturating_sub(self.completed())
    }

    #[must_use]
    pub fn has_completed(&self) -> bool {
        self.completed() >= self.length
    }

    /// Pool-wide progress rounded to the nearest whole percent.
    #[must_use]
    pub fn completion_percentage(&self) -> u8 {
        percentage(self.completed(), self.length)
    }

    /// Whether some incomplete worker is currently claimed by a caller.
    ///
    /// `false` on an incomplete pool means outstanding work is parked rather
    /// than being serviced.
    #[must_use]
    pub fn has_alive_worker(&self) -> bool {
        self.workers
            .iter()
            .any(|worker| worker.is_active() && !worker.has_completed())
    }

    #[must_use]
    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }
}

impl Clone for RangePool {
    /// Copies the partition into a new pool with its own identity. Handles of
    /// `self` do not resolve on the copy.
    fn clone(&self) -> Self {
        Self {
            id: next_pool_id(),
            length: self.length,
            workers: self.workers.clone(),
            generation: self.generation,
            config: self.config,
            metadata: self.metadata.clone(),
        }
    }
}

impl TryFrom<PoolRecord> for RangePool {
    type Error = Error;

    fn try_from(record: PoolRecord) -> Result<Self> {
        Self::from_record(record)
    }
}

impl From<&RangePool> for PoolRecord {
    fn from(pool: &RangePool) -> Self {
        pool.to_record()
    }
}

fn validate_length(length: Limit) -> Result<u64> {
    match length {
        Limit::Unbounded => Err(Error::invalid("length can not be unbounded")),
        Limit::Finite(0) => Err(Error::invalid("length must be greater than zero")),
        Limit::Finite(n) => Ok(n),
    }
}

/// Checks that `workers` are empty or tile `[0, length)` without gaps or
/// overlaps.
fn check_partition(length: u64, workers: &[RangeWorker]) -> Result<()> {
    if workers.is_empty() {
        return Ok(());
    }
    let mut spans = workers
        .iter()
        .map(|worker| match worker.limit_index() {
            Limit::Finite(limit) if limit <= length => Ok((worker.start_index(), limit)),
            _ => Err(Error::invalid("worker limit exceeds pool length")),
        })
        .collect::<Result<Vec<_>>>()?;
    spans.sort_unstable();

    let mut next = 0;
    for (start, limit) in spans {
        if start != next {
            return Err(Error::invalid("workers do not partition the index space"));
        }
        next = limit;
    }
    if next != length {
        return Err(Error::invalid("workers do not partition the index space"));
    }
    Ok(())
}
