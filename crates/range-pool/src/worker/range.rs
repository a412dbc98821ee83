#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, Limit, Result, WorkerRecord};

/// Ownership of, and progress through, one contiguous sub-range
/// `[start_index, limit_index)`.
///
/// A worker knows nothing about the pool it belongs to. The pool creates it,
/// shrinks its limit when splitting it, and flips its active flag when handing
/// it out or taking it back. The caller holding it moves the cursor forward
/// with [`RangeWorker::advance`].
///
/// ## Invariants
/// - `start_index <= current_index <= limit_index`
/// - `limit_index > start_index`
/// - `current_index` never decreases and `limit_index` never grows
///
/// # Example
/// ```
/// use range_pool::{Error, Limit, RangeWorker};
///
/// let mut worker = RangeWorker::new(0, 50)?;
/// assert!(matches!(worker.advance(51), Err(Error::OutOfRange { .. })));
///
/// worker.advance(50)?;
/// assert!(worker.has_completed());
/// assert_eq!(worker.remaining(), Limit::Finite(0));
/// # Ok::<(), Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeWorker {
    start_index: u64,
    limit_index: Limit,
    current_index: u64,
    active: bool,
}

impl RangeWorker {
    /// Creates an inactive worker over `[start_index, limit_index)` with its
    /// cursor at `start_index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `limit_index` is zero or does not
    /// exceed `start_index`.
    pub fn new(start_index: u64, limit_index: impl Into<Limit>) -> Result<Self> {
        let limit_index = limit_index.into();
        if limit_index == 0 {
            return Err(Error::invalid("limit index must be greater than zero"));
        }
        if limit_index <= start_index {
            return Err(Error::invalid(
                "limit index must be greater than start index",
            ));
        }
        Ok(Self {
            start_index,
            limit_index,
            current_index: start_index,
            active: false,
        })
    }

    /// Rebuilds a worker from its serialized record.
    ///
    /// Validates the bounds exactly like [`RangeWorker::new`] and additionally
    /// requires the cursor to sit inside them. Unbounded limits are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the record violates any worker
    /// invariant.
    pub fn from_record(record: &WorkerRecord) -> Result<Self> {
        let mut worker = Self::new(record.start_index, record.limit_index)?;
        if record.current_index < record.start_index {
            return Err(Error::invalid("current index must not precede start index"));
        }
        if record.limit_index < record.current_index {
            return Err(Error::invalid("current index must not exceed limit index"));
        }
        worker.current_index = record.current_index;
        worker.active = record.active;
        Ok(worker)
    }

    /// Captures the worker's bounds, cursor and active flag.
    #[must_use]
    pub const fn to_record(&self) -> WorkerRecord {
        WorkerRecord {
            start_index: self.start_index,
            limit_index: self.limit_index,
            current_index: self.current_index,
            active: self.active,
        }
    }

    /// Moves the cursor forward by `steps`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `steps` is zero
    /// - [`Error::OutOfRange`] if `steps` exceeds [`RangeWorker::remaining`]
    ///
    /// The worker is left untouched on error.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(start = self.start_index)))]
    pub fn advance(&mut self, steps: u64) -> Result<()> {
        if steps == 0 {
            return Err(Error::invalid("steps must be a positive integer"));
        }
        let remaining = self.remaining();
        let next = match self.current_index.checked_add(steps) {
            Some(next) if remaining >= steps => next,
            _ => return Err(Error::OutOfRange { steps, remaining }),
        };
        self.current_index = next;
        Ok(())
    }

    #[must_use]
    pub const fn start_index(&self) -> u64 {
        self.start_index
    }

    #[must_use]
    pub const fn limit_index(&self) -> Limit {
        self.limit_index
    }

    #[must_use]
    pub const fn current_index(&self) -> u64 {
        self.current_index
    }

    /// Indices left between the cursor and the limit.
    #[must_use]
    pub const fn remaining(&self) -> Limit {
        self.limit_index.saturating_sub(self.current_index)
    }

    /// Indices consumed since `start_index`.
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.current_index - self.start_index
    }

    /// Progress through the owned span, rounded to the nearest whole percent.
    ///
    /// Always `0` for an unbounded worker.
    #[must_use]
    pub fn completion_percentage(&self) -> u8 {
        match self.limit_index {
            Limit::Finite(limit) => percentage(self.completed(), limit - self.start_index),
            Limit::Unbounded => 0,
        }
    }

    #[must_use]
    pub fn has_completed(&self) -> bool {
        self.remaining() == 0
    }

    /// Whether a caller currently holds this worker.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Parks the worker.
    ///
    /// Only the active flag changes. The unfinished remainder stays owned by
    /// this worker so the next caller resumes exactly where this one stopped.
    pub const fn dispose(&mut self) {
        self.active = false;
    }

    /// Carves the upper half of the remaining span off into a new, inactive
    /// worker and shrinks `self` to the lower half.
    ///
    /// The split point is `current + ceil(remaining / 2)`, so `self` keeps the
    /// larger half. Returns `None`, leaving `self` untouched, when the worker
    /// is unbounded or the new worker would hold fewer than `min_chunk`
    /// indices.
    pub(crate) fn split(&mut self, min_chunk: u64) -> Option<Self> {
        let limit = self.limit_index.finite()?;
        let remaining = limit - self.current_index;
        let half = self.current_index + remaining.div_ceil(2);
        if limit - half < min_chunk.max(1) {
            return None;
        }
        let tail = Self::new(half, limit).ok()?;
        self.limit_index = Limit::Finite(half);
        Some(tail)
    }
}

impl TryFrom<&WorkerRecord> for RangeWorker {
    type Error = Error;

    fn try_from(record: &WorkerRecord) -> Result<Self> {
        Self::from_record(record)
    }
}

impl From<&RangeWorker> for WorkerRecord {
    fn from(worker: &RangeWorker) -> Self {
        worker.to_record()
    }
}

/// `done / span` as a whole percentage, rounding half up.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn percentage(done: u64, span: u64) -> u8 {
    let done = u128::from(done);
    let span = u128::from(span);
    ((200 * done + span) / (2 * span)).min(100) as u8
}
