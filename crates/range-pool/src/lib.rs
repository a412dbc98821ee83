//! Elastic partitioning of an integer index range `[0, length)` across a
//! growing and shrinking set of workers.
//!
//! A [`RangePool`] hands out [`RangeWorker`]s on demand. The first worker owns
//! the whole range. Every later request either resumes a parked worker or
//! splits the remaining span of the *laziest* active worker (the one with the
//! most work left) in half.
//!
//! ```
//! use range_pool::RangePool;
//!
//! let mut pool = RangePool::new(512)?;
//!
//! let first = pool.get_worker()?;
//! pool.advance(first, 256)?;
//!
//! // The 256 remaining indices are split evenly.
//! let second = pool.get_worker()?;
//! assert_eq!(pool.worker(first).map(|w| w.limit_index()), Some(384.into()));
//! assert_eq!(pool.worker(second).map(|w| w.start_index()), Some(384));
//! # Ok::<(), range_pool::Error>(())
//! ```
//!
//! The pool does no locking and never executes work itself. Callers that share
//! a pool between threads must wrap it in their own mutex.
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod error;
mod limit;
mod pool;
mod record;
#[cfg(feature = "serde")]
mod serde;
mod worker;

pub use crate::error::*;
pub use crate::limit::*;
pub use crate::pool::*;
pub use crate::record::*;
pub use crate::worker::*;
