//! Serialized shapes of workers and pools.
//!
//! These plain structs are the only external contract of the crate. With the
//! `serde` feature they (de)serialize with camelCase field names, and an
//! unbounded [`Limit`] is written as the string `"Infinity"` while finite
//! bounds are always numbers.
//!
//! ```json
//! {
//!   "length": 50,
//!   "workers": [
//!     { "startIndex": 0,  "limitIndex": 28, "currentIndex": 5,  "active": true },
//!     { "startIndex": 28, "limitIndex": 50, "currentIndex": 33, "active": true }
//!   ]
//! }
//! ```

use alloc::{collections::BTreeMap, string::String, vec::Vec};

use crate::Limit;

/// Opaque caller-supplied key/value pairs carried by a pool.
///
/// Values are strings. A wire `metadata` object holding numbers, booleans or
/// nested values does not decode; encode such values as strings first.
pub type Metadata = BTreeMap<String, String>;

/// Serialized state of one [`RangeWorker`].
///
/// [`RangeWorker`]: crate::RangeWorker
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct WorkerRecord {
    pub start_index: u64,
    pub limit_index: Limit,
    pub current_index: u64,
    /// Absent on the wire means parked, so a restored pool can hand the
    /// worker out again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub active: bool,
}

/// Serialized state of a [`RangePool`].
///
/// `length` shares the [`Limit`] encoding with worker limits so an unbounded
/// length survives the trip to the decoder, which then rejects it.
///
/// [`RangePool`]: crate::RangePool
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PoolRecord {
    pub length: Limit,
    pub workers: Vec<WorkerRecord>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub metadata: Metadata,
}
