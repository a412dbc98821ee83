use serde::{Deserialize, Deserializer};

use crate::{Error, PoolRecord, RangePool, RangeWorker, Result, WorkerRecord};

/// Decodes a record, folding any decoder failure into
/// [`Error::InvalidArgument`].
fn decode<'de, T, D>(deserializer: D, reason: &'static str) -> Result<T>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map_err(|_e| {
        #[cfg(feature = "tracing")]
        tracing::debug!(error = %_e, reason, "rejecting serialized record");
        Error::invalid(reason)
    })
}

impl RangePool {
    /// Restores a pool straight from any `serde` deserializer.
    ///
    /// Equivalent to decoding a [`PoolRecord`] and passing it to
    /// [`RangePool::from_record`], except that decoder failures are reported
    /// as [`Error::InvalidArgument`] too.
    ///
    /// ```
    /// use range_pool::RangePool;
    ///
    /// let json = r#"{"length":50,"workers":[
    ///     {"startIndex":0,"limitIndex":28,"currentIndex":5},
    ///     {"startIndex":28,"limitIndex":50,"currentIndex":33}
    /// ]}"#;
    /// let mut de = serde_json::Deserializer::from_str(json);
    /// let pool = RangePool::from_deserializer(&mut de)?;
    /// assert_eq!(pool.completed(), 10);
    /// # Ok::<(), range_pool::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the input is not a pool record
    /// or if [`RangePool::from_record`] rejects it.
    pub fn from_deserializer<'de, D>(deserializer: D) -> Result<Self>
    where
        D: Deserializer<'de>,
    {
        Self::from_record(decode::<PoolRecord, _>(deserializer, "malformed pool record")?)
    }
}

impl RangeWorker {
    /// Restores a worker straight from any `serde` deserializer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the input is not a worker record
    /// or if [`RangeWorker::from_record`] rejects it.
    pub fn from_deserializer<'de, D>(deserializer: D) -> Result<Self>
    where
        D: Deserializer<'de>,
    {
        let record: WorkerRecord = decode(deserializer, "malformed worker record")?;
        Self::from_record(&record)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, Limit, RangePool, RangeWorker};
    use serde_json::{Deserializer, json};

    #[test]
    fn pool_decodes_from_json_text() {
        let json = r#"{"length":50,"workers":[
            {"startIndex":0,"limitIndex":28,"currentIndex":5,"active":true},
            {"startIndex":28,"limitIndex":50,"currentIndex":33}
        ],"metadata":{"job":"reindex"}}"#;
        let pool = RangePool::from_deserializer(&mut Deserializer::from_str(json))
            .expect("valid record");

        assert_eq!(pool.length(), 50);
        assert_eq!(pool.completed(), 10);
        assert_eq!(
            pool.workers().map(|(_, w)| w.is_active()).collect::<alloc::vec::Vec<_>>(),
            alloc::vec![true, false]
        );
        assert_eq!(
            pool.metadata().get("job").map(alloc::string::String::as_str),
            Some("reindex")
        );
    }

    #[test]
    fn pool_decodes_from_json_value() {
        let value = json!({ "length": 10, "workers": [] });
        let pool = RangePool::from_deserializer(value).expect("valid record");
        assert_eq!(pool.length(), 10);
        assert_eq!(pool.workers().len(), 0);
    }

    #[test]
    fn malformed_input_is_an_invalid_argument() {
        let inputs = [
            r#"{"length":50,"workers":["#,
            r#"{"workers":[]}"#,
            r#"{"length":-5,"workers":[]}"#,
            r#"{"length":50,"workers":[{"startIndex":0}]}"#,
            "[]",
        ];
        for input in inputs {
            let err = RangePool::from_deserializer(&mut Deserializer::from_str(input))
                .expect_err("should fail");
            assert_eq!(err, Error::invalid("malformed pool record"), "{input}");
        }
    }

    #[test]
    fn non_string_metadata_is_rejected() {
        let value = json!({ "length": 50, "workers": [], "metadata": { "retries": 3 } });
        assert!(serde_json::from_value::<crate::PoolRecord>(value.clone()).is_err());
        assert!(matches!(
            RangePool::from_deserializer(value),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn decoded_records_are_still_validated() {
        let unbounded = json!({ "length": "Infinity", "workers": [] });
        assert!(matches!(
            RangePool::from_deserializer(unbounded),
            Err(Error::InvalidArgument { .. })
        ));

        let gap = json!({
            "length": 50,
            "workers": [
                { "startIndex": 0, "limitIndex": 20, "currentIndex": 0 },
                { "startIndex": 30, "limitIndex": 50, "currentIndex": 30 }
            ]
        });
        assert!(matches!(
            RangePool::from_deserializer(gap),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn worker_decodes_or_reports_invalid_argument() {
        let worker = RangeWorker::from_deserializer(json!({
            "startIndex": 10,
            "limitIndex": "Infinity",
            "currentIndex": 12
        }))
        .expect("valid record");
        assert_eq!(worker.limit_index(), Limit::Unbounded);
        assert_eq!(worker.completed(), 2);

        let err = RangeWorker::from_deserializer(json!({ "startIndex": "ten" }))
            .expect_err("should fail");
        assert_eq!(err, Error::invalid("malformed worker record"));

        assert!(matches!(
            RangeWorker::from_deserializer(json!({
                "startIndex": 10,
                "limitIndex": 5,
                "currentIndex": 10
            })),
            Err(Error::InvalidArgument { .. })
        ));
    }
}
