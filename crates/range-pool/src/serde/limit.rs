use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::Limit;

/// Wire token for [`Limit::Unbounded`]. Finite limits are always numbers, so
/// no legal finite value can collide with it.
const UNBOUNDED: &str = "Infinity";

/// Largest integer an IEEE-754 double represents exactly.
const MAX_SAFE_FLOAT: f64 = 9_007_199_254_740_991.0;

impl Serialize for Limit {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Finite(n) => s.serialize_u64(*n),
            Self::Unbounded => s.serialize_str(UNBOUNDED),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LimitVisitor;

        impl de::Visitor<'_> for LimitVisitor {
            type Value = Limit;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-negative integer or \"Infinity\"")
            }

            #[inline]
            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Limit::Finite(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v)
                    .map(Limit::Finite)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if v == f64::INFINITY {
                    return Ok(Limit::Unbounded);
                }
                // Only integral values that a double holds exactly.
                if (0.0..=MAX_SAFE_FLOAT).contains(&v) && v == (v as u64) as f64 {
                    return Ok(Limit::Finite(v as u64));
                }
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if v == UNBOUNDED {
                    Ok(Limit::Unbounded)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        d.deserialize_any(LimitVisitor)
    }
}
