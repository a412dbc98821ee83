use core::{cmp::Ordering, fmt};

/// An exclusive upper bound that is either a finite index or unbounded.
///
/// Worker limits and remaining spans use this type so a standalone
/// [`RangeWorker`] can cover an open-ended range. Ordering places every
/// finite value below [`Limit::Unbounded`].
///
/// [`RangeWorker`]: crate::RangeWorker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Limit {
    /// A finite exclusive bound.
    Finite(u64),
    /// No upper bound.
    Unbounded,
}

impl Limit {
    /// Returns the finite value, or `None` when unbounded.
    #[must_use]
    pub const fn finite(self) -> Option<u64> {
        match self {
            Self::Finite(n) => Some(n),
            Self::Unbounded => None,
        }
    }

    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// `self - rhs`, saturating at zero. Unbounded stays unbounded.
    #[must_use]
    pub const fn saturating_sub(self, rhs: u64) -> Self {
        match self {
            Self::Finite(n) => Self::Finite(n.saturating_sub(rhs)),
            Self::Unbounded => Self::Unbounded,
        }
    }
}

impl From<u64> for Limit {
    fn from(n: u64) -> Self {
        Self::Finite(n)
    }
}

impl PartialEq<u64> for Limit {
    fn eq(&self, other: &u64) -> bool {
        *self == Self::Finite(*other)
    }
}

impl PartialOrd<u64> for Limit {
    fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
        Some(self.cmp(&Self::Finite(*other)))
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Unbounded => f.write_str("Infinity"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn finite_orders_below_unbounded() {
        assert!(Limit::Finite(u64::MAX) < Limit::Unbounded);
        assert!(Limit::Finite(3) < Limit::Finite(4));
        assert!(Limit::Unbounded > u64::MAX);
        assert_eq!(Limit::Finite(7), 7);
    }

    #[test]
    fn saturating_sub_keeps_unbounded() {
        assert_eq!(Limit::Finite(10).saturating_sub(4), Limit::Finite(6));
        assert_eq!(Limit::Finite(3).saturating_sub(4), Limit::Finite(0));
        assert_eq!(Limit::Unbounded.saturating_sub(u64::MAX), Limit::Unbounded);
    }

    #[test]
    fn displays_unbounded_as_infinity() {
        assert_eq!(Limit::Unbounded.to_string(), "Infinity");
        assert_eq!(Limit::Finite(42).to_string(), "42");
    }
}
