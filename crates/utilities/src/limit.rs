use std::cmp::Ordering;
use std::fmt;

/// A configurable upper bound that is either a concrete number or absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Limit {
    Bounded(usize),
    #[default]
    Unbounded,
}

impl Limit {
    /// Returns true iff the given value is strictly larger than this limit.
    pub fn is_exceeded_by(&self, value: usize) -> bool {
        match self {
            Limit::Bounded(bound) => value > *bound,
            Limit::Unbounded => false,
        }
    }

    /// Returns true iff the given value has reached this limit.
    pub fn is_reached_by(&self, value: usize) -> bool {
        match self {
            Limit::Bounded(bound) => value >= *bound,
            Limit::Unbounded => false,
        }
    }

    /// Returns the smallest of both limits.
    pub fn min(self, other: Limit) -> Limit {
        match (self, other) {
            (Limit::Bounded(a), Limit::Bounded(b)) => Limit::Bounded(a.min(b)),
            (Limit::Bounded(a), Limit::Unbounded) | (Limit::Unbounded, Limit::Bounded(a)) => Limit::Bounded(a),
            (Limit::Unbounded, Limit::Unbounded) => Limit::Unbounded,
        }
    }
}

impl From<usize> for Limit {
    fn from(bound: usize) -> Self {
        Limit::Bounded(bound)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Bounded(bound) => write!(f, "{bound}"),
            Limit::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// The size of a possibly infinite collection. Sizes that do not fit in a
/// `u64` saturate at `u64::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Finite(u64),
    Infinite,
}

impl PartialOrd for Cardinality {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cardinality {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cardinality::Finite(a), Cardinality::Finite(b)) => a.cmp(b),
            (Cardinality::Finite(_), Cardinality::Infinite) => Ordering::Less,
            (Cardinality::Infinite, Cardinality::Finite(_)) => Ordering::Greater,
            (Cardinality::Infinite, Cardinality::Infinite) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Finite(size) => write!(f, "{size}"),
            Cardinality::Infinite => write!(f, "+∞"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit() {
        assert!(Limit::Bounded(3).is_exceeded_by(4));
        assert!(!Limit::Bounded(3).is_exceeded_by(3));
        assert!(Limit::Bounded(3).is_reached_by(3));
        assert!(!Limit::Unbounded.is_exceeded_by(usize::MAX));
        assert_eq!(Limit::Unbounded.min(Limit::Bounded(2)), Limit::Bounded(2));
    }

    #[test]
    fn test_cardinality_order() {
        assert!(Cardinality::Finite(u64::MAX) < Cardinality::Infinite);
        assert_eq!(Cardinality::Infinite.to_string(), "+∞");
    }
}
