//! Transient-failure classification.
//!
//! Retryability is decided by membership of an error's kind in a closed set
//! supplied by the caller. Anything outside the set is never retried.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Exposes the kind of an operation error for classification.
pub trait FailureKind {
    /// Discriminant type compared against a [`TransientSet`].
    type Kind: Copy + Eq + Hash + Debug;

    /// The kind of this error.
    fn failure_kind(&self) -> Self::Kind;
}

/// The closed set of error kinds that warrant re-authentication and retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientSet<K: Eq + Hash> {
    kinds: HashSet<K>,
}

impl<K> TransientSet<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// A set containing exactly `kinds`.
    pub fn new(kinds: impl IntoIterator<Item = K>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// A set that treats every failure as unrecoverable.
    #[must_use]
    pub fn none() -> Self {
        Self {
            kinds: HashSet::new(),
        }
    }

    /// Add a kind to the set.
    #[must_use]
    pub fn with(mut self, kind: K) -> Self {
        self.kinds.insert(kind);
        self
    }

    /// Whether `kind` is retried.
    #[must_use]
    pub fn contains(&self, kind: K) -> bool {
        self.kinds.contains(&kind)
    }

    /// Whether `err` is retried.
    pub fn is_transient<E>(&self, err: &E) -> bool
    where
        E: FailureKind<Kind = K>,
    {
        self.contains(err.failure_kind())
    }

    /// Number of kinds in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl<K> FromIterator<K> for TransientSet<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Expired,
        Server,
        Parse,
    }

    struct Failure(Kind);

    impl FailureKind for Failure {
        type Kind = Kind;

        fn failure_kind(&self) -> Kind {
            self.0
        }
    }

    #[test]
    fn test_membership_decides_retry() {
        let set = TransientSet::new([Kind::Expired, Kind::Server]);
        assert!(set.is_transient(&Failure(Kind::Expired)));
        assert!(set.is_transient(&Failure(Kind::Server)));
        assert!(!set.is_transient(&Failure(Kind::Parse)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_set_retries_nothing() {
        let set = TransientSet::<Kind>::none();
        assert!(set.is_empty());
        assert!(!set.is_transient(&Failure(Kind::Expired)));

        let set = set.with(Kind::Parse);
        assert!(set.is_transient(&Failure(Kind::Parse)));
    }
}
