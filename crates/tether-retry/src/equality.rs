//! Equality rules for replay verification.
//!
//! A replayed record is accepted only if the rule chosen by the caller says it
//! matches the record already delivered at the same position. There is no
//! fallback between rules.

use serde::Serialize;

/// Decides whether a replayed record matches a delivered one.
pub trait RecordEq<R: ?Sized> {
    /// `true` if `replayed` may stand in for `delivered`.
    fn same(&self, delivered: &R, replayed: &R) -> bool;
}

/// Compare records with [`PartialEq`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueEq;

impl<R: PartialEq + ?Sized> RecordEq<R> for ValueEq {
    fn same(&self, delivered: &R, replayed: &R) -> bool {
        delivered == replayed
    }
}

/// Compare records field by field through their `serde` representation.
///
/// Useful for parsed records that carry transient state outside their
/// serialized fields (`#[serde(skip)]`) or lack a `PartialEq` impl. A record
/// that fails to serialize never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldEq;

impl<R: Serialize + ?Sized> RecordEq<R> for FieldEq {
    fn same(&self, delivered: &R, replayed: &R) -> bool {
        match (serde_json::to_value(delivered), serde_json::to_value(replayed)) {
            (Ok(a), Ok(b)) => a == b,
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Record could not be serialized for comparison: {}", e);
                false
            }
        }
    }
}

/// Compare records with a caller-supplied predicate.
#[derive(Debug, Clone, Copy)]
pub struct FnEq<F>(pub F);

impl<R: ?Sized, F> RecordEq<R> for FnEq<F>
where
    F: Fn(&R, &R) -> bool,
{
    fn same(&self, delivered: &R, replayed: &R) -> bool {
        (self.0)(delivered, replayed)
    }
}
