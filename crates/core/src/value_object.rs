//! Value object marker.
//!
//! Resources, entitlements and grants are built fresh on every sync pass and
//! never mutated after construction. Two values with the same fields are the
//! same value.

/// Marker trait for immutable, compared-by-value governance types.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
