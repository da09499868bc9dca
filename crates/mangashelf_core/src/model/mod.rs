//! Collection domain model.
//!
//! # Responsibility
//! - Define the canonical series record and its identifier.
//! - Provide the built-in sample collection.
//!
//! # Invariants
//! - Every series is identified by a stable opaque `SeriesId`.
//! - Owned volume sets are kept sorted and deduplicated.

pub mod seed;
pub mod series;
