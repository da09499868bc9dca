//! Persisted collection format.

pub mod codec;
