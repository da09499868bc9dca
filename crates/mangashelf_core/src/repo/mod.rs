//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract the collection service writes through.
//! - Isolate SQLite details from service orchestration.

pub mod kv_repo;
