//! Collection blob encoding.
//!
//! # Responsibility
//! - Serialize the full collection to one JSON array.
//! - Rehydrate older blobs, filling fields missing from earlier schema
//!   revisions and repairing owned-volume sets.
//!
//! # Invariants
//! - Encoded field names are camelCase (`totalVolumes`, `ownedVolumes`).
//! - A decoded collection never contains duplicate ids or invalid series.

use crate::model::series::{Series, SeriesId};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed storage key for the serialized collection.
pub const COLLECTION_STORAGE_KEY: &str = "manga-collection";

#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    DuplicateId(SeriesId),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed collection blob: {err}"),
            Self::DuplicateId(id) => write!(f, "collection blob repeats series id `{id}`"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

pub fn encode_collection(series: &[Series]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(series)?)
}

/// Decodes a persisted collection blob.
///
/// Per-entry invariant violations (blank title, zero `totalVolumes`, rating
/// out of range) surface as `CodecError::Json` with the validation message.
pub fn decode_collection(blob: &str) -> Result<Vec<Series>, CodecError> {
    let series: Vec<Series> = serde_json::from_str(blob)?;

    let mut seen = BTreeSet::new();
    for entry in &series {
        if !seen.insert(entry.id.as_str()) {
            return Err(CodecError::DuplicateId(entry.id.clone()));
        }
    }

    Ok(series)
}
