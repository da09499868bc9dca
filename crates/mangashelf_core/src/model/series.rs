//! Series domain model.
//!
//! # Responsibility
//! - Define the canonical record for one tracked manga series.
//! - Own ownership-set invariants (`owned_volumes`) and their normalization.
//!
//! # Invariants
//! - `1 <= total_volumes <= MAX_TOTAL_VOLUMES`.
//! - `owned_volumes` is ascending, unique, and every value is in
//!   `[1, total_volumes]`.
//! - `rating`, when present, is in `[1, 10]`.
//! - `status` is editorial; `is_fully_owned()` is the derived signal.
//!
//! # See also
//! - `store::codec` for the persisted wire shape.

use chrono::Datelike;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 10.0;
/// Upper bound on `total_volumes`; every per-volume projection stays small.
pub const MAX_TOTAL_VOLUMES: u32 = 1000;

/// Opaque stable identifier for one series.
///
/// Legacy collections carry short numeric strings (`"1"`), newly minted ids
/// are UUIDv7 text. Both are treated as plain opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Mints a fresh timestamp-ordered identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for SeriesId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Editorial reading/collecting status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    #[default]
    Planned,
    Ongoing,
    Completed,
    Dropped,
}

impl SeriesStatus {
    pub const ALL: [SeriesStatus; 4] = [
        SeriesStatus::Planned,
        SeriesStatus::Ongoing,
        SeriesStatus::Completed,
        SeriesStatus::Dropped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "planned" => Some(Self::Planned),
            "ongoing" => Some(Self::Ongoing),
            "completed" => Some(Self::Completed),
            "dropped" => Some(Self::Dropped),
            _ => None,
        }
    }
}

/// Spine tint palette.
///
/// Unknown names read from storage fall back to `Blue`, matching the
/// renderer's palette lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpineColor {
    Red,
    #[default]
    Blue,
    Green,
    Orange,
    Purple,
    Brown,
}

impl SpineColor {
    pub const ALL: [SpineColor; 6] = [
        SpineColor::Red,
        SpineColor::Blue,
        SpineColor::Green,
        SpineColor::Orange,
        SpineColor::Purple,
        SpineColor::Brown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Brown => "brown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "red" => Some(Self::Red),
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "orange" => Some(Self::Orange),
            "purple" => Some(Self::Purple),
            "brown" => Some(Self::Brown),
            _ => None,
        }
    }

    /// Rendered spine color as `#rrggbb`.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Red => "#dc2626",
            Self::Blue => "#2563eb",
            Self::Green => "#16a34a",
            Self::Orange => "#ea580c",
            Self::Purple => "#9333ea",
            Self::Brown => "#a16207",
        }
    }
}

impl<'de> Deserialize<'de> for SpineColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

/// Validation failures for `Series` invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValidationError {
    EmptyId,
    EmptyTitle,
    EmptyAuthor,
    ZeroTotalVolumes,
    TooManyVolumes(u32),
    VolumeOutOfRange { volume: u32, total_volumes: u32 },
    UnorderedVolumes { previous: u32, next: u32 },
    RatingOutOfRange(f64),
}

impl Display for SeriesValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "series id cannot be empty"),
            Self::EmptyTitle => write!(f, "series title cannot be empty"),
            Self::EmptyAuthor => write!(f, "series author cannot be empty"),
            Self::ZeroTotalVolumes => write!(f, "totalVolumes must be at least 1"),
            Self::TooManyVolumes(total) => write!(
                f,
                "totalVolumes {total} exceeds the limit of {MAX_TOTAL_VOLUMES}"
            ),
            Self::VolumeOutOfRange {
                volume,
                total_volumes,
            } => write!(
                f,
                "volume {volume} is outside the series range 1..={total_volumes}"
            ),
            Self::UnorderedVolumes { previous, next } => write!(
                f,
                "ownedVolumes must be strictly ascending, found {next} after {previous}"
            ),
            Self::RatingOutOfRange(value) => write!(
                f,
                "rating {value} is outside {MIN_RATING}..={MAX_RATING}"
            ),
        }
    }
}

impl Error for SeriesValidationError {}

/// Series payload before an identifier is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSeries {
    pub title: String,
    pub author: String,
    pub total_volumes: u32,
    pub owned_volumes: Vec<u32>,
    pub status: SeriesStatus,
    pub genre: Vec<String>,
    pub start_year: i32,
    pub color: SpineColor,
    pub description: Option<String>,
    pub rating: Option<f64>,
}

impl NewSeries {
    /// Minimal payload with defaults for every optional field.
    pub fn new(title: impl Into<String>, author: impl Into<String>, total_volumes: u32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            total_volumes,
            owned_volumes: Vec::new(),
            status: SeriesStatus::default(),
            genre: Vec::new(),
            start_year: current_year(),
            color: SpineColor::default(),
            description: None,
            rating: None,
        }
    }
}

/// Canonical tracked series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredSeries")]
pub struct Series {
    pub id: SeriesId,
    pub title: String,
    pub author: String,
    pub total_volumes: u32,
    /// Ascending, unique, each in `[1, total_volumes]`.
    pub owned_volumes: Vec<u32>,
    pub status: SeriesStatus,
    pub genre: Vec<String>,
    pub start_year: i32,
    pub color: SpineColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Series {
    /// Creates a series with a freshly minted identifier.
    pub fn new(payload: NewSeries) -> Self {
        Self::with_id(SeriesId::generate(), payload)
    }

    /// Creates a series with a caller-provided identifier.
    ///
    /// Used by import paths and seed data where identity already exists.
    pub fn with_id(id: SeriesId, payload: NewSeries) -> Self {
        Self {
            id,
            title: payload.title,
            author: payload.author,
            total_volumes: payload.total_volumes,
            owned_volumes: payload.owned_volumes,
            status: payload.status,
            genre: payload.genre,
            start_year: payload.start_year,
            color: payload.color,
            description: payload.description,
            rating: payload.rating,
        }
    }

    /// Checks every record invariant without mutating.
    pub fn validate(&self) -> Result<(), SeriesValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(SeriesValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(SeriesValidationError::EmptyTitle);
        }
        if self.author.trim().is_empty() {
            return Err(SeriesValidationError::EmptyAuthor);
        }
        if self.total_volumes == 0 {
            return Err(SeriesValidationError::ZeroTotalVolumes);
        }
        if self.total_volumes > MAX_TOTAL_VOLUMES {
            return Err(SeriesValidationError::TooManyVolumes(self.total_volumes));
        }

        let mut previous: Option<u32> = None;
        for &volume in &self.owned_volumes {
            if volume == 0 || volume > self.total_volumes {
                return Err(SeriesValidationError::VolumeOutOfRange {
                    volume,
                    total_volumes: self.total_volumes,
                });
            }
            if let Some(prev) = previous {
                if volume <= prev {
                    return Err(SeriesValidationError::UnorderedVolumes {
                        previous: prev,
                        next: volume,
                    });
                }
            }
            previous = Some(volume);
        }

        if let Some(rating) = self.rating {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                return Err(SeriesValidationError::RatingOutOfRange(rating));
            }
        }

        Ok(())
    }

    /// Sorts and deduplicates `owned_volumes`, dropping numbers outside
    /// `[1, total_volumes]`.
    ///
    /// Returns how many entries were removed (duplicates included).
    pub fn normalize_owned_volumes(&mut self) -> usize {
        let before = self.owned_volumes.len();
        let total = self.total_volumes;
        self.owned_volumes
            .retain(|&volume| volume >= 1 && volume <= total);
        self.owned_volumes.sort_unstable();
        self.owned_volumes.dedup();
        before - self.owned_volumes.len()
    }

    pub fn owns(&self, volume: u32) -> bool {
        self.owned_volumes.binary_search(&volume).is_ok()
    }

    pub fn owned_count(&self) -> usize {
        self.owned_volumes.len()
    }

    /// Derived completion signal, independent from editorial `status`.
    pub fn is_fully_owned(&self) -> bool {
        self.owned_volumes.len() == self.total_volumes as usize
    }

    /// Owned share in `[0, 1]`.
    pub fn completion_ratio(&self) -> f64 {
        if self.total_volumes == 0 {
            return 0.0;
        }
        self.owned_volumes.len() as f64 / f64::from(self.total_volumes)
    }
}

/// Persisted shape tolerated on read.
///
/// Older blobs lack `genre`/`rating`, some lack `status`; every field that
/// was not present in all revisions is defaulted here.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSeries {
    id: SeriesId,
    title: String,
    author: String,
    total_volumes: u32,
    #[serde(default)]
    owned_volumes: Vec<u32>,
    #[serde(default)]
    status: SeriesStatus,
    #[serde(default)]
    genre: Vec<String>,
    #[serde(default = "current_year")]
    start_year: i32,
    #[serde(default)]
    color: SpineColor,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
}

impl TryFrom<StoredSeries> for Series {
    type Error = SeriesValidationError;

    fn try_from(value: StoredSeries) -> Result<Self, Self::Error> {
        let mut series = Series {
            id: value.id,
            title: value.title,
            author: value.author,
            total_volumes: value.total_volumes,
            owned_volumes: value.owned_volumes,
            status: value.status,
            genre: value
                .genre
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            start_year: value.start_year,
            color: value.color,
            description: value.description.filter(|text| !text.trim().is_empty()),
            rating: value.rating,
        };

        let dropped = series.normalize_owned_volumes();
        if dropped > 0 {
            warn!(
                "event=series_normalize module=model status=repaired series_id={} dropped_volumes={}",
                series.id, dropped
            );
        }

        series.validate()?;
        Ok(series)
    }
}

/// Current calendar year from the local clock.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::{
        NewSeries, Series, SeriesId, SeriesValidationError, SpineColor, MAX_TOTAL_VOLUMES,
    };

    fn sample() -> Series {
        let mut payload = NewSeries::new("Berserk", "Kentaro Miura", 41);
        payload.owned_volumes = vec![1, 2, 3];
        Series::with_id(SeriesId::new("b"), payload)
    }

    #[test]
    fn normalize_sorts_dedups_and_drops_out_of_range() {
        let mut series = sample();
        series.owned_volumes = vec![5, 0, 3, 5, 42, 1];

        let dropped = series.normalize_owned_volumes();
        assert_eq!(dropped, 3);
        assert_eq!(series.owned_volumes, vec![1, 3, 5]);
        assert!(series.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unordered_volumes() {
        let mut series = sample();
        series.owned_volumes = vec![2, 1];

        assert_eq!(
            series.validate().unwrap_err(),
            SeriesValidationError::UnorderedVolumes {
                previous: 2,
                next: 1
            }
        );
    }

    #[test]
    fn validate_caps_total_volumes() {
        let mut series = sample();
        series.total_volumes = MAX_TOTAL_VOLUMES;
        assert!(series.validate().is_ok());

        series.total_volumes = u32::MAX;
        assert_eq!(
            series.validate().unwrap_err(),
            SeriesValidationError::TooManyVolumes(u32::MAX)
        );
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(SeriesId::generate(), SeriesId::generate());
    }

    #[test]
    fn unknown_color_falls_back_to_blue() {
        let color: SpineColor = serde_json::from_str("\"teal\"").unwrap();
        assert_eq!(color, SpineColor::Blue);
    }
}
