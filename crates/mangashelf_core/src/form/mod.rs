//! Add/edit form validation.
//!
//! # Responsibility
//! - Turn raw dialog text into a well-formed `NewSeries` or updated `Series`.
//! - Reject submissions missing required fields before any mutation.
//!
//! # Invariants
//! - Title and author are trimmed and non-empty; total volumes is an integer
//!   in `1..=MAX_TOTAL_VOLUMES`.
//! - Numbers parse from their leading digits (`"12 vols"` → 12); anything
//!   after the number is ignored.
//! - Optional fields never fail on empty input.

use crate::model::series::{
    NewSeries, Series, SeriesStatus, SeriesValidationError, SpineColor, MAX_RATING,
    MAX_TOTAL_VOLUMES, MIN_RATING,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static LEADING_INT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid integer regex"));
static LEADING_FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)").expect("valid float regex")
});

#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    /// Required field left blank; carries the field name.
    MissingField(&'static str),
    InvalidTotalVolumes(String),
    RatingOutOfRange(f64),
    Series(SeriesValidationError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "please fill in the required field `{field}`"),
            Self::InvalidTotalVolumes(raw) => {
                write!(
                    f,
                    "total volumes must be a whole number in 1..={MAX_TOTAL_VOLUMES}, got `{raw}`"
                )
            }
            Self::RatingOutOfRange(value) => {
                write!(f, "rating must be between {MIN_RATING} and {MAX_RATING}, got {value}")
            }
            Self::Series(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Series(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SeriesValidationError> for FormError {
    fn from(value: SeriesValidationError) -> Self {
        Self::Series(value)
    }
}

/// Raw input of the add dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesForm {
    pub title: String,
    pub author: String,
    pub total_volumes: String,
    pub status: String,
    /// Comma-separated tags.
    pub genre: String,
    pub start_year: String,
    pub color: String,
    pub description: String,
    pub rating: String,
}

impl Default for SeriesForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            total_volumes: String::new(),
            status: SeriesStatus::default().as_str().to_string(),
            genre: String::new(),
            start_year: String::new(),
            color: SpineColor::default().as_str().to_string(),
            description: String::new(),
            rating: String::new(),
        }
    }
}

impl SeriesForm {
    /// Validates input into a new series payload with no owned volumes.
    pub fn submit(&self, current_year: i32) -> Result<NewSeries, FormError> {
        let title = required(&self.title, "title")?;
        let author = required(&self.author, "author")?;
        let total_volumes = parse_total_volumes(&self.total_volumes)?;

        Ok(NewSeries {
            title,
            author,
            total_volumes,
            owned_volumes: Vec::new(),
            status: parse_status(&self.status),
            genre: parse_genre(&self.genre),
            start_year: parse_start_year(&self.start_year, current_year),
            color: parse_color(&self.color),
            description: optional_text(&self.description),
            rating: parse_rating(&self.rating)?,
        })
    }
}

/// Raw input of the edit dialog, prefilled from an existing series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSeriesForm {
    pub title: String,
    pub author: String,
    pub total_volumes: String,
    pub status: String,
    pub start_year: String,
    pub color: String,
    pub description: String,
}

impl EditSeriesForm {
    pub fn from_series(series: &Series) -> Self {
        Self {
            title: series.title.clone(),
            author: series.author.clone(),
            total_volumes: series.total_volumes.to_string(),
            status: series.status.as_str().to_string(),
            start_year: series.start_year.to_string(),
            color: series.color.as_str().to_string(),
            description: series.description.clone().unwrap_or_default(),
        }
    }

    /// Applies the edited fields to `original`.
    ///
    /// Identity, genre and rating carry over; owned volumes above a lowered
    /// total are dropped.
    pub fn submit(&self, original: &Series, current_year: i32) -> Result<Series, FormError> {
        let title = required(&self.title, "title")?;
        let author = required(&self.author, "author")?;
        let total_volumes = parse_total_volumes(&self.total_volumes)?;

        let mut updated = Series {
            title,
            author,
            total_volumes,
            status: parse_status(&self.status),
            start_year: parse_start_year(&self.start_year, current_year),
            color: parse_color(&self.color),
            description: optional_text(&self.description),
            ..original.clone()
        };
        updated.normalize_owned_volumes();
        updated.validate()?;
        Ok(updated)
    }
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Leading-integer parse: `" 42abc"` → `Some(42)`, `"abc"` → `None`.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    LEADING_INT_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Leading-decimal parse: `"8.5/10"` → `Some(8.5)`.
pub fn parse_leading_float(value: &str) -> Option<f64> {
    LEADING_FLOAT_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|parsed| parsed.is_finite())
}

fn parse_total_volumes(value: &str) -> Result<u32, FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField("totalVolumes"));
    }
    parse_leading_int(value)
        .and_then(|parsed| u32::try_from(parsed).ok())
        .filter(|parsed| (1..=MAX_TOTAL_VOLUMES).contains(parsed))
        .ok_or_else(|| FormError::InvalidTotalVolumes(value.trim().to_string()))
}

fn parse_start_year(value: &str, current_year: i32) -> i32 {
    parse_leading_int(value)
        .and_then(|parsed| i32::try_from(parsed).ok())
        .filter(|&year| year != 0)
        .unwrap_or(current_year)
}

fn parse_status(value: &str) -> SeriesStatus {
    SeriesStatus::parse(value).unwrap_or_default()
}

fn parse_color(value: &str) -> SpineColor {
    SpineColor::parse(value).unwrap_or_default()
}

fn parse_rating(value: &str) -> Result<Option<f64>, FormError> {
    match parse_leading_float(value) {
        None => Ok(None),
        Some(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => Ok(Some(rating)),
        Some(rating) => Err(FormError::RatingOutOfRange(rating)),
    }
}

/// Splits comma-separated tags, trimming and dropping empties.
pub fn parse_genre(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        parse_genre, parse_leading_float, parse_leading_int, parse_total_volumes, FormError,
    };

    #[test]
    fn leading_int_ignores_trailing_text() {
        assert_eq!(parse_leading_int(" 12 volumes"), Some(12));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("vol 12"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn leading_float_accepts_fraction_forms() {
        assert_eq!(parse_leading_float("8.5/10"), Some(8.5));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("7."), Some(7.0));
        assert_eq!(parse_leading_float("n/a"), None);
    }

    #[test]
    fn total_volumes_is_bounded() {
        assert_eq!(parse_total_volumes("1000"), Ok(1000));
        assert_eq!(
            parse_total_volumes("1001"),
            Err(FormError::InvalidTotalVolumes("1001".to_string()))
        );
        assert!(matches!(
            parse_total_volumes("4294967295"),
            Err(FormError::InvalidTotalVolumes(_))
        ));
        assert!(matches!(
            parse_total_volumes("99999999999999999999"),
            Err(FormError::InvalidTotalVolumes(_))
        ));
    }

    #[test]
    fn genre_split_trims_and_drops_empty_tags() {
        assert_eq!(
            parse_genre(" Action, ,Adventure ,, Fantasy "),
            vec!["Action", "Adventure", "Fantasy"]
        );
        assert!(parse_genre("   ").is_empty());
    }
}
