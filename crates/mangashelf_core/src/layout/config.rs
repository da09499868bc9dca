//! Shelf layout tunables.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// How a series with no placed volumes is counted when sizing the shelf grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowPolicy {
    /// An empty series still reserves one row.
    #[default]
    ReserveEmptyRows,
    /// An empty series reserves nothing.
    ///
    /// The placement walk still advances one row per series, so the grid can
    /// come up short; overflowing volumes are dropped.
    SkipEmptyRows,
}

/// Geometry and capacity of the shelf grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Spines per shelf row.
    pub books_per_row: usize,
    /// Lower bound on the shelf count.
    pub min_shelves: usize,
    pub shelf_height: f64,
    pub shelf_width: f64,
    pub shelf_depth: f64,
    /// Horizontal distance between adjacent spine origins.
    pub book_spacing: f64,
    /// Added to every shelf's Y after centering.
    pub vertical_offset: f64,
    /// Z of every placement.
    pub depth_offset: f64,
    pub row_policy: RowPolicy,
    /// Also place volumes the user does not own (dimmed placeholders).
    pub include_unowned: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            books_per_row: 60,
            min_shelves: 4,
            shelf_height: 2.2,
            shelf_width: 235.0 / 11.0,
            shelf_depth: 0.5,
            book_spacing: 0.35,
            vertical_offset: 1.0,
            depth_offset: 0.2,
            row_policy: RowPolicy::ReserveEmptyRows,
            include_unowned: false,
        }
    }
}

impl LayoutConfig {
    /// Checks that a full row fits inside the shelf.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.books_per_row == 0 {
            return Err(LayoutError::ZeroCapacity);
        }
        for (name, value) in [
            ("shelf_height", self.shelf_height),
            ("shelf_width", self.shelf_width),
            ("shelf_depth", self.shelf_depth),
            ("book_spacing", self.book_spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::NonPositiveDimension { name, value });
            }
        }
        if !self.vertical_offset.is_finite() || !self.depth_offset.is_finite() {
            return Err(LayoutError::NonFiniteOffset);
        }

        // Row starts one spacing in from the left edge.
        let row_extent = self.book_spacing * self.books_per_row as f64;
        if row_extent >= self.shelf_width - self.book_spacing {
            return Err(LayoutError::RowTooWide {
                row_extent,
                shelf_width: self.shelf_width,
            });
        }
        Ok(())
    }

    /// Shelf rows one series needs for `volume_count` placed volumes.
    pub fn rows_for(&self, volume_count: usize) -> usize {
        match (volume_count, self.row_policy) {
            (0, RowPolicy::ReserveEmptyRows) => 1,
            (0, RowPolicy::SkipEmptyRows) => 0,
            (count, _) => count.div_ceil(self.books_per_row),
        }
    }

    /// X of the first spine in a row.
    pub fn row_start_x(&self) -> f64 {
        -self.shelf_width / 2.0 + self.book_spacing
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    ZeroCapacity,
    NonPositiveDimension { name: &'static str, value: f64 },
    NonFiniteOffset,
    RowTooWide { row_extent: f64, shelf_width: f64 },
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "books_per_row must be at least 1"),
            Self::NonPositiveDimension { name, value } => {
                write!(f, "{name} must be a positive finite number, got {value}")
            }
            Self::NonFiniteOffset => write!(f, "layout offsets must be finite"),
            Self::RowTooWide {
                row_extent,
                shelf_width,
            } => write!(
                f,
                "a full row spans {row_extent} but only fits inside shelf width {shelf_width}"
            ),
        }
    }
}

impl Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::{LayoutConfig, LayoutError, RowPolicy};

    #[test]
    fn default_config_is_valid() {
        LayoutConfig::default().validate().unwrap();
    }

    #[test]
    fn rows_for_rounds_up_and_honors_policy() {
        let mut config = LayoutConfig::default();
        assert_eq!(config.rows_for(0), 1);
        assert_eq!(config.rows_for(60), 1);
        assert_eq!(config.rows_for(61), 2);

        config.row_policy = RowPolicy::SkipEmptyRows;
        assert_eq!(config.rows_for(0), 0);
        assert_eq!(config.rows_for(1), 1);
    }

    #[test]
    fn overfull_row_is_rejected() {
        let config = LayoutConfig {
            book_spacing: 0.5,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LayoutError::RowTooWide { .. })
        ));
    }
}
