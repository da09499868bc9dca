//! Shelf grid derivation and spine placement.
//!
//! # Responsibility
//! - Size the shelf grid from per-series row requirements.
//! - Walk series in collection order and seat each volume on a shelf row.
//!
//! # Invariants
//! - Output depends only on the input slice and config (no clock, no RNG).
//! - A series never starts mid-row: every series opens a fresh row.
//! - Shelves are returned in ascending Y order.
//! - Placements past the last shelf are dropped and recorded, never panicking.

use super::config::{LayoutConfig, LayoutError};
use crate::model::series::{Series, SeriesId};
use log::{debug, error};
use nalgebra::Point3;

/// One horizontal shelf in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shelf {
    pub index: usize,
    /// Center of the shelf surface.
    pub position: Point3<f64>,
    pub width: f64,
    pub depth: f64,
}

/// One seated spine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<'a> {
    pub series: &'a Series,
    /// Index of `series` in the input slice.
    pub series_index: usize,
    pub volume: u32,
    pub shelf_index: usize,
    pub position: Point3<f64>,
    /// `false` only for placeholder spines when `include_unowned` is set.
    pub owned: bool,
}

/// A volume that did not fit on any computed shelf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedVolume {
    pub series_id: SeriesId,
    pub volume: u32,
    pub shelf_index: usize,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfLayout<'a> {
    pub shelves: Vec<Shelf>,
    pub placements: Vec<Placement<'a>>,
    pub dropped: Vec<DroppedVolume>,
    /// Sum of per-series row requirements, before the minimum floor.
    pub rows_required: usize,
}

impl<'a> ShelfLayout<'a> {
    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    pub fn spine_count(&self) -> usize {
        self.placements.len()
    }

    pub fn placements_for<'s>(
        &'s self,
        id: &'s SeriesId,
    ) -> impl Iterator<Item = &'s Placement<'a>> + 's {
        self.placements
            .iter()
            .filter(move |placement| &placement.series.id == id)
    }

    pub fn placements_on_shelf(
        &self,
        shelf_index: usize,
    ) -> impl Iterator<Item = &Placement<'a>> + '_ {
        self.placements
            .iter()
            .filter(move |placement| placement.shelf_index == shelf_index)
    }
}

/// Computes shelves and spine placements for `series`.
///
/// # Errors
/// - Returns `LayoutError` only for an invalid `config`; overflow is not an
///   error (see `ShelfLayout::dropped`).
pub fn compute_layout<'a>(
    series: &'a [Series],
    config: &LayoutConfig,
) -> Result<ShelfLayout<'a>, LayoutError> {
    config.validate()?;

    let rows_required: usize = series
        .iter()
        .map(|entry| config.rows_for(placed_volume_count(entry, config)))
        .sum();
    let shelves = build_shelves(config.min_shelves.max(rows_required), config);

    let mut placements = Vec::new();
    let mut dropped = Vec::new();
    let start_x = config.row_start_x();
    // Advanced before each series, so the first series lands on shelf 0.
    let mut shelf_cursor: Option<usize> = None;

    for (series_index, entry) in series.iter().enumerate() {
        let mut shelf_index = shelf_cursor.map_or(0, |index| index + 1);
        let mut x = start_x;
        let mut books_on_row = 0usize;

        for (volume, owned) in placed_volumes(entry, config) {
            if books_on_row >= config.books_per_row {
                shelf_index += 1;
                x = start_x;
                books_on_row = 0;
            }

            match shelves.get(shelf_index) {
                Some(shelf) => placements.push(Placement {
                    series: entry,
                    series_index,
                    volume,
                    shelf_index,
                    position: Point3::new(x, shelf.position.y, config.depth_offset),
                    owned,
                }),
                None => dropped.push(DroppedVolume {
                    series_id: entry.id.clone(),
                    volume,
                    shelf_index,
                }),
            }

            x += config.book_spacing;
            books_on_row += 1;
        }

        shelf_cursor = Some(shelf_index);
    }

    if !dropped.is_empty() {
        error!(
            "event=layout_overflow module=layout status=error shelf_count={} rows_required={} dropped={}",
            shelves.len(),
            rows_required,
            dropped.len()
        );
    }
    debug!(
        "event=layout_compute module=layout status=ok series={} shelves={} spines={}",
        series.len(),
        shelves.len(),
        placements.len()
    );

    Ok(ShelfLayout {
        shelves,
        placements,
        dropped,
        rows_required,
    })
}

fn build_shelves(count: usize, config: &LayoutConfig) -> Vec<Shelf> {
    let half_stack = count as f64 / 2.0 * config.shelf_height;
    (0..count)
        .map(|index| Shelf {
            index,
            position: Point3::new(
                0.0,
                index as f64 * config.shelf_height - half_stack + config.vertical_offset,
                0.0,
            ),
            width: config.shelf_width,
            depth: config.shelf_depth,
        })
        .collect()
}

fn placed_volume_count(series: &Series, config: &LayoutConfig) -> usize {
    if config.include_unowned {
        series.total_volumes as usize
    } else {
        series.owned_count()
    }
}

/// Volumes to seat for one series in ascending order, with ownership.
fn placed_volumes<'s>(
    series: &'s Series,
    config: &LayoutConfig,
) -> Box<dyn Iterator<Item = (u32, bool)> + 's> {
    if config.include_unowned {
        Box::new((1..=series.total_volumes).map(move |volume| (volume, series.owns(volume))))
    } else {
        Box::new(series.owned_volumes.iter().map(|&volume| (volume, true)))
    }
}

#[cfg(test)]
mod tests {
    use super::compute_layout;
    use crate::layout::config::LayoutConfig;
    use crate::model::series::{NewSeries, Series, SeriesId};

    fn series_owning(id: &str, total: u32, owned: u32) -> Series {
        let mut payload = NewSeries::new(format!("title {id}"), "author", total);
        payload.owned_volumes = (1..=owned).collect();
        Series::with_id(SeriesId::new(id), payload)
    }

    #[test]
    fn empty_collection_still_has_minimum_shelves() {
        let layout = compute_layout(&[], &LayoutConfig::default()).unwrap();
        assert_eq!(layout.shelf_count(), 4);
        assert_eq!(layout.spine_count(), 0);
        assert_eq!(layout.rows_required, 0);
    }

    #[test]
    fn shelves_are_centered_around_vertical_offset() {
        let layout = compute_layout(&[], &LayoutConfig::default()).unwrap();
        let ys: Vec<f64> = layout.shelves.iter().map(|s| s.position.y).collect();
        let expected = [-3.4, -1.2, 1.0, 3.2];
        for (y, want) in ys.iter().zip(expected) {
            assert!((y - want).abs() < 1e-9, "{y} != {want}");
        }
    }

    #[test]
    fn long_series_wraps_to_next_row_at_capacity() {
        let collection = [series_owning("a", 130, 125)];
        let layout = compute_layout(&collection, &LayoutConfig::default()).unwrap();

        assert_eq!(layout.rows_required, 3);
        assert_eq!(layout.placements_on_shelf(0).count(), 60);
        assert_eq!(layout.placements_on_shelf(1).count(), 60);
        assert_eq!(layout.placements_on_shelf(2).count(), 5);

        let first_on_second_row = layout.placements_on_shelf(1).next().unwrap();
        assert_eq!(first_on_second_row.volume, 61);
        assert!((first_on_second_row.position.x - LayoutConfig::default().row_start_x()).abs() < 1e-9);
    }

    #[test]
    fn every_series_opens_a_new_row() {
        let collection = [series_owning("a", 10, 3), series_owning("b", 10, 2)];
        let layout = compute_layout(&collection, &LayoutConfig::default()).unwrap();

        let b_shelves: Vec<usize> = layout
            .placements_for(&SeriesId::new("b"))
            .map(|p| p.shelf_index)
            .collect();
        assert_eq!(b_shelves, vec![1, 1]);
    }
}
