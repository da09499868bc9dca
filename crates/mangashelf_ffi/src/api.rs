//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose collection, list and shelf use cases to Dart via FRB.
//! - Map every core error into a response envelope with a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens the database, loads the collection and persists before
//!   returning; calls within one process are serialized.

use log::{error, info};
use mangashelf_core::db::open_db;
use mangashelf_core::{
    compute_layout, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, toggle_volume, CollectionService, EditSeriesForm, LayoutConfig,
    SeriesForm, SeriesId, SqliteKeyValueRepository, VolumeChange,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const COLLECTION_DB_FILE_NAME: &str = "mangashelf.sqlite3";
const COLLECTION_DB_PATH_ENV: &str = "MANGASHELF_DB_PATH";
static COLLECTION_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static COLLECTION_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One series as shown by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub total_volumes: u32,
    /// Ascending.
    pub owned_volumes: Vec<u32>,
    /// `planned|ongoing|completed|dropped`.
    pub status: String,
    pub genre: Vec<String>,
    pub start_year: i32,
    /// Palette name (`red|blue|...`).
    pub color: String,
    /// `#rrggbb` for `color`.
    pub color_hex: String,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub fully_owned: bool,
}

/// Collection snapshot envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResponse {
    pub ok: bool,
    pub items: Vec<SeriesItem>,
    pub message: String,
}

/// Mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Whether stored data changed (`false` for idempotent no-ops).
    pub changed: bool,
    /// Affected series ID.
    pub series_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CollectionActionResponse {
    fn success(message: impl Into<String>, changed: bool, series_id: String) -> Self {
        Self {
            ok: true,
            changed,
            series_id: Some(series_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            series_id: None,
            message: message.into(),
        }
    }

    fn from_volume_change(change: VolumeChange, series_id: String) -> Self {
        match change {
            VolumeChange::Applied => Self::success("Collection updated.", true, series_id),
            VolumeChange::Unchanged => Self::success("Nothing to change.", false, series_id),
            VolumeChange::SeriesMissing => Self::failure(format!("series `{series_id}` not found")),
        }
    }
}

/// Raw add-dialog input, field for field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesFormInput {
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

/// Raw edit-dialog input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSeriesInput {
    pub title: String,
    pub author: String,
    pub total_volumes: String,
    pub status: String,
    pub start_year: String,
    pub color: String,
    pub description: String,
}

/// One spine in shelf coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SpineItem {
    pub series_id: String,
    pub volume: u32,
    pub shelf_index: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color_hex: String,
    pub owned: bool,
}

/// Shelf layout envelope for the 3D view.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfLayoutResponse {
    pub ok: bool,
    /// Shelf center Y values, ascending.
    pub shelf_ys: Vec<f64>,
    pub spines: Vec<SpineItem>,
    /// Volumes that did not fit on any shelf.
    pub dropped_count: u32,
    pub message: String,
}

/// Lists the collection, seeding it on first use.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn collection_list() -> CollectionResponse {
    let result = with_collection(|service| {
        Ok(service
            .series()
            .iter()
            .map(to_series_item)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => CollectionResponse {
            ok: true,
            message: format!("{} series.", items.len()),
            items,
        },
        Err(err) => CollectionResponse {
            ok: false,
            items: Vec::new(),
            message: format!("collection_list failed: {err}"),
        },
    }
}

/// Adds a series from add-dialog input.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; validation failures come back as `ok=false`.
/// - Returns the minted series ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn collection_add(input: SeriesFormInput) -> CollectionActionResponse {
    let form = SeriesForm {
        title: input.title,
        author: input.author,
        total_volumes: input.total_volumes,
        status: input.status,
        genre: input.genre,
        start_year: input.start_year,
        color: input.color,
        description: input.description,
        rating: input.rating,
    };
    let year = mangashelf_core::current_year();

    let result = with_collection(|service| {
        let payload = form.submit(year).map_err(|err| err.to_string())?;
        service.add(payload).map_err(|err| err.to_string())
    });
    match result {
        Ok(id) => CollectionActionResponse::success("Series added.", true, id.to_string()),
        Err(err) => CollectionActionResponse::failure(format!("collection_add failed: {err}")),
    }
}

/// Applies edit-dialog input to an existing series.
///
/// Genre, rating and owned volumes carry over; owned volumes above a lowered
/// total are dropped.
#[flutter_rust_bridge::frb(sync)]
pub fn collection_update(series_id: String, input: EditSeriesInput) -> CollectionActionResponse {
    let id = SeriesId::new(series_id.trim());
    let form = EditSeriesForm {
        title: input.title,
        author: input.author,
        total_volumes: input.total_volumes,
        status: input.status,
        start_year: input.start_year,
        color: input.color,
        description: input.description,
    };
    let year = mangashelf_core::current_year();

    let result = with_collection(|service| {
        let Some(original) = service.get(&id) else {
            return Ok(false);
        };
        let updated = form
            .submit(original, year)
            .map_err(|err| err.to_string())?;
        service.update(updated).map_err(|err| err.to_string())
    });
    match result {
        Ok(true) => CollectionActionResponse::success("Series updated.", true, id.to_string()),
        Ok(false) => CollectionActionResponse::failure(format!("series `{id}` not found")),
        Err(err) => CollectionActionResponse::failure(format!("collection_update failed: {err}")),
    }
}

/// Marks one volume as owned. Adding an owned volume is a successful no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn collection_add_volume(series_id: String, volume: u32) -> CollectionActionResponse {
    let id = SeriesId::new(series_id.trim());
    let result = with_collection(|service| {
        service
            .add_volume(&id, volume)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(change) => CollectionActionResponse::from_volume_change(change, id.to_string()),
        Err(err) => {
            CollectionActionResponse::failure(format!("collection_add_volume failed: {err}"))
        }
    }
}

/// Unmarks one volume. Removing an unowned volume is a successful no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn collection_remove_volume(series_id: String, volume: u32) -> CollectionActionResponse {
    let id = SeriesId::new(series_id.trim());
    match with_collection(|service| Ok(service.remove_volume(&id, volume))) {
        Ok(change) => CollectionActionResponse::from_volume_change(change, id.to_string()),
        Err(err) => {
            CollectionActionResponse::failure(format!("collection_remove_volume failed: {err}"))
        }
    }
}

/// List-view toggle: removes the volume when owned, adds it otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn collection_toggle_volume(series_id: String, volume: u32) -> CollectionActionResponse {
    let id = SeriesId::new(series_id.trim());
    let result = with_collection(|service| {
        toggle_volume(service, &id, volume).map_err(|err| err.to_string())
    });
    match result {
        Ok(change) => CollectionActionResponse::from_volume_change(change, id.to_string()),
        Err(err) => {
            CollectionActionResponse::failure(format!("collection_toggle_volume failed: {err}"))
        }
    }
}

/// Marks every volume of a series as owned.
#[flutter_rust_bridge::frb(sync)]
pub fn collection_add_all_volumes(series_id: String) -> CollectionActionResponse {
    let id = SeriesId::new(series_id.trim());
    match with_collection(|service| Ok(service.add_all_volumes(&id))) {
        Ok(change) => CollectionActionResponse::from_volume_change(change, id.to_string()),
        Err(err) => {
            CollectionActionResponse::failure(format!("collection_add_all_volumes failed: {err}"))
        }
    }
}

/// Deletes a series.
#[flutter_rust_bridge::frb(sync)]
pub fn collection_remove(series_id: String) -> CollectionActionResponse {
    let id = SeriesId::new(series_id.trim());
    match with_collection(|service| Ok(service.remove(&id))) {
        Ok(true) => CollectionActionResponse::success("Series removed.", true, id.to_string()),
        Ok(false) => CollectionActionResponse::failure(format!("series `{id}` not found")),
        Err(err) => CollectionActionResponse::failure(format!("collection_remove failed: {err}")),
    }
}

/// Computes shelf placements for the current collection.
///
/// `include_unowned` adds dimmed placeholder spines for missing volumes.
///
/// # FFI contract
/// - Sync call, DB-backed execution; read-only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn shelf_layout(include_unowned: bool) -> ShelfLayoutResponse {
    let config = LayoutConfig {
        include_unowned,
        ..LayoutConfig::default()
    };

    let result = with_collection(|service| {
        let layout = compute_layout(service.series(), &config).map_err(|err| err.to_string())?;
        let spines = layout
            .placements
            .iter()
            .map(|placement| SpineItem {
                series_id: placement.series.id.to_string(),
                volume: placement.volume,
                shelf_index: placement.shelf_index as u32,
                x: placement.position.x,
                y: placement.position.y,
                z: placement.position.z,
                color_hex: placement.series.color.hex().to_string(),
                owned: placement.owned,
            })
            .collect::<Vec<_>>();
        Ok((
            layout
                .shelves
                .iter()
                .map(|shelf| shelf.position.y)
                .collect::<Vec<_>>(),
            spines,
            layout.dropped.len() as u32,
        ))
    });

    match result {
        Ok((shelf_ys, spines, dropped_count)) => ShelfLayoutResponse {
            ok: true,
            message: format!("{} spines on {} shelves.", spines.len(), shelf_ys.len()),
            shelf_ys,
            spines,
            dropped_count,
        },
        Err(err) => ShelfLayoutResponse {
            ok: false,
            shelf_ys: Vec::new(),
            spines: Vec::new(),
            dropped_count: 0,
            message: format!("shelf_layout failed: {err}"),
        },
    }
}

fn resolve_collection_db_path() -> PathBuf {
    COLLECTION_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(COLLECTION_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(COLLECTION_DB_FILE_NAME)
        })
        .clone()
}

fn open_collection_db() -> Result<Connection, String> {
    let db_path = resolve_collection_db_path();
    open_db(&db_path).map_err(|err| {
        error!(
            "event=ffi_db_open module=ffi status=error path={} error={err}",
            db_path.display()
        );
        format!("collection DB open failed: {err}")
    })
}

/// Runs `f` against a freshly loaded collection under the process-wide lock.
fn with_collection<T>(
    f: impl FnOnce(&mut CollectionService<SqliteKeyValueRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    // Load-mutate-persist must not interleave between callers.
    let _guard = COLLECTION_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let conn = open_collection_db()?;
    let mut service = CollectionService::load(SqliteKeyValueRepository::new(&conn));
    let result = f(&mut service);
    if let Err(err) = &result {
        info!("event=ffi_call module=ffi status=rejected error={err}");
    }
    result
}

fn to_series_item(series: &mangashelf_core::Series) -> SeriesItem {
    SeriesItem {
        id: series.id.to_string(),
        title: series.title.clone(),
        author: series.author.clone(),
        total_volumes: series.total_volumes,
        owned_volumes: series.owned_volumes.clone(),
        status: series.status.as_str().to_string(),
        genre: series.genre.clone(),
        start_year: series.start_year,
        color: series.color.as_str().to_string(),
        color_hex: series.color.hex().to_string(),
        description: series.description.clone(),
        rating: series.rating,
        fully_owned: series.is_fully_owned(),
    }
}
