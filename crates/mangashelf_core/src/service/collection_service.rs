//! Collection use-case service.
//!
//! # Responsibility
//! - Own the in-memory series list for one session.
//! - Apply add/update/volume mutations and persist after each one.
//! - Rehydrate from storage, falling back to the seed collection.
//!
//! # Invariants
//! - Memory is the source of truth; persistence failures are logged and
//!   never roll back a mutation.
//! - Every stored series satisfies `Series::validate()`.
//! - Insertion order is preserved; it drives shelf layout order.

use crate::model::seed::seed_collection;
use crate::model::series::{NewSeries, Series, SeriesId, SeriesStatus, SeriesValidationError};
use crate::repo::kv_repo::KeyValueRepository;
use crate::store::codec::{decode_collection, encode_collection, COLLECTION_STORAGE_KEY};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outcome of a volume-level mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    /// Ownership set changed and was persisted (best-effort).
    Applied,
    /// Request was already satisfied; nothing changed.
    Unchanged,
    /// No series with the requested id.
    SeriesMissing,
}

/// Where the current collection came from at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Storage,
    SeedMissing,
    SeedRecovered,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionError {
    Validation(SeriesValidationError),
    VolumeOutOfRange {
        id: SeriesId,
        volume: u32,
        total_volumes: u32,
    },
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::VolumeOutOfRange {
                id,
                volume,
                total_volumes,
            } => write!(
                f,
                "volume {volume} is outside 1..={total_volumes} for series `{id}`"
            ),
        }
    }
}

impl Error for CollectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::VolumeOutOfRange { .. } => None,
        }
    }
}

impl From<SeriesValidationError> for CollectionError {
    fn from(value: SeriesValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Aggregate counters shown above the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionStats {
    pub series_count: usize,
    pub owned_volumes: usize,
    pub total_volumes: usize,
    /// Series whose editorial status is `completed`.
    pub completed_series: usize,
    /// Series where every volume is owned.
    pub fully_owned_series: usize,
}

/// Session-scoped collection store over a key-value repository.
pub struct CollectionService<R: KeyValueRepository> {
    repo: R,
    series: Vec<Series>,
    source: LoadSource,
}

impl<R: KeyValueRepository> CollectionService<R> {
    /// Loads the persisted collection, or the seed collection when storage
    /// is empty, unreadable or malformed. Never fails.
    pub fn load(repo: R) -> Self {
        let (series, source) = match repo.get(COLLECTION_STORAGE_KEY) {
            Ok(Some(blob)) => match decode_collection(&blob) {
                Ok(series) => {
                    info!(
                        "event=collection_load module=service status=ok series_count={}",
                        series.len()
                    );
                    (series, LoadSource::Storage)
                }
                Err(err) => {
                    error!(
                        "event=collection_load module=service status=fallback error_code=decode_failed error={err}"
                    );
                    (seed_collection(), LoadSource::SeedRecovered)
                }
            },
            Ok(None) => {
                info!("event=collection_load module=service status=fallback reason=empty_storage");
                (seed_collection(), LoadSource::SeedMissing)
            }
            Err(err) => {
                error!(
                    "event=collection_load module=service status=fallback error_code=storage_read_failed error={err}"
                );
                (seed_collection(), LoadSource::SeedRecovered)
            }
        };

        Self {
            repo,
            series,
            source,
        }
    }

    /// Starts from an explicit list without reading storage.
    ///
    /// Entries are validated; invalid ones are rejected as a whole.
    pub fn from_series(repo: R, series: Vec<Series>) -> Result<Self, SeriesValidationError> {
        for entry in &series {
            entry.validate()?;
        }
        Ok(Self {
            repo,
            series,
            source: LoadSource::Storage,
        })
    }

    pub fn load_source(&self) -> LoadSource {
        self.source
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn get(&self, id: &SeriesId) -> Option<&Series> {
        self.series.iter().find(|series| &series.id == id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Appends a new series with a freshly minted id.
    pub fn add(&mut self, payload: NewSeries) -> Result<SeriesId, SeriesValidationError> {
        let mut series = Series::new(payload);
        series.normalize_owned_volumes();
        series.validate()?;

        let id = series.id.clone();
        self.series.push(series);
        info!("event=series_add module=service status=ok series_id={id}");
        self.persist();
        Ok(id)
    }

    /// Replaces the entry with the same id.
    ///
    /// Owned volumes above a lowered `total_volumes` are dropped before
    /// validation. Returns `Ok(false)` when no entry matches.
    pub fn update(&mut self, mut series: Series) -> Result<bool, SeriesValidationError> {
        let dropped = series.normalize_owned_volumes();
        series.validate()?;

        let Some(slot) = self.series.iter_mut().find(|entry| entry.id == series.id) else {
            debug!(
                "event=series_update module=service status=noop reason=not_found series_id={}",
                series.id
            );
            return Ok(false);
        };

        if dropped > 0 {
            warn!(
                "event=series_update module=service status=repaired series_id={} dropped_volumes={dropped}",
                series.id
            );
        }
        *slot = series;
        info!(
            "event=series_update module=service status=ok series_id={}",
            slot.id
        );
        self.persist();
        Ok(true)
    }

    /// Marks `volume` as owned; duplicate inserts leave the set unchanged.
    pub fn add_volume(
        &mut self,
        id: &SeriesId,
        volume: u32,
    ) -> Result<VolumeChange, CollectionError> {
        let Some(series) = self.find_mut(id) else {
            return Ok(VolumeChange::SeriesMissing);
        };
        if volume == 0 || volume > series.total_volumes {
            return Err(CollectionError::VolumeOutOfRange {
                id: id.clone(),
                volume,
                total_volumes: series.total_volumes,
            });
        }

        match series.owned_volumes.binary_search(&volume) {
            Ok(_) => Ok(VolumeChange::Unchanged),
            Err(index) => {
                series.owned_volumes.insert(index, volume);
                info!("event=volume_add module=service status=ok series_id={id} volume={volume}");
                self.persist();
                Ok(VolumeChange::Applied)
            }
        }
    }

    /// Unmarks `volume`; a no-op when it is not owned.
    pub fn remove_volume(&mut self, id: &SeriesId, volume: u32) -> VolumeChange {
        let Some(series) = self.find_mut(id) else {
            return VolumeChange::SeriesMissing;
        };

        match series.owned_volumes.binary_search(&volume) {
            Ok(index) => {
                series.owned_volumes.remove(index);
                info!(
                    "event=volume_remove module=service status=ok series_id={id} volume={volume}"
                );
                self.persist();
                VolumeChange::Applied
            }
            Err(_) => VolumeChange::Unchanged,
        }
    }

    /// Marks every volume `1..=total_volumes` as owned.
    pub fn add_all_volumes(&mut self, id: &SeriesId) -> VolumeChange {
        let Some(series) = self.find_mut(id) else {
            return VolumeChange::SeriesMissing;
        };
        if series.is_fully_owned() {
            return VolumeChange::Unchanged;
        }

        series.owned_volumes = (1..=series.total_volumes).collect();
        info!(
            "event=volume_add_all module=service status=ok series_id={id} total_volumes={}",
            series.total_volumes
        );
        self.persist();
        VolumeChange::Applied
    }

    /// Removes a series from the collection.
    pub fn remove(&mut self, id: &SeriesId) -> bool {
        let before = self.series.len();
        self.series.retain(|series| &series.id != id);
        if self.series.len() == before {
            return false;
        }

        info!("event=series_remove module=service status=ok series_id={id}");
        self.persist();
        true
    }

    pub fn stats(&self) -> CollectionStats {
        self.series
            .iter()
            .fold(CollectionStats::default(), |mut stats, series| {
                stats.series_count += 1;
                stats.owned_volumes += series.owned_count();
                stats.total_volumes += series.total_volumes as usize;
                if series.status == SeriesStatus::Completed {
                    stats.completed_series += 1;
                }
                if series.is_fully_owned() {
                    stats.fully_owned_series += 1;
                }
                stats
            })
    }

    /// Writes the whole collection under the fixed storage key.
    ///
    /// Best-effort: returns `false` and logs on failure, never retries.
    pub fn persist(&self) -> bool {
        let blob = match encode_collection(&self.series) {
            Ok(blob) => blob,
            Err(err) => {
                error!(
                    "event=collection_persist module=service status=error error_code=encode_failed error={err}"
                );
                return false;
            }
        };

        match self.repo.put(COLLECTION_STORAGE_KEY, &blob) {
            Ok(()) => {
                debug!(
                    "event=collection_persist module=service status=ok bytes={}",
                    blob.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=collection_persist module=service status=error error_code=storage_write_failed error={err}"
                );
                false
            }
        }
    }

    fn find_mut(&mut self, id: &SeriesId) -> Option<&mut Series> {
        self.series.iter_mut().find(|series| &series.id == id)
    }
}
