//! Core domain logic for Manga Shelf.
//! This crate is the single source of truth for collection invariants and
//! for the 3D shelf layout.

pub mod db;
pub mod form;
pub mod host;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scene;
pub mod service;
pub mod store;
pub mod view;

pub use form::{EditSeriesForm, FormError, SeriesForm};
pub use layout::{
    compute_layout, DroppedVolume, LayoutConfig, LayoutError, Placement, RowPolicy, Shelf,
    ShelfLayout,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::seed::seed_collection;
pub use model::series::{
    current_year, NewSeries, Series, SeriesId, SeriesStatus, SeriesValidationError, SpineColor,
    MAX_TOTAL_VOLUMES,
};
pub use repo::kv_repo::{
    InMemoryKeyValueRepository, KeyValueRepository, RepoError, RepoResult,
    SqliteKeyValueRepository,
};
pub use scene::{
    build_scene, OrbitCamera, Ray, Scene, SceneInteraction, SceneStyle, SelectionChannel,
    SelectionEvent,
};
pub use service::collection_service::{
    CollectionError, CollectionService, CollectionStats, LoadSource, VolumeChange,
};
pub use store::codec::{decode_collection, encode_collection, CodecError, COLLECTION_STORAGE_KEY};
pub use view::{collection_cards, toggle_volume, SeriesCard, VolumeToggle};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
