use mangashelf_core::db::open_db;
use mangashelf_core::{
    decode_collection, seed_collection, CollectionError, CollectionService,
    InMemoryKeyValueRepository, KeyValueRepository, LoadSource, NewSeries, RepoError,
    RepoResult, Series, SeriesId, SeriesStatus, SqliteKeyValueRepository, VolumeChange,
    COLLECTION_STORAGE_KEY,
};
use std::cell::Cell;

/// Repository whose writes always fail; reads report an empty store.
struct FailingRepository {
    put_attempts: Cell<usize>,
}

impl KeyValueRepository for FailingRepository {
    fn get(&self, _key: &str) -> RepoResult<Option<String>> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: &str) -> RepoResult<()> {
        self.put_attempts.set(self.put_attempts.get() + 1);
        Err(RepoError::Unavailable("disk full".to_string()))
    }
}

fn stored(repo: &InMemoryKeyValueRepository) -> Vec<Series> {
    let blob = repo.get(COLLECTION_STORAGE_KEY).unwrap().unwrap();
    decode_collection(&blob).unwrap()
}

#[test]
fn empty_storage_falls_back_to_seed() {
    let repo = InMemoryKeyValueRepository::new();
    let service = CollectionService::load(&repo);

    assert_eq!(service.load_source(), LoadSource::SeedMissing);
    assert_eq!(service.len(), 5);
    assert_eq!(service.stats().owned_volumes, 69);
    // Seeding alone does not write.
    assert!(repo.is_empty());
}

#[test]
fn malformed_blob_falls_back_to_seed() {
    let repo = InMemoryKeyValueRepository::with_entry(COLLECTION_STORAGE_KEY, "[{\"id\":");
    let service = CollectionService::load(&repo);

    assert_eq!(service.load_source(), LoadSource::SeedRecovered);
    assert_eq!(service.series(), seed_collection().as_slice());
}

#[test]
fn duplicate_ids_in_storage_fall_back_to_seed() {
    let mut seed = seed_collection();
    seed[1].id = seed[0].id.clone();
    let blob = serde_json::to_string(&seed).unwrap();
    let repo = InMemoryKeyValueRepository::with_entry(COLLECTION_STORAGE_KEY, blob);

    let service = CollectionService::load(&repo);
    assert_eq!(service.load_source(), LoadSource::SeedRecovered);
}

#[test]
fn add_persists_and_mints_unique_ids() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);

    let first = service
        .add(NewSeries::new("Vagabond", "Takehiko Inoue", 37))
        .unwrap();
    let second = service
        .add(NewSeries::new("Vagabond", "Takehiko Inoue", 37))
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(service.len(), 7);
    let persisted = stored(&repo);
    assert_eq!(persisted.len(), 7);
    assert_eq!(persisted.last().unwrap().id, second);
}

#[test]
fn add_rejects_invalid_payload_without_mutation() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);

    assert!(service.add(NewSeries::new("  ", "Someone", 3)).is_err());
    assert!(service.add(NewSeries::new("Title", "Someone", 0)).is_err());
    assert_eq!(service.len(), 5);
    assert!(repo.is_empty());
}

#[test]
fn add_volume_is_idempotent() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);
    let id = SeriesId::new("3");

    assert_eq!(service.add_volume(&id, 7).unwrap(), VolumeChange::Applied);
    assert_eq!(service.add_volume(&id, 7).unwrap(), VolumeChange::Unchanged);

    let series = service.get(&id).unwrap();
    assert_eq!(series.owned_volumes, vec![1, 2, 3, 4, 5, 7]);
    assert_eq!(stored(&repo)[2].owned_volumes, vec![1, 2, 3, 4, 5, 7]);
}

#[test]
fn add_volume_rejects_out_of_range() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);
    let id = SeriesId::new("5");

    let err = service.add_volume(&id, 13).unwrap_err();
    assert_eq!(
        err,
        CollectionError::VolumeOutOfRange {
            id: id.clone(),
            volume: 13,
            total_volumes: 12
        }
    );
    assert!(matches!(
        service.add_volume(&id, 0),
        Err(CollectionError::VolumeOutOfRange { .. })
    ));
}

#[test]
fn remove_volume_of_unowned_is_noop() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);
    let id = SeriesId::new("1");

    assert_eq!(service.remove_volume(&id, 50), VolumeChange::Unchanged);
    assert_eq!(service.remove_volume(&id, 1), VolumeChange::Applied);
    assert_eq!(service.get(&id).unwrap().owned_count(), 9);
    assert_eq!(
        service.remove_volume(&SeriesId::new("missing"), 1),
        VolumeChange::SeriesMissing
    );
}

#[test]
fn add_all_volumes_marks_every_volume() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);
    let id = SeriesId::new("3");

    assert_eq!(service.add_all_volumes(&id), VolumeChange::Applied);
    let series = service.get(&id).unwrap();
    assert_eq!(series.owned_volumes, (1..=23).collect::<Vec<u32>>());
    assert!(series.is_fully_owned());
    assert_eq!(service.add_all_volumes(&id), VolumeChange::Unchanged);
}

#[test]
fn update_replaces_by_id_and_truncates_owned() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);
    let id = SeriesId::new("2");

    let mut edited = service.get(&id).unwrap().clone();
    edited.total_volumes = 20;
    edited.status = SeriesStatus::Dropped;
    assert!(service.update(edited).unwrap());

    let series = service.get(&id).unwrap();
    assert_eq!(series.owned_volumes, (1..=20).collect::<Vec<u32>>());
    assert_eq!(series.status, SeriesStatus::Dropped);
    // Order is preserved.
    assert_eq!(service.series()[1].id, id);

    let mut unknown = series.clone();
    unknown.id = SeriesId::new("nope");
    assert!(!service.update(unknown).unwrap());
}

#[test]
fn remove_deletes_series() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);

    assert!(service.remove(&SeriesId::new("4")));
    assert!(!service.remove(&SeriesId::new("4")));
    assert_eq!(service.len(), 4);
    assert_eq!(stored(&repo).len(), 4);
}

#[test]
fn failed_writes_keep_memory_state() {
    let repo = FailingRepository {
        put_attempts: Cell::new(0),
    };
    let mut service = CollectionService::load(&repo);
    let id = SeriesId::new("1");

    assert_eq!(service.add_volume(&id, 11).unwrap(), VolumeChange::Applied);
    assert!(service.get(&id).unwrap().owns(11));
    assert!(!service.persist());
    assert_eq!(repo.put_attempts.get(), 2);
}

#[test]
fn sqlite_round_trip_restores_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.db");

    let added = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteKeyValueRepository::new(&conn);
        let mut service = CollectionService::load(repo);
        let mut payload = NewSeries::new("Blue Period", "Tsubasa Yamaguchi", 15);
        payload.owned_volumes = vec![2, 1];
        payload.genre = vec!["art".to_string()];
        let id = service.add(payload).unwrap();
        service.add_volume(&SeriesId::new("4"), 9).unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    let service = CollectionService::load(SqliteKeyValueRepository::new(&conn));

    assert_eq!(service.load_source(), LoadSource::Storage);
    assert_eq!(service.len(), 6);
    let restored = service.get(&added).unwrap();
    assert_eq!(restored.owned_volumes, vec![1, 2]);
    assert_eq!(restored.genre, vec!["art"]);
    assert!(service.get(&SeriesId::new("4")).unwrap().owns(9));
}

#[test]
fn stats_separate_status_from_ownership() {
    let repo = InMemoryKeyValueRepository::new();
    let service = CollectionService::load(&repo);
    let stats = service.stats();

    assert_eq!(stats.series_count, 5);
    assert_eq!(stats.total_volumes, 213);
    assert_eq!(stats.completed_series, 3);
    assert_eq!(stats.fully_owned_series, 2);
}
