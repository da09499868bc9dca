use mangashelf_core::{
    collection_cards, toggle_volume, CollectionService, EditSeriesForm, FormError,
    InMemoryKeyValueRepository, NewSeries, SeriesForm, SeriesId, SeriesStatus,
    SeriesValidationError, SpineColor, VolumeChange, MAX_TOTAL_VOLUMES,
};

fn filled_form() -> SeriesForm {
    SeriesForm {
        title: "  Chainsaw Man ".to_string(),
        author: "Tatsuki Fujimoto".to_string(),
        total_volumes: "16 volumes".to_string(),
        status: "ongoing".to_string(),
        genre: "action, horror,, ".to_string(),
        start_year: "2018".to_string(),
        color: "orange".to_string(),
        description: "   ".to_string(),
        rating: "8.5/10".to_string(),
    }
}

#[test]
fn add_form_builds_payload_with_no_owned_volumes() {
    let payload = filled_form().submit(2026).unwrap();

    assert_eq!(payload.title, "Chainsaw Man");
    assert_eq!(payload.total_volumes, 16);
    assert_eq!(payload.status, SeriesStatus::Ongoing);
    assert_eq!(payload.genre, vec!["action", "horror"]);
    assert_eq!(payload.start_year, 2018);
    assert_eq!(payload.color, SpineColor::Orange);
    assert_eq!(payload.description, None);
    assert_eq!(payload.rating, Some(8.5));
    assert!(payload.owned_volumes.is_empty());
}

#[test]
fn add_form_requires_title_author_and_total() {
    let mut form = filled_form();
    form.author = "   ".to_string();
    assert_eq!(form.submit(2026), Err(FormError::MissingField("author")));

    let mut form = filled_form();
    form.total_volumes = String::new();
    assert_eq!(form.submit(2026), Err(FormError::MissingField("totalVolumes")));

    let mut form = filled_form();
    form.total_volumes = "zero".to_string();
    assert!(matches!(
        form.submit(2026),
        Err(FormError::InvalidTotalVolumes(_))
    ));

    let mut form = filled_form();
    form.total_volumes = "4294967295".to_string();
    assert!(matches!(
        form.submit(2026),
        Err(FormError::InvalidTotalVolumes(_))
    ));

    let mut form = filled_form();
    form.total_volumes = "0".to_string();
    assert!(matches!(
        form.submit(2026),
        Err(FormError::InvalidTotalVolumes(_))
    ));
}

#[test]
fn add_form_defaults_optional_fields() {
    let form = SeriesForm {
        title: "Dorohedoro".to_string(),
        author: "Q Hayashida".to_string(),
        total_volumes: "23".to_string(),
        start_year: "soon".to_string(),
        rating: "n/a".to_string(),
        ..SeriesForm::default()
    };

    let payload = form.submit(2026).unwrap();
    assert_eq!(payload.status, SeriesStatus::Planned);
    assert_eq!(payload.color, SpineColor::Blue);
    assert_eq!(payload.start_year, 2026);
    assert_eq!(payload.rating, None);
    assert!(payload.genre.is_empty());
}

#[test]
fn add_form_rejects_rating_out_of_range() {
    let mut form = filled_form();
    form.rating = "11".to_string();
    assert_eq!(form.submit(2026), Err(FormError::RatingOutOfRange(11.0)));
}

#[test]
fn edit_form_keeps_identity_and_truncates_owned() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);
    let id = SeriesId::new("1");
    let original = service.get(&id).unwrap().clone();

    let mut form = EditSeriesForm::from_series(&original);
    assert_eq!(form.total_volumes, "106");
    form.total_volumes = "8".to_string();
    form.status = "dropped".to_string();
    form.description = String::new();

    let updated = form.submit(&original, 2026).unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.genre, original.genre);
    assert_eq!(updated.rating, original.rating);
    assert_eq!(updated.owned_volumes, (1..=8).collect::<Vec<u32>>());
    assert_eq!(updated.status, SeriesStatus::Dropped);
    assert_eq!(updated.description, None);

    assert!(service.update(updated).unwrap());
    assert_eq!(service.get(&id).unwrap().total_volumes, 8);
}

#[test]
fn edit_form_rejects_total_above_limit() {
    let repo = InMemoryKeyValueRepository::new();
    let service = CollectionService::load(&repo);
    let original = service.get(&SeriesId::new("1")).unwrap();

    let mut form = EditSeriesForm::from_series(original);
    form.total_volumes = (MAX_TOTAL_VOLUMES + 1).to_string();
    assert!(matches!(
        form.submit(original, 2026),
        Err(FormError::InvalidTotalVolumes(_))
    ));
}

#[test]
fn oversized_series_never_reaches_the_collection() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);

    let err = service
        .add(NewSeries::new("Endless", "Nobody", u32::MAX))
        .unwrap_err();
    assert_eq!(err, SeriesValidationError::TooManyVolumes(u32::MAX));
    assert_eq!(service.len(), 5);
}

#[test]
fn edit_form_rejects_blank_title() {
    let repo = InMemoryKeyValueRepository::new();
    let service = CollectionService::load(&repo);
    let original = service.get(&SeriesId::new("2")).unwrap();

    let mut form = EditSeriesForm::from_series(original);
    form.title = " ".to_string();
    assert_eq!(
        form.submit(original, 2026),
        Err(FormError::MissingField("title"))
    );
    assert_ne!(
        FormError::from(SeriesValidationError::EmptyTitle),
        FormError::MissingField("title")
    );
}

#[test]
fn list_toggle_flips_ownership_and_cards_follow() {
    let repo = InMemoryKeyValueRepository::new();
    let mut service = CollectionService::load(&repo);
    let id = SeriesId::new("5");

    assert_eq!(
        toggle_volume(&mut service, &id, 12).unwrap(),
        VolumeChange::Applied
    );
    let cards = collection_cards(service.series());
    let card = cards.iter().find(|card| card.id == id).unwrap();
    assert_eq!(card.owned_count, 11);
    assert!(!card.fully_owned);
    assert!(!card.volumes[11].owned);

    assert_eq!(
        toggle_volume(&mut service, &id, 12).unwrap(),
        VolumeChange::Applied
    );
    assert!(service.get(&id).unwrap().is_fully_owned());
    assert_eq!(
        toggle_volume(&mut service, &SeriesId::new("missing"), 1).unwrap(),
        VolumeChange::SeriesMissing
    );
}
