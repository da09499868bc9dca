//! Non-3D collection projection.
//!
//! # Responsibility
//! - Project each series into a card row with progress and volume toggles.
//! - Route toggle input to the same collection service mutations as the
//!   3D view.

use crate::model::series::{Series, SeriesId};
use crate::repo::kv_repo::KeyValueRepository;
use crate::service::collection_service::{CollectionError, CollectionService, VolumeChange};

/// Genre tags shown before collapsing into an overflow counter.
pub const VISIBLE_GENRES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeToggle {
    pub volume: u32,
    pub owned: bool,
}

/// One row of the collection list.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesCard {
    pub id: SeriesId,
    pub title: String,
    pub author: String,
    pub status: &'static str,
    pub start_year: i32,
    pub owned_count: usize,
    pub total_volumes: u32,
    /// Owned share in percent, `0.0..=100.0`.
    pub completion_percent: f64,
    pub fully_owned: bool,
    pub rating: Option<f64>,
    pub visible_genres: Vec<String>,
    pub hidden_genre_count: usize,
    pub description: Option<String>,
    pub volumes: Vec<VolumeToggle>,
}

impl SeriesCard {
    pub fn from_series(series: &Series) -> Self {
        let visible_genres: Vec<String> = series
            .genre
            .iter()
            .take(VISIBLE_GENRES)
            .cloned()
            .collect();

        Self {
            id: series.id.clone(),
            title: series.title.clone(),
            author: series.author.clone(),
            status: series.status.as_str(),
            start_year: series.start_year,
            owned_count: series.owned_count(),
            total_volumes: series.total_volumes,
            completion_percent: series.completion_ratio() * 100.0,
            fully_owned: series.is_fully_owned(),
            rating: series.rating,
            hidden_genre_count: series.genre.len() - visible_genres.len(),
            visible_genres,
            description: series.description.clone(),
            volumes: (1..=series.total_volumes)
                .map(|volume| VolumeToggle {
                    volume,
                    owned: series.owns(volume),
                })
                .collect(),
        }
    }
}

/// Cards for every series, in collection order.
pub fn collection_cards(series: &[Series]) -> Vec<SeriesCard> {
    series.iter().map(SeriesCard::from_series).collect()
}

/// Flips ownership of one volume: adds when missing, removes when owned.
pub fn toggle_volume<R: KeyValueRepository>(
    service: &mut CollectionService<R>,
    id: &SeriesId,
    volume: u32,
) -> Result<VolumeChange, CollectionError> {
    let Some(owned) = service.get(id).map(|series| series.owns(volume)) else {
        return Ok(VolumeChange::SeriesMissing);
    };
    if owned {
        Ok(service.remove_volume(id, volume))
    } else {
        service.add_volume(id, volume)
    }
}

#[cfg(test)]
mod tests {
    use super::SeriesCard;
    use crate::model::series::{NewSeries, Series, SeriesId};

    #[test]
    fn card_collapses_extra_genres() {
        let mut payload = NewSeries::new("Vinland Saga", "Makoto Yukimura", 14);
        payload.owned_volumes = vec![1, 2];
        payload.genre = ["action", "history", "drama", "seinen"]
            .iter()
            .map(|tag| tag.to_string())
            .collect();
        let card = SeriesCard::from_series(&Series::with_id(SeriesId::new("v"), payload));

        assert_eq!(card.visible_genres, vec!["action", "history", "drama"]);
        assert_eq!(card.hidden_genre_count, 1);
        assert_eq!(card.volumes.len(), 14);
        assert!(card.volumes[0].owned);
        assert!(!card.volumes[2].owned);
        assert!((card.completion_percent - 200.0 / 14.0).abs() < 1e-9);
    }
}
