//! Sample collection used on first start and as a recovery fallback.
//!
//! # Invariants
//! - Seed ids are stable (`"1"`..`"5"`) so repeated fallbacks do not mint
//!   new identities.
//! - Every seed entry passes `Series::validate()`.

use crate::model::series::{NewSeries, Series, SeriesId, SeriesStatus, SpineColor};

struct SeedEntry {
    id: &'static str,
    title: &'static str,
    author: &'static str,
    total_volumes: u32,
    owned_through: u32,
    status: SeriesStatus,
    start_year: i32,
    color: SpineColor,
    description: &'static str,
}

const SEED: &[SeedEntry] = &[
    SeedEntry {
        id: "1",
        title: "One Piece",
        author: "Eiichiro Oda",
        total_volumes: 106,
        owned_through: 10,
        status: SeriesStatus::Ongoing,
        start_year: 1997,
        color: SpineColor::Blue,
        description: "Follow Monkey D. Luffy as he explores the Grand Line to find One Piece and become Pirate King.",
    },
    SeedEntry {
        id: "2",
        title: "Attack on Titan",
        author: "Hajime Isayama",
        total_volumes: 34,
        owned_through: 34,
        status: SeriesStatus::Completed,
        start_year: 2009,
        color: SpineColor::Red,
        description: "Humanity fights for survival against giant humanoid Titans.",
    },
    SeedEntry {
        id: "3",
        title: "Demon Slayer",
        author: "Koyoharu Gotouge",
        total_volumes: 23,
        owned_through: 5,
        status: SeriesStatus::Completed,
        start_year: 2016,
        color: SpineColor::Green,
        description: "Tanjiro becomes a demon slayer to save his sister and avenge his family.",
    },
    SeedEntry {
        id: "4",
        title: "My Hero Academia",
        author: "Kohei Horikoshi",
        total_volumes: 38,
        owned_through: 8,
        status: SeriesStatus::Ongoing,
        start_year: 2014,
        color: SpineColor::Orange,
        description: "In a world of superheroes, Izuku dreams of becoming the greatest hero.",
    },
    SeedEntry {
        id: "5",
        title: "Death Note",
        author: "Tsugumi Ohba",
        total_volumes: 12,
        owned_through: 12,
        status: SeriesStatus::Completed,
        start_year: 2003,
        color: SpineColor::Purple,
        description: "Light Yagami finds a notebook that can kill anyone whose name is written in it.",
    },
];

/// Returns the built-in sample collection in display order.
pub fn seed_collection() -> Vec<Series> {
    SEED.iter()
        .map(|entry| {
            Series::with_id(
                SeriesId::new(entry.id),
                NewSeries {
                    title: entry.title.to_string(),
                    author: entry.author.to_string(),
                    total_volumes: entry.total_volumes,
                    owned_volumes: (1..=entry.owned_through).collect(),
                    status: entry.status,
                    genre: Vec::new(),
                    start_year: entry.start_year,
                    color: entry.color,
                    description: Some(entry.description.to_string()),
                    rating: None,
                },
            )
        })
        .collect()
}
