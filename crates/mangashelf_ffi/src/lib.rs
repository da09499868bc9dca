//! Flutter-facing bindings for the Manga Shelf core.

pub mod api;
