//! Pointer interaction on the shelf scene.
//!
//! # Responsibility
//! - Track the hovered spine and expose its visual scale.
//! - Turn a click on a spine into one `SelectionEvent` on the selection
//!   channel.
//!
//! # Invariants
//! - Hover never mutates collection data.
//! - A selection event carries the whole series, never the clicked volume.
//! - Hover state survives scene rebuilds because it is keyed by `SpineKey`.

use super::build::{Scene, SpineKey};
use super::geometry::Ray;
use crate::model::series::{Series, SeriesId};
use log::debug;
use std::collections::BTreeMap;

pub const HOVER_SCALE: f64 = 1.05;

/// Raised when a spine is clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    pub series: Series,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type SelectionHandler = Box<dyn FnMut(&SelectionEvent)>;

/// The single outbound selection channel of the scene.
///
/// The host subscribes and unsubscribes; handlers run synchronously in
/// subscription order.
#[derive(Default)]
pub struct SelectionChannel {
    next_id: u64,
    handlers: BTreeMap<SubscriptionId, SelectionHandler>,
}

impl SelectionChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&SelectionEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.insert(id, Box::new(handler));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.handlers.remove(&id).is_some()
    }

    /// Delivers `event` to every handler; returns how many ran.
    pub fn emit(&mut self, event: &SelectionEvent) -> usize {
        for handler in self.handlers.values_mut() {
            handler(event);
        }
        self.handlers.len()
    }
}

/// Hover and click state for one viewport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneInteraction {
    hovered: Option<SpineKey>,
}

impl SceneInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&SpineKey> {
        self.hovered.as_ref()
    }

    /// Updates hover from a pointer ray. Returns `true` when it changed.
    pub fn pointer_move(&mut self, scene: &Scene<'_>, ray: &Ray) -> bool {
        let next = scene
            .pick(ray)
            .map(|hit| scene.spines[hit.index].key.clone());
        if next == self.hovered {
            return false;
        }
        self.hovered = next;
        true
    }

    pub fn pointer_out(&mut self) {
        self.hovered = None;
    }

    /// Render scale for a spine: enlarged while hovered.
    pub fn scale_for(&self, key: &SpineKey) -> f64 {
        if self.hovered.as_ref() == Some(key) {
            HOVER_SCALE
        } else {
            1.0
        }
    }

    /// Resolves a click; emits a selection and returns the series id on a hit.
    pub fn click(
        &mut self,
        scene: &Scene<'_>,
        ray: &Ray,
        channel: &mut SelectionChannel,
    ) -> Option<SeriesId> {
        let hit = scene.pick(ray)?;
        let spine = &scene.spines[hit.index];
        let event = SelectionEvent {
            series: spine.series.clone(),
        };
        let delivered = channel.emit(&event);
        debug!(
            "event=spine_select module=scene status=ok series_id={} volume={} handlers={delivered}",
            spine.key.series_id, spine.key.volume
        );
        Some(spine.key.series_id.clone())
    }

    /// Drops hover state pointing at a spine that no longer exists.
    pub fn retain_valid(&mut self, scene: &Scene<'_>) {
        if let Some(key) = &self.hovered {
            if scene.spine(key).is_none() {
                self.hovered = None;
            }
        }
    }
}
