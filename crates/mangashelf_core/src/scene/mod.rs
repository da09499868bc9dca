//! 3D bookshelf scene.
//!
//! Builds a renderer-agnostic description of shelves and spines from a
//! `ShelfLayout`, and maps camera rays back to series selections.

pub mod build;
pub mod camera;
pub mod geometry;
pub mod interaction;

pub use build::{
    build_scene, Material, Scene, SceneStyle, ShelfMesh, ShelfPart, SpineHit, SpineKey, SpineNode,
    TextLabel,
};
pub use camera::{OrbitCamera, OrbitLimits};
pub use geometry::{Aabb, Ray};
pub use interaction::{
    SceneInteraction, SelectionChannel, SelectionEvent, SubscriptionId, HOVER_SCALE,
};
