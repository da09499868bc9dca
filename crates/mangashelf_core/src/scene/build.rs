//! Backend-neutral scene description built from a shelf layout.
//!
//! # Responsibility
//! - Turn shelves into surface/back/side boxes and placements into spines.
//! - Attach materials and spine labels a renderer can draw verbatim.
//! - Resolve a picking ray to the nearest interactive spine.
//!
//! # Invariants
//! - Spine order matches `ShelfLayout::placements` order.
//! - Placeholder (unowned) spines carry no labels and are never picked.

use super::geometry::{Aabb, Ray};
use crate::layout::{Placement, Shelf, ShelfLayout};
use crate::model::series::{Series, SeriesId};
use nalgebra::{Point3, Vector3};
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// `#rrggbb`.
    pub color: &'static str,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
}

impl Material {
    pub const fn opaque(color: &'static str, roughness: f32) -> Self {
        Self {
            color,
            roughness,
            metalness: 0.0,
            opacity: 1.0,
        }
    }
}

/// Visual constants for shelves and spines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStyle {
    pub board_thickness: f64,
    pub panel_height: f64,
    pub panel_thickness: f64,
    pub side_height: f64,
    pub board: Material,
    pub back_panel: Material,
    /// Width, height, depth of one spine box.
    pub spine_size: Vector3<f64>,
    pub spine_roughness: f32,
    pub spine_metalness: f32,
    pub placeholder: Material,
    pub label_depth: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            board_thickness: 0.1,
            panel_height: 2.0,
            panel_thickness: 0.05,
            side_height: 2.1,
            board: Material::opaque("#8B4513", 0.8),
            back_panel: Material::opaque("#654321", 0.9),
            spine_size: Vector3::new(0.3, 2.0, 0.05),
            spine_roughness: 0.3,
            spine_metalness: 0.1,
            placeholder: Material {
                color: "#2a2a2a",
                roughness: 0.3,
                metalness: 0.1,
                opacity: 0.3,
            },
            label_depth: 0.026,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfPart {
    Surface,
    Back,
    LeftSide,
    RightSide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShelfMesh {
    pub shelf_index: usize,
    pub part: ShelfPart,
    pub bounds: Aabb,
    pub material: Material,
}

/// Text drawn on a spine face, relative to the spine center.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub offset: Vector3<f64>,
    /// Rotation about Z in radians; spine text runs vertically.
    pub rotation_z: f64,
    pub font_size: f64,
    pub color: &'static str,
    pub max_width: Option<f64>,
}

/// Stable identity of one spine across rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpineKey {
    pub series_id: SeriesId,
    pub volume: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpineNode<'a> {
    pub key: SpineKey,
    pub series: &'a Series,
    pub shelf_index: usize,
    pub bounds: Aabb,
    pub material: Material,
    pub labels: Vec<TextLabel>,
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpineHit {
    /// Index into `Scene::spines`.
    pub index: usize,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene<'a> {
    pub shelves: Vec<ShelfMesh>,
    pub spines: Vec<SpineNode<'a>>,
}

impl<'a> Scene<'a> {
    pub fn spine(&self, key: &SpineKey) -> Option<&SpineNode<'a>> {
        self.spines.iter().find(|spine| &spine.key == key)
    }

    /// Nearest interactive spine along `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<SpineHit> {
        self.spines
            .iter()
            .enumerate()
            .filter(|(_, spine)| spine.interactive)
            .filter_map(|(index, spine)| {
                spine
                    .bounds
                    .intersect(ray)
                    .map(|distance| SpineHit { index, distance })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Builds drawable shelves and spines for `layout`.
pub fn build_scene<'a>(layout: &ShelfLayout<'a>, style: &SceneStyle) -> Scene<'a> {
    Scene {
        shelves: layout
            .shelves
            .iter()
            .flat_map(|shelf| shelf_meshes(shelf, style))
            .collect(),
        spines: layout
            .placements
            .iter()
            .map(|placement| spine_node(placement, style))
            .collect(),
    }
}

fn shelf_meshes(shelf: &Shelf, style: &SceneStyle) -> [ShelfMesh; 4] {
    let origin = shelf.position;
    let rise = style.panel_height / 2.0;
    let mesh = |part: ShelfPart,
                offset: Vector3<f64>,
                size: Vector3<f64>,
                material: Material| ShelfMesh {
        shelf_index: shelf.index,
        part,
        bounds: Aabb::from_center(origin + offset, size),
        material,
    };

    [
        mesh(
            ShelfPart::Surface,
            Vector3::zeros(),
            Vector3::new(shelf.width, style.board_thickness, shelf.depth),
            style.board,
        ),
        mesh(
            ShelfPart::Back,
            Vector3::new(0.0, rise, -shelf.depth / 2.0 + style.panel_thickness),
            Vector3::new(shelf.width, style.panel_height, style.panel_thickness),
            style.back_panel,
        ),
        mesh(
            ShelfPart::LeftSide,
            Vector3::new(-shelf.width / 2.0, rise, 0.0),
            Vector3::new(style.board_thickness, style.side_height, shelf.depth),
            style.board,
        ),
        mesh(
            ShelfPart::RightSide,
            Vector3::new(shelf.width / 2.0, rise, 0.0),
            Vector3::new(style.board_thickness, style.side_height, shelf.depth),
            style.board,
        ),
    ]
}

fn spine_node<'a>(placement: &Placement<'a>, style: &SceneStyle) -> SpineNode<'a> {
    let series = placement.series;
    // Spines stand on the board: lift by half their height.
    let center = Point3::new(
        placement.position.x,
        placement.position.y + style.spine_size.y / 2.0,
        placement.position.z,
    );

    let (material, labels) = if placement.owned {
        (
            Material {
                color: series.color.hex(),
                roughness: style.spine_roughness,
                metalness: style.spine_metalness,
                opacity: 1.0,
            },
            spine_labels(series, placement.volume, style.label_depth),
        )
    } else {
        (style.placeholder, Vec::new())
    };

    SpineNode {
        key: SpineKey {
            series_id: series.id.clone(),
            volume: placement.volume,
        },
        series,
        shelf_index: placement.shelf_index,
        bounds: Aabb::from_center(center, style.spine_size),
        material,
        labels,
        interactive: placement.owned,
    }
}

fn spine_labels(series: &Series, volume: u32, depth: f64) -> Vec<TextLabel> {
    vec![
        TextLabel {
            text: series.title.clone(),
            offset: Vector3::new(0.0, 0.5, depth),
            rotation_z: FRAC_PI_2,
            font_size: 0.08,
            color: "#ffffff",
            max_width: Some(1.8),
        },
        TextLabel {
            text: series.author.clone(),
            offset: Vector3::new(0.0, -0.3, depth),
            rotation_z: FRAC_PI_2,
            font_size: 0.06,
            color: "#cccccc",
            max_width: Some(1.5),
        },
        TextLabel {
            text: format!("Vol. {volume}"),
            offset: Vector3::new(0.0, -0.8, depth),
            rotation_z: FRAC_PI_2,
            font_size: 0.05,
            color: "#ffffff",
            max_width: None,
        },
    ]
}
