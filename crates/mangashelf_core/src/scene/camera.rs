//! Perspective orbit camera with clamped distance and polar angle.
//!
//! # Invariants
//! - `distance` stays within `[min_distance, max_distance]`.
//! - `polar` stays within `[min_polar, max_polar]`, so the eye never crosses
//!   above or below the shelf plane's poles and the view basis never
//!   degenerates.

use super::geometry::Ray;
use nalgebra::{Point3, Vector3};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f64,
    pub max_distance: f64,
    pub min_polar: f64,
    pub max_polar: f64,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 3.0,
            max_distance: 25.0,
            min_polar: FRAC_PI_4,
            max_polar: PI - FRAC_PI_4,
        }
    }
}

/// Orbit camera around a target point.
///
/// `azimuth` rotates about +Y (0 looks down -Z); `polar` is measured from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Point3<f64>,
    distance: f64,
    azimuth: f64,
    polar: f64,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    pub limits: OrbitLimits,
}

impl Default for OrbitCamera {
    /// Eye at `(0, 0, 15)` looking at the origin, 60° vertical fov.
    fn default() -> Self {
        Self::new(
            Point3::origin(),
            15.0,
            0.0,
            FRAC_PI_2,
            60f64.to_radians(),
            OrbitLimits::default(),
        )
    }
}

impl OrbitCamera {
    pub fn new(
        target: Point3<f64>,
        distance: f64,
        azimuth: f64,
        polar: f64,
        fov_y: f64,
        limits: OrbitLimits,
    ) -> Self {
        Self {
            target,
            distance: distance.clamp(limits.min_distance, limits.max_distance),
            azimuth,
            polar: polar.clamp(limits.min_polar, limits.max_polar),
            fov_y,
            limits,
        }
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn polar(&self) -> f64 {
        self.polar
    }

    pub fn eye(&self) -> Point3<f64> {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        self.target
            + Vector3::new(sin_polar * sin_az, cos_polar, sin_polar * cos_az) * self.distance
    }

    /// Orbits by the given angle deltas (radians), clamping the polar angle.
    pub fn rotate(&mut self, delta_azimuth: f64, delta_polar: f64) {
        self.azimuth = (self.azimuth + delta_azimuth).rem_euclid(2.0 * PI);
        self.polar = (self.polar + delta_polar).clamp(self.limits.min_polar, self.limits.max_polar);
    }

    /// Multiplies the eye distance by `factor` (`< 1` zooms in).
    pub fn zoom(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.distance =
            (self.distance * factor).clamp(self.limits.min_distance, self.limits.max_distance);
    }

    /// Moves the target within the view plane.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (_, right, up) = self.basis();
        self.target += right * dx + up * dy;
    }

    /// World ray through a normalized device coordinate (`[-1, 1]` each axis,
    /// +Y up) for a viewport of the given aspect ratio.
    pub fn ray_through(&self, ndc_x: f64, ndc_y: f64, aspect: f64) -> Ray {
        let (forward, right, up) = self.basis();
        let tan_half = (self.fov_y / 2.0).tan();
        let direction = forward + right * (ndc_x * tan_half * aspect) + up * (ndc_y * tan_half);
        Ray::new(self.eye(), direction.normalize())
    }

    fn basis(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(&Vector3::y()).normalize();
        let up = right.cross(&forward);
        (forward, right, up)
    }
}
