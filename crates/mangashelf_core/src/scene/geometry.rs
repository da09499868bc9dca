//! Ray and axis-aligned box primitives used for picking.

use nalgebra::{Point3, Vector3};

/// A ray defined by an origin point and a (not necessarily unit) direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub const fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// Box of `size` centered on `center`.
    pub fn from_center(center: Point3<f64>, size: Vector3<f64>) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Slab test. Returns the entry distance along `ray` (clamped to 0 when
    /// the origin is inside), or `None` when the box is missed or behind.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            if direction.abs() < f64::EPSILON {
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (self.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::{Aabb, Ray};
    use nalgebra::{Point3, Vector3};

    fn unit_box() -> Aabb {
        Aabb::from_center(Point3::origin(), Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn ray_hits_box_in_front() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vector3::z());
        let t = unit_box().intersect(&ray).unwrap();
        assert!((t - 4.5).abs() < 1e-12);
    }

    #[test]
    fn ray_misses_box_behind_origin() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::z());
        assert!(unit_box().intersect(&ray).is_none());
    }

    #[test]
    fn axis_parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Point3::new(2.0, 0.0, 5.0), -Vector3::z());
        assert!(unit_box().intersect(&ray).is_none());
    }
}
