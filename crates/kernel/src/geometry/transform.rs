use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use super::point::Point3d;

/// A rigid (possibly mirroring) affine transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: Matrix4<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            m: Matrix4::identity(),
        }
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            m: Matrix4::new_translation(&Vector3::new(dx, dy, dz)),
        }
    }

    /// Reflection across the horizontal plane `z = height`.
    pub fn mirror_z(height: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(2, 2)] = -1.0;
        m[(2, 3)] = 2.0 * height;
        Self { m }
    }

    /// Transform a point (applies translation).
    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        let r = self.m.transform_point(&nalgebra::Point3::new(p.x, p.y, p.z));
        Point3d::new(r.x, r.y, r.z)
    }

    /// Apply `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform { m: next.m * self.m }
    }

    /// True when the transform reverses orientation (odd number of reflections).
    pub fn is_mirroring(&self) -> bool {
        self.m.fixed_view::<3, 3>(0, 0).clone_owned().determinant() < 0.0
    }

    /// Image of the origin.
    pub fn origin(&self) -> Point3d {
        Point3d::new(self.m[(0, 3)], self.m[(1, 3)], self.m[(2, 3)])
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3d>) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.expand_to_include(p);
        }
        bb
    }

    pub fn expand_to_include(&mut self, p: &Point3d) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn contains_point(&self, p: &Point3d) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn center(&self) -> Point3d {
        self.min.midpoint(&self.max)
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point3d::new(self.min.x - margin, self.min.y - margin, self.min.z - margin),
            max: Point3d::new(self.max.x + margin, self.max.y + margin, self.max.z + margin),
        }
    }
}
