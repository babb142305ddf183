pub mod bsp;
pub mod engine;
pub mod split;

pub use engine::{BoolOp, BooleanOutcome, Interaction, check_result};

use crate::Tolerance;
use crate::error::GeometryResult;
use crate::topology::mesh::Solid;

/// Boolean set operations over closed polygonal solids.
///
/// The first operand is consumed and the second borrowed, so a tool solid can
/// be applied to many targets. Implement this trait to provide alternative
/// backends or mock implementations.
pub trait BooleanEngine {
    /// Run `op` and report how the operands interacted.
    fn apply(&self, op: BoolOp, a: Solid, b: &Solid) -> GeometryResult<BooleanOutcome>;

    /// Compute the union of two solids.
    fn union(&self, a: Solid, b: &Solid) -> GeometryResult<Solid> {
        self.apply(BoolOp::Union, a, b).map(|o| o.solid)
    }

    /// Subtract `tool` from `target`.
    fn subtract(&self, target: Solid, tool: &Solid) -> GeometryResult<Solid> {
        self.apply(BoolOp::Subtract, target, tool).map(|o| o.solid)
    }

    /// Compute the intersection of two solids.
    fn intersect(&self, a: Solid, b: &Solid) -> GeometryResult<Solid> {
        self.apply(BoolOp::Intersect, a, b).map(|o| o.solid)
    }
}

/// Default engine: BSP clipping of polygon boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct BspBooleanEngine {
    pub tolerance: Tolerance,
}

impl BspBooleanEngine {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }
}

impl BooleanEngine for BspBooleanEngine {
    fn apply(&self, op: BoolOp, a: Solid, b: &Solid) -> GeometryResult<BooleanOutcome> {
        engine::boolean_op(a, b, op, &self.tolerance)
    }
}

#[cfg(test)]
mod trait_tests {
    use super::*;
    use crate::geometry::point::Point3d;
    use crate::topology::primitives::make_box;

    fn cube(min: f64, size: f64) -> Solid {
        make_box("cube", Point3d::new(min, min, min), Point3d::new(min + size, min + size, min + size)).unwrap()
    }

    #[test]
    fn test_boolean_engine_trait_union() {
        let engine = BspBooleanEngine::default();
        let result = engine.union(cube(0.0, 1.0), &cube(5.0, 1.0)).unwrap();
        assert!((result.volume() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_boolean_engine_trait_subtract_keeps_tool() {
        let engine = BspBooleanEngine::default();
        let tool = cube(1.0, 2.0);
        let first = engine.subtract(cube(0.0, 2.0), &tool).unwrap();
        let second = engine.subtract(cube(2.0, 2.0), &tool).unwrap();
        assert!((first.volume() - 7.0).abs() < 1e-9);
        assert!((second.volume() - 7.0).abs() < 1e-9);
        assert!((tool.volume() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_boolean_engine_trait_intersect() {
        let engine = BspBooleanEngine::default();
        let result = engine.intersect(cube(0.0, 2.0), &cube(1.0, 2.0)).unwrap();
        assert!((result.volume() - 1.0).abs() < 1e-9);
    }
}
