// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path values with a fill rule.

use alloc::vec::Vec;

use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape as _};

/// Rule deciding which points are inside a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// Inside when the winding number is non-zero.
    #[default]
    NonZero,
    /// Inside when the winding number is odd.
    EvenOdd,
}

/// A Bézier path together with the fill rule it is interpreted with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    bez: BezPath,
    fill: FillRule,
}

impl From<BezPath> for PathData {
    fn from(bez: BezPath) -> Self {
        Self::new(bez, FillRule::NonZero)
    }
}

impl PathData {
    /// Creates a path value.
    #[must_use]
    pub fn new(bez: BezPath, fill: FillRule) -> Self {
        Self { bez, fill }
    }

    /// Returns the geometry.
    #[inline]
    #[must_use]
    pub fn bez(&self) -> &BezPath {
        &self.bez
    }

    /// Returns the path elements.
    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[PathEl] {
        self.bez.elements()
    }

    /// Returns the fill rule.
    #[inline]
    #[must_use]
    pub fn fill_rule(&self) -> FillRule {
        self.fill
    }

    /// Sets the fill rule.
    pub fn set_fill_rule(&mut self, fill: FillRule) {
        self.fill = fill;
    }

    /// Replaces the geometry, keeping the fill rule.
    #[must_use]
    pub fn with_bez(&self, bez: BezPath) -> Self {
        Self {
            bez,
            fill: self.fill,
        }
    }

    /// Returns whether the path has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bez.elements().is_empty()
    }

    /// Returns the smallest rectangle enclosing the geometry, curve extrema
    /// included. Empty paths have zero bounds.
    #[must_use]
    pub fn tight_bounds(&self) -> Rect {
        if self.bez.segments().next().is_none() {
            return match self.bez.elements().first() {
                Some(PathEl::MoveTo(p)) => Rect::from_points(*p, *p),
                _ => Rect::ZERO,
            };
        }
        self.bez.bounding_box()
    }

    /// Returns whether `p` is inside the path under its fill rule.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let winding = self.bez.winding(p);
        match self.fill {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }

    /// Maps every point through `m`.
    pub fn transform(&mut self, m: Affine) {
        self.bez.apply_affine(m);
    }

    /// Releases spare element capacity.
    pub fn shrink_to_fit(&mut self) {
        let elements: Vec<PathEl> = self.bez.elements().to_vec();
        self.bez = BezPath::from_vec(elements);
    }
}
