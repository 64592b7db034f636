// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use core::cell::Cell;

use super::{Derivation, Derived, EffectKind, GeometryEffect};
use crate::filter::{CornerFilter, FilterOptions, PathFilter as _, hairline};
use crate::geometry::{GeometryNode, PathData};
use crate::node::set_attribute;

/// Corner-rounding parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoundParams {
    /// Rounding radius. Non-positive radii leave the path unchanged.
    pub radius: f64,
}

impl RoundParams {
    /// Rounds the corners of `path`.
    #[must_use]
    pub fn apply(self, path: PathData) -> Derived {
        let Some(filter) = CornerFilter::new(self.radius) else {
            return Derived::skipped(path);
        };
        let Some(bez) = filter.filter_path(path.bez(), &hairline()) else {
            panic!("corner filter rejected radius {}", self.radius);
        };
        Derived::applied(path.with_bez(bez))
    }
}

/// Derivation of [`RoundEffect`].
#[derive(Debug)]
pub struct Round {
    params: Cell<RoundParams>,
}

impl Derivation for Round {
    const KIND: EffectKind = EffectKind::Round;

    fn derive(&self, child: &dyn GeometryNode, _: &FilterOptions) -> Derived {
        self.params.get().apply(child.as_path())
    }
}

/// Rounds the corners of the child's path.
pub type RoundEffect = GeometryEffect<Round>;

impl GeometryEffect<Round> {
    /// Creates a corner-rounding effect over `child`.
    #[must_use]
    pub fn new(child: Rc<dyn GeometryNode>, radius: f64) -> Rc<Self> {
        Self::with_derivation(
            child,
            Round {
                params: Cell::new(RoundParams { radius }),
            },
        )
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.derivation.params.get().radius
    }

    /// Sets the radius, invalidating the node if it changed.
    pub fn set_radius(&self, radius: f64) {
        set_attribute(&self.base, &self.derivation.params, RoundParams { radius });
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, PathEl};

    use super::*;
    use crate::effect::FilterOutcome;
    use crate::effect::test_util::square;
    use crate::geometry::{FillRule, Path};
    use crate::node::{Invalidatable as _, Node as _};

    #[test]
    fn zero_radius_is_a_no_op() {
        let child = Path::new(PathData::new(square(10.0), FillRule::EvenOdd));
        let round = RoundEffect::new(child.clone(), 0.0);
        round.revalidate(None, Affine::IDENTITY);
        assert_eq!(round.as_path(), child.path());
    }

    #[test]
    fn rounding_keeps_the_fill_rule() {
        let path = PathData::new(square(10.0), FillRule::EvenOdd);
        let out = RoundParams { radius: 2.0 }.apply(path);
        assert_eq!(out.outcome, FilterOutcome::Applied);
        assert_eq!(out.path.fill_rule(), FillRule::EvenOdd);
        assert_eq!(out.path.elements()[0], PathEl::MoveTo((2.0, 0.0).into()));
    }

    #[test]
    fn set_radius_invalidates_on_change_only() {
        let child = Path::from_bez(square(10.0));
        let round = RoundEffect::new(child, 0.0);
        round.revalidate(None, Affine::IDENTITY);

        round.set_radius(0.0);
        assert!(!round.has_inval());
        round.set_radius(3.0);
        assert!(round.has_inval());
        round.revalidate(None, Affine::IDENTITY);
        assert_eq!(round.radius(), 3.0);
        assert_ne!(round.as_path().bez(), &square(10.0));
    }
}
