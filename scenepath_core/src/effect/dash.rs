// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use super::{Derivation, Derived, EffectKind, GeometryEffect};
use crate::filter::{DashFilter, FilterOptions, PathFilter as _, hairline};
use crate::geometry::{GeometryNode, PathData};

/// Dash parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashParams {
    /// On/off lengths. Odd-length lists are repeated once; an empty list
    /// disables dashing.
    pub intervals: Vec<f64>,
    /// Offset into the pattern at which dashing starts.
    pub phase: f64,
}

impl DashParams {
    /// Dashes `path`.
    ///
    /// Malformed patterns and patterns producing too many dashes leave the
    /// path unchanged, reported as [`Declined`](super::FilterOutcome::Declined).
    #[must_use]
    pub fn apply(&self, path: PathData, options: &FilterOptions) -> Derived {
        if self.intervals.is_empty() {
            return Derived::skipped(path);
        }
        let dashed = DashFilter::new(&self.intervals, self.phase, options)
            .and_then(|filter| filter.filter_path(path.bez(), &hairline()));
        match dashed {
            Some(bez) => Derived::applied(path.with_bez(bez)),
            None => Derived::declined(path),
        }
    }
}

/// Derivation of [`DashEffect`].
#[derive(Debug)]
pub struct Dash {
    params: RefCell<DashParams>,
}

impl Derivation for Dash {
    const KIND: EffectKind = EffectKind::Dash;

    fn derive(&self, child: &dyn GeometryNode, options: &FilterOptions) -> Derived {
        self.params.borrow().apply(child.as_path(), options)
    }
}

/// Splits the child's path into dashes.
pub type DashEffect = GeometryEffect<Dash>;

impl GeometryEffect<Dash> {
    /// Creates a dash effect over `child`.
    #[must_use]
    pub fn new(child: Rc<dyn GeometryNode>, intervals: &[f64], phase: f64) -> Rc<Self> {
        Self::with_derivation(
            child,
            Dash {
                params: RefCell::new(DashParams {
                    intervals: intervals.to_vec(),
                    phase,
                }),
            },
        )
    }

    /// Returns a copy of the dash parameters.
    #[must_use]
    pub fn params(&self) -> DashParams {
        self.derivation.params.borrow().clone()
    }

    /// Returns a copy of the intervals.
    #[must_use]
    pub fn intervals(&self) -> Vec<f64> {
        self.derivation.params.borrow().intervals.clone()
    }

    /// Sets the intervals, invalidating the node if they changed.
    pub fn set_intervals(&self, intervals: &[f64]) {
        if self.derivation.params.borrow().intervals == intervals {
            return;
        }
        self.derivation.params.borrow_mut().intervals = intervals.to_vec();
        self.base.invalidate(true);
    }

    /// Returns the phase.
    #[must_use]
    pub fn phase(&self) -> f64 {
        self.derivation.params.borrow().phase
    }

    /// Sets the phase, invalidating the node if it changed.
    pub fn set_phase(&self, phase: f64) {
        if self.derivation.params.borrow().phase == phase {
            return;
        }
        self.derivation.params.borrow_mut().phase = phase;
        self.base.invalidate(true);
    }
}

#[cfg(test)]
mod tests {
    #[cfg(not(feature = "std"))]
    use kurbo::common::FloatFuncs as _;
    use kurbo::Affine;

    use super::*;
    use crate::effect::FilterOutcome;
    use crate::effect::test_util::{length, square};
    use crate::geometry::Path;
    use crate::node::{Invalidatable as _, Node as _};

    #[test]
    fn empty_intervals_keep_the_child_path() {
        let child = Path::from_bez(square(10.0));
        let dash = DashEffect::new(child, &[], 3.0);
        dash.revalidate(None, Affine::IDENTITY);
        assert_eq!(dash.as_path().bez(), &square(10.0));
    }

    #[test]
    fn odd_pattern_matches_its_doubled_form() {
        let options = FilterOptions::default();
        let path = PathData::from(square(10.0));
        let odd = DashParams {
            intervals: alloc::vec![2.0, 1.0, 3.0],
            phase: 0.5,
        };
        let doubled = DashParams {
            intervals: alloc::vec![2.0, 1.0, 3.0, 2.0, 1.0, 3.0],
            phase: 0.5,
        };
        assert_eq!(
            odd.apply(path.clone(), &options),
            doubled.apply(path, &options)
        );
    }

    #[test]
    fn malformed_pattern_is_declined() {
        let path = PathData::from(square(10.0));
        let out = DashParams {
            intervals: alloc::vec![1.0, -1.0],
            phase: 0.0,
        }
        .apply(path.clone(), &FilterOptions::default());
        assert_eq!(out.outcome, FilterOutcome::Declined);
        assert_eq!(out.path, path);
    }

    #[test]
    fn dash_budget_is_configurable() {
        let child = Path::from_bez(square(10.0));
        let dash = DashEffect::new(child, &[0.5, 0.5], 0.0);
        dash.revalidate(None, Affine::IDENTITY);
        assert!((length(dash.as_path().bez()) - 20.0).abs() < 1e-6);

        dash.set_options(FilterOptions {
            max_dash_count: 8,
            ..FilterOptions::default()
        });
        dash.revalidate(None, Affine::IDENTITY);
        assert_eq!(dash.as_path().bez(), &square(10.0));
    }

    #[test]
    fn setters_invalidate_on_change_only() {
        let child = Path::from_bez(square(10.0));
        let dash = DashEffect::new(child, &[2.0, 2.0], 0.0);
        dash.revalidate(None, Affine::IDENTITY);

        dash.set_intervals(&[2.0, 2.0]);
        dash.set_phase(0.0);
        assert!(!dash.has_inval());

        dash.set_phase(1.0);
        assert!(dash.has_inval());
        dash.revalidate(None, Affine::IDENTITY);

        dash.set_intervals(&[3.0]);
        assert!(dash.has_inval());
        assert_eq!(dash.intervals(), [3.0]);
        assert_eq!(dash.phase(), 1.0);
    }
}
