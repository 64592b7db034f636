// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use core::cell::Cell;

use super::{Derivation, Derived, EffectKind, GeometryEffect};
use crate::filter::{FilterOptions, PathFilter as _, TrimFilter, TrimMode, hairline};
use crate::geometry::{GeometryNode, PathData};
use crate::node::set_attribute;

/// Trim parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimParams {
    /// Start of the kept range, as a fraction of the length.
    pub start: f64,
    /// End of the kept range, as a fraction of the length.
    pub stop: f64,
    /// Which part of the path is kept.
    pub mode: TrimMode,
}

impl Default for TrimParams {
    fn default() -> Self {
        Self {
            start: 0.0,
            stop: 1.0,
            mode: TrimMode::Normal,
        }
    }
}

impl TrimParams {
    /// Trims `path`.
    ///
    /// # Panics
    ///
    /// Panics if the trim filter cannot process the path (non-finite
    /// coordinates).
    #[must_use]
    pub fn apply(self, path: PathData, options: &FilterOptions) -> Derived {
        let Some(filter) = TrimFilter::new(self.start, self.stop, self.mode, options) else {
            return Derived::skipped(path);
        };
        let Some(bez) = filter.filter_path(path.bez(), &hairline()) else {
            panic!("trim filter rejected {} path elements", path.elements().len());
        };
        Derived::applied(path.with_bez(bez))
    }
}

/// Derivation of [`TrimEffect`].
#[derive(Debug)]
pub struct Trim {
    params: Cell<TrimParams>,
}

impl Derivation for Trim {
    const KIND: EffectKind = EffectKind::Trim;

    fn derive(&self, child: &dyn GeometryNode, options: &FilterOptions) -> Derived {
        self.params.get().apply(child.as_path(), options)
    }
}

/// Keeps part of the child's path, measured by arc length.
pub type TrimEffect = GeometryEffect<Trim>;

impl GeometryEffect<Trim> {
    /// Creates a trim over `child`.
    #[must_use]
    pub fn new(child: Rc<dyn GeometryNode>, start: f64, stop: f64, mode: TrimMode) -> Rc<Self> {
        Self::with_derivation(
            child,
            Trim {
                params: Cell::new(TrimParams { start, stop, mode }),
            },
        )
    }

    /// Returns the trim parameters.
    #[must_use]
    pub fn params(&self) -> TrimParams {
        self.derivation.params.get()
    }

    /// Replaces the trim parameters.
    pub fn set_params(&self, params: TrimParams) {
        set_attribute(&self.base, &self.derivation.params, params);
    }

    /// Returns the start fraction.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.params().start
    }

    /// Sets the start fraction.
    pub fn set_start(&self, start: f64) {
        self.set_params(TrimParams {
            start,
            ..self.params()
        });
    }

    /// Returns the stop fraction.
    #[must_use]
    pub fn stop(&self) -> f64 {
        self.params().stop
    }

    /// Sets the stop fraction.
    pub fn set_stop(&self, stop: f64) {
        self.set_params(TrimParams {
            stop,
            ..self.params()
        });
    }

    /// Returns the trim mode.
    #[must_use]
    pub fn mode(&self) -> TrimMode {
        self.params().mode
    }

    /// Sets the trim mode.
    pub fn set_mode(&self, mode: TrimMode) {
        self.set_params(TrimParams {
            mode,
            ..self.params()
        });
    }
}
