// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry effects: geometry nodes deriving their path from a child.
//!
//! A [`GeometryEffect`] owns one child [`GeometryNode`] and observes it. When
//! revalidated it first revalidates the child, then runs its [`Derivation`]
//! over the child's path and caches the result. Every read is served from
//! that cache.
//!
//! ```text
//!   GeometryEffect<D>
//!     │ Rc (owning)          ▲ observer (non-owning)
//!     ▼                      │
//!   child: GeometryNode ─────┘
//! ```
//!
//! The variants are:
//!
//! | Alias                 | Derivation            | Parameters                   |
//! |-----------------------|-----------------------|------------------------------|
//! | [`TrimEffect`]        | [`Trim`]              | start, stop, [`TrimMode`]    |
//! | [`GeometryTransform`] | [`TransformDerivation`] | a [`Transform`] node       |
//! | [`DashEffect`]        | [`Dash`]              | intervals, phase             |
//! | [`RoundEffect`]       | [`Round`]             | radius                       |
//!
//! [`TrimMode`]: crate::filter::TrimMode
//! [`Transform`]: crate::transform::Transform

mod dash;
mod round;
mod transform;
mod trim;

pub use dash::{Dash, DashEffect, DashParams};
pub use round::{Round, RoundEffect, RoundParams};
pub use transform::{GeometryTransform, TransformDerivation};
pub use trim::{Trim, TrimEffect, TrimParams};

use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::{Affine, Point, Rect};

use crate::canvas::{Canvas, ClipOp, Paint};
use crate::filter::FilterOptions;
use crate::geometry::{GeometryNode, PathData};
use crate::invalidation::InvalidationController;
use crate::node::{Invalidatable, Node, NodeBase, NodeKind, NodeTraits};
use crate::trace::FilterEvent;

/// Which effect variant a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// [`TrimEffect`].
    Trim,
    /// [`GeometryTransform`].
    Transform,
    /// [`DashEffect`].
    Dash,
    /// [`RoundEffect`].
    Round,
}

/// What happened when an effect derived its path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterOutcome {
    /// The filter ran and produced a new path.
    Applied,
    /// The parameters were a no-op; the child's path was kept.
    Skipped,
    /// The filter refused the input; the child's path was kept.
    Declined,
}

/// A derived path and how it was obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct Derived {
    /// The derived path.
    pub path: PathData,
    /// How the path was obtained.
    pub outcome: FilterOutcome,
}

impl Derived {
    /// A path produced by the filter.
    #[must_use]
    pub fn applied(path: PathData) -> Self {
        Self {
            path,
            outcome: FilterOutcome::Applied,
        }
    }

    /// The child's path, kept because the parameters were a no-op.
    #[must_use]
    pub fn skipped(path: PathData) -> Self {
        Self {
            path,
            outcome: FilterOutcome::Skipped,
        }
    }

    /// The child's path, kept because the filter declined.
    #[must_use]
    pub fn declined(path: PathData) -> Self {
        Self {
            path,
            outcome: FilterOutcome::Declined,
        }
    }
}

/// How a [`GeometryEffect`] derives its path from its child.
///
/// Implemented by the four variants in this module.
pub trait Derivation: 'static {
    /// The variant, for tracing.
    const KIND: EffectKind;

    /// Derives a path from the (valid) child.
    ///
    /// Must not mutate the child.
    fn derive(&self, child: &dyn GeometryNode, options: &FilterOptions) -> Derived;

    /// Calls `f` with every node besides the child that the effect observes.
    fn for_each_dependency(&self, f: &mut dyn FnMut(&NodeBase)) {
        _ = f;
    }

    /// Brings non-child dependencies up to date before deriving.
    fn revalidate_dependencies(&self) {}
}

/// A geometry node whose path is derived from a child geometry node.
pub struct GeometryEffect<D: Derivation> {
    base: NodeBase,
    child: Rc<dyn GeometryNode>,
    derivation: D,
    options: Cell<FilterOptions>,
    path: RefCell<PathData>,
}

impl<D: Derivation + fmt::Debug> fmt::Debug for GeometryEffect<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryEffect")
            .field("base", &self.base)
            .field("child", &self.child.id())
            .field("derivation", &self.derivation)
            .field("options", &self.options.get())
            .field("path", &self.path.borrow())
            .finish()
    }
}

impl<D: Derivation> GeometryEffect<D> {
    /// Creates an effect over `child` and registers it as an observer of the
    /// child and of the derivation's dependencies.
    pub(crate) fn with_derivation(child: Rc<dyn GeometryNode>, derivation: D) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let base = NodeBase::new(NodeTraits::BUBBLE_DAMAGE);
            let observer: Weak<dyn Invalidatable> = weak.clone();
            child.base().add_observer(base.id(), observer.clone());
            derivation.for_each_dependency(&mut |dep| {
                dep.add_observer(base.id(), observer.clone());
            });
            Self {
                base,
                child,
                derivation,
                options: Cell::new(FilterOptions::default()),
                path: RefCell::new(PathData::default()),
            }
        })
    }

    /// Returns the child.
    #[must_use]
    pub fn child(&self) -> &Rc<dyn GeometryNode> {
        &self.child
    }

    /// Returns the filter options.
    #[must_use]
    pub fn options(&self) -> FilterOptions {
        self.options.get()
    }

    /// Sets the filter options, invalidating the node if they changed.
    pub fn set_options(&self, options: FilterOptions) {
        crate::node::set_attribute(&self.base, &self.options, options);
    }
}

impl<D: Derivation> Drop for GeometryEffect<D> {
    fn drop(&mut self) {
        let id = self.base.id();
        self.child.base().remove_observer(id);
        self.derivation
            .for_each_dependency(&mut |dep| dep.remove_observer(id));
    }
}

impl<D: Derivation> Invalidatable for GeometryEffect<D> {
    fn base(&self) -> &NodeBase {
        &self.base
    }
}

impl<D: Derivation> Node for GeometryEffect<D> {
    fn kind(&self) -> NodeKind {
        NodeKind::Effect(D::KIND)
    }

    fn on_revalidate(&self, mut ic: Option<&mut InvalidationController<'_>>, ctm: Affine) -> Rect {
        debug_assert!(self.has_inval(), "revalidating a valid {:?}", self.id());

        self.derivation.revalidate_dependencies();
        self.child.revalidate(ic.as_deref_mut(), ctm);

        let Derived { mut path, outcome } = self
            .derivation
            .derive(self.child.as_ref(), &self.options.get());
        path.shrink_to_fit();
        let bounds = path.tight_bounds();

        if let Some(ic) = ic {
            ic.tracer().filter(&FilterEvent {
                node: self.id(),
                effect: D::KIND,
                outcome,
                elements: path.elements().len(),
            });
        }

        *self.path.borrow_mut() = path;
        bounds
    }
}

impl<D: Derivation> GeometryNode for GeometryEffect<D> {
    fn on_clip(&self, canvas: &mut dyn Canvas, anti_alias: bool) {
        canvas.clip_path(&self.path.borrow(), ClipOp::Intersect, anti_alias);
    }

    fn on_draw(&self, canvas: &mut dyn Canvas, paint: &Paint) {
        canvas.draw_path(&self.path.borrow(), paint);
    }

    fn on_contains(&self, p: Point) -> bool {
        self.path.borrow().contains(p)
    }

    fn on_as_path(&self) -> PathData {
        self.path.borrow().clone()
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use kurbo::BezPath;

    pub(crate) fn square(size: f64) -> BezPath {
        let mut bez = BezPath::new();
        bez.move_to((0.0, 0.0));
        bez.line_to((size, 0.0));
        bez.line_to((size, size));
        bez.line_to((0.0, size));
        bez.close_path();
        bez
    }

    pub(crate) fn length(bez: &BezPath) -> f64 {
        use kurbo::ParamCurveArclen as _;
        bez.segments().map(|s| s.arclen(1e-9)).sum()
    }
}
