// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform nodes.
//!
//! A [`Transform`] node produces a [`kurbo::Affine`] on demand. Transforms
//! take part in invalidation like any other node but have no bounds of their
//! own; their revalidation returns [`Rect::ZERO`].

use alloc::rc::{Rc, Weak};
use core::cell::Cell;
use core::fmt;

use kurbo::{Affine, Rect};

use crate::invalidation::InvalidationController;
use crate::node::{self, Invalidatable, Node, NodeBase, NodeKind, NodeTraits};

/// A node producing a matrix.
pub trait Transform: Node {
    /// Returns the current matrix.
    ///
    /// Composite transforms only hold a meaningful value after revalidation.
    fn matrix(&self) -> Affine;
}

/// A transform whose matrix is set directly by the caller.
pub struct Matrix {
    base: NodeBase,
    matrix: Cell<Affine>,
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("base", &self.base)
            .field("matrix", &self.matrix.get())
            .finish()
    }
}

impl Matrix {
    /// Creates a matrix node.
    #[must_use]
    pub fn new(matrix: Affine) -> Rc<Self> {
        Rc::new(Self {
            base: NodeBase::new(NodeTraits::BUBBLE_DAMAGE),
            matrix: Cell::new(matrix),
        })
    }

    /// Sets the matrix, invalidating observers if it changed.
    pub fn set_matrix(&self, matrix: Affine) {
        node::set_attribute(&self.base, &self.matrix, matrix);
    }
}

impl Invalidatable for Matrix {
    fn base(&self) -> &NodeBase {
        &self.base
    }
}

impl Node for Matrix {
    fn kind(&self) -> NodeKind {
        NodeKind::Matrix
    }

    fn on_revalidate(&self, _: Option<&mut InvalidationController<'_>>, _: Affine) -> Rect {
        Rect::ZERO
    }
}

impl Transform for Matrix {
    fn matrix(&self) -> Affine {
        self.matrix.get()
    }
}

/// The composition `outer * inner` of two transforms.
///
/// Observes both operands.
pub struct Concat {
    base: NodeBase,
    outer: Rc<dyn Transform>,
    inner: Rc<dyn Transform>,
    composed: Cell<Affine>,
}

impl fmt::Debug for Concat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Concat")
            .field("base", &self.base)
            .field("outer", &self.outer.id())
            .field("inner", &self.inner.id())
            .field("composed", &self.composed.get())
            .finish()
    }
}

impl Concat {
    /// Creates a node applying `inner` first, then `outer`.
    #[must_use]
    pub fn new(outer: Rc<dyn Transform>, inner: Rc<dyn Transform>) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let base = NodeBase::new(NodeTraits::BUBBLE_DAMAGE);
            let observer: Weak<dyn Invalidatable> = weak.clone();
            outer.base().add_observer(base.id(), observer.clone());
            inner.base().add_observer(base.id(), observer);
            Self {
                base,
                outer,
                inner,
                composed: Cell::new(Affine::IDENTITY),
            }
        })
    }

    /// Returns the transform applied last.
    #[must_use]
    pub fn outer(&self) -> &Rc<dyn Transform> {
        &self.outer
    }

    /// Returns the transform applied first.
    #[must_use]
    pub fn inner(&self) -> &Rc<dyn Transform> {
        &self.inner
    }
}

impl Drop for Concat {
    fn drop(&mut self) {
        self.outer.base().remove_observer(self.base.id());
        self.inner.base().remove_observer(self.base.id());
    }
}

impl Invalidatable for Concat {
    fn base(&self) -> &NodeBase {
        &self.base
    }
}

impl Node for Concat {
    fn kind(&self) -> NodeKind {
        NodeKind::Concat
    }

    fn on_revalidate(&self, mut ic: Option<&mut InvalidationController<'_>>, ctm: Affine) -> Rect {
        self.outer.revalidate(ic.as_deref_mut(), ctm);
        self.inner.revalidate(ic, ctm);
        self.composed.set(self.outer.matrix() * self.inner.matrix());
        Rect::ZERO
    }
}

impl Transform for Concat {
    fn matrix(&self) -> Affine {
        debug_assert!(!self.has_inval(), "matrix of invalidated {:?}", self.id());
        self.composed.get()
    }
}
