// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf geometry node holding a caller-supplied path.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Affine, BezPath, Point, Rect};

use super::{FillRule, GeometryNode, PathData};
use crate::canvas::{Canvas, ClipOp, Paint};
use crate::invalidation::InvalidationController;
use crate::node::{Invalidatable, Node, NodeBase, NodeKind, NodeTraits};

/// A geometry node whose path is set directly by the caller.
///
/// Setting the path or fill rule invalidates the node and everything that
/// observes it.
pub struct Path {
    base: NodeBase,
    path: RefCell<PathData>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("base", &self.base)
            .field("path", &self.path.borrow())
            .finish()
    }
}

impl Path {
    /// Creates a path node.
    #[must_use]
    pub fn new(path: PathData) -> Rc<Self> {
        Rc::new(Self {
            base: NodeBase::new(NodeTraits::BUBBLE_DAMAGE),
            path: RefCell::new(path),
        })
    }

    /// Creates a path node with the non-zero fill rule.
    #[must_use]
    pub fn from_bez(bez: BezPath) -> Rc<Self> {
        Self::new(PathData::from(bez))
    }

    /// Returns a copy of the current path, whether or not it was revalidated.
    #[must_use]
    pub fn path(&self) -> PathData {
        self.path.borrow().clone()
    }

    /// Replaces the path.
    pub fn set_path(&self, path: PathData) {
        if *self.path.borrow() == path {
            return;
        }
        *self.path.borrow_mut() = path;
        self.invalidate();
    }

    /// Replaces the geometry, keeping the fill rule.
    pub fn set_bez(&self, bez: BezPath) {
        let path = self.path.borrow().with_bez(bez);
        self.set_path(path);
    }

    /// Sets the fill rule.
    pub fn set_fill_rule(&self, fill: FillRule) {
        if self.path.borrow().fill_rule() == fill {
            return;
        }
        self.path.borrow_mut().set_fill_rule(fill);
        self.invalidate();
    }
}

impl Invalidatable for Path {
    fn base(&self) -> &NodeBase {
        &self.base
    }
}

impl Node for Path {
    fn kind(&self) -> NodeKind {
        NodeKind::Path
    }

    fn on_revalidate(&self, _: Option<&mut InvalidationController<'_>>, _: Affine) -> Rect {
        debug_assert!(self.has_inval(), "revalidating a valid path node");
        self.path.borrow().tight_bounds()
    }
}

impl GeometryNode for Path {
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
