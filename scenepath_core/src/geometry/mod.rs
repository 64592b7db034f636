// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry nodes: nodes that produce a path.
//!
//! A [`GeometryNode`] caches a [`PathData`] during
//! [revalidation](crate::node::Node::revalidate) and serves every read
//! ([`as_path`](GeometryNode::as_path), [`draw`](GeometryNode::draw),
//! [`clip`](GeometryNode::clip), [`contains`](GeometryNode::contains)) from
//! that cache. Reads never revalidate; calling them on an invalidated node is
//! a caller bug, caught by a debug assertion.
//!
//! [`Path`] is the leaf geometry node. Effects deriving geometry from another
//! node live in [`effect`](crate::effect).

mod path;
mod path_data;

pub use path::Path;
pub use path_data::{FillRule, PathData};

use kurbo::Point;

use crate::canvas::{Canvas, Paint};
use crate::node::Node;

/// A node producing a path.
pub trait GeometryNode: Node {
    /// Intersects the canvas clip with the cached path.
    fn on_clip(&self, canvas: &mut dyn Canvas, anti_alias: bool);

    /// Paints the cached path.
    fn on_draw(&self, canvas: &mut dyn Canvas, paint: &Paint);

    /// Hit-tests the cached path.
    fn on_contains(&self, p: Point) -> bool;

    /// Returns a copy of the cached path.
    fn on_as_path(&self) -> PathData;

    /// Intersects the canvas clip with the cached path.
    fn clip(&self, canvas: &mut dyn Canvas, anti_alias: bool) {
        debug_assert!(!self.has_inval(), "clip on invalidated {:?}", self.id());
        self.on_clip(canvas, anti_alias);
    }

    /// Paints the cached path with `paint`.
    fn draw(&self, canvas: &mut dyn Canvas, paint: &Paint) {
        debug_assert!(!self.has_inval(), "draw on invalidated {:?}", self.id());
        self.on_draw(canvas, paint);
    }

    /// Returns whether `p` is inside the cached path, honoring its fill rule.
    fn contains(&self, p: Point) -> bool {
        debug_assert!(!self.has_inval(), "contains on invalidated {:?}", self.id());
        self.on_contains(p)
    }

    /// Returns a copy of the cached path.
    fn as_path(&self) -> PathData {
        debug_assert!(!self.has_inval(), "as_path on invalidated {:?}", self.id());
        self.on_as_path()
    }
}
