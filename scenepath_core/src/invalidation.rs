// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage collection for a revalidation pass.

use alloc::vec::Vec;

use kurbo::{Affine, Rect};

use crate::trace::{DamageEvent, Tracer};

/// Collects the regions invalidated during a revalidation pass.
///
/// Nodes never inspect the controller; they forward it to their dependencies
/// and the [revalidation protocol](crate::node::Node::revalidate) records
/// damage into it. It also carries the [`Tracer`] for the pass.
#[derive(Debug, Default)]
pub struct InvalidationController<'a> {
    rects: Vec<Rect>,
    bounds: Rect,
    tracer: Tracer<'a>,
}

impl InvalidationController<'_> {
    /// Creates an empty controller with tracing disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> InvalidationController<'a> {
    /// Creates an empty controller that reports to `tracer`.
    #[must_use]
    pub fn with_tracer(tracer: Tracer<'a>) -> Self {
        Self {
            rects: Vec::new(),
            bounds: Rect::ZERO,
            tracer,
        }
    }

    /// Records `rect`, mapped through `ctm`, as damaged.
    ///
    /// Empty rectangles are ignored.
    pub fn inval(&mut self, rect: Rect, ctm: Affine) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }

        let rect = if ctm == Affine::IDENTITY {
            rect
        } else {
            ctm.transform_rect_bbox(rect)
        };

        self.bounds = if self.rects.is_empty() {
            rect
        } else {
            self.bounds.union(rect)
        };
        self.rects.push(rect);
        self.tracer.damage(&DamageEvent { rect });
    }

    /// Returns the damaged rectangles recorded so far.
    #[must_use]
    pub fn damage(&self) -> &[Rect] {
        &self.rects
    }

    /// Returns the union of all damaged rectangles.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Returns whether nothing has been damaged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Forgets all recorded damage.
    pub fn reset(&mut self) {
        self.rects.clear();
        self.bounds = Rect::ZERO;
    }

    /// Returns the tracer for this pass.
    pub fn tracer(&mut self) -> &mut Tracer<'a> {
        &mut self.tracer
    }
}
