// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Corner rounding.

use kurbo::{BezPath, PathSeg, Point, Stroke, Vec2};

use super::{PathFilter, contours};

/// Rounds the corners between straight segments.
///
/// At every vertex joining two line segments, the filter cuts back along each
/// line by `min(radius, length / 2)` and joins the cut points with a quadratic
/// whose control point is the original vertex. Curved segments are copied
/// unchanged, and vertices next to them stay sharp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerFilter {
    radius: f64,
}

impl CornerFilter {
    /// Builds a corner filter. Returns `None` unless `radius` is positive and
    /// finite.
    #[must_use]
    pub fn new(radius: f64) -> Option<Self> {
        (radius.is_finite() && radius > 0.0).then_some(Self { radius })
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the offset from `a` towards `b` at which the rounding starts,
    /// and whether a straight piece remains between the two roundings.
    fn step(&self, a: Point, b: Point) -> (Vec2, bool) {
        let d = b - a;
        let dist = d.hypot();
        if dist <= self.radius * 2.0 {
            (d * 0.5, false)
        } else {
            (d * (self.radius / dist), true)
        }
    }
}

impl PathFilter for CornerFilter {
    fn filter_path(&self, src: &BezPath, _: &Stroke) -> Option<BezPath> {
        let mut out = BezPath::new();
        for contour in contours(src) {
            // Closed contours start just past their first vertex, which is
            // rounded when the contour closes.
            let mut started = !contour.closed;
            if started {
                out.move_to(contour.start);
            }
            let mut first_step = Vec2::ZERO;
            let mut last_corner = contour.start;
            let mut ends_with_line = false;

            for (i, seg) in contour.segs.iter().enumerate() {
                let mut step = Vec2::ZERO;
                match *seg {
                    PathSeg::Line(l) => {
                        let (s, draw) = self.step(l.p0, l.p1);
                        step = s;
                        if started {
                            out.quad_to(l.p0, l.p0 + step);
                        } else {
                            out.move_to(l.p0 + step);
                            started = true;
                        }
                        if draw {
                            out.line_to(l.p1 - step);
                        }
                        last_corner = l.p1;
                        ends_with_line = true;
                    }
                    PathSeg::Quad(q) => {
                        if !started {
                            out.move_to(q.p0);
                            started = true;
                        }
                        out.quad_to(q.p1, q.p2);
                        last_corner = q.p2;
                        first_step = Vec2::ZERO;
                        ends_with_line = false;
                    }
                    PathSeg::Cubic(c) => {
                        if !started {
                            out.move_to(c.p0);
                            started = true;
                        }
                        out.curve_to(c.p1, c.p2, c.p3);
                        last_corner = c.p3;
                        first_step = Vec2::ZERO;
                        ends_with_line = false;
                    }
                }
                if i == 0 {
                    first_step = step;
                }
            }

            if contour.closed {
                if first_step != Vec2::ZERO {
                    out.quad_to(last_corner, last_corner + first_step);
                }
                out.close_path();
            } else if ends_with_line {
                out.line_to(last_corner);
            }
        }
        Some(out)
    }
}
