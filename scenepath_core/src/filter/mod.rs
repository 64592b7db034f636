// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path filters: pure path-to-path transformations.
//!
//! A [`PathFilter`] maps a source path to a new one. Filters are built from
//! their parameters through constructors returning `Option`; `None` means the
//! parameters describe a no-op (or a pattern the filter refuses to run), and
//! the caller keeps the source path.
//!
//! | Filter           | Built by               | `None` when                          |
//! |------------------|------------------------|--------------------------------------|
//! | [`TrimFilter`]   | [`TrimFilter::new`]    | full range, non-finite bounds        |
//! | [`DashFilter`]   | [`DashFilter::new`]    | empty or malformed pattern           |
//! | [`CornerFilter`] | [`CornerFilter::new`]  | radius not positive                  |

mod corner;
mod dash;
mod trim;

pub use corner::CornerFilter;
pub use dash::{DashFilter, effective_intervals};
pub use trim::{TrimFilter, TrimMode};

use alloc::vec::Vec;

use kurbo::{
    BezPath, CubicBez, Line, ParamCurveArclen as _, PathEl, PathSeg, Point, QuadBez, Stroke,
};

/// A path-to-path transformation.
pub trait PathFilter {
    /// Filters `src`, interpreting it as outlined by `stroke`.
    ///
    /// Returns `None` if the filter could not be applied to this path.
    fn filter_path(&self, src: &BezPath, stroke: &Stroke) -> Option<BezPath>;
}

/// Zero-width stroke context used when filtering fill geometry.
#[must_use]
pub fn hairline() -> Stroke {
    Stroke::new(0.0)
}

/// Tuning knobs shared by every filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterOptions {
    /// Accuracy of arc-length computations, in user-space units.
    pub accuracy: f64,
    /// Trims whose start is within this distance of 0 and whose stop is within
    /// this distance of 1 keep the whole path.
    pub full_range_tolerance: f64,
    /// Dash patterns that would produce more dashes than this are declined.
    pub max_dash_count: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            accuracy: 1e-4,
            full_range_tolerance: 0.0,
            max_dash_count: 1_000_000,
        }
    }
}

/// One sub-path, flattened into segments.
#[derive(Clone, Debug)]
pub(crate) struct Contour {
    pub(crate) start: Point,
    pub(crate) segs: Vec<PathSeg>,
    pub(crate) closed: bool,
}

impl Contour {
    /// Returns the arc length of each segment.
    pub(crate) fn seg_lengths(&self, accuracy: f64) -> Vec<f64> {
        self.segs.iter().map(|s| s.arclen(accuracy)).collect()
    }
}

/// Splits `path` into contours.
///
/// A closed contour whose last point differs from its start gets an explicit
/// closing line. Contours without segments are dropped.
pub(crate) fn contours(path: &BezPath) -> Vec<Contour> {
    let mut out = Vec::new();
    let mut current: Option<Contour> = None;
    let mut last = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                flush(&mut out, current.take());
                current = Some(Contour {
                    start: p,
                    segs: Vec::new(),
                    closed: false,
                });
                last = p;
            }
            PathEl::LineTo(p) => {
                push_seg(&mut current, last, Line::new(last, p).into());
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                push_seg(&mut current, last, QuadBez::new(last, p1, p2).into());
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                push_seg(&mut current, last, CubicBez::new(last, p1, p2, p3).into());
                last = p3;
            }
            PathEl::ClosePath => {
                if let Some(mut c) = current.take() {
                    if last != c.start {
                        c.segs.push(Line::new(last, c.start).into());
                    }
                    c.closed = true;
                    last = c.start;
                    flush(&mut out, Some(c));
                }
            }
        }
    }
    flush(&mut out, current);
    out
}

fn push_seg(current: &mut Option<Contour>, last: Point, seg: PathSeg) {
    current
        .get_or_insert_with(|| Contour {
            start: last,
            segs: Vec::new(),
            closed: false,
        })
        .segs
        .push(seg);
}

fn flush(out: &mut Vec<Contour>, contour: Option<Contour>) {
    out.extend(contour.filter(|c| !c.segs.is_empty()));
}

/// Splits `path` into sub-paths, one per `MoveTo`.
pub(crate) fn subpaths(path: &BezPath) -> Vec<BezPath> {
    let mut out: Vec<BezPath> = Vec::new();
    for &el in path.elements() {
        match out.last_mut() {
            Some(sub) if !matches!(el, PathEl::MoveTo(_)) => sub.push(el),
            _ => {
                let mut sub = BezPath::new();
                sub.push(el);
                out.push(sub);
            }
        }
    }
    out
}

/// Appends `seg` to `out`, assuming the current point is its start.
pub(crate) fn push_seg_el(out: &mut BezPath, seg: PathSeg) {
    match seg {
        PathSeg::Line(l) => out.line_to(l.p1),
        PathSeg::Quad(q) => out.quad_to(q.p1, q.p2),
        PathSeg::Cubic(c) => out.curve_to(c.p1, c.p2, c.p3),
    }
}

#[cfg(test)]
mod tests {
    #[cfg(not(feature = "std"))]
    use kurbo::common::FloatFuncs as _;

    use super::*;

    #[test]
    fn contours_split_on_move() {
        let mut bez = BezPath::new();
        bez.move_to((0.0, 0.0));
        bez.line_to((1.0, 0.0));
        bez.move_to((5.0, 5.0));
        bez.line_to((6.0, 5.0));
        bez.line_to((6.0, 6.0));
        let cs = contours(&bez);
        assert_eq!(cs.len(), 2);
        assert_eq!(cs[1].segs.len(), 2);
        assert!(!cs[0].closed);
    }

    #[test]
    fn close_adds_closing_line() {
        let mut bez = BezPath::new();
        bez.move_to((0.0, 0.0));
        bez.line_to((4.0, 0.0));
        bez.line_to((4.0, 3.0));
        bez.close_path();
        let cs = contours(&bez);
        assert_eq!(cs.len(), 1);
        assert!(cs[0].closed);
        assert_eq!(cs[0].segs.len(), 3);
        let total: f64 = cs[0].seg_lengths(1e-6).iter().sum();
        assert!((total - 12.0).abs() < 1e-9, "perimeter {total}");
    }

    #[test]
    fn lone_moves_are_dropped() {
        let mut bez = BezPath::new();
        bez.move_to((0.0, 0.0));
        bez.move_to((1.0, 1.0));
        assert!(contours(&bez).is_empty());
    }

    #[test]
    fn subpaths_split_on_move() {
        let mut bez = BezPath::new();
        bez.move_to((0.0, 0.0));
        bez.line_to((1.0, 0.0));
        bez.close_path();
        bez.move_to((5.0, 5.0));
        bez.line_to((6.0, 5.0));
        let subs = subpaths(&bez);
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].elements().last(), Some(&PathEl::ClosePath));
        assert_eq!(subs[1].elements()[0], PathEl::MoveTo(Point::new(5.0, 5.0)));
    }

    #[test]
    fn default_options() {
        let o = FilterOptions::default();
        assert_eq!(o.full_range_tolerance, 0.0);
        assert_eq!(o.max_dash_count, 1_000_000);
        assert_eq!(hairline().width, 0.0);
    }
}
