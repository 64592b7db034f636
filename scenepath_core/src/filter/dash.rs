// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dashing.

use alloc::borrow::Cow;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, ParamCurveArclen as _, PathEl, Point, Stroke};

use super::{FilterOptions, PathFilter, subpaths};

/// Returns the dash pattern actually used for `intervals`.
///
/// An empty list disables dashing (`None`). An odd-length list is repeated
/// once so on and off lengths alternate; an even-length list is used as is.
#[must_use]
pub fn effective_intervals(intervals: &[f64]) -> Option<Cow<'_, [f64]>> {
    if intervals.is_empty() {
        return None;
    }
    if intervals.len() % 2 == 1 {
        let mut doubled = Vec::with_capacity(intervals.len() * 2);
        doubled.extend_from_slice(intervals);
        doubled.extend_from_slice(intervals);
        Some(Cow::Owned(doubled))
    } else {
        Some(Cow::Borrowed(intervals))
    }
}

/// Splits a path into dashes following an on/off pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct DashFilter {
    intervals: Vec<f64>,
    phase: f64,
    pattern_len: f64,
    accuracy: f64,
    max_dash_count: usize,
}

impl DashFilter {
    /// Builds a dash filter from a raw interval list, applying
    /// [`effective_intervals`].
    ///
    /// Returns `None` if the list is empty or the pattern is malformed: any
    /// negative or non-finite interval, a zero total length, or a non-finite
    /// phase.
    #[must_use]
    pub fn new(intervals: &[f64], phase: f64, options: &FilterOptions) -> Option<Self> {
        let pattern = effective_intervals(intervals)?;
        Self::from_pattern(&pattern, phase, options)
    }

    /// Builds a dash filter from an even-length on/off pattern.
    ///
    /// Returns `None` under the same conditions as [`new`](Self::new), and
    /// for odd-length patterns.
    #[must_use]
    pub fn from_pattern(pattern: &[f64], phase: f64, options: &FilterOptions) -> Option<Self> {
        if pattern.is_empty() || pattern.len() % 2 != 0 || !phase.is_finite() {
            return None;
        }
        if pattern.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return None;
        }
        let pattern_len: f64 = pattern.iter().sum();
        if !pattern_len.is_finite() || pattern_len <= 0.0 {
            return None;
        }

        // Normalize into [0, pattern_len).
        let mut phase = phase - (phase / pattern_len).floor() * pattern_len;
        if phase >= pattern_len {
            phase = 0.0;
        }

        Some(Self {
            intervals: pattern.to_vec(),
            phase,
            pattern_len,
            accuracy: options.accuracy,
            max_dash_count: options.max_dash_count,
        })
    }

    /// Returns the on/off pattern.
    #[must_use]
    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    /// Returns the normalized phase, in `[0, pattern length)`.
    #[must_use]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Upper estimate of the number of dashes produced for a path of length
    /// `len`.
    fn dash_count(&self, len: f64) -> f64 {
        let on_per_pattern = (self.intervals.len() / 2) as f64;
        (len / self.pattern_len + 1.0) * on_per_pattern
    }
}

impl PathFilter for DashFilter {
    /// Returns `None` if the path is so long relative to the pattern that it
    /// would produce more than `max_dash_count` dashes.
    ///
    /// Each sub-path restarts the pattern at the phase. Dashes come out in
    /// path order; on a closed sub-path the dash running through the start
    /// point is emitted last, as one piece.
    fn filter_path(&self, src: &BezPath, _: &Stroke) -> Option<BezPath> {
        let len: f64 = src.segments().map(|s| s.arclen(self.accuracy)).sum();
        let count = self.dash_count(len);
        if !count.is_finite() || count > self.max_dash_count as f64 {
            return None;
        }

        let mut out = BezPath::new();
        for sub in subpaths(src) {
            let dashed: BezPath = kurbo::dash(sub.iter(), self.phase, &self.intervals).collect();
            let closed = sub.elements().contains(&PathEl::ClosePath);
            match sub.elements().first() {
                Some(&PathEl::MoveTo(start)) if !closed => {
                    append_in_path_order(&mut out, &dashed, start);
                }
                _ => out.extend(dashed.iter()),
            }
        }
        Some(out)
    }
}

/// Appends the dashes of one open sub-path starting at `start`.
///
/// `kurbo::dash` holds back the dash that begins at the start point and emits
/// it after the others; it is moved back to the front.
fn append_in_path_order(out: &mut BezPath, dashed: &BezPath, start: Point) {
    let mut dashes = subpaths(dashed);
    let starts_at = |d: &BezPath| d.elements().first() == Some(&PathEl::MoveTo(start));
    if dashes.len() > 1 && !starts_at(&dashes[0]) && dashes.last().is_some_and(starts_at) {
        dashes.rotate_right(1);
    }
    for dash in &dashes {
        out.extend(dash.iter());
    }
}
