// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc-length trimming.

use alloc::vec::Vec;

use kurbo::{BezPath, ParamCurve as _, ParamCurveArclen as _, Stroke};

use super::{Contour, FilterOptions, PathFilter, contours, push_seg_el};

/// Which part of a path a trim keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrimMode {
    /// Keep `[start, stop]` of the whole path's length.
    #[default]
    Normal,
    /// Keep everything outside `[start, stop]` of the whole path's length.
    Inverted,
    /// Keep `[start, stop]` of each contour's own length.
    Separate,
}

/// Keeps a fraction of a path, measured by arc length.
///
/// `start` and `stop` are fractions of the length, clamped to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimFilter {
    start: f64,
    stop: f64,
    mode: TrimMode,
    accuracy: f64,
}

impl TrimFilter {
    /// Builds a trim filter.
    ///
    /// Returns `None` when the trim would keep the whole path: a `Normal` trim
    /// covering the full range (within `options.full_range_tolerance`), or an
    /// `Inverted` trim of an empty range. Non-finite bounds also return `None`.
    #[must_use]
    pub fn new(start: f64, stop: f64, mode: TrimMode, options: &FilterOptions) -> Option<Self> {
        if !start.is_finite() || !stop.is_finite() {
            return None;
        }
        let start = start.clamp(0.0, 1.0);
        let stop = stop.clamp(0.0, 1.0);
        let tol = options.full_range_tolerance;
        match mode {
            TrimMode::Normal if start <= tol && stop >= 1.0 - tol => None,
            TrimMode::Inverted if start >= stop => None,
            _ => Some(Self {
                start,
                stop,
                mode,
                accuracy: options.accuracy,
            }),
        }
    }

    /// Returns the clamped start fraction.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Returns the clamped stop fraction.
    #[must_use]
    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Returns the trim mode.
    #[must_use]
    pub fn mode(&self) -> TrimMode {
        self.mode
    }
}

impl PathFilter for TrimFilter {
    fn filter_path(&self, src: &BezPath, _: &Stroke) -> Option<BezPath> {
        let contours = contours(src);
        let lengths: Vec<Vec<f64>> = contours
            .iter()
            .map(|c| c.seg_lengths(self.accuracy))
            .collect();
        let total: f64 = lengths.iter().flatten().sum();
        if !total.is_finite() {
            return None;
        }

        let mut out = BezPath::new();
        match self.mode {
            TrimMode::Normal => {
                let (from, to) = (self.start * total, self.stop * total);
                self.append_span(&mut out, &contours, &lengths, from, to);
            }
            TrimMode::Inverted => {
                let (from, to) = (self.start * total, self.stop * total);
                self.append_span(&mut out, &contours, &lengths, 0.0, from);
                self.append_span(&mut out, &contours, &lengths, to, total);
            }
            TrimMode::Separate => {
                for (c, lens) in contours.iter().zip(&lengths) {
                    let len: f64 = lens.iter().sum();
                    self.append_range(&mut out, c, lens, self.start * len, self.stop * len);
                }
            }
        }
        Some(out)
    }
}

impl TrimFilter {
    /// Appends `[from, to]` of the concatenated contours, one sub-path per
    /// contour touched.
    fn append_span(
        &self,
        out: &mut BezPath,
        contours: &[Contour],
        lengths: &[Vec<f64>],
        from: f64,
        to: f64,
    ) {
        let mut offset = 0.0;
        for (c, lens) in contours.iter().zip(lengths) {
            let len: f64 = lens.iter().sum();
            let (a, b) = (from - offset, to - offset);
            if b > 0.0 && a < len {
                self.append_range(out, c, lens, a.max(0.0), b.min(len));
            }
            offset += len;
        }
    }

    /// Appends `[a, b]` of a single contour as one sub-path.
    fn append_range(&self, out: &mut BezPath, contour: &Contour, lens: &[f64], a: f64, b: f64) {
        if b <= a {
            return;
        }
        let len: f64 = lens.iter().sum();
        let mut offset = 0.0;
        let mut started = false;
        for (seg, &seg_len) in contour.segs.iter().zip(lens) {
            let (sa, sb) = (a - offset, b - offset);
            offset += seg_len;
            if sb <= 0.0 || sa >= seg_len {
                continue;
            }
            let t0 = if sa <= 0.0 {
                0.0
            } else {
                seg.inv_arclen(sa, self.accuracy)
            };
            let t1 = if sb >= seg_len {
                1.0
            } else {
                seg.inv_arclen(sb, self.accuracy)
            };
            let piece = seg.subsegment(t0..t1);
            if !started {
                out.move_to(piece.start());
                started = true;
            }
            push_seg_el(out, piece);
        }
        if started && contour.closed && a <= 0.0 && b >= len {
            out.close_path();
        }
    }
}
