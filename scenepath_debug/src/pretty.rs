// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.

use std::fmt;
use std::io::{self, Write};

use kurbo::Rect;
use scenepath_core::node::NodeKind;
use scenepath_core::trace::{DamageEvent, FilterEvent, RevalidateEvent, TraceSink};

/// A [`TraceSink`] that writes one line per event.
///
/// Write errors are ignored; tracing never interrupts a revalidation pass.
///
/// ```text
/// [revalidate] node=3 kind=path bounds=[0, 0, 10, 10]
/// [filter] node=4 effect=Round outcome=Applied elements=14
/// [revalidate] node=4 kind=effect:Round bounds=[0, 0, 10, 10]
/// [damage] rect=[0, 0, 20, 20]
/// ```
pub struct PrettyPrintSink<W: Write> {
    out: W,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink<io::Stderr> {
    /// Creates a sink writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_revalidate(&mut self, e: &RevalidateEvent) {
        _ = writeln!(
            self.out,
            "[revalidate] node={} kind={} bounds={}",
            e.node.get(),
            kind_label(e.kind),
            RectDisplay(e.bounds),
        );
    }

    fn on_filter(&mut self, e: &FilterEvent) {
        _ = writeln!(
            self.out,
            "[filter] node={} effect={:?} outcome={:?} elements={}",
            e.node.get(),
            e.effect,
            e.outcome,
            e.elements,
        );
    }

    fn on_damage(&mut self, e: &DamageEvent) {
        _ = writeln!(self.out, "[damage] rect={}", RectDisplay(e.rect));
    }
}

pub(crate) fn kind_label(kind: NodeKind) -> String {
    match kind {
        NodeKind::Path => "path".into(),
        NodeKind::Matrix => "matrix".into(),
        NodeKind::Concat => "concat".into(),
        NodeKind::Effect(effect) => format!("effect:{effect:?}"),
        NodeKind::External => "external".into(),
    }
}

struct RectDisplay(Rect);

impl fmt::Display for RectDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(f, "[{}, {}, {}, {}]", r.x0, r.y0, r.x1, r.y1)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Affine, BezPath};
    use scenepath_core::effect::RoundEffect;
    use scenepath_core::geometry::Path;
    use scenepath_core::invalidation::InvalidationController;
    use scenepath_core::node::{Invalidatable as _, Node as _};
    use scenepath_core::trace::Tracer;

    use super::*;

    fn square() -> BezPath {
        let mut bez = BezPath::new();
        bez.move_to((0.0, 0.0));
        bez.line_to((10.0, 0.0));
        bez.line_to((10.0, 10.0));
        bez.line_to((0.0, 10.0));
        bez.close_path();
        bez
    }

    #[test]
    fn writes_one_line_per_event() {
        let mut sink = PrettyPrintSink::new(Vec::new());
        sink.on_damage(&DamageEvent {
            rect: Rect::new(0.0, 0.0, 2.5, 4.0),
        });
        let text = String::from_utf8(sink.into_inner()).expect("utf-8");
        assert_eq!(text, "[damage] rect=[0, 0, 2.5, 4]\n");
    }

    #[test]
    fn traces_a_revalidation_pass() {
        let child = Path::from_bez(square());
        let round = RoundEffect::new(child.clone(), 2.0);

        let mut sink = PrettyPrintSink::new(Vec::new());
        let mut ic = InvalidationController::with_tracer(Tracer::new(&mut sink));
        round.revalidate(Some(&mut ic), Affine::IDENTITY);
        drop(ic);

        let text = String::from_utf8(sink.into_inner()).expect("utf-8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3, "{text}");
        assert_eq!(
            lines[0],
            format!(
                "[revalidate] node={} kind=path bounds=[0, 0, 10, 10]",
                child.base().id().get()
            )
        );
        assert!(lines[1].starts_with("[filter]") && lines[1].contains("outcome=Applied"));
        assert!(lines[2].contains("kind=effect:Round"));
    }
}
