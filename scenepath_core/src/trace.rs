// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for revalidation passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! revalidation protocol calls as it works. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink` and travels inside the
//! [`InvalidationController`](crate::invalidation::InvalidationController).
//! When the `trace` feature is **off**, every `Tracer` method compiles to
//! nothing. When **on**, each method performs a single `Option` branch before
//! dispatching.
//!
//! Nodes revalidated without a controller (for example the transform of a
//! [`GeometryTransform`](crate::effect::GeometryTransform), which is
//! revalidated as a root) emit no events.

use kurbo::Rect;

use crate::effect::{EffectKind, FilterOutcome};
use crate::node::{NodeId, NodeKind};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a node recomputed its cached state.
#[derive(Clone, Copy, Debug)]
pub struct RevalidateEvent {
    /// Which node.
    pub node: NodeId,
    /// What sort of node it is.
    pub kind: NodeKind,
    /// Bounds produced by the revalidation.
    pub bounds: Rect,
}

/// Emitted after an effect ran its path filter.
#[derive(Clone, Copy, Debug)]
pub struct FilterEvent {
    /// Which effect node.
    pub node: NodeId,
    /// Which effect variant.
    pub effect: EffectKind,
    /// Whether the filter ran, was skipped, or declined.
    pub outcome: FilterOutcome,
    /// Number of path elements in the cached result.
    pub elements: usize,
}

/// Emitted when a damaged region is recorded.
#[derive(Clone, Copy, Debug)]
pub struct DamageEvent {
    /// Damaged region, already mapped through the current transform.
    pub rect: Rect,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from revalidation passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a node was revalidated.
    fn on_revalidate(&mut self, e: &RevalidateEvent) {
        _ = e;
    }

    /// Called after an effect ran (or skipped) its filter.
    fn on_filter(&mut self, e: &FilterEvent) {
        _ = e;
    }

    /// Called when damage is recorded.
    fn on_damage(&mut self, e: &DamageEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`RevalidateEvent`].
    #[inline]
    pub fn revalidate(&mut self, e: &RevalidateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_revalidate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FilterEvent`].
    #[inline]
    pub fn filter(&mut self, e: &FilterEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_filter(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DamageEvent`].
    #[inline]
    pub fn damage(&mut self, e: &DamageEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_damage(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_revalidate() -> RevalidateEvent {
        RevalidateEvent {
            node: crate::node::NodeBase::new(crate::node::NodeTraits::default()).id(),
            kind: NodeKind::Path,
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_revalidate(&sample_revalidate());
        sink.on_damage(&DamageEvent { rect: Rect::ZERO });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.revalidate(&sample_revalidate());
        tracer.damage(&DamageEvent { rect: Rect::ZERO });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            kinds: Vec<NodeKind>,
            damage: Vec<Rect>,
        }
        impl TraceSink for RecordingSink {
            fn on_revalidate(&mut self, e: &RevalidateEvent) {
                self.kinds.push(e.kind);
            }
            fn on_damage(&mut self, e: &DamageEvent) {
                self.damage.push(e.rect);
            }
        }

        let mut sink = RecordingSink {
            kinds: Vec::new(),
            damage: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.revalidate(&sample_revalidate());
        tracer.damage(&DamageEvent {
            rect: Rect::new(1.0, 1.0, 2.0, 2.0),
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.kinds, &[NodeKind::Path]);
        assert_eq!(sink.damage, &[Rect::new(1.0, 1.0, 2.0, 2.0)]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn controller_forwards_damage_to_tracer() {
        use crate::invalidation::InvalidationController;
        use kurbo::Affine;

        #[derive(Default)]
        struct CountingSink {
            damage: usize,
        }
        impl TraceSink for CountingSink {
            fn on_damage(&mut self, _: &DamageEvent) {
                self.damage += 1;
            }
        }

        let mut sink = CountingSink::default();
        let mut ic = InvalidationController::with_tracer(Tracer::new(&mut sink));
        ic.inval(Rect::new(0.0, 0.0, 4.0, 4.0), Affine::IDENTITY);
        ic.inval(Rect::ZERO, Affine::IDENTITY);
        drop(ic);
        assert_eq!(sink.damage, 1);
    }
}
