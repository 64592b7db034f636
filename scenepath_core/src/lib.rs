// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily revalidated scene-graph nodes for cached path geometry.
//!
//! `scenepath_core` provides geometry nodes whose path is derived from another
//! geometry node: trimmed, transformed, dashed, or with rounded corners. Each
//! derived path is computed once per change and cached; drawing, clipping, and
//! hit-testing read the cache. It is `no_std` compatible (with `alloc`) and
//! uses [`kurbo`] for all geometry.
//!
//! # Architecture
//!
//! Nodes form a DAG. Parents own their dependencies through `Rc` and register
//! as non-owning observers on them, so mutations flow upwards and recomputation
//! flows downwards:
//!
//! ```text
//!   Path::set_path() ──► invalidate ──► observers (effects) marked stale
//!                                              │
//!                 ┌────────────────────────────┘
//!                 ▼
//!   root.revalidate(ic, ctm) ──► child.revalidate() ──► Derivation::derive()
//!                                                            │
//!                 ┌──────────────────────────────────────────┘
//!                 ▼
//!   cached PathData ──► draw / clip / contains / as_path
//! ```
//!
//! **[`node`]**: The invalidation and revalidation protocol: node identity,
//! observer registration, damage bubbling, and cycle detection.
//!
//! **[`geometry`]**: [`GeometryNode`](geometry::GeometryNode), the
//! [`PathData`](geometry::PathData) value, and the leaf
//! [`Path`](geometry::Path) node.
//!
//! **[`effect`]**: [`GeometryEffect`](effect::GeometryEffect) and its four
//! variants: [`TrimEffect`](effect::TrimEffect),
//! [`GeometryTransform`](effect::GeometryTransform),
//! [`DashEffect`](effect::DashEffect), and
//! [`RoundEffect`](effect::RoundEffect).
//!
//! **[`filter`]**: Pure path filters used by the effects, with their
//! [`FilterOptions`](filter::FilterOptions).
//!
//! **[`transform`]**: [`Transform`](transform::Transform) nodes producing a
//! matrix.
//!
//! **[`invalidation`]**: The damage collector passed through a revalidation
//! pass.
//!
//! **[`canvas`]**: The [`Canvas`](canvas::Canvas) contract geometry is drawn
//! into.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! revalidation instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod canvas;
pub mod effect;
pub mod filter;
pub mod geometry;
pub mod invalidation;
pub mod node;
pub mod trace;
pub mod transform;
