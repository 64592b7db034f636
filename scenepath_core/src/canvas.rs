// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing contract consumed by geometry nodes.
//!
//! Scenepath does not rasterize. Geometry nodes hand their cached path to a
//! [`Canvas`] implemented by the embedding renderer (a Vello scene builder, a
//! tiny-skia pixmap, a display list). [`RecordingCanvas`] records the calls
//! instead, for tests and debugging.

use alloc::vec::Vec;

use crate::geometry::PathData;

/// How a clip path combines with the current clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClipOp {
    /// Keep the intersection of the current clip and the path.
    #[default]
    Intersect,
    /// Remove the path from the current clip.
    Difference,
}

/// How a path is painted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PaintStyle {
    /// Fill the interior according to the path's fill rule.
    #[default]
    Fill,
    /// Stroke the outline with the given width.
    Stroke {
        /// Stroke width in user space. Zero means hairline.
        width: f64,
    },
}

/// Paint state passed through to the canvas unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Non-premultiplied RGBA color.
    pub color: [f32; 4],
    /// Fill or stroke.
    pub style: PaintStyle,
    /// Whether edges are anti-aliased.
    pub anti_alias: bool,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            style: PaintStyle::Fill,
            anti_alias: true,
        }
    }
}

/// A drawing surface for cached geometry.
pub trait Canvas {
    /// Combines the current clip with `path`.
    fn clip_path(&mut self, path: &PathData, op: ClipOp, anti_alias: bool);

    /// Paints `path` with `paint`.
    fn draw_path(&mut self, path: &PathData, paint: &Paint);
}

/// One call made on a [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasCommand {
    /// A [`Canvas::clip_path`] call.
    ClipPath {
        /// The clip geometry.
        path: PathData,
        /// How it combines with the current clip.
        op: ClipOp,
        /// Whether the clip edge is anti-aliased.
        anti_alias: bool,
    },
    /// A [`Canvas::draw_path`] call.
    DrawPath {
        /// The painted geometry.
        path: PathData,
        /// The paint used.
        paint: Paint,
    },
}

/// A [`Canvas`] that records every call.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<CanvasCommand>,
}

impl RecordingCanvas {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded calls in order.
    #[must_use]
    pub fn commands(&self) -> &[CanvasCommand] {
        &self.commands
    }

    /// Takes the recorded calls, leaving the recording empty.
    pub fn take(&mut self) -> Vec<CanvasCommand> {
        core::mem::take(&mut self.commands)
    }
}

impl Canvas for RecordingCanvas {
    fn clip_path(&mut self, path: &PathData, op: ClipOp, anti_alias: bool) {
        self.commands.push(CanvasCommand::ClipPath {
            path: path.clone(),
            op,
            anti_alias,
        });
    }

    fn draw_path(&mut self, path: &PathData, paint: &Paint) {
        self.commands.push(CanvasCommand::DrawPath {
            path: path.clone(),
            paint: *paint,
        });
    }
}
