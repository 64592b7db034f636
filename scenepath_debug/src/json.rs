// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON trace export.
//!
//! [`JsonSink`] collects every event as a JSON object and writes them out as
//! one array, for loading into notebooks or diffing between runs:
//!
//! ```json
//! [
//!   { "event": "revalidate", "node": 3, "kind": "path", "bounds": [0.0, 0.0, 10.0, 10.0] },
//!   { "event": "filter", "node": 4, "effect": "Round", "outcome": "Applied", "elements": 14 },
//!   { "event": "damage", "rect": [0.0, 0.0, 20.0, 20.0] }
//! ]
//! ```

use std::io::{self, Write};

use kurbo::Rect;
use serde_json::{Value, json};

use scenepath_core::trace::{DamageEvent, FilterEvent, RevalidateEvent, TraceSink};

use crate::pretty::kind_label;

/// A [`TraceSink`] that collects events as JSON values.
#[derive(Debug, Default)]
pub struct JsonSink {
    events: Vec<Value>,
}

impl JsonSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected events.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Consumes the sink and returns the events as a JSON array.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Array(self.events)
    }

    /// Writes the events as a pretty-printed JSON array.
    pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }
}

impl TraceSink for JsonSink {
    fn on_revalidate(&mut self, e: &RevalidateEvent) {
        self.events.push(json!({
            "event": "revalidate",
            "node": e.node.get(),
            "kind": kind_label(e.kind),
            "bounds": rect_json(e.bounds),
        }));
    }

    fn on_filter(&mut self, e: &FilterEvent) {
        self.events.push(json!({
            "event": "filter",
            "node": e.node.get(),
            "effect": format!("{:?}", e.effect),
            "outcome": format!("{:?}", e.outcome),
            "elements": e.elements,
        }));
    }

    fn on_damage(&mut self, e: &DamageEvent) {
        self.events.push(json!({
            "event": "damage",
            "rect": rect_json(e.rect),
        }));
    }
}

fn rect_json(r: Rect) -> Value {
    json!([r.x0, r.y0, r.x1, r.y1])
}
