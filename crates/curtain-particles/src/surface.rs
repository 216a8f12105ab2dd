#![forbid(unsafe_code)]

//! 2D drawing target.
//!
//! The field issues a handful of immediate-mode calls per frame; a browser
//! host maps them onto `CanvasRenderingContext2d`, tests record them.

use curtain_core::geometry::{Point, Viewport};

use crate::palette::Rgba;

/// Minimal immediate-mode drawing surface.
pub trait Surface {
    /// Match the backing store to the viewport.
    fn resize(&mut self, viewport: Viewport);

    /// Clear the whole surface to transparent.
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba);
}

/// One recorded surface call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Resize(Viewport),
    Clear,
    Circle {
        center: Point,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
    },
}

/// Surface that keeps every call for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    viewport: Viewport,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain recorded calls.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Viewport from the last `resize`.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of `clear` calls, i.e. frames drawn.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Clear)).count()
    }

    /// Calls recorded since the last `clear`.
    #[must_use]
    pub fn last_frame(&self) -> &[DrawOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Clear))
            .map_or(0, |i| i + 1);
        &self.ops[start..]
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.ops.push(DrawOp::Resize(viewport));
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn resize(&mut self, viewport: Viewport) {
        (**self).resize(viewport);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        (**self).fill_circle(center, radius, color);
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        (**self).stroke_line(from, to, width, color);
    }
}
