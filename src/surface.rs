// Drawing surface the particle field paints onto. The browser implementation
// wraps a 2D canvas context; tests use a recording surface.

use crate::color::Color;
use glm::DVec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::{Error, Result};

/// Width and height of the visible viewport, in canvas pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Bounds { width, height }
    }
}

/// Two-stop linear gradient between two points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub from: DVec2,
    pub to: DVec2,
    pub start: Color,
    pub end: Color,
}

impl LinearGradient {
    // Top-left to bottom-right across the whole surface
    pub fn diagonal(bounds: Bounds, start: Color, end: Color) -> Self {
        LinearGradient {
            from: glm::vec2(0.0, 0.0),
            to: glm::vec2(bounds.width, bounds.height),
            start,
            end,
        }
    }
}

pub trait Surface {
    fn bounds(&self) -> Bounds;

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color);

    /// Paints the gradient over the full surface.
    fn fill_linear_gradient(&mut self, gradient: &LinearGradient);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    // Grabs the 2d context of the given canvas
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let context = canvas
            .get_context("2d")
            .map_err(Error::from_js)?
            .ok_or_else(|| Error::Dom("canvas has no 2d context".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::Dom("2d context has an unexpected type".to_owned()))?;

        Ok(CanvasSurface { canvas, context })
    }

    // Resizing the backing store also clears it
    pub fn set_size(&self, bounds: Bounds) {
        self.canvas.set_width(bounds.width.max(0.0) as u32);
        self.canvas.set_height(bounds.height.max(0.0) as u32);
    }
}

impl Surface for CanvasSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.context.begin_path();
        if let Err(err) =
            self.context
                .arc(center.x, center.y, radius, 0.0, std::f64::consts::PI * 2.0)
        {
            log::warn!("arc at ({}, {}) rejected: {:?}", center.x, center.y, err);
        }
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill();
        self.context.close_path();
    }

    fn fill_linear_gradient(&mut self, gradient: &LinearGradient) {
        let canvas_gradient = self.context.create_linear_gradient(
            gradient.from.x,
            gradient.from.y,
            gradient.to.x,
            gradient.to.y,
        );
        for (offset, color) in [(0.0, gradient.start), (1.0, gradient.end)] {
            if let Err(err) = canvas_gradient.add_color_stop(offset, &color.to_css()) {
                log::warn!("gradient stop {} rejected: {:?}", offset, err);
            }
        }
        self.context.set_fill_style_canvas_gradient(&canvas_gradient);
        let bounds = self.bounds();
        self.context.fill_rect(0.0, 0.0, bounds.width, bounds.height);
    }
}
