use anyhow::anyhow;
use confetti_common::core::{FillStyle, Point};
use confetti_common::paint::{PaintContext, Surface, SurfaceProvider};
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A full-viewport `<canvas>` overlaid on the page, ignoring pointer events.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl CanvasSurface {
    pub fn new(z_index: i32) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no global `window` exists")?;
        let document = window
            .document()
            .ok_or("should have a document on window")?;
        let body = document.body().ok_or("document should have a body")?;

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;

        // Same fallback chain the page layout would use: viewport, body, window
        let rect = body.get_bounding_client_rect();
        let root = document.document_element();
        let width = first_nonzero([
            root.as_ref().map_or(0.0, |e| e.client_width() as f64),
            rect.width(),
            window.inner_width()?.as_f64().unwrap_or(0.0),
        ]);
        let height = first_nonzero([
            root.as_ref().map_or(0.0, |e| e.client_height() as f64),
            rect.height(),
            window.inner_height()?.as_f64().unwrap_or(0.0),
        ]);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let style = canvas.style();
        style.set_property("position", "fixed")?;
        style.set_property("top", "0px")?;
        style.set_property("left", "0px")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("z-index", &z_index.to_string())?;

        let ctx = canvas
            .get_context("2d")?
            .ok_or("2D canvas context not supported")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        body.append_child(&canvas)?;

        Ok(Self {
            width: canvas.width(),
            height: canvas.height(),
            canvas,
            ctx,
        })
    }
}

/// First strictly positive candidate, or 0.
pub(crate) fn first_nonzero<const N: usize>(candidates: [f64; N]) -> f64 {
    candidates
        .into_iter()
        .find(|v| *v > 0.0 && v.is_finite())
        .unwrap_or(0.0)
}

impl PaintContext for CanvasSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_polygon(&mut self, points: &[Point], style: FillStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(&style.to_string());
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn release(&mut self) {
        if self.canvas.is_connected() {
            self.canvas.remove();
        } else {
            warn!("confetti canvas was already detached");
        }
    }
}

/// Creates a fresh [`CanvasSurface`] on `document.body` per animation.
#[derive(Clone, Copy, Debug, Default)]
pub struct BodyCanvasProvider;

impl SurfaceProvider for BodyCanvasProvider {
    type Surface = CanvasSurface;

    fn create_surface(&self, z_index: i32) -> anyhow::Result<CanvasSurface> {
        CanvasSurface::new(z_index).map_err(|e| anyhow!("canvas setup failed: {:?}", e))
    }
}
