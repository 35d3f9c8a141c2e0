//! [`Surface`] over a 2D canvas context.

use crate::dom::{create, js_err};
use anyhow::anyhow;
use backdrop_core::{Composite, PixelBuffer, RadialGradient, Rgba, Surface, Viewport};
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::{Clamped, JsCast};
use web_sys as web;

pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    // Lazily created for pixel-buffer blits
    scratch: Option<(web::HtmlCanvasElement, web::CanvasRenderingContext2d)>,
    composite: Composite,
}

fn context_2d(canvas: &web::HtmlCanvasElement) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(js_err)?
        .ok_or_else(|| anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow!("{:?}", e))
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            scratch: None,
            composite: Composite::SourceOver,
        })
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    /// Match the backing store to `viewport` and draw in CSS pixels.
    pub fn resize(&mut self, viewport: &Viewport) {
        let (w, h) = viewport.backing_size();
        self.canvas.set_width(w.max(1));
        self.canvas.set_height(h.max(1));
        let dpr = viewport.dpr as f64;
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        // Resizing resets context state.
        self.composite = Composite::SourceOver;
    }

    fn css(color: Rgba) -> String {
        color.to_string()
    }

    fn scratch(&mut self, w: u32, h: u32) -> Option<&(web::HtmlCanvasElement, web::CanvasRenderingContext2d)> {
        if self.scratch.is_none() {
            let document = self.canvas.owner_document()?;
            let canvas: web::HtmlCanvasElement = create(&document, "canvas").ok()?;
            let ctx = context_2d(&canvas).ok()?;
            self.scratch = Some((canvas, ctx));
        }
        let (canvas, _) = self.scratch.as_ref()?;
        if canvas.width() != w || canvas.height() != h {
            canvas.set_width(w);
            canvas.set_height(h);
        }
        self.scratch.as_ref()
    }
}

impl Surface for CanvasSurface {
    fn set_composite(&mut self, mode: Composite) {
        if mode != self.composite {
            self.composite = mode;
            let _ = self.ctx.set_global_composite_operation(mode.as_css());
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn set_shadow(&mut self, blur: f32, color: Rgba) {
        self.ctx.set_shadow_blur(blur.max(0.0) as f64);
        if blur > 0.0 {
            self.ctx.set_shadow_color(&Self::css(color));
        }
    }

    fn clear(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.clear_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&Self::css(color));
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&Self::css(color));
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, at: Vec2, size: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&Self::css(color));
        self.ctx.set_font(&format!("{:.1}px monospace", size.max(1.0)));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let _ = self.ctx.fill_text(text, at.x as f64, at.y as f64);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&Self::css(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_stroke_style_str(&Self::css(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.stroke();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&Self::css(color));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.ctx.stroke();
    }

    fn fill_radial_gradient(&mut self, g: &RadialGradient, x: f32, y: f32, w: f32, h: f32) {
        let (cx, cy) = (g.center.x as f64, g.center.y as f64);
        let Ok(grad) = self.ctx.create_radial_gradient(
            cx,
            cy,
            g.inner.max(0.0) as f64,
            cx,
            cy,
            g.outer.max(0.0) as f64,
        ) else {
            return;
        };
        for (offset, color) in &g.stops {
            let _ = grad.add_color_stop(*offset, &Self::css(*color));
        }
        self.ctx.set_fill_style_canvas_gradient(&grad);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn draw_pixels(&mut self, pixels: &PixelBuffer, x: f32, y: f32, w: f32, h: f32) {
        if pixels.width == 0 || pixels.height == 0 {
            return;
        }
        let Ok(image) = web::ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&pixels.data[..]),
            pixels.width,
            pixels.height,
        ) else {
            return;
        };
        let Some((scratch, sctx)) = self.scratch(pixels.width, pixels.height).cloned() else {
            return;
        };
        if sctx.put_image_data(&image, 0.0, 0.0).is_err() {
            return;
        }
        self.ctx.set_image_smoothing_enabled(true);
        let _ = self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
            &scratch, x as f64, y as f64, w as f64, h as f64,
        );
    }
}
