use crate::eval::evaluator::{RenderState, ResolvedProps};
use crate::foundation::core::{BezPath, Point};
use crate::foundation::error::{AnswerVizError, AnswerVizResult};
use crate::render::backend::{DrawBackend, FrameRGBA, RenderSettings};
use crate::render::color::{Rgba8, color_or};
use crate::render::geometry::{arrow_geometry, circle_path};
use crate::scene::model::{CANVAS, DEFAULT_ARROW_COLOR, DEFAULT_CIRCLE_FILL};

/// Fill of the Lottie stand-in rectangle.
const LOTTIE_PLACEHOLDER: Rgba8 = Rgba8::new(0x95, 0xa5, 0xa6, 0x60);

/// Rasterizes frames on the CPU into a fixed-size canvas.
#[derive(Clone, Debug)]
pub struct CpuBackend {
    settings: RenderSettings,
    width: u16,
    height: u16,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            width: CANVAS.width as u16,
            height: CANVAS.height as u16,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl DrawBackend for CpuBackend {
    fn draw_states(&mut self, states: &[RenderState]) -> AnswerVizResult<FrameRGBA> {
        if self.width == 0 || self.height == 0 {
            return Err(AnswerVizError::render("canvas has zero area"));
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let [r, g, b, a] = self.settings.clear_rgba;
        if a > 0 {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }

        for state in states {
            draw_state(&mut ctx, state);
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn worker_render_settings(&self) -> Option<RenderSettings> {
        Some(self.settings.clone())
    }
}

fn draw_state(ctx: &mut vello_cpu::RenderContext, state: &RenderState) {
    match &state.props {
        ResolvedProps::Circle(p) => {
            set_color(ctx, color_or(&p.fill, DEFAULT_CIRCLE_FILL));
            ctx.fill_path(&bezpath_to_cpu(&circle_path(p.x, p.y, p.r)));
        }
        ResolvedProps::Arrow(p) => {
            let Some(arrow) = arrow_geometry(p.x, p.y, p.dx, p.dy) else {
                return;
            };
            set_color(ctx, color_or(&p.color, DEFAULT_ARROW_COLOR));
            ctx.fill_path(&bezpath_to_cpu(&arrow.shaft));
            ctx.fill_path(&bezpath_to_cpu(&arrow.head));
        }
        ResolvedProps::Lottie(p) => {
            // Asset playback is out of reach here; mark the embed's footprint.
            set_color(ctx, LOTTIE_PLACEHOLDER);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                p.x,
                p.y,
                p.x + p.width,
                p.y + p.height,
            ));
        }
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
