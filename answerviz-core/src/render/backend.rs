use crate::eval::evaluator::RenderState;
use crate::foundation::error::AnswerVizResult;

/// One rendered frame as tightly packed RGBA8 rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, row-major, top row first.
    pub data: Vec<u8>,
    /// Whether colour channels are already multiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// Backend settings shared by every frame of a render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    /// Background, straight-alpha RGBA8.
    pub clear_rgba: [u8; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_rgba: [255, 255, 255, 255],
        }
    }
}

/// Turns one evaluated frame into pixels.
pub trait DrawBackend {
    fn draw_states(&mut self, states: &[RenderState]) -> AnswerVizResult<FrameRGBA>;

    /// Settings to build per-thread CPU workers from; `None` restricts the backend to sequential
    /// rendering.
    fn worker_render_settings(&self) -> Option<RenderSettings> {
        None
    }
}
