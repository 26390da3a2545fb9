//! answerviz turns a free-form model answer into a short, bounded 2-D animation.
//!
//! Model output is untrusted. It may be prose, fenced JSON, truncated JSON, or JSON with the wrong
//! types and out-of-range numbers. The crate recovers what it can and always ends with a valid
//! [`VisualizationSpec`] that can be sampled at any point in time.
//!
//! # Pipeline overview
//!
//! 1. **Extract**: `&str -> Option<serde_json::Value>` ([`extract_json`])
//! 2. **Sanitize**: `Value -> VisualizationSpec`, total and idempotent ([`sanitize`],
//!    [`sanitize_with_report`])
//! 3. **Evaluate**: `(spec, t_ms) -> Vec<RenderState>`, pure ([`Evaluator::eval`])
//! 4. **Play or render**: drive evaluation from a clock ([`Playback`]) or rasterize a whole
//!    schedule on the CPU ([`render_frames`], or streamed chunk by chunk with
//!    [`render_frames_with`])
//!
//! [`Responder`] wraps steps 1 and 2 around a [`ModelBackend`] so every question ends in a
//! complete text and visualization pair, even when the backend is down.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: extraction, sanitization and evaluation depend only on their inputs; ids
//!   are minted by an injected [`IdSource`].
//! - **Premultiplied RGBA8**: the CPU backend outputs premultiplied pixels.
#![forbid(unsafe_code)]

mod answer;
mod eval;
mod extract;
mod foundation;
mod normalize;
mod playback;
mod render;
mod scene;

pub use answer::backend::{CommandBackend, ModelBackend, StaticBackend};
pub use answer::responder::{Answer, Responder, ResponderOpts};
pub use eval::evaluator::{Evaluator, RenderState, ResolvedProps, evaluate};
pub use eval::fingerprint::{FrameFingerprint, fingerprint_states};
pub use extract::json::extract_json;
pub use foundation::core::{BezPath, Bounds, Canvas, Point, Vec2};
pub use foundation::error::{AnswerVizError, AnswerVizResult};
pub use foundation::ids::{CounterIds, IdSource};
pub use normalize::coerce::coerce_number;
pub use normalize::report::{Repair, RepairKind, SanitizeReport};
pub use normalize::sanitize::{
    FALLBACK_TEXT, SanitizedAnswer, sanitize, sanitize_answer, sanitize_text, sanitize_text_or,
    sanitize_with_report,
};
pub use playback::clock::{Clock, ManualClock, SystemClock};
pub use playback::driver::{Playback, PlaybackState, Sample, SampleTicket, drive, frame_times};
pub use render::backend::{DrawBackend, FrameRGBA, RenderSettings};
pub use render::color::{Rgba8, parse_css_color};
pub use render::cpu::CpuBackend;
pub use render::geometry::{
    ARROW_STROKE_WIDTH, ARROWHEAD_HALF_ANGLE_DEG, ARROWHEAD_LENGTH, ArrowGeometry,
    arrow_geometry, circle_path,
};
pub use render::pipeline::{
    RenderStats, RenderThreading, render_frame, render_frames, render_frames_with,
};
pub use scene::model::{
    ARROW_DX_BOUNDS, ARROW_DY_BOUNDS, Animation, ArrowLayer, ArrowProps, CANVAS,
    CIRCLE_RADIUS_BOUNDS, CircleLayer, CircleProps, DEFAULT_ARROW_COLOR, DEFAULT_CIRCLE_FILL,
    DEFAULT_DURATION_MS, DEFAULT_FPS, DEFAULT_LOTTIE_URL, DEFAULT_SPEC_ID, LOTTIE_HEIGHT_BOUNDS,
    LOTTIE_WIDTH_BOUNDS, Layer, LayerKind, LinearAnimation, LottieLayer, LottieProps,
    MAX_DURATION_MS, MAX_FPS, MIN_ANIMATION_SPAN_MS, MIN_DURATION_MS, MIN_FPS,
    ORBIT_PERIOD_BOUNDS_MS, ORBIT_RADIUS_BOUNDS, OrbitAnimation, Property, VisualizationSpec,
    X_BOUNDS, Y_BOUNDS, default_layers,
};
