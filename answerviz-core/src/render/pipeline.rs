use std::collections::HashMap;

use rayon::prelude::*;

use crate::eval::evaluator::{Evaluator, RenderState};
use crate::eval::fingerprint::{FrameFingerprint, fingerprint_states};
use crate::foundation::error::{AnswerVizError, AnswerVizResult};
use crate::playback::driver::frame_times;
use crate::render::backend::{DrawBackend, FrameRGBA, RenderSettings};
use crate::render::cpu::CpuBackend;
use crate::scene::model::VisualizationSpec;

/// Evaluate and draw a single frame at `t_ms`.
#[tracing::instrument(level = "debug", skip(spec, backend), fields(spec_id = %spec.id))]
pub fn render_frame(
    spec: &VisualizationSpec,
    t_ms: f64,
    backend: &mut dyn DrawBackend,
) -> AnswerVizResult<FrameRGBA> {
    backend.draw_states(&Evaluator::eval(spec, t_ms))
}

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
    /// Draw frames with identical render states once and reuse the pixels.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
    pub frames_elided: u64,
}

impl RenderStats {
    fn add(&mut self, other: RenderStats) {
        self.frames_total += other.frames_total;
        self.frames_rendered += other.frames_rendered;
        self.frames_elided += other.frames_elided;
    }
}

/// Render every frame of [`frame_times`] in sample order and collect them.
///
/// Holds the whole animation in memory; prefer [`render_frames_with`] for long renders.
pub fn render_frames(
    spec: &VisualizationSpec,
    backend: &mut dyn DrawBackend,
    threading: &RenderThreading,
) -> AnswerVizResult<(Vec<FrameRGBA>, RenderStats)> {
    let mut out = Vec::with_capacity(frame_times(spec).len());
    let stats = render_frames_with(spec, backend, threading, |_, frame| {
        out.push(frame);
        Ok(())
    })?;
    Ok((out, stats))
}

/// Render every frame of [`frame_times`], handing each to `sink` with its index as its chunk
/// completes. At most one chunk of frames is alive at a time.
///
/// Parallel rendering builds one [`CpuBackend`] per worker thread from the backend's
/// [`DrawBackend::worker_render_settings`], so backends without worker settings only render
/// sequentially. A sink error stops the render and is returned as is.
#[tracing::instrument(skip(spec, backend, threading, sink), fields(spec_id = %spec.id))]
pub fn render_frames_with<F>(
    spec: &VisualizationSpec,
    backend: &mut dyn DrawBackend,
    threading: &RenderThreading,
    mut sink: F,
) -> AnswerVizResult<RenderStats>
where
    F: FnMut(usize, FrameRGBA) -> AnswerVizResult<()>,
{
    let times = frame_times(spec);
    let chunk_size = threading.chunk_size.max(1);
    let mut stats = RenderStats::default();
    let mut index = 0usize;

    let pool = if threading.parallel {
        let settings = backend.worker_render_settings().ok_or_else(|| {
            AnswerVizError::render("parallel render requires backend worker settings support")
        })?;
        Some((settings, build_thread_pool(threading.threads)?))
    } else {
        None
    };

    for chunk in times.chunks(chunk_size) {
        let evals: Vec<Vec<RenderState>> =
            chunk.iter().map(|&t| Evaluator::eval(spec, t)).collect();
        let plan = ElisionPlan::new(&evals, threading.static_frame_elision);

        let unique = match &pool {
            Some((settings, pool)) => render_unique_parallel(&evals, &plan, settings, pool)?,
            None => plan
                .unique
                .iter()
                .map(|&i| backend.draw_states(&evals[i]))
                .collect::<AnswerVizResult<Vec<_>>>()?,
        };

        let (frames, chunk_stats) = plan.expand(unique)?;
        for frame in frames {
            sink(index, frame)?;
            index += 1;
        }
        stats.add(chunk_stats);
    }

    tracing::debug!(
        total = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "rendered frames"
    );
    Ok(stats)
}

/// Which frames of a chunk need drawing and where each output frame comes from.
struct ElisionPlan {
    unique: Vec<usize>,
    frame_to_unique: Vec<usize>,
}

impl ElisionPlan {
    fn new(evals: &[Vec<RenderState>], elide: bool) -> Self {
        let mut unique = Vec::with_capacity(evals.len());
        let mut frame_to_unique = Vec::with_capacity(evals.len());
        if elide {
            let mut first = HashMap::<FrameFingerprint, usize>::new();
            for (idx, states) in evals.iter().enumerate() {
                let fp = fingerprint_states(states);
                let slot = *first.entry(fp).or_insert_with(|| {
                    unique.push(idx);
                    unique.len() - 1
                });
                frame_to_unique.push(slot);
            }
        } else {
            for idx in 0..evals.len() {
                unique.push(idx);
                frame_to_unique.push(idx);
            }
        }
        Self {
            unique,
            frame_to_unique,
        }
    }

    fn expand(&self, rendered: Vec<FrameRGBA>) -> AnswerVizResult<(Vec<FrameRGBA>, RenderStats)> {
        let mut remaining = vec![0usize; rendered.len()];
        for &u in &self.frame_to_unique {
            remaining[u] += 1;
        }

        let mut frames: Vec<Option<FrameRGBA>> = rendered.into_iter().map(Some).collect();
        let mut out = Vec::with_capacity(self.frame_to_unique.len());
        for &u in &self.frame_to_unique {
            remaining[u] -= 1;
            let frame = if remaining[u] == 0 {
                frames[u].take()
            } else {
                frames[u].clone()
            };
            out.push(frame.ok_or_else(|| AnswerVizError::render("elided frame source missing"))?);
        }

        let total = self.frame_to_unique.len() as u64;
        let rendered = self.unique.len() as u64;
        Ok((
            out,
            RenderStats {
                frames_total: total,
                frames_rendered: rendered,
                frames_elided: total.saturating_sub(rendered),
            },
        ))
    }
}

fn render_unique_parallel(
    evals: &[Vec<RenderState>],
    plan: &ElisionPlan,
    settings: &RenderSettings,
    pool: &rayon::ThreadPool,
) -> AnswerVizResult<Vec<FrameRGBA>> {
    pool.install(|| {
        plan.unique
            .par_iter()
            .map_init(
                || CpuBackend::new(settings.clone()),
                |worker, &idx| worker.draw_states(&evals[idx]),
            )
            .collect::<AnswerVizResult<Vec<_>>>()
    })
}

fn build_thread_pool(threads: Option<usize>) -> AnswerVizResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(AnswerVizError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| AnswerVizError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
