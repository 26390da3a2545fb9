use std::ops::ControlFlow;
use std::sync::Arc;

use crate::eval::evaluator::{Evaluator, RenderState};
use crate::playback::clock::Clock;
use crate::scene::model::VisualizationSpec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No spec loaded.
    Idle,
    Playing,
    Paused,
    /// Reached `duration_ms`; the last frame was delivered.
    Finished,
}

/// Single-use permission to take the next sample.
///
/// Stamped with the playback generation at issue time. Loading, pausing and stopping bump the
/// generation, so tickets held by a scheduled callback from before that point come back
/// [`Sample::Stale`]. Not `Clone`: the only way to get another is from the frame it precedes.
#[derive(Debug, PartialEq, Eq)]
pub struct SampleTicket {
    generation: u64,
}

impl SampleTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub enum Sample {
    Frame {
        t_ms: f64,
        states: Vec<RenderState>,
        /// `None` once the final frame (at `duration_ms`) has been produced.
        next: Option<SampleTicket>,
    },
    /// The ticket predates a load/pause/stop; discard without drawing.
    Stale,
}

/// Cooperative playback of one visualization at a time.
///
/// Animation time only advances while playing: pausing retains `t`, and resuming continues from
/// it regardless of how long the pause lasted.
#[derive(Debug)]
pub struct Playback {
    spec: Option<Arc<VisualizationSpec>>,
    generation: u64,
    state: PlaybackState,
    elapsed_ms: f64, // animation time banked before `anchor_ms`
    anchor_ms: f64,  // wall time playing (re)started
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self {
            spec: None,
            generation: 0,
            state: PlaybackState::Idle,
            elapsed_ms: 0.0,
            anchor_ms: 0.0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn spec(&self) -> Option<&VisualizationSpec> {
        self.spec.as_deref()
    }

    /// Replace whatever is playing and start again from `t = 0`.
    pub fn load(&mut self, spec: impl Into<Arc<VisualizationSpec>>, now_ms: f64) -> SampleTicket {
        let spec = spec.into();
        tracing::debug!(spec_id = %spec.id, generation = self.generation + 1, "playback load");
        self.spec = Some(spec);
        self.elapsed_ms = 0.0;
        self.anchor_ms = now_ms;
        self.state = PlaybackState::Playing;
        self.bump()
    }

    /// Animation time at `now_ms`, clamped to `duration_ms`.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        let duration = self.duration_ms();
        match self.state {
            PlaybackState::Playing => {
                (self.elapsed_ms + delta_since(self.anchor_ms, now_ms)).min(duration)
            }
            PlaybackState::Idle | PlaybackState::Paused | PlaybackState::Finished => {
                self.elapsed_ms
            }
        }
    }

    pub fn sample(&mut self, ticket: SampleTicket, now_ms: f64) -> Sample {
        if ticket.generation != self.generation || self.state != PlaybackState::Playing {
            tracing::trace!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale sample"
            );
            return Sample::Stale;
        }
        let Some(spec) = self.spec.clone() else {
            return Sample::Stale;
        };

        let duration = spec.duration_ms_f64();
        let t = self.elapsed_ms + delta_since(self.anchor_ms, now_ms);
        if t >= duration {
            self.elapsed_ms = duration;
            self.state = PlaybackState::Finished;
            return Sample::Frame {
                t_ms: duration,
                states: Evaluator::eval(&spec, duration),
                next: None,
            };
        }

        Sample::Frame {
            t_ms: t,
            states: Evaluator::eval(&spec, t),
            next: Some(ticket),
        }
    }

    /// Freeze animation time. Outstanding tickets become stale.
    pub fn pause(&mut self, now_ms: f64) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms(now_ms);
        self.state = PlaybackState::Paused;
        self.bump();
        true
    }

    /// Continue from the retained time.
    pub fn resume(&mut self, now_ms: f64) -> Option<SampleTicket> {
        if self.state != PlaybackState::Paused {
            return None;
        }
        self.anchor_ms = now_ms;
        self.state = PlaybackState::Playing;
        Some(self.bump())
    }

    /// Drop the current spec. Outstanding tickets become stale.
    pub fn stop(&mut self) {
        self.spec = None;
        self.state = PlaybackState::Idle;
        self.elapsed_ms = 0.0;
        self.bump();
    }

    fn bump(&mut self) -> SampleTicket {
        self.generation = self.generation.wrapping_add(1);
        SampleTicket {
            generation: self.generation,
        }
    }

    fn duration_ms(&self) -> f64 {
        self.spec
            .as_deref()
            .map(VisualizationSpec::duration_ms_f64)
            .unwrap_or(0.0)
    }
}

fn delta_since(anchor_ms: f64, now_ms: f64) -> f64 {
    let d = now_ms - anchor_ms;
    if d.is_finite() { d.max(0.0) } else { 0.0 }
}

/// Sample, draw, wait; repeat until the last frame, a stale ticket, or `draw` breaks.
///
/// The wait between samples is `1000 / fps`; the next sample is only taken after `draw`
/// returned for the previous one.
pub fn drive<C>(
    playback: &mut Playback,
    ticket: SampleTicket,
    clock: &C,
    mut draw: impl FnMut(f64, &[RenderState]) -> ControlFlow<()>,
) -> PlaybackState
where
    C: Clock + ?Sized,
{
    let interval_ms = playback
        .spec()
        .map(|s| 1000.0 / f64::from(s.fps.max(1)))
        .unwrap_or(0.0);

    let mut ticket = ticket;
    loop {
        match playback.sample(ticket, clock.now_ms()) {
            Sample::Stale => break,
            Sample::Frame { t_ms, states, next } => {
                if draw(t_ms, &states).is_break() {
                    break;
                }
                let Some(next) = next else {
                    break;
                };
                ticket = next;
                clock.sleep_ms(interval_ms);
            }
        }
    }
    playback.state()
}

/// Offline sample times: every `1000 / fps` ms from `0`, ending with exactly `duration_ms`.
pub fn frame_times(spec: &VisualizationSpec) -> Vec<f64> {
    let duration = spec.duration_ms_f64();
    let step = 1000.0 / f64::from(spec.fps.max(1));
    let mut out = Vec::new();
    let mut i = 0u32;
    loop {
        let t = f64::from(i) * step;
        if t >= duration {
            break;
        }
        out.push(t);
        i += 1;
    }
    out.push(duration);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/playback/driver.rs"]
mod tests;
