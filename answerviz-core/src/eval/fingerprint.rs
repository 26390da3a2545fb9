use crate::eval::evaluator::{RenderState, ResolvedProps};
use crate::foundation::math::FnvPair;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint {
    pub hi: u64,
    pub lo: u64,
}

/// 128-bit content hash of one evaluated frame.
///
/// Two frames with equal fingerprints draw identically; used to skip re-rasterizing held
/// frames and to compare evaluations across runs.
pub fn fingerprint_states(states: &[RenderState]) -> FrameFingerprint {
    let mut h = FnvPair::new();
    h.len(states.len());
    for state in states {
        h.text(&state.id);
        match &state.props {
            ResolvedProps::Circle(p) => {
                h.tag(0);
                [p.x, p.y, p.r].into_iter().for_each(|v| h.float(v));
                h.text(&p.fill);
            }
            ResolvedProps::Arrow(p) => {
                h.tag(1);
                [p.x, p.y, p.dx, p.dy].into_iter().for_each(|v| h.float(v));
                h.text(&p.color);
            }
            ResolvedProps::Lottie(p) => {
                h.tag(2);
                [p.x, p.y, p.width, p.height].into_iter().for_each(|v| h.float(v));
                h.text(&p.url);
                h.tag(u8::from(p.looping));
            }
        }
    }

    let (hi, lo) = h.finish();
    FrameFingerprint { hi, lo }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/fingerprint.rs"]
mod tests;
