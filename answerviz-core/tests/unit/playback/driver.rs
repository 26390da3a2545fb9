use super::*;
use crate::playback::clock::ManualClock;
use crate::scene::model::default_layers;

fn spec(duration_ms: u32, fps: u32) -> VisualizationSpec {
    VisualizationSpec {
        id: "play".to_string(),
        duration_ms,
        fps,
        layers: default_layers(duration_ms),
    }
}

fn frame(sample: Sample) -> (f64, Option<SampleTicket>) {
    match sample {
        Sample::Frame { t_ms, next, .. } => (t_ms, next),
        Sample::Stale => panic!("expected a frame"),
    }
}

#[test]
fn new_playback_is_idle() {
    let p = Playback::new();
    assert_eq!(p.state(), PlaybackState::Idle);
    assert!(p.spec().is_none());
    assert_eq!(p.elapsed_ms(123.0), 0.0);
}

#[test]
fn sample_tracks_wall_time_since_load() {
    let mut p = Playback::new();
    let ticket = p.load(spec(1000, 10), 5_000.0);
    let (t, next) = frame(p.sample(ticket, 5_250.0));
    assert_eq!(t, 250.0);
    assert!(next.is_some());
    assert_eq!(p.state(), PlaybackState::Playing);
}

#[test]
fn clock_running_backwards_does_not_rewind() {
    let mut p = Playback::new();
    let ticket = p.load(spec(1000, 10), 500.0);
    let (t, _) = frame(p.sample(ticket, 100.0));
    assert_eq!(t, 0.0);
}

#[test]
fn final_frame_lands_exactly_on_duration() {
    let mut p = Playback::new();
    let ticket = p.load(spec(1000, 10), 0.0);
    let (t, next) = frame(p.sample(ticket, 4_000.0));
    assert_eq!(t, 1000.0);
    assert!(next.is_none());
    assert_eq!(p.state(), PlaybackState::Finished);
    assert_eq!(p.elapsed_ms(9_999.0), 1000.0);
}

#[test]
fn load_invalidates_outstanding_ticket() {
    let mut p = Playback::new();
    let old = p.load(spec(1000, 10), 0.0);
    let fresh = p.load(spec(2000, 10), 0.0);
    assert!(matches!(p.sample(old, 10.0), Sample::Stale));
    assert!(matches!(p.sample(fresh, 10.0), Sample::Frame { .. }));
}

#[test]
fn stop_invalidates_and_clears() {
    let mut p = Playback::new();
    let ticket = p.load(spec(1000, 10), 0.0);
    p.stop();
    assert_eq!(p.state(), PlaybackState::Idle);
    assert!(p.spec().is_none());
    assert!(matches!(p.sample(ticket, 10.0), Sample::Stale));
}

#[test]
fn pause_retains_time_and_resume_continues() {
    let mut p = Playback::new();
    let ticket = p.load(spec(2000, 10), 0.0);
    let (_, next) = frame(p.sample(ticket, 300.0));
    let pending = next.expect("ticket");

    assert!(p.pause(400.0));
    assert_eq!(p.state(), PlaybackState::Paused);
    assert_eq!(p.elapsed_ms(400.0), 400.0);
    // A long pause does not advance animation time.
    assert_eq!(p.elapsed_ms(60_000.0), 400.0);
    assert!(matches!(p.sample(pending, 60_000.0), Sample::Stale));

    let resumed = p.resume(60_000.0).expect("resumes from pause");
    let (t, _) = frame(p.sample(resumed, 60_100.0));
    assert_eq!(t, 500.0);
}

#[test]
fn pause_and_resume_outside_their_states_are_noops() {
    let mut p = Playback::new();
    assert!(!p.pause(0.0));
    assert!(p.resume(0.0).is_none());

    let _ticket = p.load(spec(1000, 10), 0.0);
    assert!(p.resume(10.0).is_none());
    let generation = p.generation();
    assert!(p.pause(10.0));
    assert!(!p.pause(20.0));
    assert_eq!(p.generation(), generation + 1);
}

#[test]
fn sampled_states_match_the_evaluator() {
    let s = spec(1000, 10);
    let mut p = Playback::new();
    let ticket = p.load(s.clone(), 0.0);
    match p.sample(ticket, 500.0) {
        Sample::Frame { t_ms, states, .. } => {
            assert_eq!(states, Evaluator::eval(&s, t_ms));
        }
        Sample::Stale => panic!("expected a frame"),
    }
}

#[test]
fn drive_runs_to_completion_on_manual_clock() {
    let clock = ManualClock::new(0.0);
    let mut p = Playback::new();
    let ticket = p.load(spec(1000, 10), clock.now_ms());

    let mut times = Vec::new();
    let end = drive(&mut p, ticket, &clock, |t, states| {
        assert_eq!(states.len(), 2);
        times.push(t);
        ControlFlow::Continue(())
    });

    assert_eq!(end, PlaybackState::Finished);
    assert_eq!(times.len(), 11);
    assert_eq!(times.first().copied(), Some(0.0));
    assert_eq!(times.last().copied(), Some(1000.0));
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn drive_stops_when_draw_breaks() {
    let clock = ManualClock::new(0.0);
    let mut p = Playback::new();
    let ticket = p.load(spec(1000, 10), clock.now_ms());

    let mut drawn = 0;
    let end = drive(&mut p, ticket, &clock, |_, _| {
        drawn += 1;
        if drawn == 3 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    assert_eq!(drawn, 3);
    assert_eq!(end, PlaybackState::Playing);
}

#[test]
fn frame_times_cover_whole_duration() {
    let times = frame_times(&spec(5000, 30));
    assert_eq!(times.len(), 151);
    assert_eq!(times[0], 0.0);
    assert_eq!(times[times.len() - 1], 5000.0);
    assert!(times.windows(2).all(|w| w[0] < w[1]));

    let times = frame_times(&spec(1000, 1));
    assert_eq!(times, vec![0.0, 1000.0]);
}
