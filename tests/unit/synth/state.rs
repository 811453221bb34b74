use super::*;
use crate::render::EpicycleStyle;
use crate::synth::frame::SynthParams;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn setup() -> (Spectrum, FrameSynthesizer) {
    let s = Spectrum::analyze(&[c(0.4, 0.1), c(-0.2, 0.5), c(-0.3, -0.3)]).unwrap();
    let synth = FrameSynthesizer::new(SynthParams {
        canvas: Canvas::square(40),
        point_radius: 0.05,
        style: EpicycleStyle::default(),
    })
    .unwrap();
    (s, synth)
}

#[test]
fn step_threads_trace_and_timestep() {
    let (s, mut synth) = setup();
    let state = SynthesisState::new(synth.blank_trace());
    assert_eq!(state.timestep(), Timestep(0));
    assert_eq!(state.last_tip(), None);

    let (_, state) = state.step(&mut synth, &s).unwrap();
    assert_eq!(state.timestep(), Timestep(1));
    assert_eq!(state.last_tip(), Some(s.reconstruct(Timestep(0))));
    assert!(!state.is_complete(&s));
}

#[test]
fn step_matches_direct_synthesis() {
    let (s, mut synth) = setup();
    let (d0, t0) = synth
        .synthesize(&s, Timestep(0), synth.blank_trace())
        .unwrap();
    let (d1, t1) = synth.synthesize(&s, Timestep(1), t0).unwrap();

    let state = SynthesisState::new(synth.blank_trace());
    let (e0, state) = state.step(&mut synth, &s).unwrap();
    let (e1, state) = state.step(&mut synth, &s).unwrap();

    assert_eq!(d0, e0);
    assert_eq!(d1, e1);
    assert_eq!(&t1, state.trace());
}

#[test]
fn advance_produces_the_same_trace_as_step() {
    let (s, mut synth) = setup();
    let mut stepped = SynthesisState::new(synth.blank_trace());
    let mut advanced = SynthesisState::new(synth.blank_trace());
    for _ in 0..3 {
        stepped = stepped.step(&mut synth, &s).unwrap().1;
        advanced = advanced.advance(&mut synth, &s).unwrap();
        assert_eq!(stepped.trace(), advanced.trace());
        assert_eq!(stepped.last_tip(), advanced.last_tip());
    }
    assert!(stepped.is_complete(&s));
}

#[test]
fn stepping_past_the_last_timestep_is_rejected() {
    let (s, mut synth) = setup();
    let mut state = SynthesisState::new(synth.blank_trace());
    for _ in 0..3 {
        state = state.advance(&mut synth, &s).unwrap();
    }
    let err = state.step(&mut synth, &s).unwrap_err();
    assert!(err.to_string().contains("already finished"));
}

#[test]
fn blank_trace_is_background_only() {
    let t = TraceBuffer::blank(Canvas::square(2), Rgba8Premul::opaque(9, 8, 7));
    assert_eq!(t.frame().data, vec![9, 8, 7, 255].repeat(4));
}
