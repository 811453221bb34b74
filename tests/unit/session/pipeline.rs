use super::*;
use crate::foundation::core::Complex64;
use crate::foundation::progress::CancelToken;
use crate::foundation::threading::Threading;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn small_cfg() -> AnimationConfig {
    AnimationConfig {
        image_size: 48,
        point_radius: 0.05,
        frame_duration_ms: 20,
        final_hold_ms: 1000,
        ..AnimationConfig::default()
    }
}

fn triangle() -> Spectrum {
    Spectrum::analyze(&[c(0.5, 0.0), c(-0.25, 0.4), c(-0.25, -0.4)]).unwrap()
}

#[test]
fn durations_hold_the_last_frame() {
    let cfg = small_cfg();
    assert_eq!(frame_durations(3, &cfg), vec![20, 20, 20, 1000]);
    assert_eq!(frame_durations(0, &cfg), vec![1000]);
}

#[test]
fn sequential_run_emits_n_plus_one_frames() {
    let s = triangle();
    let cfg = small_cfg();
    let mut sink = InMemorySink::new();
    let stats = render_animation(&s, &cfg, &mut sink, RunHooks::none()).unwrap();

    assert_eq!(stats.timesteps, 3);
    assert_eq!(stats.frames_emitted, 4);
    assert_eq!(stats.chunks, 0);
    assert!(sink.is_finished());
    assert_eq!(sink.durations_ms(), frame_durations(3, &cfg));

    let frames = sink.frames();
    assert!(frames[..3].iter().all(|(m, _)| !m.is_final));
    assert!(frames[3].0.is_final);
}

#[test]
fn last_frame_is_the_accumulated_trace() {
    let s = triangle();
    let cfg = small_cfg();
    let anim = render_frames(&s, &cfg).unwrap();

    let mut synth = FrameSynthesizer::new(cfg.synth_params()).unwrap();
    let mut trace = synth.blank_trace();
    for t in 0..3 {
        trace = synth
            .advance_trace(s.reconstruct(Timestep(t)), trace)
            .unwrap();
    }
    assert_eq!(anim.frames.last(), Some(trace.frame()));
}

#[test]
fn parallel_matches_sequential() {
    let points: Vec<_> = (0..11)
        .map(|i| {
            let a = i as f64 * 0.57;
            c(0.6 * a.cos(), 0.4 * (2.0 * a).sin())
        })
        .collect();
    let s = Spectrum::analyze(&points).unwrap();
    let seq = render_frames(&s, &small_cfg()).unwrap();

    let par_cfg = AnimationConfig {
        threading: Threading {
            parallel: true,
            chunk_size: 4,
            threads: Some(3),
        },
        ..small_cfg()
    };
    let mut sink = InMemorySink::new();
    let stats = render_animation(&s, &par_cfg, &mut sink, RunHooks::none()).unwrap();
    assert_eq!(stats.chunks, 3);

    let par: Vec<_> = sink.into_frames().into_iter().map(|(_, f)| f).collect();
    assert_eq!(par.len(), seq.frames.len());
    for (i, (a, b)) in par.iter().zip(&seq.frames).enumerate() {
        assert!(a == b, "frame {i} differs");
    }
}

#[test]
fn single_point_gives_two_frames() {
    let s = Spectrum::analyze(&[c(0.3, -0.2)]).unwrap();
    let anim = render_frames(&s, &small_cfg()).unwrap();
    assert_eq!(anim.frames.len(), 2);
    assert_eq!(anim.durations_ms, vec![20, 1000]);
}

#[test]
fn single_frame_matches_the_animation() {
    let s = triangle();
    let cfg = small_cfg();
    let anim = render_frames(&s, &cfg).unwrap();
    for t in 0..3 {
        let frame = render_single_frame(&s, &cfg, Timestep(t)).unwrap();
        assert!(frame == anim.frames[t as usize], "timestep {t}");
    }
    assert!(render_single_frame(&s, &cfg, Timestep(3)).is_err());
}

#[test]
fn cancelled_run_stops_before_the_sink_finishes() {
    let s = triangle();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut sink = InMemorySink::new();
    let err = render_animation(
        &s,
        &small_cfg(),
        &mut sink,
        RunHooks::none().with_cancel(&cancel),
    )
    .unwrap_err();
    assert!(err.is_cancelled());
    assert!(!sink.is_finished());
    assert!(sink.frames().is_empty());
}

#[test]
fn invalid_config_is_rejected_before_begin() {
    let s = triangle();
    let cfg = AnimationConfig {
        image_size: 0,
        ..small_cfg()
    };
    let mut sink = InMemorySink::new();
    assert!(render_animation(&s, &cfg, &mut sink, RunHooks::none()).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn empty_spectrum_is_rejected_before_begin() {
    let empty = Spectrum::unchecked(Vec::new());
    let cfg = small_cfg();
    let mut sink = InMemorySink::new();
    let err = render_animation(&empty, &cfg, &mut sink, RunHooks::none()).unwrap_err();
    assert!(matches!(err, EpicycleError::Validation(_)), "{err}");
    assert!(sink.config().is_none());

    let err = render_single_frame(&empty, &cfg, Timestep(0)).unwrap_err();
    assert!(matches!(err, EpicycleError::Validation(_)), "{err}");
}
