use super::*;
use crate::foundation::core::{Canvas, Rgba8Premul};

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        frame_count: 2,
        save_last: false,
    }
}

#[test]
fn in_memory_sink_keeps_frames_in_push_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();

    let a = FrameRGBA::solid(Canvas::square(2), Rgba8Premul::opaque(1, 1, 1));
    let b = FrameRGBA::solid(Canvas::square(2), Rgba8Premul::opaque(2, 2, 2));
    sink.push_frame(
        FrameMeta {
            index: 0,
            duration_ms: 20,
            is_final: false,
        },
        &a,
    )
    .unwrap();
    sink.push_frame(
        FrameMeta {
            index: 1,
            duration_ms: 500,
            is_final: true,
        },
        &b,
    )
    .unwrap();
    sink.end().unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(cfg()));
    assert_eq!(sink.durations_ms(), vec![20, 500]);
    let frames = sink.into_frames();
    assert_eq!(frames[0].1, a);
    assert_eq!(frames[1].1, b);
    assert!(frames[1].0.is_final);
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = InMemorySink::new();
    let frame = FrameRGBA::solid(Canvas::square(1), Rgba8Premul::transparent());
    let meta = FrameMeta {
        index: 0,
        duration_ms: 1,
        is_final: false,
    };
    assert!(sink.push_frame(meta, &frame).is_err());
}

#[test]
fn begin_resets_previous_run() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = FrameRGBA::solid(Canvas::square(2), Rgba8Premul::transparent());
    let meta = FrameMeta {
        index: 0,
        duration_ms: 1,
        is_final: false,
    };
    sink.push_frame(meta, &frame).unwrap();
    sink.end().unwrap();

    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}
