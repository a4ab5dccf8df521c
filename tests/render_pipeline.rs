use countdown_gif::render::surface::DrawCall;
use countdown_gif::{
    CountdownDuration, InMemorySink, RecordingSurface, RenderConfig, RenderRequest, TimeResult,
    render_frames,
};

fn counters(surface: &RecordingSurface, frame: usize) -> Vec<String> {
    surface.frames()[frame]
        .iter()
        .filter_map(|call| match call {
            DrawCall::FillText {
                text,
                max_width: Some(_),
                ..
            } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn run(seconds: i64, frames: i64) -> (RecordingSurface, InMemorySink) {
    let cfg = RenderConfig::from_request(&RenderRequest {
        frames: Some(frames),
        ..RenderRequest::new("2030-01-01")
    })
    .unwrap();
    let mut surface = RecordingSurface::new(cfg.width, cfg.height);
    let mut sink = InMemorySink::new();
    render_frames(
        &cfg,
        TimeResult::Remaining(CountdownDuration::from_secs(seconds)),
        &mut surface,
        &mut sink,
    )
    .unwrap();
    (surface, sink)
}

#[test]
fn carries_across_every_unit_boundary() {
    // 1 day, 0 h, 0 min, 1 s: the second frame is exactly one day, the third rolls every unit.
    let (surface, sink) = run(86_401, 3);
    assert!(sink.is_ended());
    assert_eq!(counters(&surface, 0), ["01", "00", "00", "01"]);
    assert_eq!(counters(&surface, 1), ["01", "00", "00", "00"]);
    assert_eq!(counters(&surface, 2), ["00", "23", "59", "59"]);
}

#[test]
fn days_beyond_two_digits_are_not_truncated() {
    let (surface, _) = run(123 * 86_400, 1);
    assert_eq!(counters(&surface, 0), ["123", "00", "00", "00"]);
}

#[test]
fn full_ninety_frame_run() {
    let (surface, sink) = run(3_600, 90);
    assert_eq!(sink.frames().len(), 90);
    assert_eq!(counters(&surface, 0), ["00", "01", "00", "00"]);
    assert_eq!(counters(&surface, 89), ["00", "00", "58", "31"]);
}
