use std::fs::File;
use std::io::BufReader;

use chrono::{DateTime, Utc};
use image::AnimationDecoder as _;
use image::codecs::gif::GifDecoder;

use countdown_gif::{RecordingSurface, RenderPlan, RenderRequest};

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2030-06-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn decode(path: &std::path::Path) -> Vec<image::Frame> {
    let decoder = GifDecoder::new(BufReader::new(File::open(path).unwrap())).unwrap();
    decoder.into_frames().collect_frames().unwrap()
}

fn write(req: &RenderRequest, dir: &std::path::Path) -> countdown_gif::RenderOutcome {
    let plan = RenderPlan::prepare(req, now()).unwrap();
    let mut surface = RecordingSurface::new(plan.config.width, plan.config.height);
    plan.write_gif(&mut surface, dir).unwrap()
}

#[test]
fn gif_has_requested_frames_at_one_second_each() {
    let dir = tempfile::tempdir().unwrap();
    let req = RenderRequest {
        frames: Some(4),
        ..RenderRequest::new("2030-06-02T12:00:00Z")
    };
    let outcome = write(&req, dir.path());
    assert_eq!(outcome.frames, 4);

    let frames = decode(&outcome.path);
    assert_eq!(frames.len(), 4);
    for frame in &frames {
        assert_eq!(frame.delay().numer_denom_ms(), (1000, 1));
        assert_eq!(frame.buffer().dimensions(), (1000, 300));
    }
}

#[test]
fn passed_date_gif_has_single_frame() {
    let dir = tempfile::tempdir().unwrap();
    let req = RenderRequest {
        frames: Some(30),
        ..RenderRequest::new("2001-01-01")
    };
    let outcome = write(&req, dir.path());
    assert_eq!(decode(&outcome.path).len(), 1);
}

#[test]
fn dimensions_are_zoomed_and_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let req = RenderRequest {
        width: Some(9999),
        height: Some(10),
        frames: Some(1),
        ..RenderRequest::new("2030-06-03")
    };
    let outcome = write(&req, dir.path());
    let frames = decode(&outcome.path);
    assert_eq!(frames[0].buffer().dimensions(), (1000, 300));
}

#[test]
fn background_color_reaches_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let req = RenderRequest {
        background_color: Some("#102030".to_owned()),
        frames: Some(1),
        ..RenderRequest::new("2030-06-03")
    };
    let outcome = write(&req, dir.path());
    let frames = decode(&outcome.path);
    assert_eq!(frames[0].buffer().get_pixel(5, 5).0, [0x10, 0x20, 0x30, 255]);
}

#[test]
fn same_name_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(
        &RenderRequest {
            frames: Some(5),
            ..RenderRequest::new("2030-06-03")
        },
        dir.path(),
    );
    let second = write(
        &RenderRequest {
            frames: Some(2),
            ..RenderRequest::new("2030-06-03")
        },
        dir.path(),
    );
    assert_eq!(first.path, second.path);
    assert_eq!(decode(&second.path).len(), 2);
}

#[test]
fn rasterized_gif_shows_ink_in_every_column() {
    let Ok(fonts) = countdown_gif::FontLibrary::system_shared() else {
        eprintln!("skipping: no system fonts");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let req = RenderRequest {
        frames: Some(200),
        ..RenderRequest::new("2030-06-03T12:00:00Z")
    };
    let outcome = countdown_gif::render_countdown(&req, &fonts, dir.path(), now()).unwrap();
    assert_eq!(outcome.frames, 90);

    let frames = decode(&outcome.path);
    assert_eq!(frames.len(), 90);

    let first = frames[0].buffer();
    let background = first.get_pixel(2, 2).0;
    assert_eq!(background, [0xf8, 0xf4, 0xef, 255]);

    let columns = countdown_gif::render::layout::columns(first.height());
    let inked = |x0: f64, x1: f64, y0: f64, y1: f64| {
        (x0 as u32..x1 as u32).any(|x| {
            (y0 as u32..y1 as u32).any(|y| first.get_pixel(x, y).0[0] < 0x80)
        })
    };
    for col in columns {
        let (left, right) = (col.x - 90.0, col.x + 90.0);
        assert!(
            inked(left, right, col.digits_y - 40.0, col.digits_y + 40.0),
            "no digits around x={}",
            col.x
        );
        assert!(
            inked(left, right, col.label_y - 10.0, col.label_y + 10.0),
            "no label around x={}",
            col.x
        );
    }
    // Gaps between columns stay clear of digits.
    assert!(!inked(255.0, 270.0, 100.0, 160.0));
}
