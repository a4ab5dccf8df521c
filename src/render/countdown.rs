use crate::config::RenderConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::error::CountdownResult;
use crate::render::layout::{self, DIGIT_FONT, LABEL_FONT, LABEL_SPACING, LABELS};
use crate::render::surface::DrawSurface;
use crate::time::countdown::TimeComponents;
use crate::time::target::TimeResult;
use crate::text::spacing::{TextAlign, fill_text_with_spacing};

/// Playback delay of every frame: one real second per countdown second.
pub const FRAME_DELAY_MS: u32 = 1_000;

/// Counters of a finished frame loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames: u32,
}

/// Draw every frame of the countdown onto `surface` and stream them into `sink`.
///
/// A passed target produces exactly one frame with the sentinel message; otherwise
/// `config.frame_count` frames are produced, each one second earlier than the last.
#[tracing::instrument(skip_all, fields(frames = config.frame_count, passed = time.is_passed()))]
pub fn render_frames<S, K>(
    config: &RenderConfig,
    time: TimeResult,
    surface: &mut S,
    sink: &mut K,
) -> CountdownResult<RenderStats>
where
    S: DrawSurface + ?Sized,
    K: FrameSink + ?Sized,
{
    sink.begin(SinkConfig {
        width: surface.width(),
        height: surface.height(),
        delay_ms: FRAME_DELAY_MS,
    })?;

    let mut stats = RenderStats::default();
    match time {
        TimeResult::Passed(message) => {
            draw_passed(config, &message, surface)?;
            sink.push_frame(0, &surface.snapshot()?)?;
            stats.frames = 1;
        }
        TimeResult::Remaining(mut remaining) => {
            for idx in 0..config.frame_count {
                let components = remaining.components();
                tracing::debug!(idx, ?components, "frame");
                draw_countdown(config, components, surface)?;
                sink.push_frame(idx, &surface.snapshot()?)?;
                stats.frames += 1;
                remaining.subtract_second();
            }
        }
    }

    sink.end()?;
    Ok(stats)
}

fn paint_background<S: DrawSurface + ?Sized>(
    config: &RenderConfig,
    surface: &mut S,
) -> CountdownResult<()> {
    surface.set_fill(config.background_color);
    surface.fill_rect(
        0.0,
        0.0,
        f64::from(surface.width()),
        f64::from(surface.height()),
    )
}

/// Background plus the sentinel message centered on the canvas.
pub fn draw_passed<S: DrawSurface + ?Sized>(
    config: &RenderConfig,
    message: &str,
    surface: &mut S,
) -> CountdownResult<()> {
    paint_background(config, surface)?;
    surface.set_fill(config.text_color);
    surface.set_font(DIGIT_FONT);
    surface.set_text_align(TextAlign::Center);
    surface.fill_text(
        message,
        f64::from(surface.width()) / 2.0,
        f64::from(surface.height()) / 2.0,
    )
}

/// Background plus four counters with their spaced labels.
pub fn draw_countdown<S: DrawSurface + ?Sized>(
    config: &RenderConfig,
    components: TimeComponents,
    surface: &mut S,
) -> CountdownResult<()> {
    paint_background(config, surface)?;
    surface.set_fill(config.text_color);
    surface.set_text_align(TextAlign::Center);

    let columns = layout::columns(surface.height());
    for ((value, label), col) in components.padded().iter().zip(LABELS).zip(columns) {
        surface.set_font(DIGIT_FONT);
        surface.fill_text_max_width(value, col.x, col.digits_y, layout::BIG_CELL_WIDTH)?;

        surface.set_font(LABEL_FONT);
        fill_text_with_spacing(surface, label, col.x, col.label_y, LABEL_SPACING)?;
    }
    Ok(())
}
