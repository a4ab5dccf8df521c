//! One render request, from raw parameters to a finished GIF on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::{RenderConfig, RenderRequest};
use crate::encode::gif::{GifSink, GifSinkOpts};
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::render::canvas::Canvas;
use crate::render::countdown::{draw_countdown, draw_passed, render_frames};
use crate::render::surface::{DrawSurface, FrameRGBA};
use crate::text::fonts::FontLibrary;
use crate::time::target::{TimeResult, evaluate};

/// A finished render. The file at `path` is complete and synced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutcome {
    pub path: PathBuf,
    pub frames: u32,
    pub bytes: u64,
}

/// A validated request, ready to draw. Building one performs no I/O.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderPlan {
    pub config: RenderConfig,
    pub time: TimeResult,
}

impl RenderPlan {
    pub fn prepare(request: &RenderRequest, now: DateTime<Utc>) -> CountdownResult<Self> {
        let target = request.target_time()?;
        let config = RenderConfig::from_request(request)?;
        let time = evaluate(target, now)?;
        Ok(Self { config, time })
    }

    pub fn output_path(&self, scratch_dir: &Path) -> PathBuf {
        scratch_dir.join(self.config.file_name())
    }

    /// Render every frame onto `surface` and write the GIF into `scratch_dir`.
    pub fn write_gif<S: DrawSurface + ?Sized>(
        self,
        surface: &mut S,
        scratch_dir: &Path,
    ) -> CountdownResult<RenderOutcome> {
        std::fs::create_dir_all(scratch_dir)
            .map_err(|e| CountdownError::filesystem(scratch_dir, e))?;

        let path = self.output_path(scratch_dir);
        let mut sink = GifSink::create(GifSinkOpts::new(&path))?;
        let stats = render_frames(&self.config, self.time, surface, &mut sink)?;

        let bytes = std::fs::metadata(&path)
            .map_err(|e| CountdownError::filesystem(&path, e))?
            .len();
        Ok(RenderOutcome {
            path,
            frames: stats.frames,
            bytes,
        })
    }

    /// Draw only the first frame and return its pixels.
    pub fn preview<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> CountdownResult<FrameRGBA> {
        match &self.time {
            TimeResult::Passed(message) => draw_passed(&self.config, message, surface)?,
            TimeResult::Remaining(remaining) => {
                draw_countdown(&self.config, remaining.components(), surface)?
            }
        }
        surface.snapshot()
    }
}

/// Validate `request`, render it with `fonts` and write `{scratch_dir}/{name}.gif`.
///
/// Validation errors are returned before anything touches the filesystem. When this returns
/// `Ok`, the file is fully written.
#[tracing::instrument(skip(fonts), fields(name = request.output_name()))]
pub fn render_countdown(
    request: &RenderRequest,
    fonts: &FontLibrary,
    scratch_dir: &Path,
    now: DateTime<Utc>,
) -> CountdownResult<RenderOutcome> {
    let plan = RenderPlan::prepare(request, now)?;
    let mut canvas = Canvas::new(plan.config.width, plan.config.height, fonts)?;
    let outcome = plan.write_gif(&mut canvas, scratch_dir)?;
    tracing::info!(
        path = %outcome.path.display(),
        frames = outcome.frames,
        bytes = outcome.bytes,
        "countdown rendered"
    );
    Ok(outcome)
}

/// Validate `request` and rasterize its first frame.
pub fn render_preview_frame(
    request: &RenderRequest,
    fonts: &FontLibrary,
    now: DateTime<Utc>,
) -> CountdownResult<FrameRGBA> {
    let plan = RenderPlan::prepare(request, now)?;
    let mut canvas = Canvas::new(plan.config.width, plan.config.height, fonts)?;
    plan.preview(&mut canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::RecordingSurface;
    use crate::time::target::PASSED_MESSAGE;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2030-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn digits(surface: &RecordingSurface) -> Vec<&str> {
        surface
            .texts(0)
            .into_iter()
            .filter(|t| t.chars().all(|c| c.is_ascii_digit()))
            .collect()
    }

    #[test]
    fn missing_time_fails_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("scratch");
        let err = RenderPlan::prepare(&RenderRequest::default(), now()).unwrap_err();
        assert!(err.is_validation());
        assert!(!scratch.exists());
    }

    #[test]
    fn unparsable_time_is_a_validation_error() {
        let err = RenderPlan::prepare(&RenderRequest::new("next tuesday"), now()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn plan_writes_gif_into_scratch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("nested").join("tmp");
        let req = RenderRequest {
            name: Some("launch".to_owned()),
            frames: Some(3),
            ..RenderRequest::new("2030-01-01T00:01:30Z")
        };
        let plan = RenderPlan::prepare(&req, now()).unwrap();
        let mut surface = RecordingSurface::new(plan.config.width, plan.config.height);
        let outcome = plan.write_gif(&mut surface, &scratch).unwrap();

        assert_eq!(outcome.path, scratch.join("launch.gif"));
        assert_eq!(outcome.frames, 3);
        assert_eq!(
            outcome.bytes,
            std::fs::metadata(&outcome.path).unwrap().len()
        );
        assert_eq!(digits(&surface), ["00", "00", "01", "30"]);
    }

    #[test]
    fn passed_target_yields_single_frame() {
        let dir = tempfile::tempdir().unwrap();
        let plan = RenderPlan::prepare(&RenderRequest::new("2020-01-01"), now()).unwrap();
        assert!(plan.time.is_passed());
        let mut surface = RecordingSurface::new(plan.config.width, plan.config.height);
        let outcome = plan.write_gif(&mut surface, dir.path()).unwrap();
        assert_eq!(outcome.frames, 1);
        assert_eq!(surface.texts(0), vec![PASSED_MESSAGE]);
    }

    #[test]
    fn preview_draws_first_frame_only() {
        let plan = RenderPlan::prepare(&RenderRequest::new("2030-01-03T00:00:00Z"), now()).unwrap();
        let mut surface = RecordingSurface::new(plan.config.width, plan.config.height);
        let frame = plan.preview(&mut surface).unwrap();
        assert_eq!(frame.width, 1000);
        assert_eq!(surface.frames().len(), 1);
        assert_eq!(digits(&surface), ["02", "00", "00", "00"]);
    }

    #[test]
    fn unwritable_scratch_dir_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let plan = RenderPlan::prepare(&RenderRequest::new("2030-02-01"), now()).unwrap();
        let mut surface = RecordingSurface::new(plan.config.width, plan.config.height);
        let err = plan.write_gif(&mut surface, &blocker.join("sub")).unwrap_err();
        assert!(matches!(err, CountdownError::Filesystem { .. }));
    }
}
