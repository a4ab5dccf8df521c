//! Render parameters: raw caller input and the clamped configuration a render runs with.

use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb8;
use crate::foundation::error::{CountdownError, CountdownResult};

/// Internal resolution multiplier applied to every linear dimension.
pub const ZOOM_FACTOR: u32 = 2;

pub const DEFAULT_WIDTH: i64 = 500;
pub const DEFAULT_HEIGHT: i64 = 150;
pub const DEFAULT_FRAMES: i64 = 15;
pub const DEFAULT_TEXT_COLOR: &str = "2B2B2C";
pub const DEFAULT_BACKGROUND_COLOR: &str = "F8F4EF";
pub const DEFAULT_OUTPUT_NAME: &str = "countdown";

/// Bounds for the raw (pre-zoom) width and height.
pub const MIN_DIMENSION: i64 = 150;
pub const MAX_DIMENSION: i64 = 500;

pub const MIN_FRAMES: i64 = 1;
pub const MAX_FRAMES: i64 = 90;

const MAX_OUTPUT_NAME_LEN: usize = 128;

/// Raw render parameters as a caller (query string, CLI) supplies them.
///
/// Every field is optional; [`RenderConfig::from_request`] fills defaults and clamps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Target date/time. Required.
    pub time: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// Text color as `RRGGBB`.
    #[serde(rename = "color")]
    pub text_color: Option<String>,
    /// Background color as `RRGGBB`.
    #[serde(rename = "bg")]
    pub background_color: Option<String>,
    /// Output file stem inside the scratch directory.
    pub name: Option<String>,
    pub frames: Option<i64>,
}

impl RenderRequest {
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            time: Some(time.into()),
            ..Self::default()
        }
    }

    /// The required target time, or a validation error when it is absent.
    pub fn target_time(&self) -> CountdownResult<&str> {
        match self.time.as_deref() {
            Some(t) if !t.trim().is_empty() => Ok(t),
            _ => Err(CountdownError::validation("Time parameter is required.")),
        }
    }

    pub fn output_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME)
    }
}

/// Validated, clamped render configuration. Dimensions are post-zoom pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    pub background_color: Rgb8,
    pub text_color: Rgb8,
    pub output_name: String,
}

impl RenderConfig {
    pub fn from_request(req: &RenderRequest) -> CountdownResult<Self> {
        let text_color = Rgb8::from_hex(req.text_color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR))?;
        let background_color = Rgb8::from_hex(
            req.background_color
                .as_deref()
                .unwrap_or(DEFAULT_BACKGROUND_COLOR),
        )?;
        let output_name = validate_output_name(req.output_name())?.to_owned();

        Ok(Self {
            width: clamp_dimension(req.width.unwrap_or(DEFAULT_WIDTH)),
            height: clamp_dimension(req.height.unwrap_or(DEFAULT_HEIGHT)),
            frame_count: clamp_frames(req.frames.unwrap_or(DEFAULT_FRAMES)),
            background_color,
            text_color,
            output_name,
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}.gif", self.output_name)
    }
}

/// Zoom a raw dimension and clamp it into `[MIN_DIMENSION, MAX_DIMENSION] * ZOOM_FACTOR`.
pub fn clamp_dimension(raw: i64) -> u32 {
    let zoom = i64::from(ZOOM_FACTOR);
    raw.saturating_mul(zoom)
        .clamp(MIN_DIMENSION * zoom, MAX_DIMENSION * zoom) as u32
}

pub fn clamp_frames(raw: i64) -> u32 {
    raw.clamp(MIN_FRAMES, MAX_FRAMES) as u32
}

/// Output names become file names, so only a conservative character set is allowed and they
/// may not start with `.` (no hidden files, no `..`).
pub fn validate_output_name(name: &str) -> CountdownResult<&str> {
    if name.is_empty() {
        return Err(CountdownError::validation("output name must be non-empty"));
    }
    if name.len() > MAX_OUTPUT_NAME_LEN {
        return Err(CountdownError::validation(format!(
            "output name must be at most {MAX_OUTPUT_NAME_LEN} characters"
        )));
    }
    if name.starts_with('.') {
        return Err(CountdownError::validation(
            "output name must not start with '.'",
        ));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(CountdownError::validation(format!(
            "output name contains invalid character {bad:?}"
        )));
    }
    Ok(name)
}
