use crate::foundation::color::Rgb8;
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::text::fonts::FaceKind;
use crate::text::spacing::{TextAlign, TextSurface};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// A frame filled with one opaque color.
    pub fn solid(width: u32, height: u32, color: Rgb8) -> Self {
        let px = color.to_rgba8();
        let len = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(len * 4);
        for _ in 0..len {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
            premultiplied: false,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Font selection for subsequent text calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub face: FaceKind,
    pub size_px: f32,
}

impl FontSpec {
    pub const fn new(face: FaceKind, size_px: f32) -> Self {
        Self { face, size_px }
    }
}

/// A stateful 2D drawing target, in the manner of an HTML canvas context.
///
/// Text is positioned with a "middle" baseline: `y` is the vertical center of the line.
pub trait DrawSurface: TextSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_fill(&mut self, color: Rgb8);
    fn set_font(&mut self, font: FontSpec);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> CountdownResult<()>;

    /// Like [`TextSurface::fill_text`], squeezing the text horizontally when it is wider than
    /// `max_width`.
    fn fill_text_max_width(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: f64,
    ) -> CountdownResult<()>;

    /// Finish the current frame and return its pixels. The next draw call starts a fresh frame.
    fn snapshot(&mut self) -> CountdownResult<FrameRGBA>;
}

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Rgb8,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: FontSpec,
        color: Rgb8,
        align: TextAlign,
        max_width: Option<f64>,
    },
}

/// Surface that records draw calls instead of rasterizing, for tests and debugging.
///
/// Text is measured as if every character advanced half the font size. Snapshots are solid
/// frames of the first rectangle's color.
#[derive(Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    fill: Rgb8,
    font: FontSpec,
    align: TextAlign,
    pending: Vec<DrawCall>,
    frames: Vec<Vec<DrawCall>>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fill: Rgb8::default(),
            font: FontSpec::new(FaceKind::Regular, 10.0),
            align: TextAlign::Start,
            pending: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Draw calls of each finished frame, in order.
    pub fn frames(&self) -> &[Vec<DrawCall>] {
        &self.frames
    }

    /// Text drawn on frame `idx`, in draw order.
    pub fn texts(&self, idx: usize) -> Vec<&str> {
        self.frames
            .get(idx)
            .into_iter()
            .flatten()
            .filter_map(|c| match c {
                DrawCall::FillText { text, .. } => Some(text.as_str()),
                DrawCall::FillRect { .. } => None,
            })
            .collect()
    }

    fn record_text(&mut self, text: &str, x: f64, y: f64, max_width: Option<f64>) {
        self.pending.push(DrawCall::FillText {
            text: text.to_owned(),
            x,
            y,
            font: self.font,
            color: self.fill,
            align: self.align,
            max_width,
        });
    }
}

impl TextSurface for RecordingSurface {
    fn measure_text(&mut self, text: &str) -> CountdownResult<f64> {
        Ok(text.chars().count() as f64 * f64::from(self.font.size_px) * 0.5)
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> CountdownResult<()> {
        self.record_text(text, x, y, None);
        Ok(())
    }

    fn text_align(&self) -> TextAlign {
        self.align
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_fill(&mut self, color: Rgb8) {
        self.fill = color;
    }

    fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> CountdownResult<()> {
        self.pending.push(DrawCall::FillRect {
            x,
            y,
            w,
            h,
            color: self.fill,
        });
        Ok(())
    }

    fn fill_text_max_width(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: f64,
    ) -> CountdownResult<()> {
        self.record_text(text, x, y, Some(max_width));
        Ok(())
    }

    fn snapshot(&mut self) -> CountdownResult<FrameRGBA> {
        let calls = std::mem::take(&mut self.pending);
        let background = calls
            .iter()
            .find_map(|c| match c {
                DrawCall::FillRect { color, .. } => Some(*color),
                DrawCall::FillText { .. } => None,
            })
            .ok_or_else(|| CountdownError::encode("frame has no background fill"))?;
        self.frames.push(calls);
        Ok(FrameRGBA::solid(self.width, self.height, background))
    }
}
