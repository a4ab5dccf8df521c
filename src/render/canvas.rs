use vello_cpu::kurbo::{Affine, Rect};

use crate::foundation::color::Rgb8;
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::render::surface::{DrawSurface, FontSpec, FrameRGBA};
use crate::text::engine::TextLayoutEngine;
use crate::text::fonts::{FaceKind, FontLibrary};
use crate::text::spacing::{TextAlign, TextSurface};

/// CPU raster surface backed by `vello_cpu`, with text shaped by Parley.
///
/// One canvas serves one render; frames are produced by drawing and then calling
/// [`DrawSurface::snapshot`].
pub struct Canvas {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: TextLayoutEngine,
    fill: Rgb8,
    font: FontSpec,
    align: TextAlign,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fonts: &FontLibrary) -> CountdownResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| CountdownError::validation("canvas width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| CountdownError::validation("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(CountdownError::validation(
                "canvas width/height must be non-zero",
            ));
        }

        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            text: TextLayoutEngine::new(fonts)?,
            fill: Rgb8::default(),
            font: FontSpec::new(FaceKind::Regular, 10.0),
            align: TextAlign::Start,
        })
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> CountdownResult<()> {
        let layout = self
            .text
            .layout(self.font.face, text, self.font.size_px, self.fill)?;
        let width = f64::from(layout.width());
        let height = f64::from(layout.height());

        let scale_x = match max_width {
            Some(max) if width > max && width > 0.0 => (max / width).max(0.0),
            _ => 1.0,
        };
        let drawn = width * scale_x;
        let left = match self.align {
            TextAlign::Start => x,
            TextAlign::Center => x - drawn / 2.0,
            TextAlign::End => x - drawn,
        };
        let top = y - height / 2.0;

        let font = self.text.font_data(self.font.face).clone();
        self.ctx.set_paint_transform(Affine::IDENTITY);
        self.ctx
            .set_transform(Affine::translate((left, top)) * Affine::scale_non_uniform(scale_x, 1.0));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, 255,
                ));

                // Absolute x within the line, y on the run's baseline.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        Ok(())
    }
}

impl TextSurface for Canvas {
    fn measure_text(&mut self, text: &str) -> CountdownResult<f64> {
        self.text.measure(self.font.face, text, self.font.size_px)
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> CountdownResult<()> {
        self.draw_text(text, x, y, None)
    }

    fn text_align(&self) -> TextAlign {
        self.align
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }
}

impl DrawSurface for Canvas {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn set_fill(&mut self, color: Rgb8) {
        self.fill = color;
    }

    fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> CountdownResult<()> {
        self.ctx.set_transform(Affine::IDENTITY);
        self.ctx.set_paint_transform(Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            self.fill.r,
            self.fill.g,
            self.fill.b,
            255,
        ));
        self.ctx.fill_rect(&Rect::new(x, y, x + w, y + h));
        Ok(())
    }

    fn fill_text_max_width(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: f64,
    ) -> CountdownResult<()> {
        self.draw_text(text, x, y, Some(max_width))
    }

    fn snapshot(&mut self) -> CountdownResult<FrameRGBA> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx.reset();

        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}
