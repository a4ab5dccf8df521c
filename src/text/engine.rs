use std::collections::HashMap;

use crate::foundation::color::Rgb8;
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::text::fonts::{FaceKind, FontLibrary, register_family};

/// Shaping context for a single face.
///
/// Each face gets its own collection holding only that face, so selecting by family name can
/// never resolve to a sibling weight whose glyph ids differ.
struct FaceContext {
    font_ctx: parley::FontContext,
    family: String,
    glyphs: vello_cpu::peniko::FontData,
}

/// Per-render helper for shaping and measuring text with the library's display faces.
pub struct TextLayoutEngine {
    regular: FaceContext,
    semibold: FaceContext,
    layout_ctx: parley::LayoutContext<Rgb8>,
    widths: HashMap<(FaceKind, u32, String), f64>,
}

impl TextLayoutEngine {
    pub fn new(fonts: &FontLibrary) -> CountdownResult<Self> {
        Ok(Self {
            regular: face_context(fonts, FaceKind::Regular)?,
            semibold: face_context(fonts, FaceKind::Semibold)?,
            layout_ctx: parley::LayoutContext::new(),
            widths: HashMap::new(),
        })
    }

    /// Shape and lay out a single line of plain text.
    pub fn layout(
        &mut self,
        face: FaceKind,
        text: &str,
        size_px: f32,
        brush: Rgb8,
    ) -> CountdownResult<parley::Layout<Rgb8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CountdownError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let ctx = match face {
            FaceKind::Regular => &mut self.regular,
            FaceKind::Semibold => &mut self.semibold,
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut ctx.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(ctx.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgb8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Advance width of `text` in pixels. Results are memoized per face and size.
    pub fn measure(&mut self, face: FaceKind, text: &str, size_px: f32) -> CountdownResult<f64> {
        let key = (face, size_px.to_bits(), text.to_owned());
        if let Some(w) = self.widths.get(&key) {
            return Ok(*w);
        }
        let layout = self.layout(face, text, size_px, Rgb8::default())?;
        let w = f64::from(layout.width());
        self.widths.insert(key, w);
        Ok(w)
    }

    pub fn font_data(&self, face: FaceKind) -> &vello_cpu::peniko::FontData {
        match face {
            FaceKind::Regular => &self.regular.glyphs,
            FaceKind::Semibold => &self.semibold.glyphs,
        }
    }
}

fn face_context(fonts: &FontLibrary, kind: FaceKind) -> CountdownResult<FaceContext> {
    let face = fonts.face(kind);
    let mut font_ctx = parley::FontContext::default();
    let family = register_family(&mut font_ctx, face.blob())?;
    Ok(FaceContext {
        font_ctx,
        family,
        glyphs: face.glyphs().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Option<TextLayoutEngine> {
        let fonts = FontLibrary::system_shared().ok()?;
        TextLayoutEngine::new(&fonts).ok()
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let Some(mut e) = engine() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        assert!(e.layout(FaceKind::Regular, "1", 0.0, Rgb8::default()).is_err());
        assert!(e.layout(FaceKind::Regular, "1", f32::NAN, Rgb8::default()).is_err());
    }

    #[test]
    fn widths_grow_with_text_and_size() {
        let Some(mut e) = engine() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        let one = e.measure(FaceKind::Regular, "0", 40.0).unwrap();
        let two = e.measure(FaceKind::Regular, "00", 40.0).unwrap();
        let big = e.measure(FaceKind::Regular, "0", 80.0).unwrap();
        assert!(one > 0.0);
        assert!(two > one);
        assert!(big > one);
        assert_eq!(e.measure(FaceKind::Regular, "0", 40.0).unwrap(), one);
    }

    #[test]
    fn layouts_produce_glyph_runs() {
        let Some(mut e) = engine() else {
            eprintln!("skipping: no system fonts");
            return;
        };
        let layout = e
            .layout(FaceKind::Semibold, "DAYS", 24.0, Rgb8::new(1, 2, 3))
            .unwrap();
        let mut glyphs = 0;
        for line in layout.lines() {
            for item in line.items() {
                if let parley::layout::PositionedLayoutItem::GlyphRun(run) = item {
                    assert_eq!(run.style().brush, Rgb8::new(1, 2, 3));
                    glyphs += run.glyphs().count();
                }
            }
        }
        assert_eq!(glyphs, 4);
    }
}
