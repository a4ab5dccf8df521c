use crate::foundation::error::CountdownResult;

/// Horizontal anchoring of a text run relative to its `x` coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// `x` is the left edge.
    #[default]
    Start,
    /// `x` is the horizontal center.
    Center,
    /// `x` is the right edge.
    End,
}

/// Minimal text API needed to lay out letter-spaced runs.
///
/// Widths are in surface pixels for the surface's current font.
pub trait TextSurface {
    fn measure_text(&mut self, text: &str) -> CountdownResult<f64>;
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> CountdownResult<()>;
    fn text_align(&self) -> TextAlign;
    fn set_text_align(&mut self, align: TextAlign);
}

/// Draw `text` one character at a time with `spacing` extra pixels between neighbours.
///
/// The whole run (natural width plus spacing) is anchored according to the surface's current
/// alignment; characters are placed left to right from there. Pair kerning is preserved by
/// measuring each adjacent pair against its two characters in isolation. The surface alignment
/// is restored before returning, also on error.
///
/// Returns the total width of the run.
pub fn fill_text_with_spacing<S: TextSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f64,
    y: f64,
    spacing: f64,
) -> CountdownResult<f64> {
    let align = surface.text_align();
    surface.set_text_align(TextAlign::Start);
    let out = draw_spaced(surface, text, x, y, spacing, align);
    surface.set_text_align(align);
    out
}

fn draw_spaced<S: TextSurface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f64,
    y: f64,
    spacing: f64,
    align: TextAlign,
) -> CountdownResult<f64> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Ok(0.0);
    }

    let total_width = surface.measure_text(text)? + spacing * (chars.len() - 1) as f64;
    let mut cursor = match align {
        TextAlign::Start => x,
        TextAlign::Center => x - total_width / 2.0,
        TextAlign::End => x - total_width,
    };

    let mut current = chars[0].to_string();
    let mut current_width = surface.measure_text(&current)?;
    for (i, _) in chars.iter().enumerate() {
        surface.fill_text(&current, cursor, y)?;

        let Some(&next) = chars.get(i + 1) else {
            break;
        };
        let next_str = next.to_string();
        let next_width = surface.measure_text(&next_str)?;
        let pair_width = surface.measure_text(&format!("{current}{next_str}"))?;
        let pair_kerning = pair_width - current_width - next_width;

        cursor += current_width + pair_kerning + spacing;
        current = next_str;
        current_width = next_width;
    }

    Ok(total_width)
}
