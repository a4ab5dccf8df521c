use crate::foundation::error::{CountdownError, CountdownResult};

/// Opaque 8-bit sRGB color.
///
/// Also used as the Parley brush type, so glyph runs carry the color they were shaped with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `RRGGBB` hex string (case-insensitive). A leading `#` is tolerated.
    pub fn from_hex(s: &str) -> CountdownResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> CountdownResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| CountdownError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if s.len() != 6 || !s.is_ascii() {
            return Err(CountdownError::validation(format!(
                "color \"{s}\" must be 6 hex digits (RRGGBB)"
            )));
        }

        Ok(Self {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
        })
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
