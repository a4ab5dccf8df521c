//! Fonts, shaping and letter-spaced text placement.

pub mod engine;
pub mod fonts;
pub mod spacing;
