//! Drawing surfaces and the countdown frame loop.

pub mod canvas;
pub mod countdown;
pub mod layout;
pub mod surface;
