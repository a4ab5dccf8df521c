//! Time arithmetic: parsing the target instant and stepping the countdown.

pub mod countdown;
pub mod target;
