//! Frame sinks: where rendered frames go.

pub mod gif;
pub mod sink;
