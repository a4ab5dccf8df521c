#![forbid(unsafe_code)]

//! Animated countdown GIFs: days, hours, minutes and seconds until a target time, one frame per
//! second, rendered on the CPU and served over HTTP.

pub mod config;
pub mod encode;
pub mod foundation;
pub mod render;
pub mod server;
pub mod session;
pub mod text;
pub mod time;

pub use config::{RenderConfig, RenderRequest};
pub use encode::gif::{GifSink, GifSinkOpts};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::color::Rgb8;
pub use foundation::error::{CountdownError, CountdownResult};
pub use render::canvas::Canvas;
pub use render::countdown::{RenderStats, render_frames};
pub use render::surface::{DrawSurface, FrameRGBA, RecordingSurface};
pub use session::{RenderOutcome, RenderPlan, render_countdown, render_preview_frame};
pub use text::fonts::{FontLibrary, FontOptions};
pub use time::countdown::{CountdownDuration, TimeComponents};
pub use time::target::{PASSED_MESSAGE, TimeResult, evaluate};
