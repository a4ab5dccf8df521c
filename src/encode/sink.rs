use crate::foundation::error::CountdownResult;
use crate::render::surface::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Display time of each frame.
    pub delay_ms: u32,
}

/// Sink contract for consuming rendered frames in order.
///
/// `push_frame` is called with strictly increasing indices between one `begin` and one `end`.
/// A sink must have made its output durable by the time `end` returns.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CountdownResult<()>;
    /// Push one rendered frame. `idx` starts at zero.
    fn push_frame(&mut self, idx: u32, frame: &FrameRGBA) -> CountdownResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> CountdownResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u32, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Frames pushed since the last `begin`, with their indices.
    pub fn frames(&self) -> &[(u32, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CountdownResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u32, frame: &FrameRGBA) -> CountdownResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CountdownResult<()> {
        self.ended = true;
        Ok(())
    }
}
