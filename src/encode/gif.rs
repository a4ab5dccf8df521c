use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::render::surface::FrameRGBA;

/// NeuQuant sampling speed used when quantizing frames (1 = best, 30 = fastest).
pub const DEFAULT_QUANTIZE_SPEED: i32 = 10;

#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    pub out_path: PathBuf,
    pub speed: i32,
}

impl GifSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            speed: DEFAULT_QUANTIZE_SPEED,
        }
    }
}

/// Streams frames into an infinitely looping animated GIF file.
///
/// Frames are expected to be opaque (every render paints its background first). Alpha is
/// dropped, so the file never contains transparent pixels.
///
/// The output file is created by [`GifSink::create`]; [`FrameSink::end`] flushes and syncs it.
pub struct GifSink {
    opts: GifSinkOpts,
    file: Option<BufWriter<File>>,
    encoder: Option<gif::Encoder<BufWriter<File>>>,
    cfg: Option<(u16, u16, u16)>,
    scratch: Vec<u8>,
}

impl GifSink {
    pub fn create(opts: GifSinkOpts) -> CountdownResult<Self> {
        let file = File::create(&opts.out_path)
            .map_err(|e| CountdownError::filesystem(&opts.out_path, e))?;
        Ok(Self {
            opts,
            file: Some(BufWriter::new(file)),
            encoder: None,
            cfg: None,
            scratch: Vec::new(),
        })
    }

    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> CountdownResult<()> {
        let width: u16 = cfg
            .width
            .try_into()
            .map_err(|_| CountdownError::encode("gif width exceeds u16"))?;
        let height: u16 = cfg
            .height
            .try_into()
            .map_err(|_| CountdownError::encode("gif height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(CountdownError::encode("gif width/height must be non-zero"));
        }
        let delay_cs = u16::try_from(cfg.delay_ms.div_ceil(10))
            .map_err(|_| CountdownError::encode("gif frame delay is too long"))?;

        let writer = self
            .file
            .take()
            .ok_or_else(|| CountdownError::encode("gif sink already started"))?;
        let mut encoder = gif::Encoder::new(writer, width, height, &[])
            .map_err(|e| CountdownError::encode(format!("gif header: {e}")))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| CountdownError::encode(format!("gif repeat: {e}")))?;

        tracing::debug!(width, height, delay_cs, path = %self.opts.out_path.display(), "gif begin");
        self.encoder = Some(encoder);
        self.cfg = Some((width, height, delay_cs));
        Ok(())
    }

    fn push_frame(&mut self, idx: u32, frame: &FrameRGBA) -> CountdownResult<()> {
        let (width, height, delay_cs) = self
            .cfg
            .ok_or_else(|| CountdownError::encode("gif sink: push_frame before begin"))?;
        if frame.width != u32::from(width) || frame.height != u32::from(height) {
            return Err(CountdownError::encode(format!(
                "frame {idx} is {}x{}, expected {width}x{height}",
                frame.width, frame.height
            )));
        }

        self.scratch.clear();
        self.scratch.extend_from_slice(&frame.data);
        for px in self.scratch.chunks_exact_mut(4) {
            px[3] = 255;
        }

        let mut gif_frame =
            gif::Frame::from_rgba_speed(width, height, &mut self.scratch, self.opts.speed);
        gif_frame.delay = delay_cs;

        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| CountdownError::encode("gif sink: encoder missing"))?;
        encoder
            .write_frame(&gif_frame)
            .map_err(|e| CountdownError::encode(format!("gif frame {idx}: {e}")))
    }

    fn end(&mut self) -> CountdownResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| CountdownError::encode("gif sink: end before begin"))?;
        let path = &self.opts.out_path;
        let writer = encoder
            .into_inner()
            .map_err(|e| CountdownError::filesystem(path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| CountdownError::filesystem(path, e.into_error()))?;
        file.sync_all()
            .map_err(|e| CountdownError::filesystem(path, e))?;
        self.cfg = None;
        Ok(())
    }
}
