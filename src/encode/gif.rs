use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::encode::sink::{FrameMeta, FrameSink, SinkConfig};
use crate::encode::still::{ensure_parent_dir, write_png};
use crate::foundation::error::{EpicycleError, EpicycleResult};
use crate::render::FrameRGBA;

/// GIF loop policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GifRepeat {
    /// Loop forever.
    Infinite,
    /// Replay the animation this many extra times.
    Finite(u16),
}

impl Default for GifRepeat {
    fn default() -> Self {
        GifRepeat::Finite(1)
    }
}

impl From<GifRepeat> for gif::Repeat {
    fn from(r: GifRepeat) -> Self {
        match r {
            GifRepeat::Infinite => gif::Repeat::Infinite,
            GifRepeat::Finite(n) => gif::Repeat::Finite(n),
        }
    }
}

/// GIF frame delay in whole centiseconds. Sub-centisecond remainders are dropped.
pub(crate) fn delay_centis(duration_ms: u32) -> u16 {
    u16::try_from(duration_ms / 10).unwrap_or(u16::MAX)
}

/// Write the trailer and flush everything buffered, returning the underlying writer.
pub(crate) fn finish_gif<W: Write>(encoder: gif::Encoder<BufWriter<W>>) -> EpicycleResult<W> {
    let buffered = encoder
        .into_inner()
        .map_err(|e| EpicycleError::encode(format!("failed to write gif trailer: {e}")))?;
    buffered
        .into_inner()
        .map_err(|e| EpicycleError::encode(format!("failed to flush gif: {}", e.error())))
}

/// Options for [`GifSink`].
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Animated GIF output path.
    pub out_path: PathBuf,
    /// Where the final still goes when the run asks for one; defaults to `out_path` with a
    /// `.png` extension.
    pub still_path: Option<PathBuf>,
    /// Loop policy written into the GIF header.
    pub repeat: GifRepeat,
    /// NeuQuant speed, 1 (best) ..= 30 (fastest).
    pub speed: i32,
    /// Whether to overwrite `out_path` if it already exists.
    pub overwrite: bool,
}

impl GifSinkOpts {
    /// Defaults for writing to `out_path`: play once, speed 10, overwrite allowed.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            still_path: None,
            repeat: GifRepeat::default(),
            speed: 10,
            overwrite: true,
        }
    }

    /// Check the quantizer speed.
    pub fn validate(&self) -> EpicycleResult<()> {
        if !(1..=30).contains(&self.speed) {
            return Err(EpicycleError::validation("gif speed must be in 1..=30"));
        }
        Ok(())
    }

    /// Resolved still-frame path.
    pub fn still_path(&self) -> PathBuf {
        self.still_path
            .clone()
            .unwrap_or_else(|| self.out_path.with_extension("png"))
    }
}

/// Streaming animated-GIF sink.
///
/// Frames are quantized and written as they arrive; only the encoder state is retained.
pub struct GifSink {
    opts: GifSinkOpts,
    cfg: Option<SinkConfig>,
    encoder: Option<gif::Encoder<BufWriter<File>>>,
    frames_written: u64,
}

impl GifSink {
    /// Validate `opts`. Nothing is written until [`FrameSink::begin`].
    pub fn new(opts: GifSinkOpts) -> EpicycleResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            cfg: None,
            encoder: None,
            frames_written: 0,
        })
    }

    /// Animated GIF output path.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    /// Frames encoded since the last [`FrameSink::begin`].
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> EpicycleResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(EpicycleError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(EpicycleError::validation(
                "gif width/height must fit in 16 bits",
            ));
        }

        let path = &self.opts.out_path;
        if !self.opts.overwrite && path.exists() {
            return Err(EpicycleError::validation(format!(
                "output file '{}' already exists",
                path.display()
            )));
        }
        ensure_parent_dir(path)?;

        let file = File::create(path).map_err(|e| {
            EpicycleError::encode(format!("failed to create '{}': {e}", path.display()))
        })?;
        // Both sides were checked against u16::MAX above.
        let (w, h) = (cfg.width as u16, cfg.height as u16);
        let mut encoder = gif::Encoder::new(BufWriter::new(file), w, h, &[])
            .map_err(|e| EpicycleError::encode(format!("failed to write gif header: {e}")))?;
        encoder
            .set_repeat(self.opts.repeat.into())
            .map_err(|e| EpicycleError::encode(format!("failed to set gif repeat: {e}")))?;

        tracing::debug!(
            path = %path.display(),
            width = cfg.width,
            height = cfg.height,
            frames = cfg.frame_count,
            "gif encoder started"
        );
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, meta: FrameMeta, frame: &FrameRGBA) -> EpicycleResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(EpicycleError::encode("push_frame called before begin"));
        };
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(EpicycleError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if meta.index != self.frames_written {
            return Err(EpicycleError::encode(format!(
                "frame {} pushed out of order (expected {})",
                meta.index, self.frames_written
            )));
        }
        let save_last = cfg.save_last;
        let (width, height) = (cfg.width, cfg.height);

        let Some(encoder) = self.encoder.as_mut() else {
            return Err(EpicycleError::encode("gif encoder is already finalized"));
        };
        let mut rgba = frame.to_rgba_image()?.into_raw();
        let (w, h) = (width as u16, height as u16);
        let mut gif_frame = gif::Frame::from_rgba_speed(w, h, &mut rgba, self.opts.speed);
        gif_frame.delay = delay_centis(meta.duration_ms);
        encoder
            .write_frame(&gif_frame)
            .map_err(|e| EpicycleError::encode(format!("failed to encode gif frame: {e}")))?;
        self.frames_written += 1;

        if meta.is_final && save_last {
            write_png(&self.opts.still_path(), frame)?;
        }
        Ok(())
    }

    fn end(&mut self) -> EpicycleResult<()> {
        let Some(cfg) = self.cfg.take() else {
            return Err(EpicycleError::encode("end called before begin"));
        };
        let Some(encoder) = self.encoder.take() else {
            return Err(EpicycleError::encode("gif encoder is already finalized"));
        };
        finish_gif(encoder)?;
        if self.frames_written != cfg.frame_count {
            return Err(EpicycleError::encode(format!(
                "gif received {} of {} frames",
                self.frames_written, cfg.frame_count
            )));
        }
        tracing::info!(
            path = %self.opts.out_path.display(),
            frames = self.frames_written,
            "gif written"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
