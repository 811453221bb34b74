use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::EpicycleResult;
use crate::render::FrameRGBA;

/// Create the missing parent directories of `path`.
pub fn ensure_parent_dir(path: &Path) -> EpicycleResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write one frame as a straight-alpha RGBA PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> EpicycleResult<()> {
    ensure_parent_dir(path)?;
    let img = frame.to_rgba_image()?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote still frame");
    Ok(())
}
