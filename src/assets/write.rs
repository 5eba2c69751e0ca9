use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::RgbImage;

use crate::foundation::error::{PressError, PressResult};

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> PressResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PressResult<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| PressError::invalid_input(format!("'{}' has no file name", path.display())))?;
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    Ok(path.with_file_name(format!(
        ".{}.{}.{nanos}.tmp",
        name.to_string_lossy(),
        std::process::id()
    )))
}

/// Write `bytes` to `path` through a sibling temp file and a rename.
///
/// Readers never observe a partially written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> PressResult<()> {
    ensure_parent_dir(path)?;
    let tmp = temp_sibling(path)?;
    let result = (|| -> anyhow::Result<()> {
        let mut f = std::fs::File::create(&tmp)
            .with_context(|| format!("create temp file '{}'", tmp.display()))?;
        f.write_all(bytes)
            .with_context(|| format!("write temp file '{}'", tmp.display()))?;
        f.sync_all()
            .with_context(|| format!("sync temp file '{}'", tmp.display()))?;
        drop(f);
        std::fs::rename(&tmp, path)
            .with_context(|| format!("rename into '{}'", path.display()))?;
        Ok(())
    })();
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result.map_err(PressError::from)
}

/// Encode `img` as PNG and write it atomically.
pub fn write_png_atomic(path: &Path, img: &RgbImage) -> PressResult<()> {
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PressError::rendering(format!("encode png: {e}")))?;
    write_atomic(path, &buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/write.rs"]
mod tests;
