//! Writing a canvas as `.png`, `.jpg` and `.C` siblings.

use std::io;
use std::path::{Path, PathBuf};

use crate::canvas::Canvas;
use crate::error::{PlotError, Result};

/// Extensions written by every save, in order.
pub const SAVE_EXTENSIONS: [&str; 3] = ["png", "jpg", "C"];

/// Print `canvas` to `<dir>/<name>.png`, `.jpg` and `.C`.
///
/// Returns the written paths in that order.
pub fn save(canvas: &mut Canvas, dir: &Path, name: &str) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(SAVE_EXTENSIONS.len());
    for ext in SAVE_EXTENSIONS {
        let path = dir.join(format!("{name}.{ext}"));
        canvas.print(&path)?;
        written.push(path);
    }
    Ok(written)
}

/// [`save`] with the directory and base name taken from `path`, dropping its
/// extension if it has one (`plots/pmu.png` writes `plots/pmu.{png,jpg,C}`).
pub fn save_siblings(canvas: &mut Canvas, path: &Path) -> Result<Vec<PathBuf>> {
    let name = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
        PlotError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot save to '{}': no file name", path.display()),
        ))
    })?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    save(canvas, dir, name)
}
