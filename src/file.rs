// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::config::consts::{CSV_SEP, PARTIAL_SUFFIX};
use crate::csv::write_row;
use crate::error::{FoodError, Result};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(FoodError::Config(format!("path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// `out.csv` → `out.csv.partial`
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// All-or-nothing CSV output.
///
/// Rows go to `<path>.partial`; [`AtomicCsv::commit`] renames it over `path`.
/// Dropped without a commit, the partial file is removed and `path` is left
/// as it was.
pub struct AtomicCsv {
    path: PathBuf,
    partial: PathBuf,
    out: Option<BufWriter<File>>,
    rows: usize,
    committed: bool,
}

impl AtomicCsv {
    pub fn create(path: &Path) -> Result<Self> {
        ensure_parent(path)?;
        let partial = partial_path(path);
        let file = File::create(&partial)?; // truncate/overwrite
        debug!(path = %partial.display(), "writing");
        Ok(Self { path: path.to_path_buf(), partial, out: Some(BufWriter::new(file)), rows: 0, committed: false })
    }

    pub fn write_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<()> {
        let out = self
            .out
            .as_mut()
            .ok_or_else(|| FoodError::Io(std::io::Error::other("write after commit")))?;
        write_row(out, row, CSV_SEP)?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, header included.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and rename over the target. On failure the partial file is
    /// removed by `Drop` and the target keeps its previous contents.
    pub fn commit(mut self) -> Result<PathBuf> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
        }
        fs::rename(&self.partial, &self.path)?;
        self.committed = true;
        Ok(self.path.clone())
    }
}

impl Drop for AtomicCsv {
    fn drop(&mut self) {
        if !self.committed {
            drop(self.out.take());
            if let Err(e) = fs::remove_file(&self.partial) {
                warn!(path = %self.partial.display(), "could not remove partial file: {e}");
            } else {
                warn!(path = %self.path.display(), "export abandoned, nothing written");
            }
        }
    }
}
