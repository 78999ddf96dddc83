use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::sniff::file_extension;

/// Scratch directory for uploaded files, created on demand
pub fn ensure_uploads_dir(root: &Path) -> std::io::Result<PathBuf> {
    let uploads_dir = root.join("tabsight-uploads");
    ensure_dir(&uploads_dir)?;
    Ok(uploads_dir)
}

/// Path for an upload under a fresh name. Only the extension of the
/// client-supplied name is kept.
pub fn staged_upload_path(uploads_dir: &Path, original_name: &str) -> PathBuf {
    let ext = file_extension(Path::new(original_name));
    let name = if ext.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", Uuid::new_v4(), ext)
    };
    uploads_dir.join(name)
}

/// A written upload, deleted when dropped
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    pub fn write(uploads_dir: &Path, original_name: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let path = staged_upload_path(uploads_dir, original_name);
        fs::write(&path, bytes)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "Failed to remove staged upload");
        }
    }
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
