use crate::{
    error::{LivegenError, Result},
    models::UploadedFile,
};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Writes uploaded source images into the public directory, which the
/// server also serves statically. Files are never removed.
#[derive(Debug, Clone)]
pub struct UploadStore {
    public_dir: PathBuf,
}

impl UploadStore {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Target path for an uploaded file name. Only the final path component
    /// of the client-supplied name is used.
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf> {
        let base = file_name
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or_default()
            .trim();

        if base.is_empty() || base.chars().all(|c| c == '.') {
            return Err(LivegenError::UploadError(format!(
                "invalid file name: {:?}",
                file_name
            )));
        }

        Ok(self.public_dir.join(base))
    }

    pub async fn save(&self, file: &UploadedFile) -> Result<PathBuf> {
        let path = self.path_for(&file.file_name)?;
        fs::create_dir_all(&self.public_dir).await?;
        fs::write(&path, &file.bytes).await?;

        log::debug!("Saved upload {} ({} bytes)", path.display(), file.bytes.len());
        Ok(path)
    }

    pub async fn read_back(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path).await?)
    }
}
