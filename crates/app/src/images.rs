#![forbid(unsafe_code)]

use eco_core::ports::{ImageHost, ImageHostError};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keeps uploaded images in a local directory, named by content hash.
#[derive(Clone, Debug)]
pub struct DirImageHost {
    dir: PathBuf,
}

impl DirImageHost {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageHost for DirImageHost {
    fn upload(&self, blob: &[u8]) -> Result<String, ImageHostError> {
        if blob.is_empty() {
            return Err(ImageHostError::Rejected("image is empty"));
        }
        std::fs::create_dir_all(&self.dir)?;

        let digest = Sha256::digest(blob);
        let mut name = String::with_capacity(digest.len() * 2 + 4);
        for byte in digest.iter() {
            let _ = write!(name, "{byte:02x}");
        }
        name.push_str(".img");

        let path = self.dir.join(&name);
        if !path.exists() {
            std::fs::write(&path, blob)?;
            debug!(path = %path.display(), bytes = blob.len(), "image stored");
        }
        Ok(format!("file://{}", path.display()))
    }
}
