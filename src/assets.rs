//! Asset store: downloaded product images, one flat directory.
//!
//! Files are named `<content_hash><original extension>`; the presence of a
//! file is the only signal that an image was captured for that item.

use crate::crawler::fetch_bytes;
use crate::{AssetError, IntegrityError};
use reqwest::Client;
use std::path::{Path, PathBuf};

/// File extensions counted as captured images.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "gif", "png"];

/// One image file found in the asset directory.
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl AssetFile {
    /// The identity hash encoded in the file name (everything before the
    /// first dot).
    pub fn content_hash(&self) -> &str {
        self.file_name
            .split('.')
            .next()
            .unwrap_or(&self.file_name)
    }
}

/// Flat directory of captured product images.
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    /// Creates the asset directory if missing. Failure here is fatal to
    /// the run.
    pub fn create(dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Startup consistency check: image files lying around while the
    /// catalog is empty means a prior run left inconsistent state behind.
    pub fn verify_against_catalog(&self, catalog_len: usize) -> Result<(), IntegrityError> {
        if catalog_len == 0 {
            let count = self.image_files().map(|f| f.len()).unwrap_or(0);
            if count > 0 {
                return Err(IntegrityError::OrphanedAssets { count });
            }
        }
        Ok(())
    }

    /// Downloads `url` and writes it as `<hash><extension>` into the
    /// store. Returns the written path.
    pub async fn capture(
        &self,
        client: &Client,
        url: &str,
        hash: &str,
    ) -> Result<PathBuf, AssetError> {
        let bytes = fetch_bytes(client, url)
            .await
            .map_err(|source| AssetError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let path = self.dir.join(file_name_for(hash, url));
        std::fs::write(&path, bytes).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Lists image files in directory-listing order; non-image files are
    /// ignored.
    pub fn image_files(&self) -> std::io::Result<Vec<AssetFile>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if !is_image {
                continue;
            }
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            files.push(AssetFile {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                path,
            });
        }
        Ok(files)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Destination file name for an asset: the identity hash plus the source
/// URL's extension (if it has one).
pub fn file_name_for(hash: &str, url: &str) -> String {
    match extension_of(url) {
        Some(ext) => format!("{hash}.{ext}"),
        None => hash.to_string(),
    }
}

/// The extension of the path portion of a URL, without query or fragment.
fn extension_of(url: &str) -> Option<String> {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_string())
}
