//! Content-addressed image storage on local disk.
//!
//! Uploaded bytes are named by their SHA-256 digest, so identical uploads
//! map to the same file and are written only once.

use std::path::{Component, Path, PathBuf};

use itemshelf_core::{Error, Result};
use sha2::{Digest, Sha256};

/// Extension appended to every stored image name.
const IMAGE_EXTENSION: &str = ".jpg";

/// Outcome of resolving a requested image name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLookup {
    /// The file exists under the image directory.
    Found(PathBuf),
    /// The name is valid but no such file exists.
    Missing(PathBuf),
}

/// Filesystem manager for uploaded images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    default_image: String,
}

impl ImageStore {
    /// Create a store rooted at `dir`, serving `default_image` for misses.
    pub fn new(dir: PathBuf, default_image: impl Into<String>) -> Self {
        Self {
            dir,
            default_image: default_image.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the image directory if it does not exist.
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
            tracing::info!("Created image directory {}", self.dir.display());
        }
        Ok(())
    }

    /// Store image bytes and return the content-addressed file name.
    ///
    /// If a file with the same digest already exists it is left untouched.
    pub fn store(&self, data: &[u8]) -> Result<String> {
        if data.is_empty() {
            return Err(Error::validation("image is empty"));
        }

        let file_name = image_file_name(data);
        let path = self.dir.join(&file_name);

        if path.exists() {
            tracing::debug!(file = %file_name, "Image already stored");
            return Ok(file_name);
        }

        match write_image(&path, data) {
            Ok(()) => {
                tracing::debug!(file = %file_name, bytes = data.len(), "Stored image");
                Ok(file_name)
            }
            // Another request stored the same bytes first.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(file_name),
            Err(e) => Err(Error::Internal(format!(
                "Failed to save image {}: {e}",
                path.display()
            ))),
        }
    }

    /// Absolute-or-relative path of a stored image name.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Path of the placeholder served for missing images.
    pub fn default_image_path(&self) -> PathBuf {
        self.dir.join(&self.default_image)
    }

    /// Validate a requested image name and locate it under the directory.
    ///
    /// Rejects names with any component other than a plain file name, so
    /// the resolved path cannot escape the image directory, and names not
    /// ending in lowercase `.jpg` or `.jpeg`.
    pub fn resolve(&self, file_name: &str) -> Result<ImageLookup> {
        if file_name.is_empty() {
            return Err(Error::validation("filename is required"));
        }

        let requested = Path::new(file_name);
        if !requested
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(Error::validation(format!("invalid image path: {file_name}")));
        }

        if !file_name.ends_with(".jpg") && !file_name.ends_with(".jpeg") {
            return Err(Error::validation(format!(
                "image path does not end with .jpg or .jpeg: {file_name}"
            )));
        }

        let path = self.dir.join(requested);
        if path.is_file() {
            Ok(ImageLookup::Found(path))
        } else {
            Ok(ImageLookup::Missing(path))
        }
    }
}

/// Compute the stored file name for image data: hex SHA-256 plus `.jpg`.
pub fn image_file_name(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    format!("{}{IMAGE_EXTENSION}", hex::encode(digest))
}

#[cfg(unix)]
fn write_image(path: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o644)
        .open(path)?;
    file.write_all(data)
}

#[cfg(not(unix))]
fn write_image(path: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ImageStore {
        ImageStore::new(dir.path().to_path_buf(), "default.jpg")
    }

    #[test]
    fn test_image_file_name_is_full_digest() {
        let name = image_file_name(b"test data");
        assert_eq!(name.len(), 64 + ".jpg".len());
        assert!(name.ends_with(".jpg"));
        assert_eq!(
            name,
            "916f0027a575074ce72a331777c3478d6513f786a591bd892da1a577bf2335f9.jpg"
        );
    }

    #[test]
    fn test_image_file_name_different_data() {
        assert_ne!(image_file_name(b"data1"), image_file_name(b"data2"));
    }

    #[test]
    fn test_store_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let name = store.store(b"\xFF\xD8\xFF jpeg bytes").unwrap();
        assert_eq!(name, image_file_name(b"\xFF\xD8\xFF jpeg bytes"));
        assert_eq!(
            std::fs::read(store.path_for(&name)).unwrap(),
            b"\xFF\xD8\xFF jpeg bytes"
        );
    }

    #[test]
    fn test_store_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let first = store.store(b"same bytes").unwrap();
        let second = store.store(b"same bytes").unwrap();
        assert_eq!(first, second);

        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
    }

    #[test]
    fn test_store_does_not_rewrite_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let name = image_file_name(b"original");
        std::fs::write(store.path_for(&name), b"tampered").unwrap();

        assert_eq!(store.store(b"original").unwrap(), name);
        assert_eq!(std::fs::read(store.path_for(&name)).unwrap(), b"tampered");
    }

    #[test]
    fn test_store_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_in(&dir).store(b"").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let name = store.store(b"perm check").unwrap();

        let mode = std::fs::metadata(store.path_for(&name))
            .unwrap()
            .permissions()
            .mode();
        // The process umask may clear bits but never adds any.
        assert_eq!(mode & 0o133, 0);
    }

    #[test]
    fn test_resolve_found_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let name = store.store(b"present").unwrap();

        assert_eq!(
            store.resolve(&name).unwrap(),
            ImageLookup::Found(dir.path().join(&name))
        );
        assert_eq!(
            store.resolve("absent.jpeg").unwrap(),
            ImageLookup::Missing(dir.path().join("absent.jpeg"))
        );
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for name in ["../secret.jpg", "a/../../secret.jpg", "/etc/secret.jpg", "./x.jpg"] {
            let err = store.resolve(name).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{name} should be rejected");
        }
    }

    #[test]
    fn test_resolve_rejects_other_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.resolve("photo.png").is_err());
        assert!(store.resolve("").is_err());
        assert!(store.resolve("photo.JPG").is_err());
        assert!(store.resolve("photo.jpeg").is_ok());
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("a").join("images"), "default.jpg");
        store.ensure_dir().unwrap();
        assert!(store.dir().is_dir());
        assert_eq!(store.default_image_path(), store.dir().join("default.jpg"));
    }
}
