//! Where the screenplay text comes from.
//!
//! Either a file on disk, validated before it is read and polled for changes, or the
//! built-in sample document.

use crate::error::{FountviewError, Result};
use crate::sample::STARTING_TEXT;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Origin of the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOrigin {
    File(PathBuf),
    Sample,
}

/// The current document and enough metadata to notice when it changes on disk.
#[derive(Debug, Clone)]
pub struct ScreenplaySource {
    origin: DocumentOrigin,
    text: String,
    modified: Option<SystemTime>,
    max_bytes: u64,
}

/// Validate that a path is a readable regular file no larger than `max_bytes`.
///
/// Empty files are accepted; an empty screenplay renders to an empty script.
pub fn validate_file_path(path: &Path, max_bytes: u64) -> Result<std::fs::Metadata> {
    if !path.exists() {
        return Err(FountviewError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| FountviewError::file_error("Failed to read file metadata", e))?;

    if !metadata.is_file() {
        return Err(FountviewError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    if metadata.len() > max_bytes {
        return Err(FountviewError::file_error(
            format!(
                "File is too large ({} bytes, limit {}): {}",
                metadata.len(),
                max_bytes,
                path.display()
            ),
            std::io::Error::new(std::io::ErrorKind::InvalidData, "File too large"),
        ));
    }

    Ok(metadata)
}

impl ScreenplaySource {
    /// The built-in sample document.
    pub fn sample() -> Self {
        Self {
            origin: DocumentOrigin::Sample,
            text: STARTING_TEXT.to_string(),
            modified: None,
            max_bytes: u64::MAX,
        }
    }

    /// Validate and read a screenplay file.
    pub async fn open(path: &Path, max_bytes: usize) -> Result<Self> {
        let mut source = Self {
            origin: DocumentOrigin::File(path.to_path_buf()),
            text: String::new(),
            modified: None,
            max_bytes: u64::try_from(max_bytes).unwrap_or(u64::MAX),
        };
        source.reload().await?;
        Ok(source)
    }

    pub fn origin(&self) -> &DocumentOrigin {
        &self.origin
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.origin {
            DocumentOrigin::File(path) => Some(path),
            DocumentOrigin::Sample => None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Modification time seen at the last read
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// File name for status lines and document titles.
    pub fn display_name(&self) -> String {
        match &self.origin {
            DocumentOrigin::File(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("<unnamed>")
                .to_string(),
            DocumentOrigin::Sample => "<sample>".to_string(),
        }
    }

    /// Re-read the file. The sample document never changes.
    pub async fn reload(&mut self) -> Result<()> {
        let DocumentOrigin::File(path) = &self.origin else {
            return Ok(());
        };

        let metadata = validate_file_path(path, self.max_bytes)?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FountviewError::file_error(format!("Failed to read {}", path.display()), e))?;
        let text = String::from_utf8(bytes).map_err(|_| FountviewError::NotUtf8 {
            path: path.clone(),
        })?;

        self.text = text;
        self.modified = metadata.modified().ok();
        Ok(())
    }

    /// Reload when the modification time moved. Returns true if the text was re-read.
    pub async fn refresh_if_modified(&mut self) -> Result<bool> {
        let Some(path) = self.path() else {
            return Ok(false);
        };

        let modified = tokio::fs::metadata(path)
            .await
            .ok()
            .and_then(|metadata| metadata.modified().ok());
        if modified.is_none() || modified == self.modified {
            return Ok(false);
        }

        self.reload().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::{NamedTempFile, TempDir};

    #[tokio::test]
    async fn open_reads_text_and_name() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "INT. MESS\n").unwrap();

        let source = ScreenplaySource::open(file.path(), 1024).await.unwrap();
        assert_eq!(source.text(), "INT. MESS\n");
        assert_eq!(source.path(), Some(file.path()));
        assert_ne!(source.display_name(), "<sample>");
    }

    #[tokio::test]
    async fn empty_file_is_accepted() {
        let file = NamedTempFile::new().unwrap();
        let source = ScreenplaySource::open(file.path(), 1024).await.unwrap();
        assert_eq!(source.text(), "");
    }

    #[tokio::test]
    async fn rejects_missing_directory_large_and_binary() {
        let missing = ScreenplaySource::open(Path::new("/no/such/script.fountain"), 1024).await;
        assert!(matches!(missing, Err(FountviewError::FileNotFound { .. })));

        let dir = TempDir::new().unwrap();
        let not_file = ScreenplaySource::open(dir.path(), 1024).await;
        assert!(matches!(not_file, Err(FountviewError::NotAFile { .. })));

        let mut large = NamedTempFile::new().unwrap();
        large.write_all(&[b'a'; 64]).unwrap();
        let too_large = ScreenplaySource::open(large.path(), 16).await;
        assert!(matches!(too_large, Err(FountviewError::FileError { .. })));

        let mut binary = NamedTempFile::new().unwrap();
        binary.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        let not_utf8 = ScreenplaySource::open(binary.path(), 1024).await;
        assert!(matches!(not_utf8, Err(FountviewError::NotUtf8 { .. })));
    }

    #[tokio::test]
    async fn refresh_picks_up_changes() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "KANE\nHi.\n").unwrap();
        let mut source = ScreenplaySource::open(file.path(), 1024).await.unwrap();
        let first_seen = source.modified();
        assert!(first_seen.is_some());

        assert!(!source.refresh_if_modified().await.unwrap());

        // Coarse mtime resolution on some filesystems
        tokio::time::sleep(Duration::from_millis(1100)).await;
        std::fs::write(file.path(), "RIPLEY\nWhat's wrong?\n").unwrap();

        assert!(source.refresh_if_modified().await.unwrap());
        assert_eq!(source.text(), "RIPLEY\nWhat's wrong?\n");
        assert_ne!(source.modified(), first_seen);
    }

    #[tokio::test]
    async fn sample_never_refreshes() {
        let mut source = ScreenplaySource::sample();
        assert_eq!(source.origin(), &DocumentOrigin::Sample);
        assert!(source.path().is_none());
        assert!(!source.refresh_if_modified().await.unwrap());
        assert_eq!(source.text(), STARTING_TEXT);
    }
}
