//! File reading utilities with memory mapping support.
//!
//! Provides efficient reading of transcripts and other large documents,
//! with automatic detection of when to use memory mapping. Everything read
//! as text is validated: binary data is refused rather than scanned.

// Memory mapping requires unsafe but is well-documented and safe for read-only access
#![allow(unsafe_code)]

use crate::error::{IoError, Result};
use crate::io::unicode::validate_text;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Threshold for using memory mapping (1MB).
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Maximum file size to read into memory (1GB).
const MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// File reader with support for memory mapping.
///
/// Automatically chooses the best reading strategy based on file size:
/// - Small files (< 1MB): Read directly into memory
/// - Large files (>= 1MB): Use memory mapping
///
/// # Examples
///
/// ```no_run
/// use yearline::io::FileReader;
///
/// let reader = FileReader::open("transcript.txt").unwrap();
/// let content = reader.read_to_string().unwrap();
/// ```
pub struct FileReader {
    /// File handle.
    file: File,
    /// File size in bytes.
    size: u64,
    /// File path for error messages.
    path: String,
}

impl FileReader {
    /// Opens a file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist, can't be opened, or is
    /// larger than 1GB.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_string_lossy().to_string();

        if !path_ref.exists() {
            return Err(IoError::FileNotFound { path: path_str }.into());
        }

        let file = File::open(path_ref).map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        let metadata = file.metadata().map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        let size = metadata.len();

        if size > MAX_FILE_SIZE {
            return Err(IoError::ReadFailed {
                path: path_str,
                reason: format!("file too large: {size} bytes (max: {MAX_FILE_SIZE} bytes)"),
            }
            .into());
        }

        Ok(Self {
            file,
            size,
            path: path_str,
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the file content as validated text.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, or
    /// [`ExtractionError::InvalidInput`](crate::error::ExtractionError::InvalidInput)
    /// if the content is not UTF-8 text or holds NUL bytes.
    pub fn read_to_string(&self) -> Result<String> {
        if self.size >= MMAP_THRESHOLD {
            debug!(path = %self.path, size = self.size, "reading via mmap");
            let mmap = self.mmap()?;
            Ok(validate_text(&mmap)?.to_string())
        } else {
            let bytes = self.read_direct_bytes()?;
            Ok(validate_text(&bytes)?.to_owned())
        }
    }

    /// Reads bytes directly into memory.
    #[allow(clippy::cast_possible_truncation)]
    fn read_direct_bytes(&self) -> Result<Vec<u8>> {
        let mut file = &self.file;
        let mut buffer = Vec::with_capacity(self.size as usize);
        file.read_to_end(&mut buffer)
            .map_err(|e| IoError::ReadFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        Ok(buffer)
    }

    /// Creates a memory-mapped view of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if memory mapping fails.
    pub fn mmap(&self) -> Result<Mmap> {
        // Safety: We're only reading from the file
        unsafe {
            Mmap::map(&self.file).map_err(|e| {
                IoError::MmapFailed {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }
                .into()
            })
        }
    }
}

/// Reads a file as validated text, choosing the best method.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or
/// [`ExtractionError::InvalidInput`](crate::error::ExtractionError::InvalidInput)
/// if it is not plain text.
///
/// # Examples
///
/// ```no_run
/// use yearline::io::read_text;
///
/// let content = read_text("transcript.txt").unwrap();
/// ```
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    FileReader::open(path)?.read_to_string()
}

/// Writes content to a file, creating parent directories if needed.
///
/// # Errors
///
/// Returns an error if directory creation or file writing fails.
pub fn write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path_ref = path.as_ref();
    let path_str = path_ref.to_string_lossy().to_string();

    if let Some(parent) = path_ref.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| IoError::DirectoryFailed {
            path: parent.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;
    }

    std::fs::write(path_ref, content).map_err(|e| IoError::WriteFailed {
        path: path_str,
        reason: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ExtractionError};
    use tempfile::TempDir;

    #[test]
    fn test_read_small_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("small.txt");
        std::fs::write(&file_path, "In 1916, Dulles.").unwrap();

        let content = read_text(&file_path).unwrap();
        assert_eq!(content, "In 1916, Dulles.");
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_text("/nonexistent/path/file.txt");
        assert!(matches!(result, Err(Error::Io(IoError::FileNotFound { .. }))));
    }

    #[test]
    fn test_file_reader_size_and_path() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        std::fs::write(&file_path, "Hello").unwrap();

        let reader = FileReader::open(&file_path).unwrap();
        assert_eq!(reader.size(), 5);
        assert!(reader.path().contains("test.txt"));
    }

    #[test]
    fn test_read_utf8_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("unicode.txt");
        std::fs::write(&file_path, "Gödel, 1931 – 世界").unwrap();

        let content = read_text(&file_path).unwrap();
        assert_eq!(content, "Gödel, 1931 – 世界");
    }

    #[test]
    fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");
        std::fs::write(&file_path, "").unwrap();

        assert!(read_text(&file_path).unwrap().is_empty());
    }

    #[test]
    fn test_read_invalid_utf8_is_invalid_input() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("invalid.bin");
        std::fs::write(&file_path, [b'o', b'k', 0xff, 0xfe]).unwrap();

        let result = read_text(&file_path);
        assert!(matches!(
            result,
            Err(Error::Extraction(ExtractionError::InvalidInput { offset: 2, .. }))
        ));
    }

    #[test]
    fn test_read_nul_bytes_is_invalid_input() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("binary.bin");
        std::fs::write(&file_path, b"1950\x00\x01\x02").unwrap();

        let result = read_text(&file_path);
        assert!(matches!(
            result,
            Err(Error::Extraction(ExtractionError::InvalidInput { offset: 4, .. }))
        ));
    }

    #[test]
    fn test_read_large_file_mmap_path() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("large.txt");

        let large_content = "In 1945 the war ended. ".repeat(70_000);
        std::fs::write(&file_path, &large_content).unwrap();

        let reader = FileReader::open(&file_path).unwrap();
        assert!(reader.size() >= MMAP_THRESHOLD);

        let content = reader.read_to_string().unwrap();
        assert_eq!(content.len(), large_content.len());
    }

    #[test]
    fn test_read_invalid_utf8_via_mmap() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("large_invalid.bin");

        let mut content = vec![b'x'; 1024 * 1024 + 100];
        content[0] = 0xff;
        std::fs::write(&file_path, &content).unwrap();

        let reader = FileReader::open(&file_path).unwrap();
        assert!(reader.read_to_string().is_err());
    }

    #[test]
    fn test_write_file_to_nested_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("a/b/c/timeline.json");

        write_file(&file_path, "{}").unwrap();

        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "{}");
    }
}
