//! Byte-for-byte copies of media that is mirrored without conversion.

mod error;

pub use error::CopyError;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};

/// Default IO buffer size (1 MiB). Videos are large.
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Outcome of a verbatim copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResult {
    pub bytes_copied: u64,
    /// SHA-256 of the copied data, when verification is enabled.
    pub checksum: Option<String>,
}

/// Streams files to their mirror location.
#[derive(Debug, Clone)]
pub struct VerbatimCopier {
    buffer_size: usize,
    verify: bool,
}

impl Default for VerbatimCopier {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            verify: false,
        }
    }
}

impl VerbatimCopier {
    pub fn new(verify: bool) -> Self {
        Self {
            verify,
            ..Default::default()
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn verifies(&self) -> bool {
        self.verify
    }

    /// Copies `source` to `destination`, overwriting it if present.
    ///
    /// With verification on, the written file is read back and its SHA-256
    /// compared to the hash of the data read from `source`.
    pub async fn copy(&self, source: &Path, destination: &Path) -> Result<CopyResult, CopyError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CopyError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                CopyError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            }
        })?;

        let dest_file = File::create(destination).await.map_err(|e| {
            CopyError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let mut reader = BufReader::with_capacity(self.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.buffer_size, dest_file);
        let mut hasher = self.verify.then(Sha256::new);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                CopyError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            if bytes_read == 0 {
                break;
            }

            if let Some(ref mut h) = hasher {
                h.update(&buffer[..bytes_read]);
            }

            writer.write_all(&buffer[..bytes_read]).await.map_err(|e| {
                CopyError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            total_bytes += bytes_read as u64;
        }

        writer.flush().await.map_err(|e| {
            CopyError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;
        drop(writer);

        let checksum = match hasher {
            Some(h) => {
                let expected = format!("{:x}", h.finalize());
                let actual = self.checksum(destination).await?;
                if expected != actual {
                    return Err(CopyError::ChecksumMismatch {
                        path: destination.to_path_buf(),
                        expected,
                        actual,
                    });
                }
                Some(expected)
            }
            None => None,
        };

        Ok(CopyResult {
            bytes_copied: total_bytes,
            checksum,
        })
    }

    /// SHA-256 of a file, hex encoded.
    pub async fn checksum(&self, path: &Path) -> Result<String, CopyError> {
        let map_err = |e: std::io::Error| CopyError::ChecksumCalculationFailed {
            path: path.to_path_buf(),
            source: e,
        };

        let file = File::open(path).await.map_err(map_err)?;
        let mut reader = BufReader::with_capacity(self.buffer_size, file);
        let mut buffer = vec![0u8; self.buffer_size];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(map_err)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}
