//! Testing utilities and mock implementations.
//!
//! This module provides a mock `Converter` so the pool and the sync
//! orchestrator can be exercised without ImageMagick installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use syncpics_core::testing::MockConverter;
//!
//! let converter = MockConverter::new();
//! converter.set_conversion_duration(Duration::from_millis(20)).await;
//! converter.fail_on("2023/broken.jpg").await;
//!
//! // Use with SyncOrchestrator...
//! assert!(converter.peak_in_flight() <= 2);
//! ```

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedConversion};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// Writes a small file at `root/relative`, creating parent directories.
    pub fn write_file(root: &Path, relative: &str, contents: &[u8]) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }

    /// Lists every file under `root` as sorted, `/`-separated relative paths.
    pub fn list_files(root: &Path) -> Vec<String> {
        let mut files: Vec<String> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.path()
                    .strip_prefix(root)
                    .ok()
                    .map(crate::exclude::to_slash_path)
            })
            .collect();
        files.sort();
        files
    }
}
