//! Extension based classification of files found in the source tree.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the sync does with a file, decided from its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Camera JPEG, re-encoded to HEIC in the mirror.
    ConvertibleImage,
    /// Video, copied byte for byte.
    VerbatimMedia,
    /// Raw negative or sidecar. The exported JPEG elsewhere in the tree is
    /// what gets synced.
    Ignorable,
    /// Anything else. Aborts the run.
    Unrecognized,
}

const CONVERTIBLE_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];
const VERBATIM_MEDIA_EXTENSIONS: &[&str] = &["mov", "mp4"];
const IGNORABLE_EXTENSIONS: &[&str] = &["cr3", "dng", "xmp"];

impl MediaKind {
    /// Classifies an extension, with or without its leading dot.
    pub fn from_extension(extension: &str) -> Self {
        let normalized = extension
            .strip_prefix('.')
            .unwrap_or(extension)
            .to_ascii_lowercase();

        if CONVERTIBLE_IMAGE_EXTENSIONS.contains(&normalized.as_str()) {
            Self::ConvertibleImage
        } else if VERBATIM_MEDIA_EXTENSIONS.contains(&normalized.as_str()) {
            Self::VerbatimMedia
        } else if IGNORABLE_EXTENSIONS.contains(&normalized.as_str()) {
            Self::Ignorable
        } else {
            Self::Unrecognized
        }
    }

    /// Classifies a file path. Paths without an extension are unrecognized.
    pub fn of_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unrecognized)
    }

    /// Whether the sync writes something to the mirror for this kind.
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::ConvertibleImage | Self::VerbatimMedia)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_variants_are_convertible() {
        assert_eq!(MediaKind::from_extension("jpg"), MediaKind::ConvertibleImage);
        assert_eq!(MediaKind::from_extension(".jpeg"), MediaKind::ConvertibleImage);
    }

    #[test]
    fn test_video_variants_are_verbatim() {
        assert_eq!(MediaKind::from_extension("mov"), MediaKind::VerbatimMedia);
        assert_eq!(MediaKind::from_extension(".mp4"), MediaKind::VerbatimMedia);
    }

    #[test]
    fn test_raw_and_sidecars_are_ignorable() {
        for ext in ["cr3", "dng", "xmp"] {
            assert_eq!(MediaKind::from_extension(ext), MediaKind::Ignorable);
        }
    }

    #[test]
    fn test_case_insensitive() {
        for ext in ["jpg", "jpeg", "mov", "mp4", "cr3", "dng", "xmp", "txt"] {
            let upper = ext.to_uppercase();
            let mixed: String = ext
                .chars()
                .enumerate()
                .map(|(i, c)| if i % 2 == 0 { c.to_ascii_uppercase() } else { c })
                .collect();
            assert_eq!(MediaKind::from_extension(ext), MediaKind::from_extension(&upper));
            assert_eq!(MediaKind::from_extension(ext), MediaKind::from_extension(&mixed));
        }
    }

    #[test]
    fn test_unknown_is_unrecognized() {
        assert_eq!(MediaKind::from_extension("txt"), MediaKind::Unrecognized);
        assert_eq!(MediaKind::from_extension("heic"), MediaKind::Unrecognized);
        assert_eq!(MediaKind::from_extension(""), MediaKind::Unrecognized);
    }

    #[test]
    fn test_of_path() {
        assert_eq!(
            MediaKind::of_path(Path::new("2023/trip/IMG_0001.JPG")),
            MediaKind::ConvertibleImage
        );
        assert_eq!(
            MediaKind::of_path(Path::new("2023/trip/clip.MP4")),
            MediaKind::VerbatimMedia
        );
        assert_eq!(MediaKind::of_path(Path::new("README")), MediaKind::Unrecognized);
        assert_eq!(MediaKind::of_path(Path::new("weird.TXT")), MediaKind::Unrecognized);
    }

    #[test]
    fn test_is_synced() {
        assert!(MediaKind::ConvertibleImage.is_synced());
        assert!(MediaKind::VerbatimMedia.is_synced());
        assert!(!MediaKind::Ignorable.is_synced());
        assert!(!MediaKind::Unrecognized.is_synced());
    }
}
