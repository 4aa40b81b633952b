//! Maps source files onto their location in the mirror tree.

use std::path::{Path, PathBuf};

use crate::classify::MediaKind;

/// Extension given to converted images in the mirror.
pub const CONVERTED_EXTENSION: &str = "HEIC";

/// Computes mirror paths. Destinations are a pure function of the source
/// path and the two roots.
#[derive(Debug, Clone)]
pub struct PathMapper {
    source_root: PathBuf,
    destination_root: PathBuf,
}

impl PathMapper {
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Path of `path` relative to the source root, or `None` if it lies outside.
    pub fn relative_to_source<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        path.strip_prefix(&self.source_root).ok()
    }

    /// Path of `path` relative to the destination root, or `None` if it lies outside.
    pub fn relative_to_destination<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        path.strip_prefix(&self.destination_root).ok()
    }

    /// Mirror path for a source-relative file of the given kind.
    ///
    /// Converted images keep their base name with a `.HEIC` extension; videos
    /// keep their file name untouched. Other kinds have no destination.
    pub fn destination_for(&self, relative: &Path, kind: MediaKind) -> Option<PathBuf> {
        let file_name = relative.file_name()?;
        let dir = match relative.parent() {
            Some(parent) => self.destination_root.join(parent),
            None => self.destination_root.clone(),
        };

        match kind {
            MediaKind::ConvertibleImage => {
                let stem = relative.file_stem().unwrap_or(file_name);
                let mut name = stem.to_os_string();
                name.push(".");
                name.push(CONVERTED_EXTENSION);
                Some(dir.join(name))
            }
            MediaKind::VerbatimMedia => Some(dir.join(file_name)),
            MediaKind::Ignorable | MediaKind::Unrecognized => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> PathMapper {
        PathMapper::new("/photos/lightroom", "/photos/mirror")
    }

    #[test]
    fn test_image_gets_heic_extension() {
        let dest = mapper()
            .destination_for(Path::new("2023/trip/IMG_0001.JPG"), MediaKind::ConvertibleImage)
            .unwrap();
        assert_eq!(dest, PathBuf::from("/photos/mirror/2023/trip/IMG_0001.HEIC"));
    }

    #[test]
    fn test_image_at_root() {
        let dest = mapper()
            .destination_for(Path::new("photo.jpeg"), MediaKind::ConvertibleImage)
            .unwrap();
        assert_eq!(dest, PathBuf::from("/photos/mirror/photo.HEIC"));
    }

    #[test]
    fn test_image_with_dotted_base_name() {
        let dest = mapper()
            .destination_for(Path::new("a/b.edit.jpg"), MediaKind::ConvertibleImage)
            .unwrap();
        assert_eq!(dest, PathBuf::from("/photos/mirror/a/b.edit.HEIC"));
    }

    #[test]
    fn test_video_keeps_name_and_case() {
        let dest = mapper()
            .destination_for(Path::new("2023/clip.MP4"), MediaKind::VerbatimMedia)
            .unwrap();
        assert_eq!(dest, PathBuf::from("/photos/mirror/2023/clip.MP4"));
    }

    #[test]
    fn test_no_destination_for_skipped_kinds() {
        let m = mapper();
        assert!(m
            .destination_for(Path::new("raw.DNG"), MediaKind::Ignorable)
            .is_none());
        assert!(m
            .destination_for(Path::new("weird.TXT"), MediaKind::Unrecognized)
            .is_none());
    }

    #[test]
    fn test_deterministic() {
        let m = mapper();
        let rel = Path::new("x/y/z.jpg");
        assert_eq!(
            m.destination_for(rel, MediaKind::ConvertibleImage),
            m.destination_for(rel, MediaKind::ConvertibleImage)
        );
    }

    #[test]
    fn test_relative_paths() {
        let m = mapper();
        let src = Path::new("/photos/lightroom/2023/a.jpg");
        assert_eq!(m.relative_to_source(src), Some(Path::new("2023/a.jpg")));
        assert_eq!(m.relative_to_source(Path::new("/elsewhere/a.jpg")), None);

        let dst = Path::new("/photos/mirror/2023/a.HEIC");
        assert_eq!(m.relative_to_destination(dst), Some(Path::new("2023/a.HEIC")));
    }
}
