//! Optional on-disk gallery images keyed by species identifier.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::species;

const GALLERY_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Static gallery assets. A species without an asset falls back to its
/// emoji placeholder; absence is never an error.
#[derive(Debug, Clone, Default)]
pub struct GalleryAssets {
    assets: HashMap<&'static str, PathBuf>,
}

impl GalleryAssets {
    /// Look for `<identifier>.<ext>` files in `dir`. A missing directory
    /// yields an empty gallery.
    pub fn scan(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut assets = HashMap::new();
        for record in species::all() {
            for ext in GALLERY_EXTENSIONS {
                let candidate = dir.join(format!("{}.{ext}", record.identifier));
                if candidate.is_file() {
                    assets.insert(record.identifier, candidate);
                    break;
                }
            }
        }
        if assets.is_empty() {
            tracing::debug!("no gallery assets under {}", dir.display());
        }
        Self { assets }
    }

    /// Asset path for a species, when one exists.
    pub fn path_for(&self, identifier: &str) -> Option<&Path> {
        self.assets.get(identifier).map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn scan_of_missing_directory_is_empty() {
        let gallery = GalleryAssets::scan("/no/such/gallery");
        assert!(gallery.is_empty());
        assert!(gallery.path_for("Moon_jellyfish").is_none());
    }

    #[test]
    fn scan_picks_up_assets_by_identifier() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("barrel_jellyfish.png")).unwrap();
        File::create(dir.path().join("compass_jellyfish.jpg")).unwrap();
        File::create(dir.path().join("unrelated.png")).unwrap();

        let gallery = GalleryAssets::scan(dir.path());
        assert!(gallery.path_for("barrel_jellyfish").is_some());
        assert!(gallery.path_for("compass_jellyfish").is_some());
        assert!(gallery.path_for("Moon_jellyfish").is_none());
        assert!(gallery.path_for("unrelated").is_none());
    }

    #[test]
    fn first_matching_extension_wins() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("blue_jellyfish.jpg")).unwrap();
        File::create(dir.path().join("blue_jellyfish.png")).unwrap();

        let gallery = GalleryAssets::scan(dir.path());
        let path = gallery.path_for("blue_jellyfish").unwrap();
        assert_eq!(path.extension().unwrap(), "jpg");
    }
}
