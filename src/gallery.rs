use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("a picture needs a title")]
    EmptyTitle,
    #[error("a picture titled \"{0}\" already exists")]
    DuplicateTitle(String),
    #[error("no picture titled \"{0}\"")]
    NotFound(String),
    #[error("gallery I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("gallery index is corrupt: {0}")]
    Index(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub title: String,
    pub file: String,
}

/// Title-keyed store of PNG pictures, listed in the order they were saved.
#[derive(Debug)]
pub struct Gallery {
    dir: PathBuf,
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    pub const INDEX_FILE: &'static str = "gallery.json";

    /// Opens the gallery in `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, GalleryError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let index = dir.join(Self::INDEX_FILE);
        let entries: Vec<GalleryEntry> = if index.exists() {
            serde_json::from_slice(&std::fs::read(&index)?)?
        } else {
            Vec::new()
        };
        log::debug!("opened gallery at {} with {} pictures", dir.display(), entries.len());
        Ok(Self { dir, entries })
    }

    pub fn titles(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(|entry| entry.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.iter().any(|entry| entry.title == title)
    }

    pub fn save(&mut self, title: &str, png: &[u8]) -> Result<(), GalleryError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GalleryError::EmptyTitle);
        }
        if self.contains(title) {
            return Err(GalleryError::DuplicateTitle(title.to_string()));
        }

        let file = format!("{}.png", Uuid::new_v4());
        let picture = self.dir.join(&file);
        std::fs::write(&picture, png)?;

        let mut entries = self.entries.clone();
        entries.push(GalleryEntry {
            title: title.to_string(),
            file,
        });
        if let Err(err) = self.write_index(&entries) {
            if let Err(cleanup) = std::fs::remove_file(&picture) {
                log::warn!("could not remove {}: {cleanup}", picture.display());
            }
            return Err(err);
        }
        self.entries = entries;
        log::info!("saved \"{title}\" to the gallery");
        Ok(())
    }

    pub fn load(&self, title: &str) -> Result<Vec<u8>, GalleryError> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.title == title)
            .ok_or_else(|| GalleryError::NotFound(title.to_string()))?;
        Ok(std::fs::read(self.dir.join(&entry.file))?)
    }

    /// First "Untitled N" not already taken.
    pub fn next_untitled(&self) -> String {
        (1..)
            .map(|n| format!("Untitled {n}"))
            .find(|title| !self.contains(title))
            .unwrap_or_default()
    }

    fn write_index(&self, entries: &[GalleryEntry]) -> Result<(), GalleryError> {
        let json = serde_json::to_vec_pretty(entries)?;
        std::fs::write(self.dir.join(Self::INDEX_FILE), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_pictures_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let mut gallery = Gallery::open(dir.path()).unwrap();
        gallery.save("sunset", b"first").unwrap();
        gallery.save("boats", b"second").unwrap();

        let gallery = Gallery::open(dir.path()).unwrap();
        assert_eq!(gallery.titles().collect::<Vec<_>>(), ["sunset", "boats"]);
        assert_eq!(gallery.load("boats").unwrap(), b"second");
        assert_eq!(gallery.len(), 2);
    }

    #[test]
    fn rejects_empty_and_duplicate_titles() {
        let dir = tempfile::tempdir().unwrap();
        let mut gallery = Gallery::open(dir.path()).unwrap();
        assert!(matches!(gallery.save("  ", b"x"), Err(GalleryError::EmptyTitle)));

        gallery.save("cat", b"x").unwrap();
        assert!(matches!(
            gallery.save("cat", b"y"),
            Err(GalleryError::DuplicateTitle(title)) if title == "cat"
        ));
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn unknown_title_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = Gallery::open(dir.path()).unwrap();
        assert!(gallery.is_empty());
        assert!(matches!(gallery.load("ghost"), Err(GalleryError::NotFound(_))));
    }

    #[test]
    fn untitled_names_skip_taken_ones() {
        let dir = tempfile::tempdir().unwrap();
        let mut gallery = Gallery::open(dir.path()).unwrap();
        assert_eq!(gallery.next_untitled(), "Untitled 1");
        gallery.save("Untitled 1", b"x").unwrap();
        assert_eq!(gallery.next_untitled(), "Untitled 2");
    }

    #[test]
    fn failed_index_write_leaves_gallery_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut gallery = Gallery::open(dir.path()).unwrap();
        std::fs::create_dir(dir.path().join(Gallery::INDEX_FILE)).unwrap();

        assert!(matches!(gallery.save("pond", b"png"), Err(GalleryError::Io(_))));
        assert!(!gallery.contains("pond"));
        assert!(gallery.is_empty());
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|entry| entry.as_ref().unwrap().file_name() != Gallery::INDEX_FILE)
            .count();
        assert_eq!(leftovers, 0);

        std::fs::remove_dir(dir.path().join(Gallery::INDEX_FILE)).unwrap();
        gallery.save("pond", b"png").unwrap();
        assert_eq!(gallery.titles().collect::<Vec<_>>(), ["pond"]);
    }

    #[test]
    fn corrupt_index_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(Gallery::INDEX_FILE), "[{").unwrap();
        assert!(matches!(Gallery::open(dir.path()), Err(GalleryError::Index(_))));
    }
}
