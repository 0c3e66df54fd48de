//! Loose resource files in a directory, such as the game's `override` folder

use aurora_common::ResourceKey;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

use crate::{container::ResourceContainer, error::Result};

/// A directory of `resref.ext` files
///
/// The directory is scanned once; file names are matched ignoring case and files whose extension
/// is not a known resource type are ignored.
#[derive(Debug, Clone)]
pub struct DirectoryContainer {
    root: PathBuf,
    files: IndexMap<ResourceKey, PathBuf>,
}

impl DirectoryContainer {
    #[instrument(skip_all, fields(root = %root.as_ref().display()), err)]
    pub fn new(root: impl AsRef<Path>) -> Result<DirectoryContainer> {
        let root = root.as_ref().to_path_buf();
        let mut files = IndexMap::new();

        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            match ResourceKey::from_file_name(&name) {
                Ok(key) => {
                    files.entry(key).or_insert_with(|| entry.path());
                }
                Err(error) => trace!(%name, %error, "skipping file"),
            }
        }
        files.sort_keys();

        debug!(resources = files.len(), "indexed directory");
        Ok(DirectoryContainer { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Path of the file backing `key`
    pub fn path(&self, key: &ResourceKey) -> Option<&Path> {
        self.files.get(key).map(PathBuf::as_path)
    }
}

impl ResourceContainer for DirectoryContainer {
    fn name(&self) -> String {
        self.root.display().to_string()
    }

    fn contains(&self, key: &ResourceKey) -> bool {
        self.files.contains_key(key)
    }

    fn read(&self, key: &ResourceKey) -> Result<Option<Vec<u8>>> {
        self.files
            .get(key)
            .map(|path| std::fs::read(path).map_err(Into::into))
            .transpose()
    }

    fn keys(&self) -> Vec<ResourceKey> {
        self.files.keys().cloned().collect()
    }
}

#[cfg(test)]
mod test {
    use aurora_common::{ResourceKey, ResourceType};
    use pretty_assertions::assert_eq;

    use crate::{container::ResourceContainer, dir::DirectoryContainer, error::Result};

    #[test]
    fn scans_loose_files() -> Result<()> {
        let root = std::env::temp_dir().join(format!("aurora_dir_{}", std::process::id()));
        std::fs::create_dir_all(root.join("nested"))?;
        std::fs::write(root.join("Appearance.2DA"), b"2DA V2.b")?;
        std::fs::write(root.join("readme"), b"not a resource")?;
        std::fs::write(root.join("notes.docx"), b"not a resource")?;

        let container = DirectoryContainer::new(&root)?;
        assert_eq!(container.len(), 1);

        let key = ResourceKey::new("appearance", ResourceType::TwoDa);
        assert!(container.contains(&key));
        assert_eq!(container.read(&key)?, Some(b"2DA V2.b".to_vec()));
        assert_eq!(
            container.read(&ResourceKey::new("appearance", ResourceType::Utc))?,
            None
        );

        std::fs::remove_dir_all(&root)?;
        Ok(())
    }
}
