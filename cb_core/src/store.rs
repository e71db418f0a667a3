use crate::structs::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;

/// Repository seam for persisted documents.
///
/// Every mutation is a full-document rewrite, there is no incremental update
/// and no guarantee across two documents.
pub trait Store<T> {
    fn load(&self) -> T;
    fn save(&self, value: &T) -> Result<(), Error>;
}

/// A single flat JSON document on disk.
pub struct JsonFile<T> {
    path: PathBuf,
    marker: PhantomData<T>,
}

impl<T> JsonFile<T> {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFile {
            path: path.into(),
            marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned + Default> Store<T> for JsonFile<T> {
    /// A missing file is a fresh install, malformed contents are logged and
    /// replaced with the default structure on the next save.
    fn load(&self) -> T {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) => {
                if error.kind() != std::io::ErrorKind::NotFound {
                    eprintln!("Error reading {}: {error}", self.path.display());
                }
                return T::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(error) => {
                eprintln!("Error loading {}: {error}", self.path.display());
                T::default()
            }
        }
    }

    /// Writes to a temp file first so a crash mid-write never clobbers the
    /// previous document.
    fn save(&self, value: &T) -> Result<(), Error> {
        let tmp = self.path.with_extension("tmp");
        let file = fs::File::create(&tmp)?;
        serde_json::to_writer_pretty(file, value)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn scratch_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("critter-bot-test-{name}-{}.json", std::process::id()));
        path
    }

    #[test]
    fn round_trips_a_document() {
        let path = scratch_path("roundtrip");
        let file: JsonFile<HashMap<String, u32>> = JsonFile::new(&path);

        let mut doc = HashMap::new();
        doc.insert("streak".to_owned(), 3);
        file.save(&doc).unwrap();

        assert_eq!(file.load(), doc);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_json_falls_back_to_default() {
        let path = scratch_path("malformed");
        fs::write(&path, "{ not json").unwrap();

        let file: JsonFile<HashMap<String, u32>> = JsonFile::new(&path);
        assert_eq!(file.load(), HashMap::new());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_the_default() {
        let file: JsonFile<Vec<String>> = JsonFile::new(scratch_path("missing-never-created"));
        assert!(file.load().is_empty());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let path = scratch_path("atomic");
        let file: JsonFile<Vec<u32>> = JsonFile::new(&path);
        file.save(&vec![1, 2, 3]).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        let _ = fs::remove_file(&path);
    }
}
