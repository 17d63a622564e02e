// File: src/persistence.rs
use crate::core::dictionary::DictionarySet;
use crate::core::types::Attribute;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::UNIX_EPOCH;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Size and modification time of one source `.dict` file when the snapshot was built.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceStamp {
    pub file: String,
    pub len: u64,
    pub modified_secs: u64,
    pub modified_nanos: u32,
}

/// The serialized snapshot: the typed dictionaries plus the stamps of the
/// JSON files they were compiled from.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub sources: Vec<SourceStamp>,
    pub dictionaries: DictionarySet,
}

/// Stamps every attribute dictionary file in `dir`, in `Attribute::ALL` order.
pub fn source_stamps(dir: &Path) -> Result<Vec<SourceStamp>> {
    Attribute::ALL
        .into_iter()
        .map(|attr| -> Result<SourceStamp> {
            let metadata = fs::metadata(dir.join(attr.file_name()))?;
            let modified = metadata
                .modified()?
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            Ok(SourceStamp {
                file: attr.file_name(),
                len: metadata.len(),
                modified_secs: modified.as_secs(),
                modified_nanos: modified.subsec_nanos(),
            })
        })
        .collect()
}

/// Writes a snapshot. The write is atomic.
pub fn save_to_disk(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, snapshot)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<Snapshot> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;
    Ok(snapshot)
}

/// Loads the snapshot while it still matches the JSON files in `dir`;
/// otherwise parses the JSON directory and refreshes the snapshot from it.
///
/// A snapshot whose sources are gone entirely is served as is.
pub fn from_snapshot_or_dir(snapshot_path: &Path, dir: &Path) -> Result<DictionarySet> {
    let current = source_stamps(dir);
    match load_from_disk(snapshot_path) {
        Ok(snapshot) => match &current {
            Ok(stamps) if *stamps == snapshot.sources => {
                info!(path = %snapshot_path.display(), "Loaded dictionary snapshot");
                return Ok(snapshot.dictionaries);
            }
            Ok(_) => {
                info!(path = %snapshot_path.display(), "Dictionary snapshot is stale, rebuilding");
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Dictionary sources unreadable, using snapshot");
                return Ok(snapshot.dictionaries);
            }
        },
        Err(e) if snapshot_path.exists() => {
            warn!(path = %snapshot_path.display(), error = %e, "Ignoring unreadable dictionary snapshot");
        }
        Err(_) => {}
    }

    let dictionaries = DictionarySet::from_dir(dir)?;
    match current {
        Ok(sources) => {
            let snapshot = Snapshot {
                sources,
                dictionaries,
            };
            if let Err(e) = save_to_disk(&snapshot, snapshot_path) {
                warn!(path = %snapshot_path.display(), error = %e, "Could not write dictionary snapshot");
            }
            Ok(snapshot.dictionaries)
        }
        Err(_) => Ok(dictionaries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn sample() -> DictionarySet {
        let mut d = DictionarySet::new();
        d.component.insert("他".into(), "亻".into());
        d.frequency.insert("他".into(), 6.7);
        d.pinyin.insert("他".into(), vec!["ta".into(), "t".into(), "a".into(), "1".into()]);
        d
    }

    #[test]
    fn snapshot_survives_a_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dictionaries.bin");
        let snapshot = Snapshot {
            sources: Vec::new(),
            dictionaries: sample(),
        };
        save_to_disk(&snapshot, &path).unwrap();

        let loaded = load_from_disk(&path).unwrap().dictionaries;
        assert_eq!(loaded.component["他"], "亻");
        assert_eq!(loaded.frequency["他"], 6.7);
        assert_eq!(loaded.pinyin["他"][3], "1");
    }

    fn write_json_dir(dir: &Path) {
        for attr in Attribute::ALL {
            let value = match attr {
                Attribute::Frequency | Attribute::Number => "1",
                Attribute::Pinyin | Attribute::Stroke => r#"["一"]"#,
                _ => r#""1""#,
            };
            fs::write(dir.join(attr.file_name()), format!(r#"{{"一": {value}}}"#)).unwrap();
        }
    }

    #[test]
    fn garbage_snapshot_falls_back_to_json_dir() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("dictionaries.bin");
        fs::write(&snapshot, b"x").unwrap();
        write_json_dir(dir.path());

        let loaded = from_snapshot_or_dir(&snapshot, dir.path()).unwrap();
        assert!(loaded.contains("一"));
        // rewritten from the JSON files
        let rewritten = load_from_disk(&snapshot).unwrap();
        assert!(rewritten.dictionaries.contains("一"));
        assert_eq!(rewritten.sources, source_stamps(dir.path()).unwrap());
    }

    #[test]
    fn edited_dictionary_invalidates_the_snapshot() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("dictionaries.bin");
        write_json_dir(dir.path());
        let first = from_snapshot_or_dir(&snapshot, dir.path()).unwrap();
        assert_eq!(first.fourangle["一"], "1");

        // same length, so only the timestamp tells the files apart
        let fourangle = dir.path().join(Attribute::FourAngle.file_name());
        fs::write(&fourangle, r#"{"一": "2"}"#).unwrap();
        File::options()
            .write(true)
            .open(&fourangle)
            .unwrap()
            .set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        let reloaded = from_snapshot_or_dir(&snapshot, dir.path()).unwrap();
        assert_eq!(reloaded.fourangle["一"], "2");
        assert_eq!(load_from_disk(&snapshot).unwrap().dictionaries.fourangle["一"], "2");
    }

    #[test]
    fn unchanged_sources_are_served_from_the_snapshot() {
        let dir = TempDir::new().unwrap();
        let snapshot_path = dir.path().join("dictionaries.bin");
        write_json_dir(dir.path());
        let mut marked = Snapshot {
            sources: source_stamps(dir.path()).unwrap(),
            dictionaries: DictionarySet::from_dir(dir.path()).unwrap(),
        };
        marked.dictionaries.component.insert("标".into(), "木".into());
        save_to_disk(&marked, &snapshot_path).unwrap();

        let loaded = from_snapshot_or_dir(&snapshot_path, dir.path()).unwrap();
        assert!(loaded.contains("标"));
    }

    #[test]
    fn missing_everything_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(from_snapshot_or_dir(&dir.path().join("none.bin"), dir.path()).is_err());
    }
}
