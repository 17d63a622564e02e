// File: src/core/dictionary.rs
use crate::core::types::{Attribute, Presence};
use crate::error::{Result, SimilarityError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// An untyped attribute dictionary: a flat JSON object from character to value.
pub type RawDictionary = serde_json::Map<String, serde_json::Value>;

/// Supplies the raw attribute dictionaries. Where they live is up to the provider.
pub trait DictionaryProvider {
    fn load(&self, attribute: Attribute) -> Result<RawDictionary>;
}

/// Reads `char_<attribute>.dict` JSON files from one directory.
#[derive(Debug, Clone)]
pub struct JsonDirProvider {
    root: PathBuf,
}

impl JsonDirProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, attribute: Attribute) -> PathBuf {
        self.root.join(attribute.file_name())
    }
}

impl DictionaryProvider for JsonDirProvider {
    fn load(&self, attribute: Attribute) -> Result<RawDictionary> {
        let path = self.path_for(attribute);
        let file = File::open(&path).map_err(|source| SimilarityError::DictionaryIo {
            attribute,
            path: path.clone(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| SimilarityError::DictionaryFormat { attribute, source })
    }
}

/// The eight typed attribute dictionaries, loaded once and shared read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionarySet {
    pub component: HashMap<String, String>,
    pub fourangle: HashMap<String, String>,
    pub frequency: HashMap<String, f64>,
    pub number: HashMap<String, f64>,
    pub pinyin: HashMap<String, Vec<String>>,
    pub stroke: HashMap<String, Vec<String>>,
    #[serde(rename = "struct")]
    pub structure: HashMap<String, String>,
    pub order: HashMap<String, String>,
}

impl DictionarySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and types every attribute dictionary from `provider`.
    pub fn load(provider: &dyn DictionaryProvider) -> Result<Self> {
        let set = Self {
            component: typed(provider, Attribute::Component)?,
            fourangle: typed(provider, Attribute::FourAngle)?,
            frequency: typed(provider, Attribute::Frequency)?,
            number: typed(provider, Attribute::Number)?,
            pinyin: typed(provider, Attribute::Pinyin)?,
            stroke: typed(provider, Attribute::Stroke)?,
            structure: typed(provider, Attribute::Struct)?,
            order: typed(provider, Attribute::Order)?,
        };
        info!(
            component = set.component.len(),
            fourangle = set.fourangle.len(),
            frequency = set.frequency.len(),
            number = set.number.len(),
            pinyin = set.pinyin.len(),
            stroke = set.stroke.len(),
            structure = set.structure.len(),
            order = set.order.len(),
            "Loaded character attribute dictionaries"
        );
        Ok(set)
    }

    pub fn from_dir(root: impl Into<PathBuf>) -> Result<Self> {
        Self::load(&JsonDirProvider::new(root))
    }

    /// Number of entries in one attribute dictionary.
    pub fn len_of(&self, attribute: Attribute) -> usize {
        match attribute {
            Attribute::Component => self.component.len(),
            Attribute::FourAngle => self.fourangle.len(),
            Attribute::Frequency => self.frequency.len(),
            Attribute::Number => self.number.len(),
            Attribute::Pinyin => self.pinyin.len(),
            Attribute::Stroke => self.stroke.len(),
            Attribute::Struct => self.structure.len(),
            Attribute::Order => self.order.len(),
        }
    }

    /// True if `ch` has an entry in at least one dictionary.
    pub fn contains(&self, ch: &str) -> bool {
        self.component.contains_key(ch)
            || self.fourangle.contains_key(ch)
            || self.frequency.contains_key(ch)
            || self.number.contains_key(ch)
            || self.pinyin.contains_key(ch)
            || self.stroke.contains_key(ch)
            || self.structure.contains_key(ch)
            || self.order.contains_key(ch)
    }
}

/// Looks up both characters and returns the pair only when both entries are present.
pub fn lookup_pair<'a, V: Presence>(
    dict: &'a HashMap<String, V>,
    char1: &str,
    char2: &str,
) -> Option<(&'a V, &'a V)> {
    let first = dict.get(char1).filter(|v| v.is_present())?;
    let second = dict.get(char2).filter(|v| v.is_present())?;
    Some((first, second))
}

fn typed<T: DeserializeOwned>(provider: &dyn DictionaryProvider, attribute: Attribute) -> Result<T> {
    let raw = provider.load(attribute)?;
    serde_json::from_value(serde_json::Value::Object(raw))
        .map_err(|source| SimilarityError::DictionaryFormat { attribute, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct MapProvider(HashMap<Attribute, serde_json::Value>);

    impl DictionaryProvider for MapProvider {
        fn load(&self, attribute: Attribute) -> Result<RawDictionary> {
            match self.0.get(&attribute) {
                Some(serde_json::Value::Object(map)) => Ok(map.clone()),
                _ => Ok(RawDictionary::new()),
            }
        }
    }

    #[test]
    fn load_types_every_attribute() {
        let mut raw = HashMap::new();
        raw.insert(Attribute::FourAngle, json!({"一": "10000"}));
        raw.insert(Attribute::Number, json!({"一": 1, "而": 6}));
        raw.insert(Attribute::Pinyin, json!({"一": ["yi", "y", "i", "1"]}));

        let set = DictionarySet::load(&MapProvider(raw)).unwrap();
        assert_eq!(set.fourangle["一"], "10000");
        assert_eq!(set.number["而"], 6.0);
        assert_eq!(set.pinyin["一"].len(), 4);
        assert_eq!(set.len_of(Attribute::Component), 0);
        assert!(set.contains("一"));
        assert!(!set.contains("他"));
    }

    #[test]
    fn load_reports_the_malformed_attribute() {
        let mut raw = HashMap::new();
        raw.insert(Attribute::Frequency, json!({"一": "often"}));

        let err = DictionarySet::load(&MapProvider(raw)).unwrap_err();
        assert!(matches!(
            err,
            SimilarityError::DictionaryFormat {
                attribute: Attribute::Frequency,
                ..
            }
        ));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let err = DictionarySet::from_dir("/nonexistent/char-similar").unwrap_err();
        assert!(matches!(err, SimilarityError::DictionaryIo { .. }));
    }

    #[test]
    fn lookup_pair_skips_falsy_entries() {
        let mut dict = HashMap::new();
        dict.insert("一".to_string(), "一".to_string());
        dict.insert("而".to_string(), String::new());

        assert!(lookup_pair(&dict, "一", "一").is_some());
        assert!(lookup_pair(&dict, "一", "而").is_none());
        assert!(lookup_pair(&dict, "一", "他").is_none());
    }
}
