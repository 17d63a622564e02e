//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::profile::{BlendWeights, ShapeWeights};
use crate::error::{Result, SimilarityError};

/// Environment variable naming the attribute dictionary directory.
pub const DATA_DIR_ENV: &str = "CHAR_SIMILAR_DATA_DIR";

const MAX_ROUNDING: u32 = 15;

/// When a missing embedding provider is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingPolicy {
    /// Fail on the first call that selects `w2v` or `all`.
    #[default]
    Lazy,
    /// Fail at engine construction.
    Eager,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Digits of the four-corner code (and pinyin components) compared.
    pub code_length: usize,
    /// Default decimal places of results.
    pub rounding: u32,
    pub weights: ShapeWeights,
    pub blend: BlendWeights,
    pub embedding_policy: EmbeddingPolicy,
    /// Directory holding the `char_<attribute>.dict` files.
    pub data_dir: Option<PathBuf>,
    /// Optional JSON file of character vectors for the embedding signal.
    pub vectors_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            code_length: 4,
            rounding: 4,
            weights: ShapeWeights::default(),
            blend: BlendWeights::default(),
            embedding_policy: EmbeddingPolicy::default(),
            data_dir: None,
            vectors_path: None,
        }
    }
}

impl EngineConfig {
    pub fn new(code_length: usize, rounding: u32) -> Self {
        Self {
            code_length,
            rounding,
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file; absent fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimilarityError::invalid_config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: EngineConfig = serde_json::from_str(&content).map_err(|e| {
            SimilarityError::invalid_config(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.code_length == 0 {
            return Err(SimilarityError::invalid_config(
                "code_length must be greater than 0",
            ));
        }
        if self.rounding > MAX_ROUNDING {
            return Err(SimilarityError::invalid_config(format!(
                "rounding must be at most {MAX_ROUNDING}, got {}",
                self.rounding
            )));
        }
        validate_weights(&self.weights, &self.blend)
    }

    /// Explicit `data_dir`, else `CHAR_SIMILAR_DATA_DIR`, else the user data directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        default_data_dir()
    }
}

/// Every shape and blend weight must be a finite positive number.
pub fn validate_weights(weights: &ShapeWeights, blend: &BlendWeights) -> Result<()> {
    let named = weights
        .entries()
        .into_iter()
        .map(|(attr, w)| (attr.name(), w))
        .chain([("pinyin_blend", blend.pinyin), ("embedding_blend", blend.embedding)]);
    for (name, weight) in named {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(SimilarityError::invalid_config(format!(
                "weight '{name}' must be a positive number, got {weight}"
            )));
        }
    }
    Ok(())
}

pub fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("char-similar");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.code_length, 4);
        assert_eq!(config.rounding, 4);
        assert_eq!(config.embedding_policy, EmbeddingPolicy::Lazy);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(EngineConfig::new(0, 4).validate().is_err());
        assert!(EngineConfig::new(4, 16).validate().is_err());

        let mut config = EngineConfig::default();
        config.weights.stroke = 0.0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("stroke"), "got: {err}");

        let mut config = EngineConfig::default();
        config.blend.embedding = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"code_length": 5, "weights": {{"struct": 10}}, "embedding_policy": "eager"}}"#
        )
        .unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.code_length, 5);
        assert_eq!(config.rounding, 4);
        assert_eq!(config.weights.structure, 10.0);
        assert_eq!(config.weights.fourangle, 7.0);
        assert_eq!(config.blend.pinyin, 35.0);
        assert_eq!(config.embedding_policy, EmbeddingPolicy::Eager);
    }

    #[test]
    fn from_file_reports_unreadable_and_invalid_files() {
        let missing = EngineConfig::from_file(Path::new("/nonexistent/engine.json"));
        assert!(matches!(missing, Err(SimilarityError::InvalidConfig(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"code_length": 0}}"#).unwrap();
        assert!(EngineConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = EngineConfig {
            data_dir: Some(PathBuf::from("/srv/dicts")),
            ..EngineConfig::default()
        };
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/srv/dicts"));
        assert!(default_data_dir().ends_with("char-similar"));
    }
}
