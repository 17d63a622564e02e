// src/lib.rs

pub mod c_api;
pub mod config;
pub mod core;
pub mod embedding;
pub mod error;
pub mod persistence;

pub use crate::config::{EmbeddingPolicy, EngineConfig};
pub use crate::core::dictionary::{DictionaryProvider, DictionarySet, JsonDirProvider};
pub use crate::core::engine::SimilarityEngine;
pub use crate::core::profile::Profile;
pub use crate::core::types::{Attribute, ScoreBreakdown, SimilarityReport};
pub use crate::embedding::{EmbeddingProvider, VectorTable};
pub use crate::error::{Result, SimilarityError};
