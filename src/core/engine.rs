use crate::config::{validate_weights, EmbeddingPolicy, EngineConfig};
use crate::core::aggregate::{self, ScoreAccumulator};
use crate::core::dictionary::DictionarySet;
use crate::core::profile::{BlendWeights, Profile, ShapeWeights};
use crate::core::scorers;
use crate::core::types::{Attribute, ScoreBreakdown, SimilarityReport};
use crate::embedding::{EmbeddingProvider, VectorTable};
use crate::error::{Result, SimilarityError};
use crate::persistence;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_CODE_LENGTH: usize = 4;
const DEFAULT_ROUNDING: u32 = 4;
const SNAPSHOT_FILE: &str = "dictionaries.bin";

/// Scores how alike two single Chinese characters are.
///
/// The engine owns no mutable state: dictionaries are shared behind an `Arc`
/// and every call to [`SimilarityEngine::compute`] is independent, so one
/// engine can serve many threads.
#[derive(Clone)]
pub struct SimilarityEngine {
    dictionaries: Arc<DictionarySet>,
    code_length: usize,
    rounding: u32,
    weights: ShapeWeights,
    blend: BlendWeights,
    embedding: Option<Arc<dyn EmbeddingProvider>>,
}

impl SimilarityEngine {
    pub fn new(dictionaries: Arc<DictionarySet>) -> Self {
        Self::with_params(dictionaries, DEFAULT_CODE_LENGTH, DEFAULT_ROUNDING)
    }

    pub fn with_params(dictionaries: Arc<DictionarySet>, code_length: usize, rounding: u32) -> Self {
        Self {
            dictionaries,
            code_length,
            rounding,
            weights: ShapeWeights::default(),
            blend: BlendWeights::default(),
            embedding: None,
        }
    }

    /// Builds an engine from a validated config.
    ///
    /// With [`EmbeddingPolicy::Eager`] a missing provider is an error here
    /// instead of on the first `w2v`/`all` call.
    pub fn from_config(
        dictionaries: Arc<DictionarySet>,
        config: &EngineConfig,
        embedding: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Result<Self> {
        config.validate()?;
        if config.embedding_policy == EmbeddingPolicy::Eager && embedding.is_none() {
            return Err(SimilarityError::embedding_unavailable("w2v/all"));
        }
        Ok(Self {
            dictionaries,
            code_length: config.code_length,
            rounding: config.rounding,
            weights: config.weights,
            blend: config.blend,
            embedding,
        })
    }

    /// Loads dictionaries (snapshot first, JSON directory otherwise) and the
    /// optional vector table named by `config`.
    pub fn open(config: &EngineConfig) -> Result<Self> {
        let data_dir = config.resolve_data_dir();
        let snapshot = data_dir.join(SNAPSHOT_FILE);
        let dictionaries = persistence::from_snapshot_or_dir(&snapshot, &data_dir)?;
        let embedding = match &config.vectors_path {
            Some(path) => {
                Some(Arc::new(VectorTable::from_json_file(path)?) as Arc<dyn EmbeddingProvider>)
            }
            None => None,
        };
        Self::from_config(Arc::new(dictionaries), config, embedding)
    }

    pub fn with_embedding(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding = Some(provider);
        self
    }

    /// Replaces the shape weights; each must be finite and positive.
    pub fn with_weights(mut self, weights: ShapeWeights) -> Result<Self> {
        validate_weights(&weights, &self.blend)?;
        self.weights = weights;
        Ok(self)
    }

    pub fn with_blend(mut self, blend: BlendWeights) -> Result<Self> {
        validate_weights(&self.weights, &blend)?;
        self.blend = blend;
        Ok(self)
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    pub fn rounding(&self) -> u32 {
        self.rounding
    }

    pub fn dictionaries(&self) -> &Arc<DictionarySet> {
        &self.dictionaries
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    pub fn fourangle_score(&self, char1: &str, char2: &str) -> f64 {
        scorers::fourangle_score(&self.dictionaries, char1, char2, self.code_length)
    }

    pub fn pinyin_score(&self, char1: &str, char2: &str) -> f64 {
        scorers::pinyin_score(&self.dictionaries, char1, char2, self.code_length)
    }

    /// Sub-score of any single attribute.
    pub fn attribute_score(&self, attribute: Attribute, char1: &str, char2: &str) -> f64 {
        match attribute {
            Attribute::Pinyin => self.pinyin_score(char1, char2),
            shape => aggregate::shape_score(&self.dictionaries, shape, self.code_length, char1, char2),
        }
    }

    /// Delegates to the injected provider; absence is reported, never defaulted.
    pub fn embedding_score(&self, char1: &str, char2: &str, profile: Profile) -> Result<f64> {
        let provider = self
            .embedding
            .as_ref()
            .ok_or_else(|| SimilarityError::embedding_unavailable(profile.name()))?;
        let score = provider.similarity(char1, char2)?;
        if !(0.0..=1.0).contains(&score) {
            return Err(SimilarityError::embedding_failed(
                provider.name(),
                format!("similarity {score} is outside [0, 1]"),
            ));
        }
        Ok(score)
    }

    pub fn base_aggregate(&self, char1: &str, char2: &str) -> ScoreAccumulator {
        aggregate::base_aggregate(&self.dictionaries, &self.weights, self.code_length, char1, char2)
    }

    /// Similarity of two characters under the named profile.
    ///
    /// Unknown profile names fall back to `shape`. The result is rounded to
    /// `rounding` places if given, otherwise to the engine default.
    pub fn compute(&self, char1: &str, char2: &str, profile: &str, rounding: Option<u32>) -> Result<f64> {
        self.compute_profile(char1, char2, Profile::parse(profile), rounding)
    }

    pub fn compute_profile(
        &self,
        char1: &str,
        char2: &str,
        profile: Profile,
        rounding: Option<u32>,
    ) -> Result<f64> {
        let raw = self.compute_raw(char1, char2, profile)?;
        Ok(round_to(raw, rounding.unwrap_or(self.rounding)))
    }

    /// Unrounded similarity.
    pub fn compute_raw(&self, char1: &str, char2: &str, profile: Profile) -> Result<f64> {
        validate_char("char1", char1)?;
        validate_char("char2", char2)?;

        let acc = self.base_aggregate(char1, char2);
        let result = match profile {
            Profile::Shape => aggregate::finalize_shape(acc),
            Profile::Pinyin => {
                aggregate::blend(acc, self.pinyin_score(char1, char2), self.blend.pinyin)
            }
            Profile::W2v => {
                let semantic = self.embedding_score(char1, char2, profile)?;
                aggregate::blend(acc, semantic, self.blend.embedding)
            }
            Profile::All => {
                let semantic = self.embedding_score(char1, char2, profile)?;
                aggregate::blend_many(
                    acc,
                    &[
                        (self.pinyin_score(char1, char2), self.blend.pinyin),
                        (semantic, self.blend.embedding),
                    ],
                )
            }
        };
        debug!(char1, char2, %profile, result, "Computed character similarity");
        Ok(result)
    }

    /// Every sub-score for a pair, for inspection.
    pub fn breakdown(&self, char1: &str, char2: &str) -> Result<ScoreBreakdown> {
        validate_char("char1", char1)?;
        validate_char("char2", char2)?;
        let score = |attr| self.attribute_score(attr, char1, char2);
        Ok(ScoreBreakdown {
            component: score(Attribute::Component),
            fourangle: score(Attribute::FourAngle),
            frequency: score(Attribute::Frequency),
            number: score(Attribute::Number),
            stroke: score(Attribute::Stroke),
            structure: score(Attribute::Struct),
            order: score(Attribute::Order),
            pinyin: score(Attribute::Pinyin),
            shape: aggregate::finalize_shape(self.base_aggregate(char1, char2)),
        })
    }

    /// The profile score together with the per-attribute breakdown.
    pub fn report(
        &self,
        char1: &str,
        char2: &str,
        profile: Profile,
        rounding: Option<u32>,
    ) -> Result<SimilarityReport> {
        Ok(SimilarityReport {
            char1: char1.to_string(),
            char2: char2.to_string(),
            profile,
            score: self.compute_profile(char1, char2, profile, rounding)?,
            breakdown: self.breakdown(char1, char2)?,
        })
    }

    pub fn compute_batch(
        &self,
        pairs: &[(String, String)],
        profile: &str,
        rounding: Option<u32>,
    ) -> Result<Vec<f64>> {
        let profile = Profile::parse(profile);
        let mut results = Vec::with_capacity(pairs.len());
        for (a, b) in pairs {
            results.push(self.compute_profile(a, b, profile, rounding)?);
        }
        Ok(results)
    }
}

// One engine is shared across threads by the C ABI and by callers.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SimilarityEngine>();
};

impl fmt::Debug for SimilarityEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityEngine")
            .field("code_length", &self.code_length)
            .field("rounding", &self.rounding)
            .field("weights", &self.weights)
            .field("blend", &self.blend)
            .field("embedding", &self.embedding.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}

/// Rejects anything that is not exactly one Unicode scalar value.
pub fn validate_char(argument: &'static str, value: &str) -> Result<()> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(_), None) => Ok(()),
        _ => Err(SimilarityError::malformed_input(argument, value)),
    }
}

/// Rounds to `places` decimal places. Exact ties go to the even digit, as
/// Python's `round` does, so `round_to(0.125, 2)` is `0.12`.
pub fn round_to(value: f64, places: u32) -> f64 {
    // beyond f64 precision
    if places > 15 {
        return value;
    }
    let factor = 10_f64.powi(places as i32);
    (value * factor).round_ties_even() / factor
}
