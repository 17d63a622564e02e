//! Word-vector similarity used by the `w2v` and `all` profiles.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, SimilarityError};

/// External semantic similarity between two characters.
///
/// Implementations must return values in `[0, 1]` and 1 for identical input.
pub trait EmbeddingProvider: Send + Sync {
    fn similarity(&self, char1: &str, char2: &str) -> Result<f64>;

    /// Short identifier used in logs and errors.
    fn name(&self) -> &str {
        "embedding"
    }
}

/// Character vectors held in memory, compared by cosine similarity.
///
/// Negative cosines clamp to 0. A character without a vector scores 0.
#[derive(Debug, Clone, Default)]
pub struct VectorTable {
    vectors: HashMap<String, Vec<f32>>,
    dimensions: usize,
}

impl VectorTable {
    pub fn new(vectors: HashMap<String, Vec<f32>>) -> Result<Self> {
        let mut dimensions = 0;
        for (ch, vector) in &vectors {
            if dimensions == 0 {
                dimensions = vector.len();
            } else if vector.len() != dimensions {
                return Err(SimilarityError::embedding_failed(
                    "vector-table",
                    format!(
                        "dimension mismatch for {ch:?}: expected {dimensions}, got {}",
                        vector.len()
                    ),
                ));
            }
        }
        Ok(Self { vectors, dimensions })
    }

    /// Loads a JSON object mapping each character to its vector.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let vectors: HashMap<String, Vec<f32>> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| SimilarityError::embedding_failed("vector-table", e.to_string()))?;
        let table = Self::new(vectors)?;
        info!(
            entries = table.len(),
            dimensions = table.dimensions,
            path = %path.display(),
            "Loaded character vectors"
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl EmbeddingProvider for VectorTable {
    fn similarity(&self, char1: &str, char2: &str) -> Result<f64> {
        let (Some(a), Some(b)) = (self.vectors.get(char1), self.vectors.get(char2)) else {
            debug!(char1, char2, "No vector for pair, scoring 0");
            return Ok(0.0);
        };
        Ok(cosine(a, b).clamp(0.0, 1.0))
    }

    fn name(&self) -> &str {
        "vector-table"
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
