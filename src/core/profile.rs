// File: src/core/profile.rs
use crate::core::types::Attribute;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Weighting profile selected per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// The seven shape attributes only.
    #[default]
    Shape,
    /// Shape plus the pinyin reading signal.
    Pinyin,
    /// Shape plus the word-vector signal.
    W2v,
    /// Shape plus both extra signals.
    All,
}

impl Profile {
    /// Case-insensitive parse. Unrecognized names, including names with
    /// surrounding whitespace, fall back to [`Profile::Shape`].
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "shape" => Profile::Shape,
            "pinyin" => Profile::Pinyin,
            "w2v" => Profile::W2v,
            "all" => Profile::All,
            other => {
                warn!(profile = other, "Unknown similarity profile, using shape");
                Profile::Shape
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Profile::Shape => "shape",
            Profile::Pinyin => "pinyin",
            Profile::W2v => "w2v",
            Profile::All => "all",
        }
    }

    pub fn uses_pinyin(self) -> bool {
        matches!(self, Profile::Pinyin | Profile::All)
    }

    pub fn uses_embedding(self) -> bool {
        matches!(self, Profile::W2v | Profile::All)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weights of the seven shape attributes in the base aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeWeights {
    pub component: f64,
    pub fourangle: f64,
    pub frequency: f64,
    pub number: f64,
    pub stroke: f64,
    #[serde(rename = "struct")]
    pub structure: f64,
    pub order: f64,
}

impl Default for ShapeWeights {
    fn default() -> Self {
        Self {
            component: 2.0,
            fourangle: 7.0,
            frequency: 5.0,
            number: 6.0,
            stroke: 4.0,
            structure: 8.0,
            order: 3.0,
        }
    }
}

impl ShapeWeights {
    pub fn entries(&self) -> [(Attribute, f64); 7] {
        [
            (Attribute::Component, self.component),
            (Attribute::FourAngle, self.fourangle),
            (Attribute::Frequency, self.frequency),
            (Attribute::Number, self.number),
            (Attribute::Stroke, self.stroke),
            (Attribute::Struct, self.structure),
            (Attribute::Order, self.order),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }
}

/// Weights of the extra signals blended on top of the shape aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub pinyin: f64,
    pub embedding: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            pinyin: 35.0,
            embedding: 35.0,
        }
    }
}
