// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::profile::Profile;
use crate::error::SimilarityError;

/// The eight attribute dictionaries a character can be looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Component,
    FourAngle,
    Frequency,
    Number,
    Pinyin,
    Stroke,
    Struct,
    Order,
}

impl Attribute {
    pub const ALL: [Attribute; 8] = [
        Attribute::Component,
        Attribute::FourAngle,
        Attribute::Frequency,
        Attribute::Number,
        Attribute::Pinyin,
        Attribute::Stroke,
        Attribute::Struct,
        Attribute::Order,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Component => "component",
            Attribute::FourAngle => "fourangle",
            Attribute::Frequency => "frequency",
            Attribute::Number => "number",
            Attribute::Pinyin => "pinyin",
            Attribute::Stroke => "stroke",
            Attribute::Struct => "struct",
            Attribute::Order => "order",
        }
    }

    /// File name of the bundled JSON dictionary, e.g. `char_fourangle.dict`.
    pub fn file_name(self) -> String {
        format!("char_{}.dict", self.name())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = SimilarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SimilarityError::UnknownAttribute(s.to_string()))
    }
}

/// Whether a dictionary value counts as data.
///
/// Empty strings, empty sequences and zero numbers contribute nothing, exactly
/// like a missing entry.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for Vec<String> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for f64 {
    fn is_present(&self) -> bool {
        *self != 0.0 && self.is_finite()
    }
}

/// Every per-attribute sub-score for one pair, plus the shape aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub component: f64,
    pub fourangle: f64,
    pub frequency: f64,
    pub number: f64,
    pub stroke: f64,
    #[serde(rename = "struct")]
    pub structure: f64,
    pub order: f64,
    pub pinyin: f64,
    pub shape: f64,
}

/// A scored pair: the rounded profile score alongside its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    pub char1: String,
    pub char2: String,
    pub profile: Profile,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_names_round_trip_through_from_str() {
        for attr in Attribute::ALL {
            assert_eq!(attr.name().parse::<Attribute>().unwrap(), attr);
        }
        assert_eq!("FourAngle".parse::<Attribute>().unwrap(), Attribute::FourAngle);
        assert!("radical".parse::<Attribute>().is_err());
    }

    #[test]
    fn file_names_follow_bundle_layout() {
        assert_eq!(Attribute::Struct.file_name(), "char_struct.dict");
        assert_eq!(Attribute::FourAngle.file_name(), "char_fourangle.dict");
    }

    #[test]
    fn falsy_values_are_not_present() {
        assert!(!String::new().is_present());
        assert!(!Vec::<String>::new().is_present());
        assert!(!0.0_f64.is_present());
        assert!(!f64::NAN.is_present());
        assert!("一".to_string().is_present());
        assert!(6.0_f64.is_present());
    }
}
