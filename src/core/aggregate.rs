// File: src/core/aggregate.rs
use crate::core::dictionary::DictionarySet;
use crate::core::profile::ShapeWeights;
use crate::core::scorers;
use crate::core::types::Attribute;

/// Weighted sum of sub-scores over the sum of their weights, for one computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreAccumulator {
    pub numerator: f64,
    pub denominator: f64,
}

impl ScoreAccumulator {
    pub fn add(&mut self, score: f64, weight: f64) {
        self.numerator += score * weight;
        self.denominator += weight;
    }
}

/// Runs the seven shape scorers and sums them under `weights`.
pub fn base_aggregate(
    dicts: &DictionarySet,
    weights: &ShapeWeights,
    code_length: usize,
    char1: &str,
    char2: &str,
) -> ScoreAccumulator {
    let mut acc = ScoreAccumulator::default();
    for (attribute, weight) in weights.entries() {
        acc.add(shape_score(dicts, attribute, code_length, char1, char2), weight);
    }
    acc
}

/// One shape attribute's sub-score. Pinyin is not a shape attribute and scores 0 here.
pub fn shape_score(
    dicts: &DictionarySet,
    attribute: Attribute,
    code_length: usize,
    char1: &str,
    char2: &str,
) -> f64 {
    match attribute {
        Attribute::Component => scorers::component_score(dicts, char1, char2),
        Attribute::FourAngle => scorers::fourangle_score(dicts, char1, char2, code_length),
        Attribute::Frequency => scorers::frequency_score(dicts, char1, char2),
        Attribute::Number => scorers::number_score(dicts, char1, char2),
        Attribute::Stroke => scorers::stroke_score(dicts, char1, char2),
        Attribute::Struct => scorers::struct_score(dicts, char1, char2),
        Attribute::Order => scorers::order_score(dicts, char1, char2),
        Attribute::Pinyin => 0.0,
    }
}

/// The `shape` profile result.
pub fn finalize_shape(acc: ScoreAccumulator) -> f64 {
    if acc.denominator == 0.0 {
        return 0.0;
    }
    acc.numerator / acc.denominator
}

/// Merges one extra signal into the base aggregate without recomputing it.
pub fn blend(acc: ScoreAccumulator, extra_score: f64, extra_weight: f64) -> f64 {
    blend_many(acc, &[(extra_score, extra_weight)])
}

/// Merges several extra signals in one combined division.
pub fn blend_many(acc: ScoreAccumulator, extras: &[(f64, f64)]) -> f64 {
    let mut combined = acc;
    for &(score, weight) in extras {
        combined.add(score, weight);
    }
    finalize_shape(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_characters_aggregate_to_zero_over_full_weight() {
        let dicts = DictionarySet::new();
        let acc = base_aggregate(&dicts, &ShapeWeights::default(), 4, "一", "而");
        assert_eq!(acc.numerator, 0.0);
        assert_eq!(acc.denominator, 35.0);
        assert_eq!(finalize_shape(acc), 0.0);
    }

    #[test]
    fn denominator_follows_the_weight_table() {
        let dicts = DictionarySet::new();
        let weights = ShapeWeights {
            order: 13.0,
            ..ShapeWeights::default()
        };
        let acc = base_aggregate(&dicts, &weights, 4, "一", "而");
        assert_eq!(acc.denominator, 45.0);
    }

    #[test]
    fn blend_moves_toward_the_extra_signal() {
        let acc = ScoreAccumulator {
            numerator: 17.5,
            denominator: 35.0,
        };
        assert_eq!(finalize_shape(acc), 0.5);
        assert_eq!(blend(acc, 1.0, 35.0), 0.75);
        assert_eq!(blend(acc, 0.0, 35.0), 0.25);
        assert_eq!(blend(acc, 0.5, 35.0), 0.5);
    }

    #[test]
    fn combined_blend_is_one_division() {
        let acc = ScoreAccumulator {
            numerator: 35.0,
            denominator: 35.0,
        };
        // (35 + 0 + 35) / (35 + 35 + 35)
        let all = blend_many(acc, &[(0.0, 35.0), (1.0, 35.0)]);
        assert!((all - 2.0 / 3.0).abs() < 1e-12);
        let sequential = blend(
            ScoreAccumulator {
                numerator: 35.0,
                denominator: 70.0,
            },
            1.0,
            35.0,
        );
        assert!((all - sequential).abs() < 1e-12);
    }

    #[test]
    fn empty_accumulator_finalizes_to_zero() {
        assert_eq!(finalize_shape(ScoreAccumulator::default()), 0.0);
    }
}
