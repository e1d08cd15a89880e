//! Similarity functions for kinetic record fields.
//!
//! All functions are total and never panic. Numeric similarities follow the
//! absence rule: two missing values agree (1.0), one missing value scores 0.
//! Text similarity is the exception: two empty names never match.

use kinrec_model::{ParsedValue, QuantityKind};
use kinrec_normalization::{canonical_value, parse_value_and_unit};
use rapidfuzz::distance::levenshtein;

/// Multiplier applied to any closeness below 1, so a near match never ties
/// with an exact one in the assignment objective.
pub const INEXACT_PENALTY: f64 = 0.9;

/// Score for "same digits, different unit".
pub const MISLABELED_UNIT_CAP: f64 = 0.95;

/// Relative mantissa tolerance of the mislabeled-unit check.
const MISLABELED_UNIT_TOLERANCE: f64 = 0.01;

/// Relative tolerance when testing a ratio against an integer power.
const POWER_TOLERANCE: f64 = 1e-6;

/// Partial credit for an explicit wildtype against a missing mutation.
pub const WILDTYPE_ABSENT_CREDIT: f64 = 0.2;

const WILDTYPE_SYNONYMS: &[&str] = &["wt", "wildtype", "wild type", "native", "wt enzyme"];

/// Scores of the off-by-power check, by power of the base.
///
/// Off by a thousand is deliberately ranked above off by ten or a hundred:
/// milli/micro prefix slips are the dominant transcription error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerTiers {
    pub first: f64,
    pub second: f64,
    pub third: f64,
    /// Any other integer power >= 1.
    pub other: f64,
}

impl Default for PowerTiers {
    fn default() -> Self {
        Self {
            first: 0.80,
            second: 0.70,
            third: 0.90,
            other: 0.50,
        }
    }
}

impl PowerTiers {
    fn score(&self, power: i32) -> f64 {
        match power {
            1 => self.first,
            2 => self.second,
            3 => self.third,
            _ => self.other,
        }
    }
}

/// `1 - |a - b| / max(|a|, |b|)`, clamped to `[0, 1]`; 1 when both are 0.
pub fn relative_closeness(a: f64, b: f64) -> f64 {
    if a == b {
        return 1.0;
    }
    if !a.is_finite() || !b.is_finite() {
        return 0.0;
    }
    let max = a.abs().max(b.abs());
    (1.0 - (a - b).abs() / max).clamp(0.0, 1.0)
}

/// `cap` when the raw mantissas are within 1% of each other, else 0.
pub fn mislabeled_unit_similarity(a_mantissa: f64, b_mantissa: f64, cap: f64) -> f64 {
    if !a_mantissa.is_finite() || !b_mantissa.is_finite() {
        return 0.0;
    }
    if a_mantissa == b_mantissa {
        return cap;
    }
    let max = a_mantissa.abs().max(b_mantissa.abs());
    if (a_mantissa - b_mantissa).abs() / max <= MISLABELED_UNIT_TOLERANCE {
        cap
    } else {
        0.0
    }
}

/// Power `n >= 1` with `max(a, b) / min(a, b) ≈ base^n`, if any.
///
/// Both values must be strictly positive; equal values (power 0) never match.
pub fn power_of_base(a: f64, b: f64, base: f64) -> Option<i32> {
    if !(a > 0.0 && b > 0.0 && a.is_finite() && b.is_finite() && base > 1.0) {
        return None;
    }
    let ratio = a.max(b) / a.min(b);
    let power = (ratio.ln() / base.ln()).round();
    if !(1.0..=f64::from(i32::MAX)).contains(&power) {
        return None;
    }
    let power = power as i32;
    let expected = base.powi(power);
    ((ratio - expected).abs() <= expected * POWER_TOLERANCE).then_some(power)
}

/// Tier score when the two canonical values differ by an integer power of
/// `base`, else 0. Symmetric in its arguments.
pub fn off_by_power_similarity(a: f64, b: f64, base: f64, tiers: &PowerTiers) -> f64 {
    power_of_base(a, b, base).map_or(0.0, |power| tiers.score(power))
}

/// The factor itself (`base^n`, e.g. `1000.0`) instead of a tier score.
/// Used to report diagnostics.
pub fn off_by_power_factor(a: f64, b: f64, base: f64) -> Option<f64> {
    power_of_base(a, b, base).map(|power| base.powi(power))
}

/// Similarity of two measurement strings of the same quantity kind.
///
/// Unparseable text counts as absent.
pub fn value_similarity(a: Option<&str>, b: Option<&str>, kind: QuantityKind, base: f64) -> f64 {
    let a = a.map(parse_value_and_unit);
    let b = b.map(parse_value_and_unit);
    parsed_value_similarity(a.as_ref(), b.as_ref(), kind, base)
}

/// [`value_similarity`] over already-parsed values.
///
/// The best of three explanations wins: plain closeness (penalized unless
/// exact), a mislabeled unit, or an off-by-power error. They are not summed.
pub fn parsed_value_similarity(
    a: Option<&ParsedValue>,
    b: Option<&ParsedValue>,
    kind: QuantityKind,
    base: f64,
) -> f64 {
    let a = a.filter(|parsed| !parsed.is_missing());
    let b = b.filter(|parsed| !parsed.is_missing());
    let (a, b) = match (a, b) {
        (None, None) => return 1.0,
        (Some(a), Some(b)) => (a, b),
        _ => return 0.0,
    };
    let (Some(a_value), Some(b_value)) = (canonical_value(a, kind), canonical_value(b, kind))
    else {
        return 0.0;
    };

    let mut closeness = relative_closeness(a_value, b_value);
    if closeness < 1.0 {
        closeness *= INEXACT_PENALTY;
    }
    let mislabeled = mislabeled_unit_similarity(a.mantissa, b.mantissa, MISLABELED_UNIT_CAP);
    let off_by_power = off_by_power_similarity(a_value, b_value, base, &PowerTiers::default());

    closeness.max(mislabeled).max(off_by_power)
}

/// Normalized Levenshtein similarity of two names, ignoring case and
/// surrounding whitespace. Missing or empty names score 0.
pub fn string_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (non_empty(a), non_empty(b)) else {
        return 0.0;
    };
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    levenshtein::normalized_similarity(a.chars(), b.chars())
}

/// Equivalence of two mutation descriptions.
pub fn categorical_equivalence(a: Option<&str>, b: Option<&str>) -> f64 {
    match (non_empty(a), non_empty(b)) {
        (None, None) => 1.0,
        (Some(one), None) | (None, Some(one)) => {
            if is_wildtype(one) {
                WILDTYPE_ABSENT_CREDIT
            } else {
                0.0
            }
        }
        (Some(a), Some(b)) => {
            if is_wildtype(a) && is_wildtype(b) {
                1.0
            } else if canonical_mutation(a) == canonical_mutation(b) {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// Whether `text` names the wildtype enzyme.
pub fn is_wildtype(text: &str) -> bool {
    let normalized = text
        .trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    WILDTYPE_SYNONYMS.contains(&normalized.as_str())
}

/// Uppercase, whitespace-free mutation code with multiple substitutions in
/// sorted order, so `"a123g / y45f"` equals `"Y45F/A123G"`.
pub fn canonical_mutation(text: &str) -> String {
    let mut parts: Vec<String> = text
        .split(['/', ',', ';', '+'])
        .map(|part| {
            part.chars()
                .filter(|ch| !ch.is_whitespace())
                .collect::<String>()
                .to_uppercase()
        })
        .filter(|part| !part.is_empty())
        .collect();
    parts.sort();
    parts.join("/")
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

/// Splits `value` into a mantissa in `[1, base)` and an integer exponent.
///
/// Zero splits as `(0, 0)`; the sign is dropped. `None` for non-finite input.
pub fn split_mantissa_exponent(value: f64, base: f64) -> Option<(f64, i32)> {
    if !value.is_finite() || !(base > 1.0) {
        return None;
    }
    let magnitude = value.abs();
    if magnitude == 0.0 {
        return Some((0.0, 0));
    }
    let estimate = (magnitude.ln() / base.ln()).floor();
    let mut exponent = estimate as i32;
    let mut mantissa = magnitude / base.powi(exponent);
    if mantissa >= base {
        mantissa /= base;
        exponent += 1;
    } else if mantissa < 1.0 {
        mantissa *= base;
        exponent -= 1;
    }
    Some((mantissa, exponent))
}

/// Default exponent penalty: linear in the exponent distance, except that a
/// distance of 3 (off by a thousand) is discounted.
pub fn default_exponent_penalty(distance: u32) -> f64 {
    match distance {
        3 => 0.5,
        n => f64::from(n),
    }
}

/// `1 / (1 + alpha·|Δmantissa| + beta·penalty(|Δexponent|))`.
///
/// Non-finite inputs score 0.
pub fn mantissa_exponent_similarity<P>(
    a: f64,
    b: f64,
    alpha: f64,
    beta: f64,
    base: f64,
    exponent_penalty: P,
) -> f64
where
    P: Fn(u32) -> f64,
{
    let (Some((a_mantissa, a_exponent)), Some((b_mantissa, b_exponent))) = (
        split_mantissa_exponent(a, base),
        split_mantissa_exponent(b, base),
    ) else {
        return 0.0;
    };
    let distance = a_exponent.abs_diff(b_exponent);
    let penalty = alpha * (a_mantissa - b_mantissa).abs() + beta * exponent_penalty(distance);
    let score = 1.0 / (1.0 + penalty);
    if score.is_finite() { score.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closeness_handles_zero() {
        assert_eq!(relative_closeness(0.0, 0.0), 1.0);
        assert_eq!(relative_closeness(0.0, 5.0), 0.0);
        assert!((relative_closeness(9.0, 10.0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn power_detection() {
        assert_eq!(power_of_base(10.0, 0.01, 10.0), Some(3));
        assert_eq!(power_of_base(1.0, 3600.0, 60.0), Some(2));
        assert_eq!(power_of_base(2.0, 2.0, 10.0), None);
        assert_eq!(power_of_base(2.0, 3.0, 10.0), None);
        assert_eq!(power_of_base(-1.0, 10.0, 10.0), None);
    }

    #[test]
    fn tiers_rank_thousand_highest() {
        let tiers = PowerTiers::default();
        assert_eq!(off_by_power_similarity(1.0, 10.0, 10.0, &tiers), 0.80);
        assert_eq!(off_by_power_similarity(1.0, 100.0, 10.0, &tiers), 0.70);
        assert_eq!(off_by_power_similarity(1.0, 1000.0, 10.0, &tiers), 0.90);
        assert_eq!(off_by_power_similarity(1.0, 1e6, 10.0, &tiers), 0.50);
        assert_eq!(off_by_power_factor(1.0, 1e6, 10.0), Some(1e6));
    }

    #[test]
    fn mislabeled_unit_within_one_percent() {
        assert_eq!(mislabeled_unit_similarity(2.3, 2.31, 0.95), 0.95);
        assert_eq!(mislabeled_unit_similarity(2.3, 2.5, 0.95), 0.0);
        assert_eq!(mislabeled_unit_similarity(f64::NAN, 2.5, 0.95), 0.0);
    }

    #[test]
    fn wildtype_synonyms() {
        assert!(is_wildtype("Wild-type"));
        assert!(is_wildtype(" WT "));
        assert!(!is_wildtype("W42A"));
    }

    #[test]
    fn mantissa_exponent_split() {
        assert_eq!(split_mantissa_exponent(1000.0, 10.0), Some((1.0, 3)));
        assert_eq!(split_mantissa_exponent(120.0, 60.0), Some((2.0, 1)));
        let (mantissa, exponent) = split_mantissa_exponent(0.05, 10.0).expect("split");
        assert!((mantissa - 5.0).abs() < 1e-9);
        assert_eq!(exponent, -2);
    }
}
