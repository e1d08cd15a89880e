//! Unit token table and per-unit scale factors.
//!
//! Tokens are tried in table order and the first one the text starts with
//! wins, so a token must come before every shorter token that is a prefix
//! of it (`"M^-1 s^-1"` before `"M"`, `"/sec"` before `"/s"`).
//!
//! Rate tokens match in any case (`Min^-1`, `SEC-1`). Tokens carrying a
//! molar prefix match exactly, since `mM` and `MM` differ by a factor of
//! a thousand.

use kinrec_model::{QuantityKind, Unit};

/// Recognized spellings, in match order. Spaces inside a token match one
/// space in the tidied input; see [`tidy_unit_text`].
pub const UNIT_TOKENS: &[(&str, Unit)] = &[
    // Specificity constants
    ("M^-1 s^-1", Unit::PerMolarPerSecond),
    ("M^-1s^-1", Unit::PerMolarPerSecond),
    ("M-1 s-1", Unit::PerMolarPerSecond),
    ("M-1s-1", Unit::PerMolarPerSecond),
    ("M^-1 sec^-1", Unit::PerMolarPerSecond),
    ("s^-1 M^-1", Unit::PerMolarPerSecond),
    ("s-1 M-1", Unit::PerMolarPerSecond),
    ("/M/s", Unit::PerMolarPerSecond),
    ("mM^-1 s^-1", Unit::PerMillimolarPerSecond),
    ("mM^-1s^-1", Unit::PerMillimolarPerSecond),
    ("mM-1 s-1", Unit::PerMillimolarPerSecond),
    ("mM-1s-1", Unit::PerMillimolarPerSecond),
    ("s^-1 mM^-1", Unit::PerMillimolarPerSecond),
    ("s-1 mM-1", Unit::PerMillimolarPerSecond),
    ("/mM/s", Unit::PerMillimolarPerSecond),
    ("µM^-1 s^-1", Unit::PerMicromolarPerSecond),
    ("µM^-1s^-1", Unit::PerMicromolarPerSecond),
    ("µM-1 s-1", Unit::PerMicromolarPerSecond),
    ("µM-1s-1", Unit::PerMicromolarPerSecond),
    ("s^-1 µM^-1", Unit::PerMicromolarPerSecond),
    ("s-1 µM-1", Unit::PerMicromolarPerSecond),
    ("/µM/s", Unit::PerMicromolarPerSecond),
    ("nM^-1 s^-1", Unit::PerNanomolarPerSecond),
    ("nM^-1s^-1", Unit::PerNanomolarPerSecond),
    ("nM-1 s-1", Unit::PerNanomolarPerSecond),
    ("s^-1 nM^-1", Unit::PerNanomolarPerSecond),
    ("M^-1 min^-1", Unit::PerMolarPerMinute),
    ("M^-1min^-1", Unit::PerMolarPerMinute),
    ("M-1 min-1", Unit::PerMolarPerMinute),
    ("min^-1 M^-1", Unit::PerMolarPerMinute),
    ("mM^-1 min^-1", Unit::PerMillimolarPerMinute),
    ("mM^-1min^-1", Unit::PerMillimolarPerMinute),
    ("mM-1 min-1", Unit::PerMillimolarPerMinute),
    ("min^-1 mM^-1", Unit::PerMillimolarPerMinute),
    ("µM^-1 min^-1", Unit::PerMicromolarPerMinute),
    ("µM^-1min^-1", Unit::PerMicromolarPerMinute),
    ("µM-1 min-1", Unit::PerMicromolarPerMinute),
    ("min^-1 µM^-1", Unit::PerMicromolarPerMinute),
    // Rate constants
    ("msec^-1", Unit::MilliPerSecond),
    ("ms^-1", Unit::MilliPerSecond),
    ("ms-1", Unit::MilliPerSecond),
    ("sec^-1", Unit::PerSecond),
    ("sec-1", Unit::PerSecond),
    ("s^-1", Unit::PerSecond),
    ("s-1", Unit::PerSecond),
    ("1/sec", Unit::PerSecond),
    ("1/s", Unit::PerSecond),
    ("/sec", Unit::PerSecond),
    ("/s", Unit::PerSecond),
    ("min^-1", Unit::PerMinute),
    ("min-1", Unit::PerMinute),
    ("1/min", Unit::PerMinute),
    ("/min", Unit::PerMinute),
    ("hr^-1", Unit::PerHour),
    ("hr-1", Unit::PerHour),
    ("h^-1", Unit::PerHour),
    ("h-1", Unit::PerHour),
    ("1/hr", Unit::PerHour),
    ("1/h", Unit::PerHour),
    ("/hr", Unit::PerHour),
    ("/h", Unit::PerHour),
    // Concentrations
    ("mmol/L", Unit::Millimolar),
    ("mmol/l", Unit::Millimolar),
    ("mM", Unit::Millimolar),
    ("µmol/L", Unit::Micromolar),
    ("µmol/l", Unit::Micromolar),
    ("µM", Unit::Micromolar),
    ("nmol/L", Unit::Nanomolar),
    ("nmol/l", Unit::Nanomolar),
    ("nM", Unit::Nanomolar),
    ("pmol/L", Unit::Picomolar),
    ("pM", Unit::Picomolar),
    ("fM", Unit::Femtomolar),
    ("mol/L", Unit::Molar),
    ("mol/l", Unit::Molar),
    ("M", Unit::Molar),
];

/// Exact conversion to the canonical unit: `value * mul / div`.
///
/// Kept as a rational pair so that conversions such as `33000 / 1000`
/// are exact rather than going through an inexact `0.001`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub mul: f64,
    pub div: f64,
}

impl Scale {
    const fn new(mul: f64, div: f64) -> Self {
        Self { mul, div }
    }

    pub fn apply(&self, value: f64) -> f64 {
        value * self.mul / self.div
    }

    pub fn factor(&self) -> f64 {
        self.mul / self.div
    }
}

/// Scale factor of `unit` relative to the canonical unit of its kind.
pub fn scale(unit: Unit) -> Scale {
    match unit {
        Unit::PerSecond => Scale::new(1.0, 1.0),
        Unit::PerMinute => Scale::new(1.0, 60.0),
        Unit::PerHour => Scale::new(1.0, 3600.0),
        Unit::MilliPerSecond => Scale::new(1.0, 1e3),
        Unit::Molar => Scale::new(1.0, 1.0),
        Unit::Millimolar => Scale::new(1.0, 1e3),
        Unit::Micromolar => Scale::new(1.0, 1e6),
        Unit::Nanomolar => Scale::new(1.0, 1e9),
        Unit::Picomolar => Scale::new(1.0, 1e12),
        Unit::Femtomolar => Scale::new(1.0, 1e15),
        Unit::PerMolarPerSecond => Scale::new(1.0, 1.0),
        Unit::PerMillimolarPerSecond => Scale::new(1e3, 1.0),
        Unit::PerMicromolarPerSecond => Scale::new(1e6, 1.0),
        Unit::PerNanomolarPerSecond => Scale::new(1e9, 1.0),
        Unit::PerMolarPerMinute => Scale::new(1.0, 60.0),
        Unit::PerMillimolarPerMinute => Scale::new(1e3, 60.0),
        Unit::PerMicromolarPerMinute => Scale::new(1e6, 60.0),
    }
}

/// Multiplier taking one `unit` to the canonical unit of its kind.
pub fn multiplier(unit: Unit) -> f64 {
    scale(unit).factor()
}

/// Units of `kind`, canonical unit first.
pub fn units_of_kind(kind: QuantityKind) -> Vec<Unit> {
    let canonical = kind.canonical_unit();
    let mut units = vec![canonical];
    units.extend(
        Unit::ALL
            .iter()
            .copied()
            .filter(|unit| unit.kind() == kind && *unit != canonical),
    );
    units
}

/// Folds the three micro spellings into `µ` and normalizes spacing so that
/// token lookup sees one space between unit factors and none around `^`
/// or `/`.
pub fn tidy_unit_text(raw: &str) -> String {
    let text = raw
        .replace('μ', "µ")
        .replace(['·', '⋅', '*'], " ")
        .replace('−', "-");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let spaced = collapsed
        .replace(" ^", "^")
        .replace("^ ", "^")
        .replace(" /", "/")
        .replace("/ ", "/");
    fold_ascii_micro(&spaced)
}

/// `uM`, `umol` and `u` before a molar unit read as micro.
fn fold_ascii_micro(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    for (idx, ch) in chars.iter().enumerate() {
        let at_word_start = idx == 0 || !chars[idx - 1].is_alphanumeric();
        let next = chars.get(idx + 1).copied();
        let next_next = chars.get(idx + 2).copied();
        let before_molar = next == Some('M')
            || (next == Some('m') && next_next == Some('o'));
        if *ch == 'u' && at_word_start && before_molar {
            out.push('µ');
        } else {
            out.push(*ch);
        }
    }
    out
}

/// Longest-first token lookup at the start of tidied unit text.
///
/// A token only matches when it is not immediately followed by another
/// letter or digit, so `"M"` does not match `"Mg"`.
pub fn lookup_unit_token(tidy: &str) -> Option<(Unit, usize)> {
    UNIT_TOKENS.iter().find_map(|(token, unit)| {
        let rest = strip_token(tidy, token, *unit)?;
        match rest.chars().next() {
            Some(ch) if ch.is_alphanumeric() => None,
            _ => Some((*unit, token.len())),
        }
    })
}

fn strip_token<'a>(text: &'a str, token: &str, unit: Unit) -> Option<&'a str> {
    if unit.kind() != QuantityKind::Rate {
        return text.strip_prefix(token);
    }
    let head = text.get(..token.len())?;
    head.eq_ignore_ascii_case(token).then(|| &text[token.len()..])
}
