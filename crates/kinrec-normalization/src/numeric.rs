//! Measurement string parsing.
//!
//! Turns free text such as `"33 ± 0.3 s^-1"`, `"4.2 × 10^-5 M"` or
//! `"3.5e-05 mM"` into a [`ParsedValue`]. Parsing never fails: text without
//! a recognizable mantissa yields [`ParsedValue::missing`].

use std::sync::LazyLock;

use kinrec_model::{ParsedValue, Unit};
use regex::Regex;

use crate::units::{lookup_unit_token, tidy_unit_text};

/// `x 10^n`, `× 10^n`, `* 10^(n)`.
static TIMES_TEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:x|×|\*)\s*10\s*\^\s*\(?\s*([+-]?\d+)\s*\)?")
        .expect("Invalid times-ten regex")
});

/// Bare `10^n` with no multiplication sign.
static TEN_POWER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b10\s*\^\s*\(?\s*([+-]?\d+)\s*\)?").expect("Invalid power-of-ten regex")
});

/// Trailing `e<n>` directly after a digit, as in `3.5e-05`.
static E_NOTATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)[eE]([+-]?\d+)").expect("Invalid e-notation regex"));

static MANTISSA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?(?:\d+(?:\.\d*)?|\.\d+)").expect("Invalid mantissa regex"));

/// `± 0.3`, `+/- 0.3`, `-- 40` (range upper bound) directly after the mantissa.
static ERROR_TERM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:±|\+/-|\+-|--)\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)\s*%?")
        .expect("Invalid error-term regex")
});

/// `per minute`, `/ sec`, `per h`.
static PER_UNIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:per|/)\s*(seconds?|secs?|s|minutes?|mins?|hours?|hrs?|h)\b")
        .expect("Invalid per-unit regex")
});

static THOUSANDS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d),(\d{3})\b").expect("Invalid thousands regex"));

/// `0,5`: a comma followed by anything but exactly three digits.
static DECIMAL_COMMA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d),(\d{1,2}|\d{4,})\b").expect("Invalid decimal-comma regex")
});

/// Outcome of parsing one measurement string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub value: ParsedValue,
    /// Unit text that followed the mantissa but matched no known token.
    pub unrecognized: Option<String>,
}

/// Parses `text` with power-of-ten scientific notation.
pub fn parse_value_and_unit(text: &str) -> ParsedValue {
    parse_measurement(text, 10.0).value
}

/// Parses `text`, reading scientific-notation exponents as powers of `base`.
///
/// Rate-constant callers pass 60 to surface minute/second transcription
/// errors; everyone else uses [`parse_value_and_unit`].
pub fn parse_value_and_unit_with_base(text: &str, base: f64) -> ParsedValue {
    parse_measurement(text, base).value
}

/// Full parse, also reporting unit text that was not recognized.
pub fn parse_measurement(text: &str, base: f64) -> ParseOutcome {
    let prepared = prepare(text);
    let (stripped, exponent) = strip_exponent(&prepared);

    let (mantissa, precision, remainder) = match find_mantissa(&stripped) {
        Some((start, end)) => {
            let token = &stripped[start..end];
            let Ok(mantissa) = token.parse::<f64>() else {
                return missing();
            };
            (mantissa, significant_digits(token), &stripped[end..])
        }
        // "10^-4 M": the exponent alone carries the value.
        None if exponent.is_some() => (1.0, None, stripped.as_str()),
        None => return missing(),
    };

    let value = match exponent {
        Some(n) if n >= 0 => mantissa * base.powi(n),
        Some(n) => match n.checked_neg() {
            Some(power) => mantissa / base.powi(power),
            None => return missing(),
        },
        None => mantissa,
    };
    if !value.is_finite() {
        return missing();
    }

    let (unit, unrecognized) = match_unit(remainder);
    ParseOutcome {
        value: ParsedValue::new(value, unit)
            .with_precision(precision)
            .with_unrecognized_unit(unrecognized.is_some()),
        unrecognized,
    }
}

fn missing() -> ParseOutcome {
    ParseOutcome {
        value: ParsedValue::missing(),
        unrecognized: None,
    }
}

/// Normalizes the typographic variants extraction produces.
fn prepare(text: &str) -> String {
    let replaced = text
        .replace('−', "-")
        .replace(['–', '—'], " -- ")
        .replace('μ', "µ");
    let mut text = expand_superscripts(&replaced);
    // Each pass collapses every other group of `1,234,567`.
    while THOUSANDS_REGEX.is_match(&text) {
        text = THOUSANDS_REGEX.replace_all(&text, "$1$2").into_owned();
    }
    DECIMAL_COMMA_REGEX.replace_all(&text, "$1.$2").into_owned()
}

/// Rewrites superscript runs in caret form: `10⁻⁵` becomes `10^-5`.
fn expand_superscripts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        match superscript_char(ch) {
            Some(ascii) => {
                if !in_run && !out.ends_with('^') {
                    out.push('^');
                }
                out.push(ascii);
                in_run = true;
            }
            None => {
                out.push(ch);
                in_run = false;
            }
        }
    }
    out
}

fn superscript_char(ch: char) -> Option<char> {
    match ch {
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴' => Some('4'),
        '⁵' => Some('5'),
        '⁶' => Some('6'),
        '⁷' => Some('7'),
        '⁸' => Some('8'),
        '⁹' => Some('9'),
        '⁻' => Some('-'),
        '⁺' => Some('+'),
        _ => None,
    }
}

/// Removes the first scientific-notation marker and returns its exponent,
/// so the exponent digits are not read back as part of the mantissa.
fn strip_exponent(text: &str) -> (String, Option<i32>) {
    for regex in [&*TIMES_TEN_REGEX, &*TEN_POWER_REGEX] {
        if let Some(caps) = regex.captures(text)
            && let Some(exponent) = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok())
        {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let mut stripped = String::with_capacity(text.len());
            stripped.push_str(&text[..whole.start]);
            stripped.push(' ');
            stripped.push_str(&text[whole.end..]);
            return (stripped, Some(exponent));
        }
    }
    if let Some(caps) = E_NOTATION_REGEX.captures(text)
        && let (Some(whole), Some(digit), Some(exponent)) = (
            caps.get(0),
            caps.get(1),
            caps.get(2).and_then(|m| m.as_str().parse::<i32>().ok()),
        )
    {
        let mut stripped = String::with_capacity(text.len());
        stripped.push_str(&text[..whole.start()]);
        stripped.push_str(digit.as_str());
        stripped.push_str(&text[whole.end()..]);
        return (stripped, Some(exponent));
    }
    (text.to_string(), None)
}

/// Byte range of the first number that is not part of a unit exponent
/// (`s^-1`) or glued to a word.
fn find_mantissa(text: &str) -> Option<(usize, usize)> {
    MANTISSA_REGEX.find_iter(text).find_map(|m| {
        let preceding = text[..m.start()].chars().next_back();
        match preceding {
            Some(ch) if ch == '^' || ch.is_alphabetic() => None,
            Some(ch) if ch.is_ascii_digit() || ch == '.' => None,
            _ => Some((m.start(), m.end())),
        }
    })
}

fn significant_digits(token: &str) -> Option<u32> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    let significant = digits.trim_start_matches('0');
    let count = if significant.is_empty() { 1 } else { significant.len() };
    u32::try_from(count).ok()
}

/// Matches the text after the mantissa against the unit table, then the
/// `per <unit>` phrasing.
fn match_unit(remainder: &str) -> (Option<Unit>, Option<String>) {
    let without_error = ERROR_TERM_REGEX.replace(remainder, "");
    let trimmed = without_error.trim_start_matches(|c: char| c.is_whitespace() || c == ')' || c == ']');
    let tidy = tidy_unit_text(trimmed);

    if let Some((unit, _)) = lookup_unit_token(&tidy) {
        return (Some(unit), None);
    }
    if let Some(unit) = PER_UNIT_REGEX
        .captures(&tidy)
        .and_then(|caps| caps.get(1))
        .and_then(|word| per_unit(word.as_str()))
    {
        return (Some(unit), None);
    }

    let leftover = tidy.trim_matches(|c: char| c.is_whitespace() || ")]}.,;:".contains(c));
    if leftover.is_empty() {
        (None, None)
    } else {
        (None, Some(leftover.to_string()))
    }
}

fn per_unit(word: &str) -> Option<Unit> {
    match word.to_ascii_lowercase().as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => Some(Unit::PerSecond),
        "min" | "mins" | "minute" | "minutes" => Some(Unit::PerMinute),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(Unit::PerHour),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superscripts_become_carets() {
        assert_eq!(expand_superscripts("10⁻⁵ M"), "10^-5 M");
        assert_eq!(expand_superscripts("s⁻¹"), "s^-1");
        assert_eq!(expand_superscripts("s^⁻¹"), "s^-1");
    }

    #[test]
    fn exponent_is_removed_from_text() {
        let (stripped, exponent) = strip_exponent("4.2 × 10^-5 M");
        assert_eq!(exponent, Some(-5));
        assert!(!stripped.contains("10"));

        let (stripped, exponent) = strip_exponent("3.5e-05 mM");
        assert_eq!(exponent, Some(-5));
        assert_eq!(stripped, "3.5 mM");
    }

    #[test]
    fn unit_exponent_is_not_a_mantissa() {
        assert_eq!(find_mantissa("n.d. s^-1"), None);
        assert_eq!(find_mantissa("33 s^-1"), Some((0, 2)));
    }

    #[test]
    fn commas_are_read_as_separators_or_decimal_marks() {
        assert_eq!(prepare("1,234,567 M"), "1234567 M");
        assert_eq!(prepare("0,5 mM"), "0.5 mM");
        assert_eq!(prepare("2,25 s^-1"), "2.25 s^-1");
    }

    #[test]
    fn precision_counts_significant_digits() {
        assert_eq!(significant_digits("0.0012"), Some(2));
        assert_eq!(significant_digits("33.0"), Some(3));
        assert_eq!(significant_digits("0"), Some(1));
    }
}
