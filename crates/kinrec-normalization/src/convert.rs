//! Conversion of parsed values to canonical units.

use kinrec_model::{ParsedValue, QuantityKind, Unit};
use tracing::trace;

use crate::units::scale;

/// Converts `mantissa` expressed in `unit` to the canonical unit of `kind`.
///
/// Best effort: a missing unit, or a unit of another kind, passes the
/// mantissa through unscaled as if it were already canonical.
pub fn convert_to_true_value(mantissa: f64, unit: Option<Unit>, kind: QuantityKind) -> f64 {
    match unit {
        Some(unit) if unit.kind() == kind => scale(unit).apply(mantissa),
        Some(unit) => {
            trace!(%unit, %kind, "unit does not belong to quantity kind, passing through");
            mantissa
        }
        None => mantissa,
    }
}

/// Canonical value of `parsed`, assuming the kind's default unit when the
/// source text carried none. A unit that was present but not recognized
/// passes through unscaled. `None` for the missing sentinel.
pub fn canonical_value(parsed: &ParsedValue, kind: QuantityKind) -> Option<f64> {
    let mantissa = parsed.value()?;
    let unit = match parsed.unit {
        Some(unit) => Some(unit),
        None if parsed.unrecognized_unit => None,
        None => Some(kind.default_unit()),
    };
    Some(convert_to_true_value(mantissa, unit, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_unit_passes_through() {
        assert_eq!(
            convert_to_true_value(5.0, Some(Unit::Millimolar), QuantityKind::Rate),
            5.0
        );
        assert_eq!(convert_to_true_value(5.0, None, QuantityKind::Concentration), 5.0);
    }

    #[test]
    fn default_unit_applies_to_bare_numbers() {
        let bare = ParsedValue::new(2.0, None);
        assert_eq!(
            canonical_value(&bare, QuantityKind::Concentration),
            Some(2.0 / 1e3)
        );
        assert_eq!(canonical_value(&bare, QuantityKind::Rate), Some(2.0));
        assert_eq!(
            canonical_value(&ParsedValue::missing(), QuantityKind::Rate),
            None
        );
    }

    #[test]
    fn unrecognized_unit_is_not_defaulted() {
        let foreign = ParsedValue::new(2.0, None).with_unrecognized_unit(true);
        assert_eq!(canonical_value(&foreign, QuantityKind::Concentration), Some(2.0));
    }
}
