//! Quantity kinds and the units recognized for each of them.
//!
//! Every measured field belongs to exactly one [`QuantityKind`], and every
//! [`Unit`] belongs to exactly one kind. Values are compared after being
//! converted to the kind's canonical unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// The physical quantity a numeric field measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityKind {
    /// First-order rate constants such as kcat. Canonical unit: s^-1.
    #[serde(alias = "rate_constant")]
    Rate,
    /// Concentrations and affinities such as KM, Ki, Kd. Canonical unit: M.
    #[serde(alias = "conc")]
    Concentration,
    /// Second-order specificity constants (kcat/KM). Canonical unit: M^-1 s^-1.
    Specificity,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 3] = [
        QuantityKind::Rate,
        QuantityKind::Concentration,
        QuantityKind::Specificity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityKind::Rate => "rate",
            QuantityKind::Concentration => "concentration",
            QuantityKind::Specificity => "specificity",
        }
    }

    /// Unit all values of this kind are converted to before comparison.
    pub fn canonical_unit(&self) -> Unit {
        match self {
            QuantityKind::Rate => Unit::PerSecond,
            QuantityKind::Concentration => Unit::Molar,
            QuantityKind::Specificity => Unit::PerMolarPerSecond,
        }
    }

    /// Unit assumed when an extracted value carries no unit at all.
    pub fn default_unit(&self) -> Unit {
        match self {
            QuantityKind::Rate => Unit::PerSecond,
            QuantityKind::Concentration => Unit::Millimolar,
            QuantityKind::Specificity => Unit::PerMolarPerSecond,
        }
    }

    /// Base of the transcription errors typical for this kind.
    ///
    /// Rate constants are frequently off by a factor of 60 (minutes copied
    /// as seconds); everything else is off by powers of ten.
    pub fn error_base(&self) -> f64 {
        match self {
            QuantityKind::Rate => 60.0,
            QuantityKind::Concentration | QuantityKind::Specificity => 10.0,
        }
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rate" | "rate_constant" | "kcat" => Ok(QuantityKind::Rate),
            "concentration" | "conc" | "km" => Ok(QuantityKind::Concentration),
            "specificity" | "kcat_km" => Ok(QuantityKind::Specificity),
            _ => Err(ModelError::UnknownQuantityKind(s.to_string())),
        }
    }
}

/// A recognized measurement unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Unit {
    // Rate constants
    PerSecond,
    PerMinute,
    PerHour,
    /// `ms^-1` as written in extracted tables: the milli prefix scales the
    /// per-second rate, so `33000 ms^-1` reads as `33 s^-1`.
    MilliPerSecond,

    // Concentrations
    Molar,
    Millimolar,
    Micromolar,
    Nanomolar,
    Picomolar,
    Femtomolar,

    // Specificity constants
    PerMolarPerSecond,
    PerMillimolarPerSecond,
    PerMicromolarPerSecond,
    PerNanomolarPerSecond,
    PerMolarPerMinute,
    PerMillimolarPerMinute,
    PerMicromolarPerMinute,
}

impl Unit {
    pub const ALL: [Unit; 17] = [
        Unit::PerSecond,
        Unit::PerMinute,
        Unit::PerHour,
        Unit::MilliPerSecond,
        Unit::Molar,
        Unit::Millimolar,
        Unit::Micromolar,
        Unit::Nanomolar,
        Unit::Picomolar,
        Unit::Femtomolar,
        Unit::PerMolarPerSecond,
        Unit::PerMillimolarPerSecond,
        Unit::PerMicromolarPerSecond,
        Unit::PerNanomolarPerSecond,
        Unit::PerMolarPerMinute,
        Unit::PerMillimolarPerMinute,
        Unit::PerMicromolarPerMinute,
    ];

    /// Canonical spelling, used for output and as the unit tag.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::PerSecond => "s^-1",
            Unit::PerMinute => "min^-1",
            Unit::PerHour => "h^-1",
            Unit::MilliPerSecond => "ms^-1",
            Unit::Molar => "M",
            Unit::Millimolar => "mM",
            Unit::Micromolar => "µM",
            Unit::Nanomolar => "nM",
            Unit::Picomolar => "pM",
            Unit::Femtomolar => "fM",
            Unit::PerMolarPerSecond => "M^-1 s^-1",
            Unit::PerMillimolarPerSecond => "mM^-1 s^-1",
            Unit::PerMicromolarPerSecond => "µM^-1 s^-1",
            Unit::PerNanomolarPerSecond => "nM^-1 s^-1",
            Unit::PerMolarPerMinute => "M^-1 min^-1",
            Unit::PerMillimolarPerMinute => "mM^-1 min^-1",
            Unit::PerMicromolarPerMinute => "µM^-1 min^-1",
        }
    }

    pub fn kind(&self) -> QuantityKind {
        match self {
            Unit::PerSecond | Unit::PerMinute | Unit::PerHour | Unit::MilliPerSecond => {
                QuantityKind::Rate
            }
            Unit::Molar
            | Unit::Millimolar
            | Unit::Micromolar
            | Unit::Nanomolar
            | Unit::Picomolar
            | Unit::Femtomolar => QuantityKind::Concentration,
            Unit::PerMolarPerSecond
            | Unit::PerMillimolarPerSecond
            | Unit::PerMicromolarPerSecond
            | Unit::PerNanomolarPerSecond
            | Unit::PerMolarPerMinute
            | Unit::PerMillimolarPerMinute
            | Unit::PerMicromolarPerMinute => QuantityKind::Specificity,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
