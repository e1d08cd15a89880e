//! Match configuration: TOML file plus command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use kinrec_model::{JoinMode, MatchConfig, QuantityKind};

/// Reads `path` as a TOML [`MatchConfig`]; no path means the defaults.
pub fn load_config(path: Option<&Path>) -> Result<MatchConfig> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces the file's group-by list when non-empty.
    pub group_by: Vec<String>,
    /// Added to (or replacing entries of) the file's weights.
    pub weights: Vec<(String, f64)>,
    pub quantity_kinds: Vec<(String, QuantityKind)>,
    pub join_mode: Option<JoinMode>,
    pub off_by_base: Option<f64>,
}

impl ConfigOverrides {
    /// Applies the overrides and validates the result.
    pub fn apply(self, mut config: MatchConfig) -> Result<MatchConfig> {
        if !self.group_by.is_empty() {
            config.group_by = self.group_by;
        }
        config.weights.extend(self.weights);
        config.quantity_kind_per_field.extend(self.quantity_kinds);
        if let Some(mode) = self.join_mode {
            config.join_mode = mode;
        }
        if let Some(base) = self.off_by_base {
            config.off_by_base = base;
        }
        config.validate().context("invalid match configuration")?;
        if config.weights.is_empty() {
            bail!("no field weights configured; pass --weight FIELD=WEIGHT or set [weights]");
        }
        Ok(config)
    }
}

/// Parses `FIELD=VALUE`.
pub fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {raw:?}"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in {raw:?}"));
    }
    Ok((field.to_string(), value.trim().to_string()))
}

/// Parses `FIELD=WEIGHT` for `--weight`.
pub fn parse_weight(raw: &str) -> std::result::Result<(String, f64), String> {
    let (field, value) = parse_assignment(raw)?;
    let weight = value
        .parse::<f64>()
        .map_err(|_| format!("invalid weight {value:?} for {field}"))?;
    Ok((field, weight))
}

/// Parses `FIELD=KIND` for `--quantity`.
pub fn parse_quantity_kind(raw: &str) -> std::result::Result<(String, QuantityKind), String> {
    let (field, value) = parse_assignment(raw)?;
    let kind = value.parse::<QuantityKind>().map_err(|e| e.to_string())?;
    Ok((field, kind))
}
