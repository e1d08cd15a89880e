use anyhow::Result;
use comfy_table::{Cell, Table};
use kinrec_cli::config::{ConfigOverrides, load_config};
use kinrec_cli::pipeline::{
    MatchRequest, MatchRun, MultisetRequest, MultisetRun, run_match, run_multiset,
};
use kinrec_map::MultisetOptions;
use kinrec_model::QuantityKind;
use kinrec_normalization::{UNIT_TOKENS, canonical_value, multiplier, parse_measurement};
use tracing::info_span;

use crate::cli::{MatchArgs, MultisetArgs, ParseArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell};

pub fn run_match_command(args: &MatchArgs) -> Result<MatchRun> {
    let span = info_span!(
        "match_command",
        left = %args.left.display(),
        right = %args.right.display()
    );
    let _guard = span.enter();
    let file_config = load_config(args.config.as_deref())?;
    let overrides = ConfigOverrides {
        group_by: args.group_by.clone(),
        weights: args.weights.clone(),
        quantity_kinds: args.quantities.clone(),
        join_mode: args.mode.map(Into::into),
        off_by_base: args.off_by_base,
    };
    let config = overrides.apply(file_config)?;
    run_match(&MatchRequest {
        left: args.left.clone(),
        right: args.right.clone(),
        config,
        output_dir: args.output_dir.clone(),
    })
}

pub fn run_multiset_command(args: &MultisetArgs) -> Result<MultisetRun> {
    let mut options = MultisetOptions {
        alpha: args.alpha,
        beta: args.beta,
        ..MultisetOptions::default()
    };
    if let Some(base) = args.base {
        options = options.with_base(base);
    }
    run_multiset(&MultisetRequest {
        left: args.left.clone(),
        right: args.right.clone(),
        field: args.field.clone(),
        kind: args.kind.map(Into::into),
        group_by: args.group_by.clone(),
        options,
        output: args.output.clone(),
    })
}

pub fn run_parse(args: &ParseArgs) -> Result<()> {
    let requested: Option<QuantityKind> = args.kind.map(Into::into);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Text"),
        header_cell("Mantissa"),
        header_cell("Unit"),
        header_cell("Canonical"),
        header_cell("Unrecognized"),
    ]);
    apply_table_style(&mut table);
    for text in &args.texts {
        let outcome = parse_measurement(text, args.base);
        let parsed = &outcome.value;
        let kind = requested.or_else(|| parsed.unit.map(|unit| unit.kind()));
        let canonical = kind.and_then(|kind| {
            canonical_value(parsed, kind)
                .map(|value| format!("{value} {}", kind.canonical_unit().symbol()))
        });
        table.add_row(vec![
            Cell::new(text),
            parsed
                .value()
                .map_or_else(|| dim_cell("-"), Cell::new),
            parsed
                .unit
                .map_or_else(|| dim_cell("-"), |unit| Cell::new(unit.symbol())),
            canonical.map_or_else(|| dim_cell("-"), Cell::new),
            outcome
                .unrecognized
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_units() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Token"),
        header_cell("Unit"),
        header_cell("Kind"),
        header_cell("To canonical"),
    ]);
    apply_table_style(&mut table);
    for (token, unit) in UNIT_TOKENS {
        table.add_row(vec![
            Cell::new(token),
            Cell::new(unit.symbol()),
            dim_cell(unit.kind()),
            Cell::new(format!(
                "x{} {}",
                multiplier(*unit),
                unit.kind().canonical_unit().symbol()
            )),
        ]);
    }
    println!("{table}");
    Ok(())
}
