//! Command line front-end of the customization resolver.
//!
//! * `bindery validate <product.json>` prints every schema violation.
//! * `bindery graph <product.json>` prints the dependency order with depths.
//! * `bindery simulate <product.json> <events.json>` replays shopper choices and reports
//!   visibility, live price and the checkout outcome.
//!
//! Command output goes to the writer handed to [`run`]; logs go to stderr.

use anyhow::Context;
use bindery::catalog::{load_json, load_product, resolve};
use bindery::customization::{
    CartLine, Configurator, Schema, SchemaError, SelectionValue, validate_schema,
};
use bindery::domain::config::AppConfig;
use bindery::domain::money::Money;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::Write;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "bindery", version, about = "Customization dependency-and-pricing resolver")]
pub struct Cli {
    /// Configuration file (TOML or JSON); `BINDERY__*` variables override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a product definition and list every violation.
    Validate { product: PathBuf },
    /// Print the topological order of a product's groups.
    Graph { product: PathBuf },
    /// Replay a JSON array of `{ "group", "value" }` events against a product.
    Simulate {
        product: PathBuf,
        events: PathBuf,
        /// Quantity of the cart line printed on successful checkout.
        #[arg(long, default_value_t = NonZeroU32::MIN)]
        quantity: NonZeroU32,
    },
}

/// One shopper click.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionEvent {
    pub group: String,
    #[serde(default)]
    pub value: SelectionValue,
}

/// Executes `command`, writing human-readable output to `out`.
///
/// # Errors
/// I/O failures and unreadable input files. Invalid products and failed checkouts are
/// reported through the exit code instead.
pub fn run(command: &Command, config: &AppConfig, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    match command {
        Command::Validate { product } => validate(config, product, out),
        Command::Graph { product } => graph(config, product, out),
        Command::Simulate { product, events, quantity } => {
            simulate(config, product, events, *quantity, out)
        },
    }
}

fn load_schema(
    config: &AppConfig,
    path: &Path,
    out: &mut impl Write,
) -> anyhow::Result<Option<Schema>> {
    let product = load_product(&config.catalog, path)?;
    match validate_schema(product) {
        Ok(schema) => Ok(Some(schema)),
        Err(errors) => {
            report_schema_errors(&errors, out)?;
            Ok(None)
        },
    }
}

fn report_schema_errors(errors: &[SchemaError], out: &mut impl Write) -> anyhow::Result<()> {
    warn!(violations = errors.len(), "Product definition is invalid");
    writeln!(out, "invalid: {} violation(s)", errors.len())?;
    for error in errors {
        writeln!(out, "  [{}] {error}", error.code())?;
    }
    Ok(())
}

fn validate(config: &AppConfig, path: &Path, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let Some(schema) = load_schema(config, path, out)? else {
        return Ok(ExitCode::FAILURE);
    };

    let product = schema.product();
    writeln!(
        out,
        "valid: {} group(s), base price {} {}",
        product.groups.len(),
        product.base_price,
        config.catalog.currency
    )?;
    Ok(ExitCode::SUCCESS)
}

fn graph(config: &AppConfig, path: &Path, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let Some(schema) = load_schema(config, path, out)? else {
        return Ok(ExitCode::FAILURE);
    };

    let graph = schema.graph();
    for &index in graph.order() {
        let indent = "  ".repeat(graph.depth(index));
        match graph.parent(index) {
            Some(edge) => writeln!(
                out,
                "{indent}{} (when {} = {})",
                graph.name(index),
                graph.name(edge.parent),
                edge.required_option
            )?,
            None => writeln!(out, "{indent}{}", graph.name(index))?,
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn simulate(
    config: &AppConfig,
    product: &Path,
    events: &Path,
    quantity: NonZeroU32,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let Some(schema) = load_schema(config, product, out)? else {
        return Ok(ExitCode::FAILURE);
    };
    let events: Vec<SelectionEvent> = load_json(resolve(&config.catalog, events))?;
    let currency = &config.catalog.currency;

    let mut session = Configurator::new(schema);
    print_status(&session, "start", currency, out)?;

    for event in events {
        let label = format!("{} <- {}", event.group, describe(&event.value));
        match session.select(&event.group, event.value) {
            Ok(cleared) => {
                print_status(&session, &label, currency, out)?;
                if !cleared.is_empty() {
                    writeln!(out, "  cleared: {}", cleared.join(", "))?;
                }
            },
            Err(err) => writeln!(out, "{label}\n  rejected [{}]: {err}", err.code())?,
        }
    }

    match session.freeze() {
        Ok(frozen) => {
            let line = CartLine::new(frozen, quantity);
            writeln!(out, "checkout: ok, line total {} {currency}", line.line_total())?;
            let json = serde_json::to_string_pretty(&line).context("Failed to render cart line")?;
            writeln!(out, "{json}")?;
            Ok(ExitCode::SUCCESS)
        },
        Err(missing) => {
            writeln!(out, "checkout: {} group(s) missing", missing.len())?;
            for error in missing {
                writeln!(out, "  {error}")?;
            }
            Ok(ExitCode::FAILURE)
        },
    }
}

fn print_status(
    session: &Configurator,
    label: &str,
    currency: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let visible: Vec<&str> = session.visibility().iter().collect();
    let total: Money = session.total();
    writeln!(out, "{label}")?;
    writeln!(out, "  visible: {}", visible.join(", "))?;
    writeln!(out, "  total: {total} {currency}")?;
    Ok(())
}

fn describe(value: &SelectionValue) -> String {
    match value {
        SelectionValue::SingleChoice(option) => option.clone(),
        SelectionValue::MultiChoice(options) => {
            format!("[{}]", options.iter().map(String::as_str).collect::<Vec<_>>().join(", "))
        },
        SelectionValue::Text(text) => format!("{text:?}"),
        SelectionValue::Empty => "(empty)".to_owned(),
    }
}
