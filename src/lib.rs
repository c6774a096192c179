//! fixture-gen library
//!
//! Command-line options, logging bootstrap and the commands behind the
//! `fixture-gen` binary, which samples records from a YAML fixture schema.
//!
//! The generation engine itself lives in the workspace crates:
//!
//! - `fixture_core` - descriptors, error taxonomy, fixture schema
//! - `fixture_generator` - generators, registry, field injection
//!
//! # CLI Usage
//!
//! ```bash
//! # Five JSON lines for the `users` fixture, reproducibly
//! fixture-gen generate --schema fixtures.yaml --fixture users --count 5 --seed 42
//!
//! # Check that every descriptor in a schema resolves
//! fixture-gen validate --schema fixtures.yaml
//! ```

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fixture_core::FixtureSchema;
use fixture_generator::{GeneratorRegistry, SchemaGenerator};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fixture-gen")]
#[command(about = "Generate bounded random test data from a fixture schema")]
#[command(long_about = None)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn", env = "FIXTURE_GEN_LOG_LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate records for the fixtures of a schema
    Generate(GenerateArgs),

    /// Resolve every descriptor of a schema without generating values
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    Jsonl,
    /// A single JSON array
    Json,
    /// A YAML sequence
    Yaml,
}

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Path to the fixture schema (YAML)
    #[arg(long, env = "FIXTURE_GEN_SCHEMA")]
    pub schema: PathBuf,

    /// Fixture to generate; every fixture of the schema when omitted
    #[arg(long)]
    pub fixture: Option<String>,

    /// Number of records per fixture
    #[arg(long, default_value_t = 1)]
    pub count: u64,

    /// Seed overriding the schema's seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "jsonl")]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Path to the fixture schema (YAML)
    #[arg(long, env = "FIXTURE_GEN_SCHEMA")]
    pub schema: PathBuf,
}

/// Summary printed by `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub fixtures: usize,
    pub fields: usize,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level`. Calling this more than once is harmless.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_schema(path: &Path) -> anyhow::Result<FixtureSchema> {
    FixtureSchema::from_file(path)
        .with_context(|| format!("Failed to load fixture schema from {}", path.display()))
}

/// Generate records as described by `args` and render them.
pub fn generate(args: &GenerateArgs) -> anyhow::Result<String> {
    let schema = load_schema(&args.schema)?;
    let fixtures: Vec<String> = match &args.fixture {
        Some(fixture) => vec![fixture.clone()],
        None => schema.fixture_names().into_iter().map(String::from).collect(),
    };

    let registry = GeneratorRegistry::new();
    let mut generator = SchemaGenerator::new(schema, &registry, args.seed);

    let mut rows = Vec::new();
    for fixture in &fixtures {
        let records = generator
            .records(fixture, args.count)
            .with_context(|| format!("Failed to generate records for fixture '{fixture}'"))?;
        debug!(fixture = %fixture, count = records.len(), "Generated records");
        rows.extend(records.iter().map(|record| record.to_json()));
    }

    render(&rows, args.format)
}

fn render(rows: &[serde_json::Value], format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Jsonl => {
            let mut out = String::new();
            for row in rows {
                out.push_str(&serde_json::to_string(row)?);
                out.push('\n');
            }
            out
        }
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(rows)?;
            out.push('\n');
            out
        }
        OutputFormat::Yaml => serde_yaml::to_string(rows)?,
    })
}

/// Write rendered output to `path`, or stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, rendered: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Wrote output to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Resolve every descriptor of the schema at `args.schema`.
pub fn validate(args: &ValidateArgs) -> anyhow::Result<ValidationReport> {
    let schema = load_schema(&args.schema)?;
    let report = ValidationReport {
        fixtures: schema.fixtures.len(),
        fields: schema.fixtures.iter().map(|f| f.fields.len()).sum(),
    };

    let registry = GeneratorRegistry::new();
    SchemaGenerator::new(schema, &registry, None)
        .validate()
        .context("Schema validation failed")?;

    Ok(report)
}
