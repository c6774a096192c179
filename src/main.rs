//! Command-line interface for fixture-gen
//!
//! # Usage Examples
//!
//! ```bash
//! # Three records of every fixture, as JSON lines
//! fixture-gen generate --schema fixtures.yaml --count 3
//!
//! # Reproducible output written to a file
//! fixture-gen generate --schema fixtures.yaml --fixture users \
//!   --count 100 --seed 42 --format json --output users.json
//!
//! # Check a schema without generating anything
//! fixture-gen validate --schema fixtures.yaml
//! ```
//!
//! ## Seeds
//! `--seed` wins over the schema's `seed`, which wins over the
//! `FIXTURE_GEN_SEED` environment variable. With none of them set the
//! output is different on every run.

use clap::Parser;
use fixture_gen::{generate, init_logging, validate, write_output, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => {
            let rendered = generate(&args)?;
            write_output(args.output.as_deref(), &rendered)?;
        }
        Commands::Validate(args) => {
            let report = validate(&args)?;
            println!(
                "Schema {} is valid: {} fixtures, {} fields",
                args.schema.display(),
                report.fixtures,
                report.fields
            );
        }
    }
    Ok(())
}
