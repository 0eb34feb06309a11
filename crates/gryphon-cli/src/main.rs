//! gryphon command line tool
//!
//! Reads a GR(1) game specification, decides realizability and, when the
//! specification is realizable, prints an explicit finite-state strategy on
//! standard output. The realizability verdict and all diagnostics go to
//! standard error.

use std::fs;

use anyhow::Context;
use clap::Parser;
use human_panic::setup_panic;
use log::{debug, info};

use gryphon_parser::GameSpecParser;
use gryphon_synthesis::{Gr1Backend, SynthesisBackend};

use crate::cli::Cli;
use crate::gryphon_config::GryphonConfig;

mod cli;
mod gryphon_config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_panic!();

    let args = Cli::parse();
    cli::initialize_logger(args.log_config)?;
    eprintln!("gryphon: symbolic synthesis of GR(1) controllers");

    let config = GryphonConfig::load(args.config_file)?;

    let input = fs::read_to_string(&args.input_file)
        .with_context(|| format!("Cannot open input file '{}'", args.input_file.display()))?;
    let game = GameSpecParser::new()
        .parse(&input, config.bdd_manager())
        .with_context(|| format!("Failed to parse '{}'", args.input_file.display()))?;
    info!(
        "Parsed a game with {} input(s) and {} output(s)",
        game.input_names().len(),
        game.output_names().len()
    );

    let backend = Gr1Backend::new();
    let solution = backend.solve(&game);
    if solution.is_realizable() {
        eprintln!("RESULT: Specification is realizable.");
        if !args.only_realizability {
            let strategy = backend
                .extract(&game, &solution)
                .context("Strategy extraction failed")?;
            debug!(
                "Printing a strategy with {} state(s)",
                strategy.states().len()
            );
            print!("{strategy}");
        }
    } else {
        eprintln!("RESULT: Specification is not realizable.");
    }

    Ok(())
}
