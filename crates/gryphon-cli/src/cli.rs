//! Command line interface of gryphon
//!
//! gryphon uses the `clap` crate to parse command line arguments. This module
//! defines the available options and their documentation, together with the
//! logger setup. All diagnostics go to standard error; standard output is
//! reserved for the extracted strategy.

use anyhow::Context;
use std::path::PathBuf;

use clap::{Args, Parser};
use log::LevelFilter;
use log4rs::{
    Config,
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
};

/// gryphon - symbolic synthesis of GR(1) controllers
///
/// Reads a game specification describing an infinite game between an
/// adversarial environment and a controllable system, decides whether the
/// system can win it, and if so prints an explicit finite-state strategy on
/// standard output.
///
/// The exit code is 0 whether the specification is realizable or not;
/// unrealizability is a result, not an error. Any failure (bad arguments,
/// unreadable input, parse error) exits with a non-zero code.
#[derive(Parser, Debug)]
#[command(version, name = "gryphon", about, long_about)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) log_config: LoggerConfig,

    /// Only decide realizability; do not extract or print a strategy
    #[arg(long = "onlyRealizability", default_value_t = false)]
    pub(crate) only_realizability: bool,

    /// Configuration file overriding the built-in BDD manager defaults
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub(crate) config_file: Option<PathBuf>,

    /// The game specification file
    pub(crate) input_file: PathBuf,
}

#[derive(Debug, Args)]
pub(crate) struct LoggerConfig {
    /// Read the logger configuration from file.
    /// Logger configuration can be provided in the log4rs specification
    /// format.
    #[arg(long)]
    logger_config_file: Option<String>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Initialize the logger as specified in `cfg`
///
/// By default the logger writes to standard error, keeping standard output
/// free for the strategy. If a log4rs configuration file is given in `cfg`,
/// the configuration from that file is used instead.
pub(crate) fn initialize_logger(cfg: LoggerConfig) -> Result<(), anyhow::Error> {
    if let Some(f) = cfg.logger_config_file {
        log4rs::init_file(f, Default::default())
            .with_context(|| "Failed to read logger config file")?;
        return Ok(());
    }

    let p_encoder = match cfg.debug {
        true => PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} - {h({l})} - [{f}:{L} - {M}] - {m}{n}"),
        false => PatternEncoder::new("{d(%H:%M:%S)} - {h({l})} - {m}{n}"),
    };

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(p_encoder))
        .build();

    let mut level = LevelFilter::Info;
    if cfg.debug {
        level = LevelFilter::Debug;
    }

    let log_config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .expect("Failed to initialize logger");

    log4rs::init_config(log_config).expect("Failed to initialize console logger");
    Ok(())
}
