//! Runtime configuration of the gryphon CLI
//!
//! Configuration is layered: an optional configuration file is read first,
//! then environment variables prefixed with `GRYPHON_` override it. The only
//! configurable concern is the BDD manager backing the game.

use std::path::PathBuf;

use anyhow::Context;
use gryphon_bdd::{BDDManager, BDDManagerConfig};
use serde::Deserialize;

/// Configuration of the gryphon CLI
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct GryphonConfig {
    /// BDD manager selection and capacities
    bdd: Option<BDDManagerConfig>,
}

impl GryphonConfig {
    /// Load the configuration from the given file (if any) and the
    /// environment
    pub(crate) fn load(config_file: Option<PathBuf>) -> Result<Self, anyhow::Error> {
        let mut settings = config::Config::builder();
        if let Some(config_file) = config_file {
            if !config_file.exists() {
                return Err(anyhow::anyhow!(
                    "Specified configuration file '{}' does not exist.",
                    config_file.display()
                ));
            }
            settings = settings.add_source(config::File::from(config_file));
        }
        settings = settings.add_source(config::Environment::with_prefix("GRYPHON"));

        settings
            .build()
            .with_context(|| "Failed to assemble the configuration sources")?
            .try_deserialize::<GryphonConfig>()
            .with_context(|| "Failed to read the gryphon configuration")
    }

    /// Create the BDD manager described by the configuration, falling back to
    /// the default manager
    pub(crate) fn bdd_manager(&self) -> BDDManager {
        self.bdd
            .as_ref()
            .map(BDDManagerConfig::mgr_from_config)
            .unwrap_or_default()
    }
}
