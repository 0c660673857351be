//! One-call optimizer entry points.

use std::path::Path;

use runeforge_config::{ConfigError, OptimizerConfig};
use runeforge_core::{Character, Rune, StatEngine};
use runeforge_solver::{BuildManager, ResultSet};

/// Validates `config`, builds pools from `inventory` and searches them.
///
/// With the `console` feature enabled, the first call installs the
/// console subscriber.
///
/// # Errors
///
/// Returns the configuration's validation error; the search itself does
/// not fail.
pub fn run_optimizer<'a, E: StatEngine>(
    engine: E,
    character: Character,
    inventory: &'a [Rune],
    config: &OptimizerConfig,
) -> Result<ResultSet<'a>, ConfigError> {
    #[cfg(feature = "console")]
    runeforge_console::init();

    config.validate()?;
    BuildManager::new(engine, character, config.build.clone())
        .with_search_config(config.search.clone())
        .optimize(inventory)
}

/// Like [`run_optimizer`], reading the configuration from a TOML file.
pub fn run_optimizer_from_file<'a, E: StatEngine>(
    engine: E,
    character: Character,
    inventory: &'a [Rune],
    path: impl AsRef<Path>,
) -> Result<ResultSet<'a>, ConfigError> {
    let config = OptimizerConfig::load(path)?;
    run_optimizer(engine, character, inventory, &config)
}
