//! CLI Command Handlers
//!
//! Thin glue between parsed arguments and the library: loads configuration,
//! applies flag overrides, wires the cached generator into the batch driver,
//! and prints the final report.

use std::path::Path;
use std::sync::Arc;

use crate::batch::BatchDriver;
use crate::config::{Config, ConfigLoader, OnConflict};
use crate::generator::{CachedGenerator, GenerationCache, OpenAiGenerator, SharedGenerator};
use crate::schema::BuilderStyle;
use crate::types::Result;

/// Flag overrides applied on top of the loaded configuration
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub inplace: bool,
    pub skip_conflicts: bool,
    pub workers: Option<usize>,
    pub temperature: Option<f32>,
    pub builder: Option<BuilderStyle>,
    pub api_key: Option<String>,
}

fn load_config(config_file: &Path, overrides: RunOverrides) -> Result<Config> {
    let mut config = ConfigLoader::load_with_file(config_file)?;

    if !overrides.include.is_empty() {
        config.include = overrides.include;
    }
    if !overrides.exclude.is_empty() {
        config.exclude = overrides.exclude;
    }
    if overrides.inplace {
        config.inplace = true;
    }
    if overrides.skip_conflicts {
        config.on_conflict = OnConflict::Skip;
    }
    if let Some(workers) = overrides.workers {
        config.max_workers = workers;
    }
    if let Some(temperature) = overrides.temperature {
        config.temperature = temperature;
    }
    if let Some(builder) = overrides.builder {
        config.builder_style = builder;
    }

    config.validate()?;
    Ok(config)
}

fn build_generator(config: &Config, api_key: Option<String>) -> Result<SharedGenerator> {
    let cache = Arc::new(GenerationCache::open(&config.cache_path)?);
    let openai = Arc::new(OpenAiGenerator::new(api_key, config.openai.clone())?);
    Ok(Arc::new(CachedGenerator::new(cache, openai)))
}

/// Run the batch over the configured file selection.
///
/// Returns `true` when every file succeeded with no skipped definitions.
pub async fn run(config_file: &Path, overrides: RunOverrides) -> Result<bool> {
    let api_key = overrides.api_key.clone();
    let config = load_config(config_file, overrides)?;
    let generator = build_generator(&config, api_key)?;

    let report = BatchDriver::new(config, generator).run().await?;

    for (input, output) in &report.outputs {
        println!("{} -> {}", input.display(), output.display());
    }
    for (path, skip) in &report.definition_skips {
        println!(
            "skipped {} `{}` at {}:{} ({})",
            skip.kind,
            skip.name,
            path.display(),
            skip.line,
            skip.error
        );
    }
    for failure in &report.failures {
        println!("failed {}: {}", failure.path.display(), failure.error);
    }
    println!(
        "{} written, {} failed, {} definitions skipped",
        report.outputs.len(),
        report.failures.len(),
        report.definition_skips.len()
    );

    Ok(report.is_clean())
}

/// Operator invalidation of the generation cache
pub fn cache_clear(config_file: &Path) -> Result<()> {
    let config = ConfigLoader::load_with_file(config_file)?;
    let cache = GenerationCache::open(&config.cache_path)?;
    let removed = cache.clear()?;
    println!("Removed {} cached docstrings", removed);
    Ok(())
}

/// Report cache entry count and location
pub fn cache_stats(config_file: &Path) -> Result<()> {
    let config = ConfigLoader::load_with_file(config_file)?;
    let cache = GenerationCache::open(&config.cache_path)?;
    println!(
        "{} entries in {}",
        cache.len()?,
        config.cache_path.display()
    );
    Ok(())
}

/// Print the effective merged configuration
pub fn config_show(config_file: &Path) -> Result<()> {
    let config = ConfigLoader::load_with_file(config_file)?;
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| crate::types::DocsmithError::Config(format!("Render error: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
