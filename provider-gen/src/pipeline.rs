//! Generation orchestration.
//!
//! Ties the stages together for one provider or for every provider in a
//! catalog: load, render, commit. Each provider is its own atomic batch; in
//! all-providers mode a failing provider is recorded in the
//! [`GenerationSummary`] and the run moves on.

use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::catalog::{ProviderCatalog, ProviderModels};
use crate::codegen::{ProviderNames, RenderInput, render};
use crate::errors::GeneratorError;
use crate::formatter::run_rustfmt;
use crate::loader::Catalog;
use crate::output::commit;

/// Default location of provider modules below the output root.
pub const DEFAULT_PROVIDERS_DIR: &str = "src/providers";

/// Which files to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// `capabilities.rs` only.
    Capabilities,
    /// `mod.rs` for OpenAI-compatible providers, plus `capabilities.rs` when
    /// `with_capabilities` is set.
    OpenAiCompatible,
}

/// Which providers to generate for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSelector {
    One(String),
    All,
}

/// Library-level generation settings.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Project root that `providers_dir` is resolved against.
    pub output_root: PathBuf,
    /// Directory holding provider modules, relative to `output_root`.
    pub providers_dir: PathBuf,
    /// Also write `capabilities.rs` in OpenAI-compatible mode.
    pub with_capabilities: bool,
    pub dry_run: bool,
    /// Run rustfmt over committed files.
    pub format: bool,
    /// Overrides the derived provider struct name.
    pub struct_name: Option<String>,
    /// Catalog folder to read when it differs from the provider id.
    pub folder: Option<String>,
}

impl GenerationOptions {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            providers_dir: PathBuf::from(DEFAULT_PROVIDERS_DIR),
            with_capabilities: false,
            dry_run: false,
            format: false,
            struct_name: None,
            folder: None,
        }
    }

    /// Absolute directory the provider modules are written to.
    pub fn providers_path(&self) -> PathBuf {
        self.output_root.join(&self.providers_dir)
    }
}

/// Result of generating one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutcome {
    pub provider_id: String,
    /// Number of models in the registry; zero when no registry was written.
    pub model_count: usize,
    /// Committed paths; empty for a dry run.
    pub paths: Vec<PathBuf>,
}

/// Per-provider results of a generation run.
#[derive(Debug, Default)]
pub struct GenerationSummary {
    pub succeeded: Vec<ProviderOutcome>,
    pub skipped: Vec<(String, String)>,
    pub failed: Vec<(String, String)>,
    /// Models rendered into registries during the run.
    pub catalog: ProviderCatalog,
}

impl GenerationSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Every path committed during the run.
    pub fn committed_paths(&self) -> Vec<PathBuf> {
        self.succeeded
            .iter()
            .flat_map(|outcome| outcome.paths.iter().cloned())
            .collect()
    }

    pub fn print(&self) {
        println!("\n=== Generation Summary ===\n");

        if !self.succeeded.is_empty() {
            println!("Succeeded:");
            for outcome in &self.succeeded {
                println!(
                    "  {}: {} models, {} files",
                    outcome.provider_id,
                    outcome.model_count,
                    outcome.paths.len()
                );
            }
        }

        if !self.skipped.is_empty() {
            println!("\nSkipped:");
            for (provider, reason) in &self.skipped {
                println!("  {}: {}", provider, reason);
            }
        }

        if !self.failed.is_empty() {
            println!("\nFailed:");
            for (provider, reason) in &self.failed {
                println!("  {}: {}", provider, reason);
            }
        }

        println!(
            "\nTotal: {} succeeded, {} skipped, {} failed",
            self.succeeded.len(),
            self.skipped.len(),
            self.failed.len()
        );
    }

    fn record(&mut self, provider_id: &str, result: Result<GeneratedProvider, GeneratorError>) {
        match result {
            Ok(generated) => {
                info!(
                    "Generated {} files for {} ({} models)",
                    generated.outcome.paths.len(),
                    provider_id,
                    generated.outcome.model_count
                );
                if let Some(models) = generated.models {
                    self.catalog.insert(models);
                }
                self.succeeded.push(generated.outcome);
            }
            Err(e) if e.is_nothing_to_generate() => {
                warn!("Skipping {provider_id}: {e}");
                self.skipped.push((provider_id.to_string(), e.to_string()));
            }
            Err(e) => {
                warn!("Failed to generate {provider_id}: {e}");
                self.failed.push((provider_id.to_string(), e.to_string()));
            }
        }
    }
}

struct GeneratedProvider {
    outcome: ProviderOutcome,
    models: Option<ProviderModels>,
}

/// Loads, renders and commits one provider as a single batch.
#[instrument(skip(catalog, options))]
fn generate_provider(
    catalog: &Catalog,
    provider_id: &str,
    mode: GenerationMode,
    options: &GenerationOptions,
) -> Result<GeneratedProvider, GeneratorError> {
    let folder = options.folder.as_deref();
    let names = ProviderNames::new(provider_id, options.struct_name.as_deref())?;

    let (info, models, scaffold) = match mode {
        GenerationMode::Capabilities => {
            let models = catalog.load_provider(provider_id, folder)?;
            (models.info.clone(), Some(models), false)
        }
        GenerationMode::OpenAiCompatible => {
            let info = catalog.provider_info(provider_id, folder)?;
            if !info.is_openai_compatible(provider_id) {
                return Err(GeneratorError::NotCompatible(provider_id.to_string()));
            }
            let models = if options.with_capabilities {
                match catalog.load_provider(provider_id, folder) {
                    Ok(models) => Some(models),
                    Err(e) if e.is_nothing_to_generate() => {
                        warn!("No capabilities to generate for {provider_id}; writing scaffold only");
                        None
                    }
                    Err(e) => return Err(e),
                }
            } else {
                None
            };
            (info, models, true)
        }
    };

    let files = render(
        RenderInput {
            names: &names,
            info: &info,
            models: models.as_ref(),
            scaffold,
        },
        &options.providers_path(),
    )?;
    let paths = commit(&files, options.dry_run)?;

    Ok(GeneratedProvider {
        outcome: ProviderOutcome {
            provider_id: provider_id.to_string(),
            model_count: models.as_ref().map_or(0, ProviderModels::len),
            paths,
        },
        models,
    })
}

/// Provider ids to visit in all-providers mode.
fn select_all(catalog: &Catalog, mode: GenerationMode) -> Result<Vec<String>, GeneratorError> {
    let ids = catalog.provider_ids()?;
    if mode == GenerationMode::Capabilities {
        return Ok(ids);
    }

    let mut compatible = Vec::new();
    for id in ids {
        match catalog.provider_info(&id, None) {
            Ok(info) if info.is_openai_compatible(&id) => compatible.push(id),
            Ok(_) => debug!("{id} is not OpenAI-compatible"),
            Err(e) => warn!("Could not read metadata for {id}: {e}"),
        }
    }
    info!("Found {} OpenAI-compatible providers", compatible.len());
    Ok(compatible)
}

/// Runs a generation over the selected providers.
///
/// For a single provider, any hard failure is returned as an error. An empty
/// provider is reported as skipped in both modes.
///
/// ## Errors
///
/// - Any `GeneratorError` from a single-provider run other than `NoActiveModels`
/// - `Io` if the provider list of a tree catalog cannot be read
#[instrument(skip(catalog, options))]
pub fn run(
    catalog: &Catalog,
    selector: &ProviderSelector,
    mode: GenerationMode,
    options: &GenerationOptions,
) -> Result<GenerationSummary, GeneratorError> {
    let mut summary = GenerationSummary::default();

    match selector {
        ProviderSelector::One(provider_id) => {
            let result = generate_provider(catalog, provider_id, mode, options);
            match result {
                Err(e) if !e.is_nothing_to_generate() => return Err(e),
                result => summary.record(provider_id, result),
            }
        }
        ProviderSelector::All => {
            for provider_id in select_all(catalog, mode)? {
                let result = generate_provider(catalog, &provider_id, mode, options);
                summary.record(&provider_id, result);
            }
        }
    }

    if options.format && !options.dry_run {
        run_rustfmt(&summary.committed_paths());
    }

    Ok(summary)
}
