//! Catalog loading and normalization.
//!
//! Two catalog layouts are supported:
//!
//! ```text
//! <root>/providers/<id>/provider.toml            # optional provider metadata
//! <root>/providers/<id>/models/<model>.toml      # one record per model
//! <root>/providers/<id>/models/<folder>/<model>.toml
//! ```
//!
//! or a single JSON document keyed by provider id (the models.dev API
//! format), where each provider carries a `models` map.
//!
//! Loading a provider yields its active models as [`ProviderModels`]:
//!
//! - deprecated models are logged and left out
//! - a malformed record is logged, recorded in `skipped`, and left out
//! - a record nested deeper than one folder fails the whole provider
//! - two models deriving the same type name fail the whole provider
//! - zero active models is reported as `GeneratorError::NoActiveModels`

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::capability::capabilities;
use crate::catalog::{
    CatalogDocument, CatalogEntry, NormalizedModel, ProviderInfo, ProviderModels, SkippedEntry,
};
use crate::errors::GeneratorError;
use crate::naming::{derive_names, split_model_id};

/// Record file extensions the tree loader reads.
const RECORD_EXTENSIONS: &[&str] = &["toml", "json"];

/// A catalog ready to be queried provider by provider.
#[derive(Debug, Clone)]
pub enum Catalog {
    /// A local directory tree rooted at `root` (the directory holding `providers/`).
    Tree { root: PathBuf },
    /// A fetched JSON document.
    Document(CatalogDocument),
}

impl Catalog {
    /// Lists provider identifiers in sorted order.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Io` if the tree's `providers/` directory
    /// cannot be read.
    pub fn provider_ids(&self) -> Result<Vec<String>, GeneratorError> {
        match self {
            Catalog::Tree { root } => list_tree_providers(root),
            Catalog::Document(doc) => Ok(doc.providers.keys().cloned().collect()),
        }
    }

    /// Returns provider metadata without loading models.
    pub fn provider_info(
        &self,
        provider_id: &str,
        folder: Option<&str>,
    ) -> Result<ProviderInfo, GeneratorError> {
        match self {
            Catalog::Tree { root } => {
                let provider_dir = tree_provider_dir(root, provider_id, folder)?;
                read_provider_info(&provider_dir)
            }
            Catalog::Document(doc) => doc
                .providers
                .get(provider_id)
                .map(|record| record.info.clone())
                .ok_or_else(|| GeneratorError::ProviderNotFound(provider_id.to_string())),
        }
    }

    /// Loads the active models of one provider.
    ///
    /// `folder` overrides the directory looked up in a tree catalog when it
    /// differs from the provider identifier. It is ignored for documents.
    pub fn load_provider(
        &self,
        provider_id: &str,
        folder: Option<&str>,
    ) -> Result<ProviderModels, GeneratorError> {
        match self {
            Catalog::Tree { root } => load_provider_tree(root, provider_id, folder),
            Catalog::Document(doc) => load_provider_document(doc, provider_id),
        }
    }
}

fn list_tree_providers(root: &Path) -> Result<Vec<String>, GeneratorError> {
    let providers_dir = root.join("providers");
    let entries = fs::read_dir(&providers_dir).map_err(|source| GeneratorError::Io {
        path: providers_dir.clone(),
        source,
    })?;

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| GeneratorError::Io {
            path: providers_dir.clone(),
            source,
        })?;
        if entry.path().is_dir() {
            ids.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    ids.sort();
    Ok(ids)
}

fn tree_provider_dir(
    root: &Path,
    provider_id: &str,
    folder: Option<&str>,
) -> Result<PathBuf, GeneratorError> {
    let folder_name = folder.unwrap_or(provider_id);
    let provider_dir = root.join("providers").join(folder_name);
    if !provider_dir.is_dir() {
        return Err(GeneratorError::ProviderNotFound(folder_name.to_string()));
    }
    Ok(provider_dir)
}

/// Reads `provider.toml`, defaulting every field when the file is absent.
fn read_provider_info(provider_dir: &Path) -> Result<ProviderInfo, GeneratorError> {
    let path = provider_dir.join("provider.toml");
    if !path.exists() {
        debug!("No provider.toml in {}", provider_dir.display());
        return Ok(ProviderInfo::default());
    }

    let text = fs::read_to_string(&path).map_err(|source| GeneratorError::Io {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&text).map_err(|e| {
        GeneratorError::MalformedDocument(format!("{}: {}", path.display(), e))
    })
}

/// Parses one record file as TOML or JSON depending on its extension.
fn parse_record(path: &Path) -> Result<CatalogEntry, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&text).map_err(|e| e.to_string()),
        _ => toml::from_str(&text).map_err(|e| e.to_string()),
    }
}

/// Builds a NormalizedModel from a parsed entry.
///
/// `wire_id` is the identifier used when the entry has no explicit `model_name`.
fn normalize(
    entry: &CatalogEntry,
    prefix: Option<&str>,
    base: &str,
    wire_id: String,
) -> Result<NormalizedModel, GeneratorError> {
    let names = derive_names(prefix, base)?;
    let model_id = entry.model_name.clone().unwrap_or(wire_id);
    let display_name = entry.name.clone().unwrap_or_else(|| model_id.clone());

    Ok(NormalizedModel {
        model_id,
        type_name: names.type_name,
        constructor_name: names.constructor_name,
        display_name,
        capabilities: capabilities(entry),
    })
}

/// Records a skipped entry and logs it with its identity.
fn skip(models: &mut ProviderModels, identity: String, reason: String) {
    let err = GeneratorError::EntryParse {
        path: PathBuf::from(&identity),
        reason: reason.clone(),
    };
    warn!("{err}");
    models.skipped.push(SkippedEntry { identity, reason });
}

/// Loads one provider from a directory tree catalog.
///
/// ## Errors
///
/// - `ProviderNotFound` if the provider folder does not exist
/// - `NestingTooDeep` for any record more than one folder below `models/`
/// - `IdentifierCollision` if two records derive the same type name
/// - `NoActiveModels` if nothing survives filtering
#[instrument(skip(root))]
pub fn load_provider_tree(
    root: &Path,
    provider_id: &str,
    folder: Option<&str>,
) -> Result<ProviderModels, GeneratorError> {
    let provider_dir = tree_provider_dir(root, provider_id, folder)?;
    let info = read_provider_info(&provider_dir)?;
    let mut models = ProviderModels::new(provider_id, info);

    let models_dir = provider_dir.join("models");
    if !models_dir.is_dir() {
        warn!("No models directory found for provider '{provider_id}'");
        return Err(GeneratorError::NoActiveModels {
            provider: provider_id.to_string(),
        });
    }

    for dir_entry in WalkDir::new(&models_dir).sort_by_file_name() {
        let dir_entry = dir_entry.map_err(|e| GeneratorError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| models_dir.clone()),
            source: e.into(),
        })?;
        let path = dir_entry.path();
        let is_record = dir_entry.file_type().is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| RECORD_EXTENSIONS.contains(&ext));
        if !is_record {
            continue;
        }

        let relative = path.strip_prefix(&models_dir).unwrap_or(path);
        let segments: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        let folder_prefix = match segments.as_slice() {
            [_] => None,
            [prefix, _] => Some(*prefix),
            _ => {
                return Err(GeneratorError::NestingTooDeep {
                    path: relative.to_path_buf(),
                });
            }
        };

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            skip(&mut models, path.display().to_string(), "file name is not UTF-8".to_string());
            continue;
        };

        let entry = match parse_record(path) {
            Ok(entry) => entry,
            Err(reason) => {
                skip(&mut models, path.display().to_string(), reason);
                continue;
            }
        };

        if entry.is_deprecated() {
            info!("Skipping deprecated model: {}", relative.display());
            continue;
        }

        let wire_id = match folder_prefix {
            Some(prefix) => format!("{prefix}/{stem}"),
            None => stem.to_string(),
        };
        let model = match normalize(&entry, folder_prefix, stem, wire_id) {
            Ok(model) => model,
            Err(e) => {
                skip(&mut models, path.display().to_string(), e.to_string());
                continue;
            }
        };

        debug!("Loaded active model: {} from {}", model.type_name, relative.display());
        models.insert(model)?;
    }

    finish(models)
}

/// Loads one provider from a fetched JSON document.
///
/// ## Errors
///
/// - `ProviderNotFound` if the document has no such provider
/// - `InvalidModelId` for a model id with more than one `/`
/// - `IdentifierCollision` if two models derive the same type name
/// - `NoActiveModels` if nothing survives filtering
#[instrument(skip(doc))]
pub fn load_provider_document(
    doc: &CatalogDocument,
    provider_id: &str,
) -> Result<ProviderModels, GeneratorError> {
    let record = doc
        .providers
        .get(provider_id)
        .ok_or_else(|| GeneratorError::ProviderNotFound(provider_id.to_string()))?;
    let mut models = ProviderModels::new(provider_id, record.info.clone());

    for (model_id, value) in &record.models {
        let identity = format!("{provider_id}/models/{model_id}");
        let entry: CatalogEntry = match serde_json::from_value(value.clone()) {
            Ok(entry) => entry,
            Err(e) => {
                skip(&mut models, identity, e.to_string());
                continue;
            }
        };

        if entry.is_deprecated() {
            info!("Skipping deprecated model: {model_id}");
            continue;
        }

        let (prefix, base) = split_model_id(model_id)?;
        let model = match normalize(&entry, prefix, base, model_id.clone()) {
            Ok(model) => model,
            Err(e) => {
                skip(&mut models, identity, e.to_string());
                continue;
            }
        };

        debug!("Loaded active model: {} from {identity}", model.type_name);
        models.insert(model)?;
    }

    finish(models)
}

fn finish(models: ProviderModels) -> Result<ProviderModels, GeneratorError> {
    if models.is_empty() {
        return Err(GeneratorError::NoActiveModels {
            provider: models.provider_id,
        });
    }
    info!(
        "Loaded {} active models for '{}' ({} skipped)",
        models.len(),
        models.provider_id,
        models.skipped.len()
    );
    Ok(models)
}
