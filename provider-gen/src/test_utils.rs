//! Shared test utilities for provider-gen tests.
//!
//! Helpers for building normalized models and on-disk catalog trees so unit
//! tests across modules use the same fixtures.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::capability::Capability;
use crate::catalog::{NormalizedModel, ProviderInfo, ProviderModels};

/// Creates a NormalizedModel with a constructor name derived from the type name.
///
/// ## Arguments
///
/// * `model_id` - Wire identifier
/// * `type_name` - PascalCase type name (also the sort key)
/// * `caps` - Capabilities to attach
pub fn make_model(model_id: &str, type_name: &str, caps: &[Capability]) -> NormalizedModel {
    NormalizedModel {
        model_id: model_id.to_string(),
        type_name: type_name.to_string(),
        constructor_name: type_name.to_lowercase(),
        display_name: model_id.to_string(),
        capabilities: caps.iter().copied().collect::<BTreeSet<_>>(),
    }
}

/// Creates a ProviderModels holding the given models.
pub fn make_provider(provider_id: &str, info: ProviderInfo, models: Vec<NormalizedModel>) -> ProviderModels {
    let mut provider = ProviderModels::new(provider_id, info);
    for model in models {
        provider.insert(model).unwrap();
    }
    provider
}

/// Metadata for an OpenAI-compatible provider.
pub fn compatible_info(api: &str, env: &[&str], model: Option<&str>) -> ProviderInfo {
    ProviderInfo {
        name: None,
        npm: Some(crate::catalog::OPENAI_COMPATIBLE_NPM.to_string()),
        api: Some(api.to_string()),
        env: env.iter().map(|s| s.to_string()).collect(),
        model: model.map(str::to_string),
    }
}

/// Writes a model record under `<root>/providers/<provider>/models/<relative>`.
///
/// Returns the full path of the written file.
pub fn write_model_record(root: &Path, provider: &str, relative: &str, content: &str) -> PathBuf {
    let path = root.join("providers").join(provider).join("models").join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Writes `<root>/providers/<provider>/provider.toml`.
pub fn write_provider_record(root: &Path, provider: &str, content: &str) -> PathBuf {
    let path = root.join("providers").join(provider).join("provider.toml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}
