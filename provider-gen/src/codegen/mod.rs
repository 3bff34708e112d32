//! Rendering of generated provider files.
//!
//! Each provider yields up to two files under `<providers_dir>/<module_name>/`:
//!
//! - [`registry`] - `capabilities.rs`, one entry per active model with its
//!   constructor, display name and capability markers
//! - [`scaffold`] - `mod.rs`, the settings, provider and builder types and
//!   the language-model binding for an OpenAI-compatible provider
//!
//! Rendering performs no I/O. Output is a pure function of its inputs, so
//! regenerating from an unchanged catalog produces byte-identical files.
//! All output is parsed with `syn` before it is returned; a failure there
//! means the inputs were malformed and is reported as
//! `GeneratorError::CodeGenError`.

pub mod registry;
pub mod scaffold;

use std::path::{Path, PathBuf};

use crate::catalog::{ProviderInfo, ProviderModels};
use crate::errors::GeneratorError;
use crate::naming::{is_valid_identifier, to_module_name, to_type_name};

pub use registry::render_registry;
pub use scaffold::render_scaffold;

/// The kind of a rendered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Registry,
    Scaffold,
}

impl FileKind {
    /// File name the kind is written to inside the provider module directory.
    pub fn file_name(self) -> &'static str {
        match self {
            FileKind::Registry => "capabilities.rs",
            FileKind::Scaffold => "mod.rs",
        }
    }
}

/// A fully rendered file waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub kind: FileKind,
    pub content: String,
}

/// Rust names for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderNames {
    /// Catalog identifier, e.g. `302ai`.
    pub provider_id: String,
    /// Provider struct name, e.g. `Ai302`.
    pub struct_name: String,
    /// Module name, e.g. `ai_302`.
    pub module_name: String,
}

impl ProviderNames {
    /// Derives names from a provider id, with an optional struct name override.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::CodeGenError` if either name is not a valid
    /// Rust identifier.
    pub fn new(provider_id: &str, struct_name: Option<&str>) -> Result<Self, GeneratorError> {
        let struct_name = struct_name
            .map(str::to_string)
            .unwrap_or_else(|| to_type_name(provider_id));
        let module_name = to_module_name(provider_id);

        for name in [&struct_name, &module_name] {
            if !is_valid_identifier(name) {
                return Err(GeneratorError::CodeGenError(format!(
                    "provider '{provider_id}' derives invalid identifier '{name}'"
                )));
            }
        }

        Ok(Self {
            provider_id: provider_id.to_string(),
            struct_name,
            module_name,
        })
    }

    /// Directory holding this provider's generated files.
    pub fn module_dir(&self, providers_dir: &Path) -> PathBuf {
        providers_dir.join(&self.module_name)
    }
}

/// What to render for one provider.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub names: &'a ProviderNames,
    pub info: &'a ProviderInfo,
    /// Active models; `None` skips the registry file.
    pub models: Option<&'a ProviderModels>,
    pub scaffold: bool,
}

/// Renders every requested file for one provider, scaffold first.
pub fn render(input: RenderInput<'_>, providers_dir: &Path) -> Result<Vec<RenderedFile>, GeneratorError> {
    let mut files = Vec::with_capacity(2);
    if input.scaffold {
        files.push(render_scaffold(input.names, input.info, providers_dir)?);
    }
    if let Some(models) = input.models {
        files.push(render_registry(input.names, models, providers_dir)?);
    }
    Ok(files)
}
