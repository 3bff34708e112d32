//! Capability registry rendering.
//!
//! The registry is a `model_capabilities!` invocation listing every active
//! model of a provider:
//!
//! ```text
//! model_capabilities! {
//!     provider: DeepSeek,
//!     models: {
//!         DeepseekChat {
//!             model_name: "deepseek-chat",
//!             constructor_name: deepseek_chat,
//!             display_name: "DeepSeek Chat",
//!             capabilities: [TextInputSupport, TextOutputSupport, ToolCallSupport]
//!         },
//!     }
//! }
//! ```
//!
//! The text is assembled directly rather than through `prettyplease`, which
//! would flatten the macro body onto one line.

use std::fmt::Write as _;
use std::path::Path;

use crate::catalog::{NormalizedModel, ProviderModels};
use crate::codegen::{FileKind, ProviderNames, RenderedFile};
use crate::errors::GeneratorError;
use crate::naming::is_valid_identifier;
use crate::output::{GENERATED_NOTICE, validate_source};

/// Renders one model entry, indented for the `models: { ... }` block.
fn render_entry(out: &mut String, model: &NormalizedModel) {
    let capabilities = model
        .capabilities
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    // Debug formatting of a str yields an escaped Rust string literal.
    let _ = writeln!(out, "        {} {{", model.type_name);
    let _ = writeln!(out, "            model_name: {:?},", model.model_id);
    let _ = writeln!(out, "            constructor_name: {},", model.constructor_name);
    let _ = writeln!(out, "            display_name: {:?},", model.display_name);
    let _ = writeln!(out, "            capabilities: [{capabilities}]");
    let _ = writeln!(out, "        }},");
}

/// Renders the registry source text for a provider.
pub fn registry_source(names: &ProviderNames, models: &ProviderModels) -> String {
    let module = &names.module_name;
    let provider = &names.struct_name;

    let mut out = format!(
        r#"{GENERATED_NOTICE}

//! Capabilities for {module} models.
//!
//! This module defines model types and their capabilities for {module} providers.
//! Users can implement additional traits on custom models.

use crate::core::capabilities::*;
use crate::model_capabilities;
use crate::providers::{module}::{provider};

model_capabilities! {{
    provider: {provider},
    models: {{
"#
    );

    for model in models.iter() {
        render_entry(&mut out, model);
    }

    out.push_str("    }\n}\n");
    out
}

/// Renders `capabilities.rs` for a provider.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if a model's type or constructor
/// name is not a usable identifier, or the rendered text does not parse.
pub fn render_registry(
    names: &ProviderNames,
    models: &ProviderModels,
    providers_dir: &Path,
) -> Result<RenderedFile, GeneratorError> {
    // The macro body is only tokenized by syn, so names are checked here.
    for model in models.iter() {
        for name in [&model.type_name, &model.constructor_name] {
            if !is_valid_identifier(name) {
                return Err(GeneratorError::CodeGenError(format!(
                    "model '{}' has invalid identifier '{name}'",
                    model.model_id
                )));
            }
        }
    }

    let content = registry_source(names, models);
    validate_source(&content)?;

    Ok(RenderedFile {
        path: names.module_dir(providers_dir).join(FileKind::Registry.file_name()),
        kind: FileKind::Registry,
        content,
    })
}
