//! Error types for the provider generator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the catalog, rendering, or writing output.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A model record sits more than one folder beneath the provider's model root.
    #[error(
        "Nested folder depth exceeds 1 level at '{}'. Only 'models/*.toml' and 'models/folder/*.toml' are supported",
        path.display()
    )]
    NestingTooDeep { path: PathBuf },

    /// A model identifier cannot be split into an optional folder prefix and a base name.
    #[error("Invalid model id '{id}': {reason}")]
    InvalidModelId { id: String, reason: String },

    /// The catalog document does not have the expected top-level shape.
    #[error("Malformed catalog document: {0}")]
    MalformedDocument(String),

    /// A single catalog entry could not be parsed.
    ///
    /// The loader never returns this; it records it against the skipped entry.
    #[error("Failed to parse catalog entry '{}': {reason}", path.display())]
    EntryParse { path: PathBuf, reason: String },

    /// The provider produced zero active models, so there is nothing to generate.
    #[error("No active models found for provider '{provider}'")]
    NoActiveModels { provider: String },

    /// Two active models derive the same type name.
    #[error(
        "Identifier collision in provider '{provider}': '{first}' and '{second}' both map to type '{type_name}'"
    )]
    IdentifierCollision {
        provider: String,
        type_name: String,
        first: String,
        second: String,
    },

    /// The requested provider is not present in the catalog.
    #[error("Provider '{0}' not found in catalog")]
    ProviderNotFound(String),

    /// The requested provider is not classified as OpenAI-compatible.
    #[error("Provider '{0}' is not OpenAI-compatible; use the 'capabilities' command instead")]
    NotCompatible(String),

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{}': {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fetching the catalog document over HTTP failed.
    #[error("Failed to fetch catalog from {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// Cloning the catalog repository failed.
    #[error("Failed to clone catalog repository {url}: {reason}")]
    CloneFailed { url: String, reason: String },

    /// No `Cargo.toml` was found walking up from the starting directory.
    #[error("Could not find project root (missing Cargo.toml) above '{}'", start.display())]
    ProjectRootNotFound { start: PathBuf },

    #[error("IO error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Returns true for the empty-result condition.
    ///
    /// Callers use this to report "nothing to generate" separately from hard failures.
    pub fn is_nothing_to_generate(&self) -> bool {
        matches!(self, GeneratorError::NoActiveModels { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_no_active_models_is_nothing_to_generate() {
        let empty = GeneratorError::NoActiveModels {
            provider: "deepseek".to_string(),
        };
        assert!(empty.is_nothing_to_generate());

        let nested = GeneratorError::NestingTooDeep {
            path: PathBuf::from("a/b/model.toml"),
        };
        assert!(!nested.is_nothing_to_generate());
    }

    #[test]
    fn nesting_error_names_offending_path() {
        let err = GeneratorError::NestingTooDeep {
            path: PathBuf::from("a/b/model.toml"),
        };
        assert!(err.to_string().contains("a/b/model.toml"));
    }
}
