//! Provider code generator library.
//!
//! Turns the models.dev catalog into Rust source for the provider modules of
//! an AI SDK crate. For each provider it can generate:
//!
//! - `capabilities.rs` - a `model_capabilities!` registry with one typed
//!   entry per active model and its capability markers
//! - `mod.rs` - a provider scaffold (settings, provider struct, builder and
//!   `LanguageModel` binding) for OpenAI-compatible providers
//!
//! ## Modules
//!
//! - [`source`] - Retrieving the catalog (local path, git clone, HTTP)
//! - [`loader`] - Reading provider and model records, filtering deprecated models
//! - [`naming`] - Turning catalog identifiers into Rust identifiers
//! - [`capability`] - Deriving capability markers from a catalog entry
//! - [`catalog`] - Catalog records and normalized models
//! - [`codegen`] - Rendering registry and scaffold files
//! - [`output`] - Validation, formatting and all-or-nothing writing
//! - [`pipeline`] - Per-provider and all-provider generation runs
//! - [`project`] - Locating the project root
//! - [`formatter`] - Optional rustfmt pass
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use provider_gen::loader::Catalog;
//! use provider_gen::pipeline::{GenerationMode, GenerationOptions, ProviderSelector, run};
//!
//! let catalog = Catalog::Tree { root: "models.dev".into() };
//! let mut options = GenerationOptions::new(".");
//! options.dry_run = true;
//!
//! let summary = run(
//!     &catalog,
//!     &ProviderSelector::One("deepseek".to_string()),
//!     GenerationMode::Capabilities,
//!     &options,
//! )
//! .unwrap();
//! summary.print();
//! ```

pub mod capability;
pub mod catalog;
pub mod codegen;
pub mod errors;
pub mod formatter;
pub mod loader;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod project;
pub mod source;

#[cfg(test)]
mod test_utils;
