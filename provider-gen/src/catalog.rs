//! Catalog data model.
//!
//! Raw records ([`CatalogEntry`], [`ProviderInfo`], [`CatalogDocument`]) are
//! deserialized from the external catalog and discarded after normalization.
//! [`NormalizedModel`] and [`ProviderModels`] are built once per run and never
//! mutated afterwards, except by the loader while it assembles them.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::capability::Capability;
use crate::errors::GeneratorError;

/// The `npm` tag that classifies a provider as OpenAI-compatible.
pub const OPENAI_COMPATIBLE_NPM: &str = "@ai-sdk/openai-compatible";

/// Compatible providers that are never scaffolded.
pub const EXCLUDED_COMPATIBLE: &[&str] = &["privatemode-ai"];

/// Lifecycle status of a catalog model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Active,
    Deprecated,
    #[serde(other)]
    Other,
}

/// Input and output modality lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Modalities {
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub output: Vec<String>,
}

/// One model's raw catalog record.
///
/// Fields the generator does not use (cost, limits, dates) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    /// Human-readable name, e.g. "DeepSeek Chat".
    pub name: Option<String>,
    /// Explicit wire identifier overriding the one derived from the record's location.
    pub model_name: Option<String>,
    pub tool_call: bool,
    pub reasoning: bool,
    pub structured_output: bool,
    pub attachment: bool,
    pub modalities: Modalities,
    pub status: Option<ModelStatus>,
}

impl CatalogEntry {
    pub fn is_deprecated(&self) -> bool {
        self.status == Some(ModelStatus::Deprecated)
    }
}

/// Provider-level metadata used by the scaffold renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderInfo {
    pub name: Option<String>,
    pub npm: Option<String>,
    pub api: Option<String>,
    pub env: Vec<String>,
    pub model: Option<String>,
}

impl ProviderInfo {
    /// Whether a provider with this metadata should get a scaffold file.
    pub fn is_openai_compatible(&self, provider_id: &str) -> bool {
        self.npm.as_deref() == Some(OPENAI_COMPATIBLE_NPM)
            && !EXCLUDED_COMPATIBLE.contains(&provider_id)
    }

    /// The API endpoint, or an empty string if none is declared.
    pub fn api_endpoint(&self) -> &str {
        self.api.as_deref().unwrap_or_default()
    }

    /// The first declared environment variable, or an empty string.
    pub fn primary_env_var(&self) -> &str {
        self.env.first().map(String::as_str).unwrap_or_default()
    }

    /// The declared default model, falling back to the provider id.
    pub fn default_model<'a>(&'a self, provider_id: &'a str) -> &'a str {
        self.model.as_deref().unwrap_or(provider_id)
    }
}

/// One provider's record in the fetched JSON document.
///
/// Models stay as raw JSON so a malformed model is skipped on its own
/// instead of failing the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderRecord {
    #[serde(flatten)]
    pub info: ProviderInfo,
    #[serde(default)]
    pub models: BTreeMap<String, serde_json::Value>,
}

/// The fetched catalog document, keyed by provider identifier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CatalogDocument {
    pub providers: BTreeMap<String, ProviderRecord>,
}

impl CatalogDocument {
    /// Parses a JSON catalog document.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::MalformedDocument` if the text is not a JSON
    /// object mapping provider ids to provider records.
    pub fn from_json(text: &str) -> Result<Self, GeneratorError> {
        serde_json::from_str(text).map_err(|e| GeneratorError::MalformedDocument(e.to_string()))
    }
}

/// A model ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedModel {
    /// Wire identifier sent to the provider API, e.g. `meta-llama/llama-guard-4-12b`.
    pub model_id: String,
    pub type_name: String,
    pub constructor_name: String,
    pub display_name: String,
    pub capabilities: BTreeSet<Capability>,
}

/// A catalog entry the loader skipped because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// File path or document key identifying the entry.
    pub identity: String,
    pub reason: String,
}

/// The active models of one provider, ordered by type name.
#[derive(Debug, Clone, Default)]
pub struct ProviderModels {
    pub provider_id: String,
    pub info: ProviderInfo,
    models: BTreeMap<String, NormalizedModel>,
    /// Entries skipped because of per-entry parse failures.
    pub skipped: Vec<SkippedEntry>,
}

impl ProviderModels {
    pub fn new(provider_id: impl Into<String>, info: ProviderInfo) -> Self {
        Self {
            provider_id: provider_id.into(),
            info,
            models: BTreeMap::new(),
            skipped: Vec::new(),
        }
    }

    /// Adds a model, rejecting a second model with the same type name.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::IdentifierCollision` naming both wire ids.
    pub fn insert(&mut self, model: NormalizedModel) -> Result<(), GeneratorError> {
        if let Some(existing) = self.models.get(&model.type_name) {
            return Err(GeneratorError::IdentifierCollision {
                provider: self.provider_id.clone(),
                type_name: model.type_name.clone(),
                first: existing.model_id.clone(),
                second: model.model_id,
            });
        }
        self.models.insert(model.type_name.clone(), model);
        Ok(())
    }

    /// Models in type-name order.
    pub fn iter(&self) -> impl Iterator<Item = &NormalizedModel> {
        self.models.values()
    }

    pub fn get(&self, type_name: &str) -> Option<&NormalizedModel> {
        self.models.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Loaded providers keyed by provider identifier.
#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog {
    providers: BTreeMap<String, ProviderModels>,
}

impl ProviderCatalog {
    pub fn insert(&mut self, models: ProviderModels) {
        self.providers.insert(models.provider_id.clone(), models);
    }

    pub fn get(&self, provider_id: &str) -> Option<&ProviderModels> {
        self.providers.get(provider_id)
    }

    /// Providers in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ProviderModels> {
        self.providers.values()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::make_model;

    #[test]
    fn entry_defaults_when_fields_missing() {
        let entry: CatalogEntry = toml::from_str(r#"name = "Bare""#).unwrap();
        assert_eq!(entry.name.as_deref(), Some("Bare"));
        assert!(!entry.tool_call);
        assert!(entry.modalities.input.is_empty());
        assert_eq!(entry.status, None);
    }

    #[test]
    fn entry_parses_status() {
        let entry: CatalogEntry = toml::from_str(r#"status = "deprecated""#).unwrap();
        assert!(entry.is_deprecated());

        let entry: CatalogEntry = toml::from_str(r#"status = "beta""#).unwrap();
        assert_eq!(entry.status, Some(ModelStatus::Other));
        assert!(!entry.is_deprecated());
    }

    #[test]
    fn entry_ignores_unknown_fields() {
        let entry: CatalogEntry = toml::from_str(
            r#"
            name = "GPT-4o"
            release_date = "2024-05-13"

            [cost]
            input = 2.5

            [modalities]
            input = ["text", "image"]
            output = ["text"]
            "#,
        )
        .unwrap();
        assert_eq!(entry.modalities.input, vec!["text", "image"]);
    }

    #[test]
    fn provider_info_fallbacks() {
        let info = ProviderInfo::default();
        assert_eq!(info.api_endpoint(), "");
        assert_eq!(info.primary_env_var(), "");
        assert_eq!(info.default_model("vultr"), "vultr");
    }

    #[test]
    fn provider_info_uses_first_env_var() {
        let info = ProviderInfo {
            env: vec!["VULTR_API_KEY".to_string(), "VULTR_TOKEN".to_string()],
            model: Some("llama-3".to_string()),
            ..ProviderInfo::default()
        };
        assert_eq!(info.primary_env_var(), "VULTR_API_KEY");
        assert_eq!(info.default_model("vultr"), "llama-3");
    }

    #[test]
    fn compatibility_respects_exclusions() {
        let info = ProviderInfo {
            npm: Some(OPENAI_COMPATIBLE_NPM.to_string()),
            ..ProviderInfo::default()
        };
        assert!(info.is_openai_compatible("vultr"));
        assert!(!info.is_openai_compatible("privatemode-ai"));
        assert!(!ProviderInfo::default().is_openai_compatible("vultr"));
    }

    #[test]
    fn document_rejects_non_object() {
        let err = CatalogDocument::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedDocument(_)));
    }

    #[test]
    fn document_keeps_models_raw() {
        let doc = CatalogDocument::from_json(
            r#"{"deepseek": {"npm": "@ai-sdk/openai-compatible", "env": ["DEEPSEEK_API_KEY"],
                "models": {"deepseek-chat": {"name": "DeepSeek Chat"}, "broken": 42}}}"#,
        )
        .unwrap();
        let record = &doc.providers["deepseek"];
        assert_eq!(record.models.len(), 2);
        assert_eq!(record.info.primary_env_var(), "DEEPSEEK_API_KEY");
    }

    #[test]
    fn provider_models_sorted_by_type_name() {
        let mut models = ProviderModels::new("test", ProviderInfo::default());
        models.insert(make_model("zeta", "Zeta", &[])).unwrap();
        models.insert(make_model("alpha", "Alpha", &[])).unwrap();
        let order: Vec<&str> = models.iter().map(|m| m.type_name.as_str()).collect();
        assert_eq!(order, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn provider_models_reject_collisions() {
        let mut models = ProviderModels::new("test", ProviderInfo::default());
        models.insert(make_model("gpt-4o", "Gpt4o", &[])).unwrap();
        let err = models.insert(make_model("gpt.4o", "Gpt4o", &[])).unwrap_err();
        match err {
            GeneratorError::IdentifierCollision { first, second, .. } => {
                assert_eq!(first, "gpt-4o");
                assert_eq!(second, "gpt.4o");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
