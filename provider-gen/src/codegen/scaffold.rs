//! Provider scaffold rendering.
//!
//! Produces `mod.rs` for an OpenAI-compatible provider. The file wires a
//! settings type, a provider struct and its builder, and a `LanguageModel`
//! implementation that delegates to the shared chat-completions client.
//! Everything is emitted as plain items so the generated module needs no
//! macro expansion to read.

use std::path::Path;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::catalog::ProviderInfo;
use crate::codegen::{FileKind, ProviderNames, RenderedFile};
use crate::errors::GeneratorError;
use crate::output::{format_code, validate_code};

/// Values substituted into the scaffold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldParams<'a> {
    pub struct_name: &'a str,
    pub api_endpoint: &'a str,
    pub env_var: &'a str,
    pub default_model: &'a str,
}

impl<'a> ScaffoldParams<'a> {
    pub fn new(names: &'a ProviderNames, info: &'a ProviderInfo) -> Self {
        Self {
            struct_name: &names.struct_name,
            api_endpoint: info.api_endpoint(),
            env_var: info.primary_env_var(),
            default_model: info.default_model(&names.provider_id),
        }
    }
}

fn settings_module(params: &ScaffoldParams<'_>) -> TokenStream {
    let settings = format_ident!("{}ProviderSettings", params.struct_name);
    let settings_builder = format_ident!("{}ProviderSettingsBuilder", params.struct_name);
    let display_name = params.struct_name;
    let base_url = params.api_endpoint;
    let env_var = params.env_var;

    quote! {
        pub mod settings {
            //! Defines the settings for this provider.

            /// Settings for this provider (delegates to OpenAI Chat Completions).
            #[derive(Debug, Clone)]
            pub struct #settings {
                /// The name of the provider.
                pub provider_name: String,
                /// The base URL for the API.
                pub base_url: String,
                /// The API key for authentication.
                pub api_key: String,
                /// Custom API path override.
                pub path: Option<String>,
            }

            impl Default for #settings {
                fn default() -> Self {
                    Self {
                        provider_name: #display_name.to_string(),
                        base_url: #base_url.to_string(),
                        api_key: std::env::var(#env_var).unwrap_or_default(),
                        path: None,
                    }
                }
            }

            impl #settings {
                /// Creates a new builder for the settings.
                pub fn builder() -> #settings_builder {
                    #settings_builder::default()
                }
            }

            /// Builder for the provider settings.
            #[derive(Debug, Clone, Default)]
            pub struct #settings_builder {
                provider_name: Option<String>,
                base_url: Option<String>,
                api_key: Option<String>,
                path: Option<String>,
            }

            impl #settings_builder {
                pub fn provider_name(mut self, provider_name: impl Into<String>) -> Self {
                    self.provider_name = Some(provider_name.into());
                    self
                }

                pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
                    self.base_url = Some(base_url.into());
                    self
                }

                pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
                    self.api_key = Some(api_key.into());
                    self
                }

                pub fn path(mut self, path: impl Into<String>) -> Self {
                    self.path = Some(path.into());
                    self
                }

                /// Builds the settings, using defaults for unset fields.
                pub fn build(self) -> #settings {
                    let defaults = #settings::default();
                    #settings {
                        provider_name: self.provider_name.unwrap_or(defaults.provider_name),
                        base_url: self.base_url.unwrap_or(defaults.base_url),
                        api_key: self.api_key.unwrap_or(defaults.api_key),
                        path: self.path.or(defaults.path),
                    }
                }
            }
        }
    }
}

fn provider_items(params: &ScaffoldParams<'_>) -> TokenStream {
    let provider = format_ident!("{}", params.struct_name);
    let builder = format_ident!("{}Builder", params.struct_name);
    let settings = format_ident!("{}ProviderSettings", params.struct_name);
    let name = params.struct_name;
    let example_model = params.default_model;

    // Leading space for proper /// formatting
    let struct_doc = format!(" The {name} provider, wrapping OpenAI Chat Completions API.");
    let model_name_doc = format!(
        " Creates a {name} provider with a dynamic model name (e.g. \"{example_model}\") using default settings."
    );
    let default_doc = format!(" Creates a {name} provider with default settings.");
    let builder_doc = format!(" {name} provider builder.");
    let build_doc = format!(" Builds the {name} provider after validating the base URL and API key.");

    quote! {
        use crate::Error;
        use crate::core::DynamicModel;
        use crate::core::capabilities::ModelName;
        use crate::core::utils::validate_base_url;
        use crate::error::Result;
        use crate::providers::openai_chat_completions::OpenAIChatCompletions;
        use settings::#settings;

        #[doc = #struct_doc]
        #[derive(Debug, Clone)]
        pub struct #provider<M: ModelName> {
            /// Configuration settings for the provider.
            pub settings: #settings,
            pub(crate) inner: OpenAIChatCompletions<M>,
        }

        impl<M: ModelName> #provider<M> {
            /// Provider settings builder.
            pub fn builder() -> #builder<M> {
                #builder::default()
            }
        }

        impl #provider<DynamicModel> {
            #[doc = #model_name_doc]
            pub fn model_name(name: impl Into<String>) -> Self {
                let settings = #settings::default();
                let inner = OpenAIChatCompletions::<DynamicModel>::model_name(name);
                #provider { settings, inner }
            }
        }

        impl<M: ModelName> Default for #provider<M> {
            #[doc = #default_doc]
            fn default() -> Self {
                let #builder { settings, inner } = #builder::default();
                #provider { settings, inner }
            }
        }

        #[doc = #builder_doc]
        pub struct #builder<M: ModelName> {
            settings: #settings,
            inner: OpenAIChatCompletions<M>,
        }

        impl<M: ModelName> Default for #builder<M> {
            fn default() -> Self {
                let settings = #settings::default();
                let mut inner = OpenAIChatCompletions::default();
                inner.settings.provider_name = settings.provider_name.clone();
                inner.settings.base_url = settings.base_url.clone();
                inner.settings.api_key = settings.api_key.clone();
                inner.settings.path = settings.path.clone();
                Self { settings, inner }
            }
        }

        impl<M: ModelName> #builder<M> {
            pub fn provider_name(mut self, provider_name: impl Into<String>) -> Self {
                let name = provider_name.into();
                self.settings.provider_name = name.clone();
                self.inner.settings.provider_name = name;
                self
            }

            pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
                let url = base_url.into();
                self.settings.base_url = url.clone();
                self.inner.settings.base_url = url;
                self
            }

            pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
                let key = api_key.into();
                self.settings.api_key = key.clone();
                self.inner.settings.api_key = key;
                self
            }

            pub fn path(mut self, path: impl Into<String>) -> Self {
                let path = Some(path.into());
                self.settings.path = path.clone();
                self.inner.settings.path = path;
                self
            }

            #[doc = #build_doc]
            pub fn build(mut self) -> Result<#provider<M>> {
                let base_url = validate_base_url(&self.settings.base_url)?;
                if self.settings.api_key.is_empty() {
                    return Err(Error::MissingField("api_key".to_string()));
                }
                self.inner.settings.base_url = base_url.to_string();
                self.settings.base_url = base_url.to_string();
                Ok(#provider {
                    settings: self.settings,
                    inner: self.inner,
                })
            }
        }

        impl #builder<DynamicModel> {
            /// Sets the model name from a string. Capabilities are not validated.
            pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
                self.inner.options.model = model_name.into();
                self
            }
        }
    }
}

fn language_model_module(params: &ScaffoldParams<'_>) -> TokenStream {
    let provider = format_ident!("{}", params.struct_name);
    let generate_doc = format!(" Generates text using the {} provider.", params.struct_name);
    let stream_doc = format!(" Streams text using the {} provider.", params.struct_name);

    quote! {
        pub mod language_model {
            //! Language model implementation for this provider.

            use async_trait::async_trait;

            use super::#provider;
            use crate::{
                Result,
                core::{
                    LanguageModel,
                    capabilities::ModelName,
                    language_model::{LanguageModelOptions, LanguageModelResponse, ProviderStream},
                },
            };

            #[async_trait]
            impl<M: ModelName> LanguageModel for #provider<M> {
                fn name(&self) -> String {
                    self.inner.name()
                }

                #[doc = #generate_doc]
                async fn generate_text(&mut self, options: LanguageModelOptions) -> Result<LanguageModelResponse> {
                    self.inner.generate_text(options).await
                }

                #[doc = #stream_doc]
                async fn stream_text(&mut self, options: LanguageModelOptions) -> Result<ProviderStream> {
                    self.inner.stream_text(options).await
                }
            }
        }
    }
}

/// Assembles the full scaffold token stream.
pub fn assemble_scaffold(params: &ScaffoldParams<'_>) -> TokenStream {
    let module_doc = format!(
        " This module provides the {0} provider, wrapping OpenAI Chat Completions for {0} requests.",
        params.struct_name
    );
    let settings = settings_module(params);
    let provider = provider_items(params);
    let language_model = language_model_module(params);

    quote! {
        #![doc = #module_doc]

        pub mod capabilities;

        #settings

        #provider

        #language_model

        pub use capabilities::*;
    }
}

/// Renders `mod.rs` for an OpenAI-compatible provider.
///
/// The endpoint is embedded as declared (empty if absent), the API key
/// variable is the first of `env` (empty if none), and the default model
/// falls back to the provider id.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the struct name is not a valid
/// identifier or the assembled code does not parse.
pub fn render_scaffold(
    names: &ProviderNames,
    info: &ProviderInfo,
    providers_dir: &Path,
) -> Result<RenderedFile, GeneratorError> {
    let params = ScaffoldParams::new(names, info);
    let tokens = assemble_scaffold(&params);
    let file = validate_code(&tokens)?;

    Ok(RenderedFile {
        path: names.module_dir(providers_dir).join(FileKind::Scaffold.file_name()),
        kind: FileKind::Scaffold,
        content: format_code(&file),
    })
}
