//! Identifier normalization for generated Rust code.
//!
//! Catalog identifiers contain digits, dots, hyphens, colons, parentheses and
//! slashes. This module maps them onto three canonical forms:
//!
//! - **type name**: PascalCase, used for model structs and the provider struct
//! - **constructor name**: snake_case, used for model constructor functions
//! - **module name**: snake_case, used for the provider's module path
//!
//! Rust identifiers cannot start with a digit, so a leading digit run is moved
//! to the end of the identifier by [`relocate_leading_digits`]. That step is
//! kept separate from casing so the placement rule can change per target.
//!
//! ## Examples
//!
//! ```
//! use provider_gen::naming::{to_constructor_name, to_module_name, to_type_name};
//!
//! assert_eq!(to_type_name("gpt-3.5-turbo"), "Gpt35Turbo");
//! assert_eq!(to_constructor_name("gpt-3.5-turbo"), "gpt_3_5_turbo");
//! assert_eq!(to_type_name("302ai"), "Ai302");
//! assert_eq!(to_module_name("302ai"), "ai_302");
//! ```

use std::borrow::Cow;

use crate::errors::GeneratorError;

/// Where a relocated leading digit run is placed at the end of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitPlacement {
    /// Digits abut the remaining text: `302ai` -> `ai302`.
    Abutting,
    /// Digits are joined with an underscore: `302ai` -> `ai_302`.
    Separated,
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
fn replace_invalid_chars(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Moves a leading run of digits to the end of an already-cleaned identifier.
///
/// The run may be interleaved with underscores (`3_5_turbo` has the run `3_5`),
/// and leading underscores are ignored when looking for it. Identifiers made
/// only of digits are returned unchanged since there is nothing to move them
/// behind.
pub fn relocate_leading_digits(s: &str, placement: DigitPlacement) -> Cow<'_, str> {
    let body = s.trim_start_matches('_');
    if !body.starts_with(|c: char| c.is_ascii_digit()) {
        return Cow::Borrowed(s);
    }

    let run_end = body
        .find(|c: char| !(c.is_ascii_digit() || c == '_'))
        .unwrap_or(body.len());
    let rest = &body[run_end..];
    if rest.is_empty() {
        return Cow::Borrowed(s);
    }

    let digits = body[..run_end].trim_end_matches('_');
    match placement {
        DigitPlacement::Abutting => Cow::Owned(format!("{rest}{digits}")),
        DigitPlacement::Separated => Cow::Owned(format!("{rest}_{digits}")),
    }
}

/// Uppercases the first character of a segment, leaving the rest untouched.
///
/// Leaving the tail alone is what makes [`to_type_name`] a fixed point on its
/// own output.
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Collapses runs of `_`, trims them from both ends and lowercases.
fn to_snake(s: &str) -> String {
    s.split('_')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

/// Converts an identifier to a PascalCase type name.
///
/// - `gpt-3.5-turbo` -> `Gpt35Turbo`
/// - `302ai` -> `Ai302`
/// - `llama-guard-4-12b` -> `LlamaGuard412b`
pub fn to_type_name(s: &str) -> String {
    let cleaned = replace_invalid_chars(s);
    let relocated = relocate_leading_digits(&cleaned, DigitPlacement::Abutting);
    relocated
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

/// Converts an identifier to a snake_case constructor name.
///
/// The result never starts or ends with `_` and never contains `__`. It is
/// empty only when the input has no ASCII alphanumeric character at all.
///
/// - `gpt-3.5-turbo` -> `gpt_3_5_turbo`
/// - `claude-3-opus(beta)` -> `claude_3_opus_beta`
/// - `302ai` -> `ai302`
pub fn to_constructor_name(s: &str) -> String {
    let cleaned = replace_invalid_chars(s);
    let relocated = relocate_leading_digits(&cleaned, DigitPlacement::Abutting);
    to_snake(&relocated)
}

/// Converts a provider identifier to a snake_case module name.
///
/// - `github-copilot` -> `github_copilot`
/// - `302ai` -> `ai_302`
pub fn to_module_name(provider_id: &str) -> String {
    let cleaned = replace_invalid_chars(provider_id);
    let relocated = relocate_leading_digits(&cleaned, DigitPlacement::Separated);
    to_snake(&relocated)
}

/// Returns true if `s` is a Rust identifier starting with an ASCII letter.
///
/// Keywords (`type`, `fn`, `self`, ...) are rejected.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let ascii = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    ascii && syn::parse_str::<syn::Ident>(s).is_ok()
}

/// Splits a model identifier into an optional folder prefix and a base name.
///
/// Only one level of nesting is supported: `meta-llama/llama-guard-4-12b` is
/// accepted, `a/b/c` is rejected rather than truncated.
///
/// ## Errors
///
/// Returns `GeneratorError::InvalidModelId` for more than one `/` or for an
/// empty prefix or base.
pub fn split_model_id(model_id: &str) -> Result<(Option<&str>, &str), GeneratorError> {
    let parts: Vec<&str> = model_id.split('/').collect();
    match parts.as_slice() {
        [base] => Ok((None, *base)),
        [prefix, base] if !prefix.is_empty() && !base.is_empty() => Ok((Some(*prefix), *base)),
        [_, _] => Err(GeneratorError::InvalidModelId {
            id: model_id.to_string(),
            reason: "folder prefix and base name must both be non-empty".to_string(),
        }),
        _ => Err(GeneratorError::InvalidModelId {
            id: model_id.to_string(),
            reason: format!(
                "{} levels of nesting; only one folder prefix is supported",
                parts.len() - 1
            ),
        }),
    }
}

/// Type and constructor names derived for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNames {
    pub type_name: String,
    pub constructor_name: String,
}

/// Derives the type and constructor names for a base name and optional folder prefix.
///
/// Prefixed models concatenate the prefix's type name with the base's, and
/// join the constructor names with `_`.
///
/// ## Errors
///
/// Returns `GeneratorError::InvalidModelId` if either derived name is not a
/// valid Rust identifier (for example, an all-punctuation identifier).
pub fn derive_names(prefix: Option<&str>, base: &str) -> Result<DerivedNames, GeneratorError> {
    let (type_name, constructor_name) = match prefix {
        Some(prefix) => (
            to_type_name(prefix) + &to_type_name(base),
            format!("{}_{}", to_constructor_name(prefix), to_constructor_name(base)),
        ),
        None => (to_type_name(base), to_constructor_name(base)),
    };

    let display = match prefix {
        Some(prefix) => format!("{prefix}/{base}"),
        None => base.to_string(),
    };
    for candidate in [&type_name, &constructor_name] {
        if !is_valid_identifier(candidate) {
            return Err(GeneratorError::InvalidModelId {
                id: display,
                reason: format!("derives invalid identifier '{candidate}'"),
            });
        }
    }

    Ok(DerivedNames {
        type_name,
        constructor_name,
    })
}
