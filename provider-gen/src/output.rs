//! Validation, formatting and all-or-nothing writing of generated files.
//!
//! ## Safety Guarantees
//!
//! - **Validation**: every rendered file is parsed with `syn` before it is
//!   handed to [`commit`]
//! - **Atomic writes**: each file is written to a temp file and renamed into
//!   place, so no target is ever left half-written
//! - **Batch rollback**: if any write in a batch fails, files created by the
//!   batch are removed and files it overwrote get their previous bytes back
//!
//! ## Commit Phases
//!
//! 1. Inspect targets, log an overwrite notice for each existing file and
//!    snapshot its content
//! 2. Create every missing parent directory
//! 3. Write files in order, recording each committed path
//! 4. On failure, roll back the committed paths in reverse and return the
//!    original error

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::codegen::RenderedFile;
use crate::errors::GeneratorError;

/// Notice placed at the top of every generated file.
pub const GENERATED_NOTICE: &str =
    "// This code was automatically generated by provider-gen. Do not edit manually.";

/// Validates generated code using syn.
///
/// Parses the token stream as a complete Rust file to ensure it's syntactically
/// valid before writing to disk.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Validates source text that was assembled as a string.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the text fails to parse.
pub fn validate_source(source: &str) -> Result<syn::File, GeneratorError> {
    syn::parse_file(source)
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease, prefixed with [`GENERATED_NOTICE`].
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{GENERATED_NOTICE}\n\n{formatted}")
}

/// Writes content to a file atomically using temp file + rename.
///
/// The temp file gets a unique name in the target's directory, so an unrelated
/// sibling file is never touched. The parent directory must already exist;
/// [`commit`] creates parents in a separate pass so a failure there happens
/// before any file is touched.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if the temp file cannot be written or
/// the rename fails. The temp file is removed on any failure.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_error = |source: std::io::Error| GeneratorError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(content.as_bytes()).map_err(write_error)?;
    // Dropping the returned file on error removes the temp file.
    temp.persist(path).map_err(|e| write_error(e.error))?;

    Ok(())
}

/// A target that existed before the batch started.
struct Snapshot {
    path: PathBuf,
    content: Vec<u8>,
}

/// Phase 1: log overwrites and capture the prior content of existing files.
fn inspect_targets(files: &[RenderedFile]) -> Result<Vec<Snapshot>, GeneratorError> {
    let mut snapshots = Vec::new();
    for file in files {
        if !file.path.is_file() {
            continue;
        }
        info!("Will overwrite existing file: {}", file.path.display());
        let content = fs::read(&file.path).map_err(|source| GeneratorError::Io {
            path: file.path.clone(),
            source,
        })?;
        snapshots.push(Snapshot {
            path: file.path.clone(),
            content,
        });
    }
    Ok(snapshots)
}

/// Phase 2: create every missing parent directory.
fn create_parents(files: &[RenderedFile]) -> Result<(), GeneratorError> {
    for file in files {
        if let Some(parent) = file.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            debug!("Creating directory {}", parent.display());
            fs::create_dir_all(parent).map_err(|source| GeneratorError::WriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Undoes the committed part of a failed batch, newest first.
///
/// A failure to undo one path is logged and the rest are still attempted.
fn rollback(committed: &[PathBuf], snapshots: &[Snapshot]) {
    for path in committed.iter().rev() {
        let result = match snapshots.iter().find(|s| &s.path == path) {
            Some(snapshot) => {
                info!("Rolling back {}: restoring previous content", path.display());
                fs::write(path, &snapshot.content)
            }
            None => {
                info!("Rolling back {}: removing", path.display());
                fs::remove_file(path)
            }
        };
        if let Err(e) = result {
            error!("Failed to roll back {}: {e}", path.display());
        }
    }
}

/// Commits a batch of rendered files: all of them land, or none do.
///
/// With `dry_run`, only the inspection phase runs; pending paths are logged
/// and the returned list is empty.
///
/// ## Returns
///
/// The committed paths, in write order.
///
/// ## Errors
///
/// Returns the first error raised while writing, after rolling back every
/// file the batch had already committed.
pub fn commit(files: &[RenderedFile], dry_run: bool) -> Result<Vec<PathBuf>, GeneratorError> {
    let snapshots = inspect_targets(files)?;

    if dry_run {
        for file in files {
            let marker = if snapshots.iter().any(|s| s.path == file.path) {
                " (overwrite)"
            } else {
                ""
            };
            info!(
                "[DRY RUN] Would write {} ({} bytes){marker}",
                file.path.display(),
                file.content.len()
            );
        }
        return Ok(Vec::new());
    }

    create_parents(files)?;

    let mut committed = Vec::with_capacity(files.len());
    for file in files {
        if let Err(e) = write_atomic(&file.path, &file.content) {
            warn!("Write failed, rolling back {} committed files", committed.len());
            rollback(&committed, &snapshots);
            return Err(e);
        }
        info!("Wrote {}", file.path.display());
        committed.push(file.path.clone());
    }

    Ok(committed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::FileKind;
    use quote::quote;
    use tempfile::TempDir;

    fn rendered(path: PathBuf, content: &str) -> RenderedFile {
        RenderedFile {
            path,
            kind: FileKind::Registry,
            content: content.to_string(),
        }
    }

    #[test]
    fn validate_code_accepts_valid_tokens() {
        let tokens = quote! { pub struct Foo; };
        assert!(validate_code(&tokens).is_ok());
    }

    #[test]
    fn validate_source_rejects_invalid_text() {
        assert!(matches!(
            validate_source("pub struct {"),
            Err(GeneratorError::CodeGenError(_))
        ));
    }

    #[test]
    fn format_code_prepends_notice() {
        let file = validate_code(&quote! { pub struct Foo; }).unwrap();
        let formatted = format_code(&file);
        assert!(formatted.starts_with(GENERATED_NOTICE));
        assert!(formatted.contains("pub struct Foo;"));
    }

    fn entry_count(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn write_atomic_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mod.rs");
        write_atomic(&path, "// hi\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "// hi\n");
        assert_eq!(entry_count(dir.path()), 1);
    }

    #[test]
    fn write_atomic_keeps_unrelated_tmp_sibling() {
        let dir = TempDir::new().unwrap();
        let sibling = dir.path().join("capabilities.tmp");
        fs::write(&sibling, "user data").unwrap();

        write_atomic(&dir.path().join("capabilities.rs"), "// caps\n").unwrap();

        assert_eq!(fs::read_to_string(&sibling).unwrap(), "user data");
        assert_eq!(entry_count(dir.path()), 2);
    }

    #[test]
    fn commit_writes_exact_content_and_creates_parents() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            rendered(dir.path().join("a/mod.rs"), "// a\n"),
            rendered(dir.path().join("a/capabilities.rs"), "// caps\n"),
        ];

        let committed = commit(&files, false).unwrap();

        assert_eq!(committed, vec![files[0].path.clone(), files[1].path.clone()]);
        assert_eq!(fs::read_to_string(&files[0].path).unwrap(), "// a\n");
        assert_eq!(fs::read_to_string(&files[1].path).unwrap(), "// caps\n");
    }

    #[test]
    fn failed_write_removes_earlier_files() {
        let dir = TempDir::new().unwrap();
        // A directory at the second target makes its rename fail.
        let blocked = dir.path().join("out/second.rs");
        fs::create_dir_all(&blocked).unwrap();

        let files = vec![
            rendered(dir.path().join("out/first.rs"), "// 1\n"),
            rendered(blocked.clone(), "// 2\n"),
            rendered(dir.path().join("out/third.rs"), "// 3\n"),
        ];

        let err = commit(&files, false).unwrap_err();

        assert!(matches!(err, GeneratorError::WriteError { .. }));
        assert!(!files[0].path.exists());
        assert!(blocked.is_dir());
        assert!(!files[2].path.exists());
        // Only the blocking directory is left; no temp file survives.
        assert_eq!(entry_count(&dir.path().join("out")), 1);
    }

    #[test]
    fn failed_write_restores_overwritten_file() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("out/existing.rs");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "// original\n").unwrap();
        let blocked = dir.path().join("out/blocked.rs");
        fs::create_dir_all(&blocked).unwrap();

        let files = vec![
            rendered(existing.clone(), "// replaced\n"),
            rendered(blocked, "// never\n"),
        ];

        assert!(commit(&files, false).is_err());
        assert_eq!(fs::read_to_string(&existing).unwrap(), "// original\n");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let files: Vec<_> = (0..4)
            .map(|i| rendered(dir.path().join(format!("p/{i}.rs")), "// x\n"))
            .collect();

        let committed = commit(&files, true).unwrap();

        assert!(committed.is_empty());
        assert!(!dir.path().join("p").exists());
    }

    #[test]
    fn dry_run_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mod.rs");
        fs::write(&path, "// keep\n").unwrap();

        commit(&[rendered(path.clone(), "// new\n")], true).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "// keep\n");
    }
}
