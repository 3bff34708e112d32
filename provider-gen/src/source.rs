//! Catalog retrieval.
//!
//! A catalog comes from a local path (a directory tree or a JSON file), a
//! shallow git clone, or an HTTP fetch of the JSON document. Cloned catalogs
//! live in a temporary directory that is removed when the
//! [`MaterializedCatalog`] is dropped.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tempfile::TempDir;
use tracing::{debug, info, instrument};

use crate::catalog::CatalogDocument;
use crate::errors::GeneratorError;
use crate::loader::Catalog;

/// Repository holding the per-model TOML tree.
pub const DEFAULT_CATALOG_GIT_URL: &str = "https://github.com/sst/models.dev.git";

/// Endpoint serving the whole catalog as one JSON document.
pub const DEFAULT_CATALOG_API_URL: &str = "https://models.dev/api.json";

/// Timeout for the catalog fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where to read the catalog from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A directory containing `providers/`, or a JSON document on disk.
    Local(PathBuf),
    /// A git repository to shallow-clone.
    Git { url: String },
    /// An HTTP endpoint serving the JSON document.
    Api { url: String },
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::Api {
            url: DEFAULT_CATALOG_API_URL.to_string(),
        }
    }
}

/// A catalog plus whatever temporary storage backs it.
#[derive(Debug)]
pub struct MaterializedCatalog {
    catalog: Catalog,
    checkout: Option<TempDir>,
}

impl MaterializedCatalog {
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Path of the temporary clone, if the catalog was cloned.
    pub fn checkout_path(&self) -> Option<&Path> {
        self.checkout.as_ref().map(TempDir::path)
    }
}

/// Retrieves the catalog described by `source`.
///
/// ## Errors
///
/// - `Io` if a local path does not exist or cannot be read
/// - `MalformedDocument` if a JSON document does not parse
/// - `CloneFailed` / `FetchFailed` for remote sources
#[instrument]
pub async fn materialize(source: &CatalogSource) -> Result<MaterializedCatalog, GeneratorError> {
    match source {
        CatalogSource::Local(path) => Ok(MaterializedCatalog {
            catalog: open_local(path)?,
            checkout: None,
        }),
        CatalogSource::Git { url } => {
            let checkout = clone_catalog(url)?;
            let root = checkout.path().to_path_buf();
            Ok(MaterializedCatalog {
                catalog: Catalog::Tree { root },
                checkout: Some(checkout),
            })
        }
        CatalogSource::Api { url } => Ok(MaterializedCatalog {
            catalog: Catalog::Document(fetch_catalog_document(url).await?),
            checkout: None,
        }),
    }
}

/// Opens a local catalog: a directory becomes a tree, a file a JSON document.
pub fn open_local(path: &Path) -> Result<Catalog, GeneratorError> {
    let metadata = std::fs::metadata(path).map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.is_dir() {
        debug!("Using catalog tree at {}", path.display());
        return Ok(Catalog::Tree {
            root: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Using catalog document at {}", path.display());
    Ok(Catalog::Document(CatalogDocument::from_json(&text)?))
}

/// Shallow-clones the catalog repository into a fresh temporary directory.
///
/// ## Errors
///
/// Returns `GeneratorError::CloneFailed` if git cannot be run or exits non-zero.
pub fn clone_catalog(url: &str) -> Result<TempDir, GeneratorError> {
    let checkout = TempDir::new().map_err(|e| GeneratorError::CloneFailed {
        url: url.to_string(),
        reason: format!("cannot create temporary directory: {e}"),
    })?;

    info!("Cloning catalog repository (shallow): {url}");
    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--quiet", url])
        .arg(checkout.path())
        .output()
        .map_err(|e| GeneratorError::CloneFailed {
            url: url.to_string(),
            reason: format!("failed to run git: {e}"),
        })?;

    if !output.status.success() {
        return Err(GeneratorError::CloneFailed {
            url: url.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(checkout)
}

/// Fetches and parses the catalog JSON document.
///
/// ## Errors
///
/// Returns `GeneratorError::FetchFailed` on transport errors or non-success
/// status, and `GeneratorError::MalformedDocument` if the body does not parse.
pub async fn fetch_catalog_document(url: &str) -> Result<CatalogDocument, GeneratorError> {
    let fetch_failed = |reason: String| GeneratorError::FetchFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| fetch_failed(e.to_string()))?;

    info!("Fetching catalog data from {url}");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_failed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_failed(format!("HTTP status {}", status.as_u16())));
    }

    let body = response.text().await.map_err(|e| fetch_failed(e.to_string()))?;
    let doc = CatalogDocument::from_json(&body)?;
    info!("Fetched catalog with {} providers", doc.providers.len());
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_model_record;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn local_directory_is_tree() {
        let dir = TempDir::new().unwrap();
        write_model_record(dir.path(), "x", "m.toml", "");

        let catalog = open_local(dir.path()).unwrap();
        assert!(matches!(catalog, Catalog::Tree { .. }));
    }

    #[test]
    fn local_file_is_document() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("api.json");
        std::fs::write(&file, r#"{"x": {"models": {"m": {}}}}"#).unwrap();

        let catalog = open_local(&file).unwrap();
        assert_eq!(catalog.provider_ids().unwrap(), vec!["x"]);
    }

    #[test]
    fn missing_local_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = open_local(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, GeneratorError::Io { .. }));
    }

    #[tokio::test]
    async fn fetch_parses_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"deepseek": {"models": {"deepseek-chat": {}}}}"#),
            )
            .mount(&server)
            .await;

        let doc = fetch_catalog_document(&format!("{}/api.json", server.uri()))
            .await
            .unwrap();
        assert!(doc.providers.contains_key("deepseek"));
    }

    #[tokio::test]
    async fn fetch_reports_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetch_catalog_document(&format!("{}/api.json", server.uri()))
            .await
            .unwrap_err();
        match err {
            GeneratorError::FetchFailed { reason, .. } => assert!(reason.contains("503")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = fetch_catalog_document(&server.uri()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedDocument(_)));
    }

    #[tokio::test]
    async fn materialize_local_has_no_checkout() {
        let dir = TempDir::new().unwrap();
        write_model_record(dir.path(), "x", "m.toml", "");

        let materialized = materialize(&CatalogSource::Local(dir.path().to_path_buf()))
            .await
            .unwrap();
        assert!(materialized.checkout_path().is_none());
    }
}
