use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A catalog tree with one OpenAI-compatible provider and an output root.
fn fixture() -> (TempDir, TempDir) {
    let catalog = TempDir::new().unwrap();
    write(
        catalog.path(),
        "providers/vultr/provider.toml",
        "npm = \"@ai-sdk/openai-compatible\"\napi = \"https://api.vultrinference.com/v1\"\nenv = [\"VULTR_API_KEY\"]\n",
    );
    write(
        catalog.path(),
        "providers/vultr/models/llama-3.1-70b.toml",
        "name = \"Llama 3.1 70B\"\ntool_call = true\n",
    );

    let out = TempDir::new().unwrap();
    write(out.path(), "Cargo.toml", "[package]\nname = \"sdk\"\n");
    (catalog, out)
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_flag() {
    cargo_bin_cmd!("provider-gen")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("capabilities"))
        .stdout(predicate::str::contains("openai-compatible"));
}

#[test]
fn test_capabilities_help_lists_options() {
    cargo_bin_cmd!("provider-gen")
        .args(["capabilities", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--struct-name"))
        .stdout(predicate::str::contains("--folder"));
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_unknown_provider_fails() {
    let (catalog, out) = fixture();
    cargo_bin_cmd!("provider-gen")
        .arg("--catalog-dir")
        .arg(catalog.path())
        .arg("--output-root")
        .arg(out.path())
        .args(["capabilities", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_dry_run_succeeds_and_writes_nothing() {
    let (catalog, out) = fixture();
    cargo_bin_cmd!("provider-gen")
        .arg("--catalog-dir")
        .arg(catalog.path())
        .arg("--output-root")
        .arg(out.path())
        .args(["openai-compatible", "vultr", "-c", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vultr"));

    assert!(!out.path().join("src").exists());
}

#[test]
fn test_capabilities_writes_registry() {
    let (catalog, out) = fixture();
    cargo_bin_cmd!("provider-gen")
        .arg("--catalog-dir")
        .arg(catalog.path())
        .arg("--output-root")
        .arg(out.path())
        .args(["capabilities", "vultr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 succeeded"));

    let content =
        fs::read_to_string(out.path().join("src/providers/vultr/capabilities.rs")).unwrap();
    assert!(content.contains("Llama3170b {"));
    assert!(content.contains("constructor_name: llama_3_1_70b,"));
}

#[test]
fn test_native_provider_rejected_by_compatible_command() {
    let (catalog, out) = fixture();
    write(
        catalog.path(),
        "providers/native/models/m.toml",
        "name = \"M\"\n",
    );
    cargo_bin_cmd!("provider-gen")
        .arg("--catalog-dir")
        .arg(catalog.path())
        .arg("--output-root")
        .arg(out.path())
        .args(["openai-compatible", "native"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not OpenAI-compatible"));
}
