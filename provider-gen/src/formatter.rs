//! Best-effort formatting of committed files with `rustfmt`.
//!
//! Formatting is cosmetic. A missing or failing `rustfmt` is logged and never
//! turns a successful generation into a failure.

use std::path::PathBuf;
use std::process::Command;

use tracing::{info, warn};

/// Edition passed to `rustfmt`.
const RUSTFMT_EDITION: &str = "2024";

/// Runs `rustfmt` over `paths`. Returns true if formatting succeeded.
pub fn run_rustfmt(paths: &[PathBuf]) -> bool {
    if paths.is_empty() {
        return true;
    }

    info!("Running rustfmt on {} files", paths.len());
    let output = Command::new("rustfmt")
        .args(["--edition", RUSTFMT_EDITION])
        .args(paths)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            info!("Code formatted successfully");
            true
        }
        Ok(output) => {
            warn!(
                "rustfmt failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Err(e) => {
            warn!("Could not run rustfmt: {e}");
            false
        }
    }
}
