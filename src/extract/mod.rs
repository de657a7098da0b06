// src/extract/mod.rs
// External PDF-to-text extraction. The upload is written to a scoped temp
// file, handed to the configured pdftotext-style binary, and the temp file
// is removed on every exit path (NamedTempFile deletes on drop).

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PdfExtractor {
    binary: String,
    temp_dir: Option<PathBuf>,
}

impl PdfExtractor {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            temp_dir: None,
        }
    }

    /// Place temp files in a specific directory instead of the system
    /// default. Tests use this to observe cleanup.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Extract the text of a PDF by invoking `BINARY <path> -`.
    ///
    /// Non-zero exit or a spawn failure is an error; the caller decides how
    /// to degrade. The temp copy is gone by the time this returns, success
    /// or not.
    pub async fn extract(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("attache-").suffix(".pdf");
        let temp = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("Failed to create temp file for PDF extraction")?;

        std::fs::write(temp.path(), bytes)
            .with_context(|| format!("Failed to write temp copy of {name}"))?;

        debug!(
            "Running {} on {} ({} bytes)",
            self.binary,
            temp.path().display(),
            bytes.len()
        );

        let output = Command::new(&self.binary)
            .arg(temp.path())
            .arg("-")
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("Failed to run {} for {name}", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {} for {name}: {}",
                self.binary,
                output.status,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
