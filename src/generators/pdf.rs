use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use super::{ensure_parent, temp_sibling, DocumentRenderer};
use crate::core::{DocumentError, DocumentResult};

/// Compiles Typst markup to PDF with the `typst` CLI.
pub struct TypstRenderer {
    binary: PathBuf,
    timeout: Duration,
}

impl TypstRenderer {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        TypstRenderer {
            binary: binary.into(),
            timeout,
        }
    }

    async fn compile(&self, typ_path: &Path, pdf_path: &Path) -> DocumentResult<()> {
        let mut command = Command::new(&self.binary);
        command.arg("compile").arg(typ_path).arg(pdf_path).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| DocumentError::RenderTimeout(self.timeout))?
            .map_err(|e| {
                DocumentError::Rendering(format!("Error running {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            return Err(DocumentError::Rendering(format!(
                "Typst compilation failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(())
    }
}

impl Default for TypstRenderer {
    fn default() -> Self {
        Self::new("typst", Duration::from_secs(60))
    }
}

#[async_trait]
impl DocumentRenderer for TypstRenderer {
    async fn render(&self, markup: &str, output_path: &Path) -> DocumentResult<()> {
        ensure_parent(output_path).await?;

        let typ_path = temp_sibling(output_path, "typ");
        let pdf_path = temp_sibling(output_path, "pdf");

        tokio::fs::write(&typ_path, markup).await?;
        let compiled = self.compile(&typ_path, &pdf_path).await;
        let _ = tokio::fs::remove_file(&typ_path).await;

        let result = match compiled {
            Ok(()) => tokio::fs::rename(&pdf_path, output_path).await.map_err(DocumentError::from),
            Err(e) => Err(e),
        };
        if result.is_err() {
            let _ = tokio::fs::remove_file(&pdf_path).await;
        }
        result
    }

    fn extension(&self) -> &str {
        "pdf"
    }
}
