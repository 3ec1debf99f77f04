pub mod markup;
pub mod pdf;

pub use markup::MarkupRenderer;
pub use pdf::TypstRenderer;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::core::DocumentResult;

/// Final stage of the pipeline: template output in, artifact on disk out.
///
/// Implementations create missing parent directories and must leave either a
/// complete artifact at `output_path` or nothing.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, markup: &str, output_path: &Path) -> DocumentResult<()>;

    /// File extension of produced artifacts, without the dot.
    fn extension(&self) -> &str;
}

/// Hidden sibling of `target` used while an artifact is being written.
pub(crate) fn temp_sibling(target: &Path, extension: &str) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    target.with_file_name(format!(".{}-{}.{}", stem, Uuid::new_v4().simple(), extension))
}

pub(crate) async fn ensure_parent(path: &Path) -> DocumentResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Writes `bytes` to a temp sibling and renames it onto `target`.
pub(crate) async fn write_atomically(target: &Path, bytes: &[u8]) -> DocumentResult<()> {
    ensure_parent(target).await?;

    let temp = temp_sibling(target, "tmp");
    if let Err(e) = tokio::fs::write(&temp, bytes).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&temp, target).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }
    Ok(())
}
