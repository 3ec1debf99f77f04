use async_trait::async_trait;
use std::path::Path;

use super::{write_atomically, DocumentRenderer};
use crate::core::DocumentResult;

/// Writes the Typst source itself instead of compiling it.
#[derive(Debug, Clone, Default)]
pub struct MarkupRenderer;

impl MarkupRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentRenderer for MarkupRenderer {
    async fn render(&self, markup: &str, output_path: &Path) -> DocumentResult<()> {
        write_atomically(output_path, markup.as_bytes()).await
    }

    fn extension(&self) -> &str {
        "typ"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_markup_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out/doc.typ");

        MarkupRenderer::new().render("= Hello", &target).await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "= Hello");
        // No temp files left behind.
        let names: Vec<_> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn overwrites_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doc.typ");
        let renderer = MarkupRenderer::new();

        renderer.render("old", &target).await.unwrap();
        renderer.render("new", &target).await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }
}
