use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::TemplateCache;
use crate::core::{DocumentError, DocumentResult};
use crate::models::AssembledView;

/// Turns an assembled view into Typst markup using the templates found in
/// one directory.
pub struct TemplateEngine {
    template_dir: PathBuf,
    extension: String,
    cache: Arc<TemplateCache>,
}

impl TemplateEngine {
    pub fn new(
        template_dir: impl Into<PathBuf>,
        extension: &str,
        cache: Arc<TemplateCache>,
    ) -> Self {
        TemplateEngine {
            template_dir: template_dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            cache,
        }
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    fn template_path(&self, template_id: &str) -> PathBuf {
        self.template_dir.join(format!("{}.{}", template_id, self.extension))
    }

    /// Template identities available on disk, sorted. A missing directory
    /// yields an empty list.
    pub async fn discover(&self) -> DocumentResult<Vec<String>> {
        if !tokio::fs::try_exists(&self.template_dir).await? {
            tracing::warn!("Template directory does not exist: {:?}", self.template_dir);
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.template_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                templates.push(stem.to_string());
            }
        }

        templates.sort();
        Ok(templates)
    }

    /// Loads a template into the cache unless it is already there.
    pub async fn load(&self, template_id: &str) -> DocumentResult<()> {
        if self.cache.contains(template_id).await {
            return Ok(());
        }

        let path = self.template_path(template_id);
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DocumentError::MissingTemplate {
                    template_id: template_id.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        self.cache.insert(template_id, source, path).await?;
        tracing::info!("Loaded template: {}", template_id);
        Ok(())
    }

    pub async fn render(&self, template_id: &str, view: &AssembledView) -> DocumentResult<String> {
        self.load(template_id).await?;
        self.cache.render(template_id, view).await
    }
}
