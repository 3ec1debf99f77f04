use std::collections::HashMap;
use std::path::PathBuf;

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use tokio::sync::RwLock;

use super::helpers;
use crate::core::{DocumentError, DocumentResult};

/// Compiled templates keyed by template identity.
///
/// Entries are added on first use and never evicted; create one cache per
/// run (or per test).
pub struct TemplateCache {
    env: RwLock<Environment<'static>>,
    /// Template identity to the file it was compiled from.
    entries: RwLock<HashMap<String, PathBuf>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        let mut env = Environment::new();
        // Output is Typst markup, not HTML.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        helpers::register(&mut env);

        TemplateCache {
            env: RwLock::new(env),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, template_id: &str) -> bool {
        self.entries.read().await.contains_key(template_id)
    }

    /// Compiles and stores a template. A second insert for the same identity
    /// keeps the first entry.
    pub async fn insert(
        &self,
        template_id: &str,
        source: String,
        source_path: PathBuf,
    ) -> DocumentResult<()> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(template_id) {
            return Ok(());
        }

        self.env
            .write()
            .await
            .add_template_owned(template_id.to_string(), source)?;

        tracing::debug!(template = template_id, source = ?source_path, "Template cached");
        entries.insert(template_id.to_string(), source_path);
        Ok(())
    }

    pub async fn render<S: Serialize>(
        &self,
        template_id: &str,
        context: S,
    ) -> DocumentResult<String> {
        let env = self.env.read().await;
        let template = env.get_template(template_id).map_err(|e| match e.kind() {
            minijinja::ErrorKind::TemplateNotFound => DocumentError::MissingTemplate {
                template_id: template_id.to_string(),
            },
            _ => DocumentError::Template(e),
        })?;

        Ok(template.render(context)?)
    }

    pub async fn get_stats(&self) -> HashMap<String, usize> {
        let mut stats = HashMap::new();
        stats.insert("templates_cached".to_string(), self.entries.read().await.len());
        stats
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn renders_after_insert() {
        let cache = TemplateCache::new();
        cache
            .insert("hello", "Hi {{ name }} {{ amount|money }}".into(), PathBuf::from("hello.typ"))
            .await
            .unwrap();

        let out = cache.render("hello", json!({"name": "<b>", "amount": 12000})).await.unwrap();
        assert_eq!(out, "Hi <b> 12,000");
        assert!(cache.contains("hello").await);
    }

    #[tokio::test]
    async fn first_insert_wins() {
        let cache = TemplateCache::new();
        cache.insert("t", "one".into(), PathBuf::from("a")).await.unwrap();
        cache.insert("t", "two".into(), PathBuf::from("b")).await.unwrap();

        assert_eq!(cache.render("t", json!({})).await.unwrap(), "one");
        assert_eq!(cache.get_stats().await.get("templates_cached"), Some(&1));
    }

    #[tokio::test]
    async fn unknown_template_is_missing() {
        let cache = TemplateCache::new();
        let err = cache.render("nope", json!({})).await.unwrap_err();
        assert!(matches!(
            err,
            DocumentError::MissingTemplate { template_id } if template_id == "nope"
        ));
    }

    #[tokio::test]
    async fn syntax_errors_surface_on_insert() {
        let cache = TemplateCache::new();
        let err = cache
            .insert("bad", "{% if %}".into(), PathBuf::from("bad.typ"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Template(_)));
        assert!(!cache.contains("bad").await);
    }
}
