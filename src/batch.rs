//! Renders every (record × template × document type) combination.
//!
//! A failing combination is logged and recorded in the summary; only a
//! missing input collection or an empty template set stops the run.

use anyhow::Context;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assembly::assemble;
use crate::core::{AppConfig, DocumentError, DocumentResult};
use crate::generators::DocumentRenderer;
use crate::models::DocumentRecord;
use crate::templates::TemplateEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSelection {
    Single(String),
    All,
}

impl TemplateSelection {
    /// `None` or `"all"` selects every discovered template.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => TemplateSelection::All,
            Some(id) if id.eq_ignore_ascii_case("all") => TemplateSelection::All,
            Some(id) => TemplateSelection::Single(id.to_string()),
        }
    }

    /// The template named by `default_template` in the configuration.
    pub fn configured_default(config: &AppConfig) -> Self {
        TemplateSelection::Single(config.default_template.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub record: PathBuf,
    pub template_id: String,
    pub document_type: String,
}

impl Combination {
    pub fn record_id(&self) -> String {
        self.record
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn output_path(&self, output_dir: &Path, extension: &str) -> PathBuf {
        output_dir.join(output_file_name(
            &self.record_id(),
            &self.template_id,
            &self.document_type,
            extension,
        ))
    }
}

/// `{record}_{template}_{label without spaces}.{extension}`
pub fn output_file_name(
    record_id: &str,
    template_id: &str,
    document_type: &str,
    extension: &str,
) -> String {
    let label: String = document_type.chars().filter(|c| *c != ' ').collect();
    format!("{}_{}_{}.{}", record_id, template_id, label, extension)
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub combination: Combination,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FailedCombination {
    pub combination: Combination,
    pub error: String,
}

/// Outcome of a run, in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<GeneratedDocument>,
    pub failed: Vec<FailedCombination>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

pub struct BatchOrchestrator {
    engine: TemplateEngine,
    renderer: Arc<dyn DocumentRenderer>,
    data_dir: PathBuf,
    output_dir: PathBuf,
    document_types: Vec<String>,
    concurrency: usize,
}

impl BatchOrchestrator {
    pub fn new(
        config: &AppConfig,
        engine: TemplateEngine,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        BatchOrchestrator {
            engine,
            renderer,
            data_dir: config.data_dir.clone(),
            output_dir: config.output_dir.clone(),
            document_types: config.document_types.clone(),
            concurrency: config.concurrency.max(1),
        }
    }

    /// JSON records in the data directory, sorted by path.
    pub async fn discover_records(&self) -> DocumentResult<Vec<PathBuf>> {
        let missing = || DocumentError::MissingInputCollection(self.data_dir.clone());

        if !tokio::fs::try_exists(&self.data_dir).await? {
            return Err(missing());
        }

        let mut records = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                records.push(path);
            }
        }

        if records.is_empty() {
            return Err(missing());
        }
        records.sort();
        Ok(records)
    }

    pub async fn combinations(
        &self,
        selection: &TemplateSelection,
    ) -> DocumentResult<Vec<Combination>> {
        let records = self.discover_records().await?;

        let templates = match selection {
            TemplateSelection::Single(id) => vec![id.clone()],
            TemplateSelection::All => {
                let discovered = self.engine.discover().await?;
                if discovered.is_empty() {
                    return Err(DocumentError::NoTemplatesAvailable(
                        self.engine.template_dir().to_path_buf(),
                    ));
                }
                discovered
            }
        };

        let mut combinations =
            Vec::with_capacity(records.len() * templates.len() * self.document_types.len());
        for record in &records {
            for template_id in &templates {
                for document_type in &self.document_types {
                    combinations.push(Combination {
                        record: record.clone(),
                        template_id: template_id.clone(),
                        document_type: document_type.clone(),
                    });
                }
            }
        }
        Ok(combinations)
    }

    pub async fn run(&self, selection: &TemplateSelection) -> DocumentResult<BatchSummary> {
        let combinations = self.combinations(selection).await?;
        tracing::info!(
            combinations = combinations.len(),
            document_types = self.document_types.len(),
            "Starting batch"
        );

        let outcomes: Vec<_> = stream::iter(combinations)
            .map(|combination| async move {
                let result = self.generate(&combination).await;
                (combination, result)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        for (combination, result) in outcomes {
            match result {
                Ok(output_path) => {
                    tracing::info!(
                        output = %output_path.display(),
                        template = %combination.template_id,
                        "Document generated"
                    );
                    summary.succeeded.push(GeneratedDocument { combination, output_path });
                }
                Err(e) => {
                    tracing::error!(
                        record = %combination.record.display(),
                        template = %combination.template_id,
                        document_type = %combination.document_type,
                        error = ?e,
                        "Failed to generate document"
                    );
                    summary.failed.push(FailedCombination {
                        combination,
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        tracing::info!(
            total = summary.total(),
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            "Batch finished"
        );
        Ok(summary)
    }

    /// One full pass of the pipeline for a single combination.
    pub async fn generate(&self, combination: &Combination) -> anyhow::Result<PathBuf> {
        let record = DocumentRecord::load(&combination.record)
            .await
            .with_context(|| format!("Failed to load record {:?}", combination.record))?;

        let view = assemble(&record, &combination.document_type);

        let markup = self
            .engine
            .render(&combination.template_id, &view)
            .await
            .with_context(|| format!("Failed to render template {}", combination.template_id))?;

        let output_path = combination.output_path(&self.output_dir, self.renderer.extension());
        self.renderer
            .render(&markup, &output_path)
            .await
            .with_context(|| format!("Failed to write {:?}", output_path))?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_strips_label_spaces() {
        assert_eq!(
            output_file_name("acme", "clean_gradient", "거 래 명 세 서", "pdf"),
            "acme_clean_gradient_거래명세서.pdf"
        );
    }

    #[test]
    fn selection_from_arg() {
        assert_eq!(TemplateSelection::from_arg(None), TemplateSelection::All);
        assert_eq!(TemplateSelection::from_arg(Some("ALL")), TemplateSelection::All);
        assert_eq!(
            TemplateSelection::from_arg(Some("classic")),
            TemplateSelection::Single("classic".into())
        );
    }

    #[test]
    fn configured_default_selects_one_template() {
        let config = AppConfig {
            default_template: "classic".into(),
            ..AppConfig::default()
        };
        assert_eq!(
            TemplateSelection::configured_default(&config),
            TemplateSelection::Single("classic".into())
        );
        assert_eq!(
            TemplateSelection::configured_default(&AppConfig::default()),
            TemplateSelection::Single("clean_gradient".into())
        );
    }

    #[test]
    fn combination_output_path() {
        let combination = Combination {
            record: PathBuf::from("data/acme.json"),
            template_id: "classic".into(),
            document_type: "견 적 서".into(),
        };
        assert_eq!(combination.record_id(), "acme");
        assert_eq!(
            combination.output_path(Path::new("output"), "pdf"),
            PathBuf::from("output/acme_classic_견적서.pdf")
        );
    }
}
