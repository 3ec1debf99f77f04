use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use super::DocumentResult;

/// Labels rendered for every record: estimate and transaction statement.
pub const DEFAULT_DOCUMENT_TYPES: [&str; 2] = ["견 적 서", "거 래 명 세 서"];

pub const DEFAULT_TEMPLATE: &str = "clean_gradient";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub template_dir: PathBuf,
    pub template_extension: String,
    pub output_dir: PathBuf,
    pub default_template: String,
    pub document_types: Vec<String>,
    pub typst_binary: String,
    pub render_timeout_secs: u64,
    pub concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: PathBuf::from("data"),
            template_dir: PathBuf::from("templates"),
            template_extension: "typ".to_string(),
            output_dir: PathBuf::from("output"),
            default_template: DEFAULT_TEMPLATE.to_string(),
            document_types: DEFAULT_DOCUMENT_TYPES.iter().map(|s| s.to_string()).collect(),
            typst_binary: "typst".to_string(),
            render_timeout_secs: 60,
            concurrency: 1,
        }
    }
}

impl AppConfig {
    /// Defaults, then `estimate.toml` if present, then `ESTIMATE_*` variables.
    pub fn load() -> DocumentResult<Self> {
        let defaults = AppConfig::default();

        let settings = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("template_dir", defaults.template_dir.to_string_lossy().to_string())?
            .set_default("template_extension", defaults.template_extension)?
            .set_default("output_dir", defaults.output_dir.to_string_lossy().to_string())?
            .set_default("default_template", defaults.default_template)?
            .set_default("document_types", defaults.document_types)?
            .set_default("typst_binary", defaults.typst_binary)?
            .set_default("render_timeout_secs", defaults.render_timeout_secs)?
            .set_default("concurrency", defaults.concurrency as u64)?
            .add_source(File::with_name("estimate").required(false))
            .add_source(
                Environment::with_prefix("ESTIMATE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("document_types"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_both_document_types() {
        let config = AppConfig::default();
        assert_eq!(config.document_types, vec!["견 적 서", "거 래 명 세 서"]);
        assert_eq!(config.default_template, "clean_gradient");
        assert_eq!(config.render_timeout(), Duration::from_secs(60));
    }
}
