use std::path::{Path, PathBuf};
use std::sync::Arc;

use estimate_generator::{
    AppConfig, BatchOrchestrator, DocumentRenderer, MarkupRenderer, TemplateCache, TemplateEngine,
};

pub const FLAT_TEMPLATE: &str = concat!(
    "{{ title }}|{{ supplier_name }}|{{ subtotal_str }}|{{ tax_amount_str }}|",
    "{{ grand_total_str }}|{{ total_quantity }}\n{{ items_rows }}",
);

pub const STRUCTURED_TEMPLATE: &str = concat!(
    "{{ title }} {{ doc_number }}\n",
    "{% for item in items %}{{ item.name }}={{ item.total }}/{{ item.tax_amount }};{% endfor %}\n",
    "{{ supply_price }} {{ tax_amount }} {{ total_tax_amount }} {{ total_amount }}",
);

pub const TWO_ITEM_RECORD: &str = r#"{
    "supplier": {"name": "Hanbit"},
    "receiver": {"name": "Daon"},
    "items": [
        {"name": "A", "quantity": 2, "price": "500"},
        {"name": "B", "quantity": 1, "price": "1000"}
    ],
    "tax": 10,
    "doc_number": "EST-1"
}"#;

pub const BROKEN_PRICE_RECORD: &str = r#"{
    "items": [
        {"name": "A", "quantity": 2, "price": "500"},
        {"name": "Broken", "quantity": 3, "price": "oops"},
        {"name": "C", "quantity": 1, "price": "1,000"}
    ]
}"#;

/// A data/templates/output layout inside a temp directory.
pub struct Workspace {
    pub root: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir_all(root.path().join("data")).unwrap();
        std::fs::create_dir_all(root.path().join("templates")).unwrap();
        Workspace { root }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn template_dir(&self) -> PathBuf {
        self.root.path().join("templates")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.path().join("output")
    }

    pub fn add_record(&self, name: &str, content: &str) -> &Self {
        std::fs::write(self.data_dir().join(format!("{}.json", name)), content).unwrap();
        self
    }

    pub fn add_template(&self, name: &str, content: &str) -> &Self {
        std::fs::write(self.template_dir().join(format!("{}.typ", name)), content).unwrap();
        self
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            data_dir: self.data_dir(),
            template_dir: self.template_dir(),
            output_dir: self.output_dir(),
            ..AppConfig::default()
        }
    }

    pub fn orchestrator(&self) -> BatchOrchestrator {
        self.orchestrator_with(&self.config(), Arc::new(MarkupRenderer::new()))
    }

    pub fn orchestrator_with(
        &self,
        config: &AppConfig,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> BatchOrchestrator {
        let engine = TemplateEngine::new(
            config.template_dir.clone(),
            &config.template_extension,
            Arc::new(TemplateCache::new()),
        );
        BatchOrchestrator::new(config, engine, renderer)
    }
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e))
}
