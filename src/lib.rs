pub mod assembly;
pub mod batch;
pub mod core;
pub mod generators;
pub mod models;
pub mod pricing;
pub mod templates;

// Re-export commonly used types
pub use assembly::assemble;
pub use batch::{BatchOrchestrator, BatchSummary, TemplateSelection};
pub use core::{AppConfig, DocumentError, DocumentResult};
pub use generators::{DocumentRenderer, MarkupRenderer, TypstRenderer};
pub use models::{AssembledView, DocumentRecord, LineItem, RawAmount};
pub use pricing::{aggregate, compute_item_total, ComputedTotals, TaxRate};
pub use templates::{TemplateCache, TemplateEngine};
