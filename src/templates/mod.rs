pub mod cache;
pub mod engine;
pub mod helpers;

pub use cache::TemplateCache;
pub use engine::TemplateEngine;
