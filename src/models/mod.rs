pub mod record;
pub mod view;

pub use record::*;
pub use view::*;
