//! Template rendering: generation model -> project files.

mod manager;
mod mode;
mod types;

pub use manager::TemplateManager;
pub use mode::GenerationMode;
pub use types::{RenderedFile, RenderedFileSet};
