mod errors;
mod template;

pub mod api;
pub mod config;
pub mod files;
pub mod project;

pub use api::{generate, GenerationError, Generated};
pub use errors::{FileOperation, IoError};
pub use template::{BackfillError, BackfillOutcome};
