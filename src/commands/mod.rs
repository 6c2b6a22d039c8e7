//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod models;
pub mod record;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, validate_analyze_args};
pub use models::{AnalyzeArgs, RecordArgs, RecordTarget};
pub use record::{execute_record, validate_record_args};
pub use utils::display_version;
