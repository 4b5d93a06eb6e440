// Public modules
pub mod backup;
pub mod canonical;
pub mod error;
pub mod filter;
pub mod migrate;
pub mod substitute;

// Re-export common types for convenience
pub use error::{Error, Result};
pub use migrate::{MigrationReport, RunConfig, RunSummary, SkipReason, SkippedFile};
pub use substitute::DomainRewriter;
