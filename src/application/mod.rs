// Headline fetching, scoring and storage
pub mod ingestion;

// Per-day sentiment summaries
pub mod aggregation;

// Market outcome resolution
pub mod enrichment;

// System orchestrator
pub mod system;

pub use system::{Application, RunReport};
