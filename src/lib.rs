//! Ratebook — hotel-contract ingestion and canonicalization.
//!
//! Turns heterogeneous contract documents (PDF, Word, spreadsheets, scans)
//! into one canonical, versioned, strongly-typed record. The pipeline runs
//! route → extract → detect language → normalize via the external model →
//! canonicalize; each stage consumes the previous stage's output and holds
//! no shared mutable state, so independent documents process in parallel
//! without coordination.

pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries embedding the pipeline. Honors RUST_LOG,
/// falling back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
