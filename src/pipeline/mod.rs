pub mod canonical;
pub mod ingest;
pub mod normalize;
pub mod processor;

pub use processor::*;
