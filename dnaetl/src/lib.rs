//! # DNA ETL
//!
//! Batch pipeline for one participant: validates the input descriptor and
//! context directory, filters the JSON metadata, analyzes the DNA sequences
//! and writes a combined result document.

pub mod assembler;
pub mod loader;
pub mod metadata_filter;
pub mod pipeline;
pub mod sequence_analyzer;
pub mod validator;
pub mod value_walk;
pub mod writer;

pub use metadata_filter::FilterRules;
pub use pipeline::{run, PipelineOutcome};
