//! End-to-end pipeline for one context directory
//!
//! Stages run in a fixed order and the first failure ends the run:
//! 1. Structural validation of the input descriptor and context directory
//! 2. Metadata checks (age, dates, string length) and sanitization
//! 3. Sequence analysis
//! 4. Assembly and writing of the result document
//!
//! Nothing is written unless every earlier stage succeeds.

use std::path::{Path, PathBuf};

use dnaetl_common::{time, Result};
use tracing::info;

use crate::assembler::{self, ResultDocument, RunMetadata};
use crate::loader::{self, ContextFiles, InputDescriptor};
use crate::metadata_filter::{self, FilterRules};
use crate::sequence_analyzer;
use crate::writer;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub participant_id: String,
    pub output_path: PathBuf,
    pub document: ResultDocument,
}

/// Run the pipeline for the input descriptor at `input_path`
pub fn run(input_path: &Path, rules: &FilterRules) -> Result<PipelineOutcome> {
    let start_at = time::now();

    let raw_descriptor = loader::read_input_descriptor(input_path)?;
    let descriptor = InputDescriptor::from_value(&raw_descriptor)?;
    info!(
        "Context {} -> results {}",
        descriptor.context_path.display(),
        descriptor.results_path.display()
    );

    let files = ContextFiles::discover(&descriptor.context_path)?;
    info!("Processing participant {}", files.participant_id);

    let metadata = loader::read_metadata(&files.json_path)?;
    let sanitized = metadata_filter::filter_metadata(&metadata, rules)?;

    let sequences = loader::read_sequences(&files.txt_path)?;
    info!("Analyzing {} sequences", sequences.len());
    let analysis = sequence_analyzer::analyze(&sequences)?;

    let item = assembler::build_result_item(files.participant_id.clone(), sanitized, analysis);
    let end_at = time::now();
    let document = assembler::build_document(
        RunMetadata {
            start_at,
            end_at,
            context_path: descriptor.context_path.to_string_lossy().into_owned(),
            results_path: descriptor.results_path.to_string_lossy().into_owned(),
        },
        vec![item],
    );

    let output_path = writer::write_output(&descriptor.results_path, &files.participant_id, &document)?;

    Ok(PipelineOutcome {
        participant_id: files.participant_id,
        output_path,
        document,
    })
}
