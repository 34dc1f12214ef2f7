//! Result document assembly
//!
//! Combines the sanitized metadata and the sequence analysis of a participant
//! into a result item, and wraps result items in the run envelope.

use chrono::{DateTime, Utc};
use dnaetl_common::time::serialize_iso;
use serde::Serialize;
use serde_json::Value;

use crate::sequence_analyzer::AnalysisOutput;

/// Run envelope written under `metadata`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMetadata {
    /// Captured immediately before input processing begins
    #[serde(serialize_with = "serialize_iso")]
    pub start_at: DateTime<Utc>,
    /// Captured immediately after all processing completes
    #[serde(serialize_with = "serialize_iso")]
    pub end_at: DateTime<Utc>,
    pub context_path: String,
    pub results_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    #[serde(rename = "_id")]
    pub id: String,
}

/// Result for one participant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultItem {
    pub participant: Participant,
    pub txt: AnalysisOutput,
    #[serde(rename = "JSON")]
    pub json: Value,
}

/// Top-level output document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDocument {
    pub metadata: RunMetadata,
    pub results: Vec<ResultItem>,
}

/// Build the result item for one participant
pub fn build_result_item(
    participant_id: impl Into<String>,
    metadata: Value,
    analysis: AnalysisOutput,
) -> ResultItem {
    ResultItem {
        participant: Participant {
            id: participant_id.into(),
        },
        txt: analysis,
        json: metadata,
    }
}

/// Wrap result items in the run envelope
pub fn build_document(metadata: RunMetadata, results: Vec<ResultItem>) -> ResultDocument {
    ResultDocument { metadata, results }
}
