//! Sequence analyzer
//!
//! Statistics over the DNA sequences of one participant:
//! - per-sequence GC content and codon counts
//! - the most common codon(s) across all sequences
//! - the longest common substring over every pair of sequences
//!
//! Sequences are reported with 1-based indices in input order.

use std::collections::{BTreeMap, HashSet};

use dnaetl_common::{Error, Result};
use serde::Serialize;
use tracing::debug;

/// Composition statistics for one sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceStats {
    /// Percentage of G and C symbols, rounded to 2 decimal places
    pub gc_content: f64,
    /// Occurrences of each complete codon
    #[serde(rename = "codons")]
    pub codon_counts: BTreeMap<String, usize>,
}

/// One longest-common-substring winner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LcsWinner {
    pub value: String,
    pub length: usize,
    /// 1-based indices of every sequence containing `value`
    pub sequences: Vec<usize>,
}

/// Pairwise LCS outcome
///
/// Serializes as a bare object when there is a single winner, otherwise as
/// an array (empty when no pair shares any symbol).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LcsResult {
    Single(LcsWinner),
    Tied(Vec<LcsWinner>),
}

impl LcsResult {
    /// All winners in first-seen order
    pub fn winners(&self) -> &[LcsWinner] {
        match self {
            LcsResult::Single(winner) => std::slice::from_ref(winner),
            LcsResult::Tied(winners) => winners,
        }
    }
}

/// Analyzer output for one participant's text file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutput {
    pub sequences: Vec<SequenceStats>,
    pub most_common_codon: String,
    pub lcs: LcsResult,
}

/// GC content and codon counts of a non-empty sequence
pub fn composition_stats(sequence: &str) -> Result<SequenceStats> {
    Ok(SequenceStats {
        gc_content: gc_content(sequence)?,
        codon_counts: codon_counts(sequence),
    })
}

/// `100 * (G + C) / length`, rounded half away from zero to 2 decimal places
///
/// Empty sequences have no defined GC content and are rejected.
pub fn gc_content(sequence: &str) -> Result<f64> {
    let length = sequence.chars().count();
    if length == 0 {
        return Err(Error::MalformedData(
            "GC content of an empty sequence".to_string(),
        ));
    }

    let gc = sequence.chars().filter(|c| matches!(c, 'G' | 'C')).count();
    let percent = gc as f64 * 100.0 / length as f64;
    Ok((percent * 100.0).round() / 100.0)
}

/// Counts of non-overlapping triplets starting at index 0
///
/// A trailing 1-2 symbols that do not form a full codon are ignored.
pub fn codon_counts(sequence: &str) -> BTreeMap<String, usize> {
    let symbols: Vec<char> = sequence.chars().collect();
    let mut counts = BTreeMap::new();
    for codon in symbols.chunks_exact(3) {
        *counts.entry(codon.iter().collect::<String>()).or_insert(0) += 1;
    }
    counts
}

/// Composition statistics for every sequence, in input order
pub fn per_sequence_stats(sequences: &[String]) -> Result<Vec<SequenceStats>> {
    sequences
        .iter()
        .enumerate()
        .map(|(i, seq)| {
            let stats = composition_stats(seq).map_err(|e| match e {
                Error::MalformedData(msg) => {
                    Error::MalformedData(format!("sequence {}: {}", i + 1, msg))
                }
                other => other,
            })?;
            debug!(
                "Sequence {}: {} symbols, GC {:.2}%, {} distinct codons",
                i + 1,
                seq.len(),
                stats.gc_content,
                stats.codon_counts.len()
            );
            Ok(stats)
        })
        .collect()
}

/// Codon(s) with the highest total count across all sequences
///
/// Ties are all reported, sorted ascending and joined with a single space.
/// No codons at all yields an empty string.
pub fn aggregate_winner(stats: &[SequenceStats]) -> String {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in stats {
        for (codon, count) in &entry.codon_counts {
            *totals.entry(codon.as_str()).or_insert(0) += count;
        }
    }

    let Some(max_count) = totals.values().copied().max() else {
        return String::new();
    };

    // BTreeMap iteration is already in ascending codon order
    totals
        .into_iter()
        .filter(|(_, count)| *count == max_count)
        .map(|(codon, _)| codon)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Longest common substring of `first` and `second`, taken from `first`
///
/// Returns the substring and its length. On equal lengths the earliest end
/// position in `first` wins, scanning `second` fastest.
pub fn longest_common_substring(first: &str, second: &str) -> (String, usize) {
    let s1: Vec<char> = first.chars().collect();
    let s2: Vec<char> = second.chars().collect();

    // Two rows of the (len1 + 1) x (len2 + 1) suffix-length table
    let mut previous = vec![0usize; s2.len() + 1];
    let mut current = vec![0usize; s2.len() + 1];
    let mut max_length = 0;
    let mut end = 0;

    for a in 1..=s1.len() {
        for b in 1..=s2.len() {
            current[b] = if s1[a - 1] == s2[b - 1] {
                previous[b - 1] + 1
            } else {
                0
            };
            if current[b] > max_length {
                max_length = current[b];
                end = a;
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let value: String = s1[end - max_length..end].iter().collect();
    (value, max_length)
}

/// Longest common substrings over every unordered pair of sequences
///
/// Only values reaching the run-wide maximum length are kept, each distinct
/// value once, in the order pairs were visited (ascending i, then j). Each
/// winner lists every sequence that contains it.
pub fn pairwise_lcs(sequences: &[String]) -> LcsResult {
    let mut best_length = 0;
    let mut winners: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (i, first) in sequences.iter().enumerate() {
        for second in &sequences[i + 1..] {
            let (value, length) = longest_common_substring(first, second);
            if length == 0 || length < best_length {
                continue;
            }

            if length > best_length {
                best_length = length;
                winners.clear();
                seen.clear();
            }

            if seen.insert(value.clone()) {
                winners.push(value);
            }
        }
    }

    let mut records: Vec<LcsWinner> = winners
        .into_iter()
        .map(|value| {
            let containing = sequences
                .iter()
                .enumerate()
                .filter(|(_, seq)| seq.contains(value.as_str()))
                .map(|(idx, _)| idx + 1)
                .collect();
            LcsWinner {
                value,
                length: best_length,
                sequences: containing,
            }
        })
        .collect();

    debug!("Pairwise LCS: {} winner(s) of length {}", records.len(), best_length);

    if records.len() == 1 {
        LcsResult::Single(records.remove(0))
    } else {
        LcsResult::Tied(records)
    }
}

/// Assemble the analyzer output document
pub fn build_output(
    sequences: Vec<SequenceStats>,
    most_common_codon: String,
    lcs: LcsResult,
) -> AnalysisOutput {
    AnalysisOutput {
        sequences,
        most_common_codon,
        lcs,
    }
}

/// Run every analysis step over the sequences of one text file
pub fn analyze(sequences: &[String]) -> Result<AnalysisOutput> {
    let stats = per_sequence_stats(sequences)?;
    let most_common = aggregate_winner(&stats);
    let lcs = pairwise_lcs(sequences);
    Ok(build_output(stats, most_common, lcs))
}
