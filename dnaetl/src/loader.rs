//! Input loading
//!
//! Reads the input descriptor, locates the participant's metadata and
//! sequence files inside the context directory and parses both.

use std::path::{Path, PathBuf};

use dnaetl_common::{Error, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::validator::{self, CONTEXT_PATH_KEY, RESULTS_PATH_KEY};

/// Suffix stripped from the file base name to get the participant id
const PARTICIPANT_SUFFIX: &str = "_dna";

/// Validated input descriptor with absolute paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDescriptor {
    pub context_path: PathBuf,
    pub results_path: PathBuf,
}

impl InputDescriptor {
    /// Run the structural checks on a raw descriptor and resolve its paths
    ///
    /// The context directory is canonicalized; the results directory is made
    /// absolute without requiring it to exist.
    pub fn from_value(descriptor: &Value) -> Result<Self> {
        validator::check_input(descriptor)?;

        let context = string_at(descriptor, CONTEXT_PATH_KEY)?;
        let results = string_at(descriptor, RESULTS_PATH_KEY)?;

        Ok(Self {
            context_path: std::fs::canonicalize(context)?,
            results_path: std::path::absolute(results)?,
        })
    }
}

/// The participant's files inside the context directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFiles {
    pub json_path: PathBuf,
    pub txt_path: PathBuf,
    pub participant_id: String,
}

impl ContextFiles {
    /// Locate the `.json` and `.txt` files in `context_path`
    pub fn discover(context_path: &Path) -> Result<Self> {
        let files = validator::context_files(context_path)?;
        let find = |extension: &str| {
            files
                .iter()
                .find(|f| validator::has_extension(f, extension))
                .cloned()
                .ok_or_else(|| {
                    Error::StructuralInput(format!(
                        "no .{} file in {}",
                        extension,
                        context_path.display()
                    ))
                })
        };

        let json_path = find("json")?;
        let txt_path = find("txt")?;
        let stem = json_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                Error::StructuralInput(format!("unusable file name {}", json_path.display()))
            })?;
        let participant_id = participant_id(stem).to_string();

        debug!(
            "Context files: {} and {} (participant {})",
            json_path.display(),
            txt_path.display(),
            participant_id
        );

        Ok(Self {
            json_path,
            txt_path,
            participant_id,
        })
    }
}

/// Participant id from a file base name: a trailing `_dna` is dropped
pub fn participant_id(stem: &str) -> &str {
    stem.strip_suffix(PARTICIPANT_SUFFIX).unwrap_or(stem)
}

/// Parse the input descriptor file as generic JSON
pub fn read_input_descriptor(path: &Path) -> Result<Value> {
    info!("Reading input descriptor {}", path.display());
    read_json(path)
}

/// Parse the metadata file as generic JSON
pub fn read_metadata(path: &Path) -> Result<Value> {
    info!("Reading metadata {}", path.display());
    read_json(path)
}

/// Read the sequence file, one sequence per non-blank line
pub fn read_sequences(path: &Path) -> Result<Vec<String>> {
    info!("Reading sequences {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(parse_sequences(&text))
}

/// Trimmed, uppercased, non-blank lines
pub fn parse_sequences(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect()
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| {
        Error::MalformedData(format!("{} is not valid JSON: {}", path.display(), e))
    })
}

fn string_at<'a>(descriptor: &'a Value, key: &str) -> Result<&'a str> {
    descriptor
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::StructuralInput(format!("{} must be a string", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_participant_id_strips_dna_suffix() {
        assert_eq!(participant_id("IND123456_dna"), "IND123456");
        assert_eq!(participant_id("IND123456"), "IND123456");
        assert_eq!(participant_id("IND_dna_dna"), "IND_dna");
        assert_eq!(participant_id("_dna"), "");
    }

    #[test]
    fn test_parse_sequences_trims_uppercases_skips_blank() {
        let text = "  atcg \n\n\tGGta\r\n   \nccc";
        assert_eq!(parse_sequences(text), vec!["ATCG", "GGTA", "CCC"]);
        assert!(parse_sequences("\n \n").is_empty());
    }

    #[test]
    fn test_discover_finds_pair_and_id() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("IND123456_dna.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("IND123456_dna.txt"), "ACGT\n").unwrap();

        let files = ContextFiles::discover(temp_dir.path()).unwrap();
        assert_eq!(files.json_path.file_name().unwrap(), "IND123456_dna.json");
        assert_eq!(files.txt_path.file_name().unwrap(), "IND123456_dna.txt");
        assert_eq!(files.participant_id, "IND123456");
    }

    #[test]
    fn test_discover_missing_txt() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.json"), "{}").unwrap();
        assert!(matches!(
            ContextFiles::discover(temp_dir.path()),
            Err(Error::StructuralInput(_))
        ));
    }

    #[test]
    fn test_read_metadata_rejects_non_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("m.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(read_metadata(&path), Err(Error::MalformedData(_))));
    }

    #[test]
    fn test_descriptor_paths_are_absolute() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = temp_dir.path().join("ctx");
        fs::create_dir(&ctx).unwrap();
        fs::write(ctx.join("P.json"), "{}").unwrap();
        fs::write(ctx.join("P.txt"), "A").unwrap();
        let out = temp_dir.path().join("out");

        let raw = json!({
            "context_path": ctx.to_string_lossy(),
            "results_path": out.to_string_lossy(),
        });
        let descriptor = InputDescriptor::from_value(&raw).unwrap();
        assert_eq!(descriptor.context_path, fs::canonicalize(&ctx).unwrap());
        assert!(descriptor.results_path.is_absolute());
        assert!(descriptor.results_path.ends_with("out"));
    }

    #[test]
    fn test_descriptor_rejects_extra_key() {
        let raw = json!({"context_path": "a", "results_path": "b", "extra": 1});
        assert!(matches!(
            InputDescriptor::from_value(&raw),
            Err(Error::StructuralInput(_))
        ));
    }
}
