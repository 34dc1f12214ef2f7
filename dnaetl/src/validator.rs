//! Structural validation of the input descriptor and context directory
//!
//! Each check is an independent predicate over the raw descriptor mapping so
//! that a missing or mistyped key makes the check fail rather than panic.
//! [`check_input`] runs them in order and names the first one that fails.

use std::path::{Path, PathBuf};

use dnaetl_common::{Error, Result};
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const CONTEXT_PATH_KEY: &str = "context_path";
pub const RESULTS_PATH_KEY: &str = "results_path";

/// Descriptor has exactly the keys `context_path` and `results_path`, both
/// non-blank strings
pub fn valid_input_format(descriptor: &Value) -> bool {
    let Some(map) = descriptor.as_object() else {
        return false;
    };

    if map.len() != 2 || !map.contains_key(CONTEXT_PATH_KEY) || !map.contains_key(RESULTS_PATH_KEY) {
        return false;
    }

    [CONTEXT_PATH_KEY, RESULTS_PATH_KEY]
        .iter()
        .all(|key| matches!(map.get(*key), Some(Value::String(s)) if !s.trim().is_empty()))
}

/// `context_path` exists and is a directory
pub fn valid_context_path(descriptor: &Value) -> bool {
    path_at(descriptor, CONTEXT_PATH_KEY).is_some_and(|p| p.is_dir())
}

/// `results_path` is an existing directory, or does not exist yet and its
/// parent is a directory
pub fn valid_results_path(descriptor: &Value) -> bool {
    let Some(path) = path_at(descriptor, RESULTS_PATH_KEY) else {
        return false;
    };

    if path.exists() {
        return path.is_dir();
    }

    match path.parent() {
        // "out" relative to the working directory has an empty parent
        Some(parent) if parent.as_os_str().is_empty() => true,
        Some(parent) => parent.is_dir(),
        None => false,
    }
}

/// Context directory holds exactly two files: one `.json` and one `.txt`
pub fn valid_context_files(descriptor: &Value) -> bool {
    let Some(files) = context_files_of(descriptor) else {
        return false;
    };
    if files.len() != 2 {
        return false;
    }

    let json = count_with_extension(&files, "json");
    let txt = count_with_extension(&files, "txt");
    json == 1 && txt == 1
}

/// The `.json` and `.txt` files share the same base name
pub fn valid_file_names(descriptor: &Value) -> bool {
    let Some(files) = context_files_of(descriptor) else {
        return false;
    };
    if files.len() != 2 {
        return false;
    }

    let json: Vec<&PathBuf> = files.iter().filter(|f| has_extension(f, "json")).collect();
    let txt: Vec<&PathBuf> = files.iter().filter(|f| has_extension(f, "txt")).collect();
    if json.len() != 1 || txt.len() != 1 {
        return false;
    }

    json[0].file_stem() == txt[0].file_stem()
}

/// Run every structural check in order
///
/// Fails with [`Error::StructuralInput`] naming the first check that fails.
pub fn check_input(descriptor: &Value) -> Result<()> {
    let checks: [(&str, fn(&Value) -> bool); 5] = [
        (
            "input format check failed: expected exactly the keys context_path and results_path with non-empty string values",
            valid_input_format,
        ),
        (
            "context path check failed: context_path must be an existing directory",
            valid_context_path,
        ),
        (
            "results path check failed: results_path must be a directory or creatable inside an existing directory",
            valid_results_path,
        ),
        (
            "context files check failed: context directory must contain exactly one .json and one .txt file",
            valid_context_files,
        ),
        (
            "file names check failed: the .json and .txt files must share the same base name",
            valid_file_names,
        ),
    ];

    for (message, check) in checks {
        if !check(descriptor) {
            warn!("{}", message);
            return Err(Error::StructuralInput(message.to_string()));
        }
    }

    debug!("Input descriptor passed all structural checks");
    Ok(())
}

/// Regular files directly inside `dir`, sorted by name
///
/// Symlinks to files count as files.
pub fn context_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| {
            Error::StructuralInput(format!("cannot list {}: {}", dir.display(), e))
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Case-insensitive extension match
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

fn count_with_extension(files: &[PathBuf], extension: &str) -> usize {
    files.iter().filter(|f| has_extension(f, extension)).count()
}

fn path_at(descriptor: &Value, key: &str) -> Option<PathBuf> {
    descriptor
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

fn context_files_of(descriptor: &Value) -> Option<Vec<PathBuf>> {
    let dir = path_at(descriptor, CONTEXT_PATH_KEY)?;
    if !dir.is_dir() {
        return None;
    }
    context_files(&dir).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn descriptor(context: &Path, results: &Path) -> Value {
        json!({
            "context_path": context.to_string_lossy(),
            "results_path": results.to_string_lossy(),
        })
    }

    fn context_with(files: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for name in files {
            fs::write(temp_dir.path().join(name), "{}").unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_input_format_exact_keys() {
        assert!(valid_input_format(&json!({"context_path": "a", "results_path": "b"})));
        assert!(!valid_input_format(&json!({"context_path": "a", "results_path": "b", "extra": 1})));
        assert!(!valid_input_format(&json!({"context_path": "a"})));
        assert!(!valid_input_format(&json!({"context_path": "a", "result_path": "b"})));
        assert!(!valid_input_format(&json!(["context_path", "results_path"])));
    }

    #[test]
    fn test_input_format_rejects_blank_or_non_string() {
        assert!(!valid_input_format(&json!({"context_path": " ", "results_path": "b"})));
        assert!(!valid_input_format(&json!({"context_path": "a", "results_path": 7})));
    }

    #[test]
    fn test_context_path_must_be_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("ctx.json");
        fs::write(&file, "{}").unwrap();

        assert!(valid_context_path(&descriptor(temp_dir.path(), temp_dir.path())));
        assert!(!valid_context_path(&descriptor(&file, temp_dir.path())));
        assert!(!valid_context_path(&descriptor(&temp_dir.path().join("missing"), temp_dir.path())));
    }

    #[test]
    fn test_results_path_existing_or_creatable() {
        let temp_dir = TempDir::new().unwrap();
        let existing = temp_dir.path().join("out");
        fs::create_dir(&existing).unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "").unwrap();

        let ctx = temp_dir.path();
        assert!(valid_results_path(&descriptor(ctx, &existing)));
        assert!(valid_results_path(&descriptor(ctx, &temp_dir.path().join("new_out"))));
        assert!(!valid_results_path(&descriptor(ctx, &file)));
        assert!(!valid_results_path(&descriptor(ctx, &temp_dir.path().join("a/b/c"))));
    }

    #[test]
    fn test_context_files_ok() {
        let ctx = context_with(&["IND1_dna.json", "IND1_dna.txt"]);
        let desc = descriptor(ctx.path(), ctx.path());
        assert!(valid_context_files(&desc));
        assert!(valid_file_names(&desc));
    }

    #[test]
    fn test_context_files_case_insensitive_extensions() {
        let ctx = context_with(&["IND1.JSON", "IND1.Txt"]);
        let desc = descriptor(ctx.path(), ctx.path());
        assert!(valid_context_files(&desc));
        assert!(valid_file_names(&desc));
    }

    #[test]
    fn test_context_files_wrong_count_or_types() {
        for files in [
            vec!["a.json"],
            vec!["a.json", "a.txt", "b.txt"],
            vec!["a.json", "b.json"],
            vec!["a.json", "a.csv"],
        ] {
            let ctx = context_with(&files);
            let desc = descriptor(ctx.path(), ctx.path());
            assert!(!valid_context_files(&desc), "{:?} should fail", files);
            assert!(!valid_file_names(&desc), "{:?} should fail", files);
        }
    }

    #[test]
    fn test_context_files_ignores_subdirectories() {
        let ctx = context_with(&["a.json", "a.txt"]);
        fs::create_dir(ctx.path().join("nested")).unwrap();
        assert!(valid_context_files(&descriptor(ctx.path(), ctx.path())));
    }

    #[test]
    fn test_file_names_mismatch() {
        let ctx = context_with(&["IND1.json", "IND2.txt"]);
        let desc = descriptor(ctx.path(), ctx.path());
        assert!(valid_context_files(&desc));
        assert!(!valid_file_names(&desc));
    }

    #[test]
    fn test_check_input_names_first_failure() {
        let ctx = context_with(&["IND1.json", "IND2.txt"]);
        let err = check_input(&descriptor(ctx.path(), ctx.path())).unwrap_err();
        match err {
            Error::StructuralInput(msg) => assert!(msg.starts_with("file names check failed")),
            other => panic!("unexpected error {:?}", other),
        }

        let err = check_input(&json!({"context_path": "x"})).unwrap_err();
        match err {
            Error::StructuralInput(msg) => assert!(msg.starts_with("input format check failed")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_check_input_passes() {
        let ctx = context_with(&["IND1_dna.json", "IND1_dna.txt"]);
        let out = TempDir::new().unwrap();
        assert!(check_input(&descriptor(ctx.path(), &out.path().join("results"))).is_ok());
    }
}
