// src/loader.rs
//! Requirement ingestion from plain-text and markdown files.
//!
//! One requirement per non-empty line. Blank lines and comment lines are
//! skipped, markdown bullet prefixes are stripped, and ids are assigned
//! sequentially as `R001`, `R002`, ... while the original file line number
//! is retained for reporting.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ReqsentryError, Result};
use crate::model::Requirement;

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Loads requirements from a file or directory.
///
/// For a directory, every supported file under it is loaded in sorted path
/// order and id assignment continues across files.
///
/// # Errors
/// Fails on I/O errors, unsupported extensions, or when no valid
/// requirement line is found.
pub fn load(path: &Path) -> Result<Vec<Requirement>> {
    let requirements = if path.is_dir() {
        load_dir(path)?
    } else {
        let mut next_id = 1;
        load_file(path, &mut next_id)?
    };

    if requirements.is_empty() {
        return Err(ReqsentryError::EmptyInput(path.to_path_buf()));
    }
    Ok(requirements)
}

fn load_dir(dir: &Path) -> Result<Vec<Requirement>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let mut requirements = Vec::new();
    let mut next_id = 1;
    for file in &files {
        requirements.extend(load_file(file, &mut next_id)?);
    }
    Ok(requirements)
}

fn load_file(path: &Path, next_id: &mut usize) -> Result<Vec<Requirement>> {
    if !is_supported(path) {
        return Err(ReqsentryError::UnsupportedExtension(
            path.display().to_string(),
        ));
    }

    let content = fs::read_to_string(path).map_err(|source| ReqsentryError::Io {
        source,
        path: path.to_path_buf(),
    })?;

    let mut requirements = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        let text = strip_bullet(line);
        if text.is_empty() {
            continue;
        }
        let id = format!("R{:03}", *next_id);
        requirements.push(Requirement::new(&id, index + 1, text)?);
        *next_id += 1;
    }
    Ok(requirements)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| {
            SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
}

/// Strips a leading markdown bullet (`-`, `*`) or numbering (`1.`) prefix.
fn strip_bullet(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim_start();
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return rest.trim_start();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_skips_blanks_and_comments_keeps_line_numbers() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "reqs.txt",
            "# header comment\n\nThe system shall log in users.\n// note\nThe system shall log out users.\n",
        );
        let reqs = load(&path).unwrap();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].id, "R001");
        assert_eq!(reqs[0].line_number, 3);
        assert_eq!(reqs[1].id, "R002");
        assert_eq!(reqs[1].line_number, 5);
    }

    #[test]
    fn test_strips_markdown_bullets() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "reqs.md",
            "- The system shall encrypt data.\n* The system shall hash passwords.\n1. The system shall audit access.\n",
        );
        let reqs = load(&path).unwrap();
        assert_eq!(reqs[0].text, "The system shall encrypt data.");
        assert_eq!(reqs[1].text, "The system shall hash passwords.");
        assert_eq!(reqs[2].text, "The system shall audit access.");
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "reqs.docx", "The system shall work.\n");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ReqsentryError::UnsupportedExtension(_)));
    }

    #[test]
    fn test_empty_input_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "reqs.txt", "# only comments\n\n");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ReqsentryError::EmptyInput(_)));
    }

    #[test]
    fn test_directory_loads_sorted_and_ids_continue() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "b.txt", "Second file requirement.\n");
        write_file(&dir, "a.txt", "First file requirement.\n");
        write_file(&dir, "notes.json", "{\"ignored\": true}\n");
        let reqs = load(dir.path()).unwrap();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].id, "R001");
        assert_eq!(reqs[0].text, "First file requirement.");
        assert_eq!(reqs[1].id, "R002");
        assert_eq!(reqs[1].text, "Second file requirement.");
    }
}
