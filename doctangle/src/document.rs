use std::io;
use std::path::{Path, PathBuf};

use crate::error::SyncError;

/// A documentation file, read once per run.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

/// Enumerate `.md` files in `docs_dir`, sorted lexicographically by path.
///
/// The order matters: under `NamingScope::Shared` it decides which document
/// claims `docs_code_1` first. A missing directory yields an empty set, the
/// same as a directory with no documents.
pub fn discover(docs_dir: &Path) -> Result<Vec<Document>, SyncError> {
    let entries = match std::fs::read_dir(docs_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SyncError::io("read directory", docs_dir, e)),
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::io("read directory", docs_dir, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(&path)
            .map_err(|e| SyncError::io("read document", &path, e))?;
        docs.push(Document { path, text });
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_md_files_in_sorted_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("zeta.md"), "z").unwrap();
        std::fs::write(tmp.path().join("alpha.md"), "a").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let docs = discover(tmp.path()).unwrap();
        let names: Vec<_> = docs
            .iter()
            .map(|d| d.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["alpha.md", "zeta.md"]);
        assert_eq!(docs[0].text, "a");
    }

    #[test]
    fn missing_directory_yields_empty_set() {
        let tmp = tempfile::TempDir::new().unwrap();
        let docs = discover(&tmp.path().join("no-such-dir")).unwrap();
        assert!(docs.is_empty());
    }
}
