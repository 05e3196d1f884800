use std::path::PathBuf;

/// Scope of artifact-name uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingScope {
    /// Ordinals restart per document and every artifact lands directly in the
    /// output directory (`docs_code_1.cpp`, `docs_code_2.cpp`, ...). Two
    /// documents can claim the same name; the synchronizer rejects that when
    /// their contents differ.
    Shared,
    /// Artifact names are prefixed with a slug of the owning document's file
    /// stem (`intro_code_1.cpp`), making them unique across the whole run.
    PerDocument,
}

/// Settings for one synchronization run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for `.md` documents.
    pub docs_dir: PathBuf,
    /// Directory artifacts are written into.
    pub out_dir: PathBuf,
    /// Build manifest, opened for read-then-append.
    pub manifest: PathBuf,
    /// Fence info string selecting which code blocks to extract.
    pub tag: String,
    /// File extension for generated artifacts, without the leading dot.
    pub extension: String,
    /// Opaque build dependency identifiers inserted into each registration
    /// line. Passed through unchanged.
    pub dependencies: Vec<String>,
    /// How artifact names are kept unique.
    pub scope: NamingScope,
}

impl Config {
    /// Configuration with the conventional defaults: tag `cpp`, extension
    /// matching the tag, manifest at `{out_dir}/meson.build`, no dependencies,
    /// shared naming scope.
    pub fn new(docs_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        let out_dir = out_dir.into();
        Config {
            docs_dir: docs_dir.into(),
            manifest: out_dir.join("meson.build"),
            out_dir,
            tag: "cpp".to_string(),
            extension: "cpp".to_string(),
            dependencies: Vec::new(),
            scope: NamingScope::Shared,
        }
    }
}
