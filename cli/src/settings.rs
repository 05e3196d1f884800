use std::path::PathBuf;

use serde::Deserialize;

use doctangle::{Config, NamingScope};

use crate::RunArgs;

/// `doctangle.toml` contents. Every field is optional; command-line flags
/// override file values, and a missing file means all defaults.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub docs: Option<PathBuf>,

    #[serde(default)]
    pub out: Option<PathBuf>,

    #[serde(default)]
    pub manifest: Option<PathBuf>,

    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub extension: Option<String>,

    #[serde(default)]
    pub dependencies: Vec<String>,

    /// "shared" (the default) or "per-document".
    #[serde(default)]
    pub scope: Option<String>,
}

/// Merge the config file with command-line arguments into a run configuration.
pub fn load(args: &RunArgs) -> Result<Config, String> {
    let file = match std::fs::read_to_string(&args.config) {
        Ok(text) => toml::from_str::<FileConfig>(&text)
            .map_err(|e| format!("cannot parse '{}': {}", args.config.display(), e))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
        Err(e) => return Err(format!("cannot read '{}': {}", args.config.display(), e)),
    };

    let docs_dir = args
        .docs
        .clone()
        .or(file.docs)
        .unwrap_or_else(|| PathBuf::from("docs"));
    let out_dir = args
        .out
        .clone()
        .or(file.out)
        .unwrap_or_else(|| PathBuf::from("test"));
    let manifest = args
        .manifest
        .clone()
        .or(file.manifest)
        .unwrap_or_else(|| out_dir.join("meson.build"));
    let tag = args
        .tag
        .clone()
        .or(file.tag)
        .unwrap_or_else(|| "cpp".to_string());
    let extension = args.ext.clone().or(file.extension).unwrap_or_else(|| tag.clone());
    let dependencies = if args.deps.is_empty() {
        file.dependencies
    } else {
        args.deps.clone()
    };

    let scope = if args.per_document {
        NamingScope::PerDocument
    } else {
        match file.scope.as_deref() {
            None | Some("shared") => NamingScope::Shared,
            Some("per-document") => NamingScope::PerDocument,
            Some(other) => {
                return Err(format!(
                    "unknown naming scope '{}' (expected 'shared' or 'per-document')",
                    other
                ));
            }
        }
    };

    Ok(Config {
        docs_dir,
        out_dir,
        manifest,
        tag,
        extension,
        dependencies,
        scope,
    })
}
