use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use codespan_reporting::files::SimpleFiles;
use fs2::FileExt;

use crate::config::Config;
use crate::document;
use crate::error::SyncError;
use crate::extract::{self, FenceWarning};
use crate::target::Target;

/// Outcome of one run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Artifacts written (for a check run: that would be written).
    pub written: Vec<PathBuf>,
    /// Registration lines appended (for a check run: that would be appended).
    pub appended: Vec<String>,
    /// Targets skipped because their registration line was already present.
    pub skipped: usize,
    /// Recoverable extraction problems, one per unclosed fence.
    pub warnings: Vec<FenceWarning>,
}

impl SyncReport {
    /// True when the manifest and artifacts already match the documents.
    pub fn is_clean(&self) -> bool {
        self.written.is_empty() && self.appended.is_empty()
    }
}

/// Run the pipeline: extract tagged blocks from every document, write an
/// artifact and append a registration line for each target not already in the
/// manifest. Re-running against an unchanged document set and manifest
/// performs zero writes.
///
/// Each document is registered in `files` so callers can render the report's
/// warnings as diagnostics.
pub fn sync(
    config: &Config,
    files: &mut SimpleFiles<String, String>,
) -> Result<SyncReport, SyncError> {
    run(config, files, true)
}

/// Walk the pipeline without writing anything. The report lists what [`sync`]
/// would write and append; [`SyncReport::is_clean`] drives a CI exit code.
pub fn check(
    config: &Config,
    files: &mut SimpleFiles<String, String>,
) -> Result<SyncReport, SyncError> {
    run(config, files, false)
}

fn run(
    config: &Config,
    files: &mut SimpleFiles<String, String>,
    apply: bool,
) -> Result<SyncReport, SyncError> {
    let docs = document::discover(&config.docs_dir)?;
    let mut report = SyncReport::default();

    let mut manifest = None;
    let text = if apply {
        fs::create_dir_all(&config.out_dir)
            .map_err(|e| SyncError::io("create directory", &config.out_dir, e))?;
        let (file, text) = open_manifest(&config.manifest)?;
        manifest = Some(file);
        text
    } else {
        read_manifest_text(&config.manifest)?
    };

    // Existing lines are membership-tested verbatim, never parsed, rewritten
    // or reordered.
    let mut registered: HashSet<String> = text.lines().map(str::to_string).collect();
    // If the manifest's last line lacks a newline, the first append must not
    // glue itself onto it.
    let mut needs_newline = !text.is_empty() && !text.ends_with('\n');

    // Owning document and content of every target name derived this run, for
    // the conflict guard.
    let mut seen: HashMap<String, (PathBuf, String)> = HashMap::new();

    for doc in &docs {
        let file_id = files.add(doc.path.display().to_string(), doc.text.clone());
        let extraction = extract::extract_blocks(&doc.text, &config.tag, file_id);
        report.warnings.extend(extraction.warnings);

        for block in &extraction.blocks {
            let target = Target::derive(doc, block, config);

            if let Some((first, content)) = seen.get(&target.name) {
                if *content != target.content {
                    return Err(SyncError::Conflict {
                        name: target.name,
                        first: first.clone(),
                        second: doc.path.clone(),
                    });
                }
            } else {
                seen.insert(
                    target.name.clone(),
                    (doc.path.clone(), target.content.clone()),
                );
            }

            // Covers both lines present at the initial read and lines appended
            // earlier in this same run.
            if registered.contains(&target.line) {
                report.skipped += 1;
                continue;
            }

            if let Some(file) = manifest.as_mut() {
                write_artifact(&target.path, &target.content)?;
                if needs_newline {
                    writeln!(file)
                        .map_err(|e| SyncError::io("append to manifest", &config.manifest, e))?;
                    needs_newline = false;
                }
                writeln!(file, "{}", target.line)
                    .map_err(|e| SyncError::io("append to manifest", &config.manifest, e))?;
            }
            registered.insert(target.line.clone());
            report.written.push(target.path.clone());
            report.appended.push(target.line);
        }
    }

    Ok(report)
}

/// Open the manifest read+append (creating it if absent), take a non-blocking
/// advisory lock, and read its current content. The lock documents and
/// enforces the single-writer assumption: a run never shares the manifest with
/// a concurrent invocation. It is released when the handle drops.
fn open_manifest(path: &Path) -> Result<(File, String), SyncError> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| SyncError::io("open manifest", path, e))?;

    if let Err(e) = file.try_lock_exclusive() {
        return if e.kind() == fs2::lock_contended_error().kind() {
            Err(SyncError::ManifestLocked(path.to_path_buf()))
        } else {
            Err(SyncError::io("lock manifest", path, e))
        };
    }

    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| SyncError::io("read manifest", path, e))?;
    Ok((file, text))
}

/// Read the manifest for a check run. A missing manifest is an empty one.
fn read_manifest_text(path: &Path) -> Result<String, SyncError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(SyncError::io("read manifest", path, e)),
    }
}

/// Materialize one code block at `path`, verbatim. Creates or overwrites.
fn write_artifact(path: &Path, content: &str) -> Result<(), SyncError> {
    fs::write(path, content).map_err(|e| SyncError::io("write artifact", path, e))
}
