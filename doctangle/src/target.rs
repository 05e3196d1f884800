use std::path::PathBuf;

use crate::config::{Config, NamingScope};
use crate::document::Document;
use crate::extract::CodeBlock;

/// A named, buildable unit derived from one extracted code block.
#[derive(Debug, Clone)]
pub struct Target {
    /// Build target name: the artifact file's base name without extension.
    pub name: String,
    /// Artifact file name within the output directory.
    pub file_name: String,
    /// Full artifact path.
    pub path: PathBuf,
    /// The manifest registration line, without trailing newline.
    pub line: String,
    /// Verbatim block content to materialize.
    pub content: String,
}

impl Target {
    /// Derive the target for `block` of `doc` under the configured naming
    /// scope. Artifact numbering is 1-based.
    pub fn derive(doc: &Document, block: &CodeBlock, config: &Config) -> Target {
        let name = match config.scope {
            NamingScope::Shared => format!("docs_code_{}", block.ordinal + 1),
            NamingScope::PerDocument => {
                format!("{}_code_{}", document_slug(doc), block.ordinal + 1)
            }
        };
        let file_name = format!("{}.{}", name, config.extension);
        let path = config.out_dir.join(&file_name);
        let line = registration_line(&name, &file_name, &config.dependencies);
        Target {
            name,
            file_name,
            path,
            line,
            content: block.content.clone(),
        }
    }
}

/// Meson executable declaration registering one target. The dependency
/// identifiers are templated in unchanged.
fn registration_line(name: &str, file_name: &str, dependencies: &[String]) -> String {
    format!(
        "{name} = executable('{name}', '{file_name}', include_directories : inc, dependencies : [{}])",
        dependencies.join(", ")
    )
}

/// Lowercased document file stem with non-alphanumeric runs collapsed to `_`.
fn document_slug(doc: &Document) -> String {
    let stem = doc
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("doc");
    let mut slug = String::with_capacity(stem.len());
    let mut pending_sep = false;
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            slug.push(c.to_ascii_lowercase());
            pending_sep = false;
        } else {
            pending_sep = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("doc");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str) -> Document {
        Document {
            path: PathBuf::from(path),
            text: String::new(),
        }
    }

    fn block(ordinal: usize, content: &str) -> CodeBlock {
        CodeBlock {
            ordinal,
            content: content.to_string(),
            span: 0..0,
        }
    }

    #[test]
    fn shared_scope_numbers_from_one() {
        let mut config = Config::new("docs", "test");
        config.dependencies = vec!["optional".into(), "variant".into()];

        let target = Target::derive(&doc("docs/guide.md"), &block(0, "int a;\n"), &config);
        assert_eq!(target.name, "docs_code_1");
        assert_eq!(target.file_name, "docs_code_1.cpp");
        assert_eq!(target.path, PathBuf::from("test/docs_code_1.cpp"));
        assert_eq!(
            target.line,
            "docs_code_1 = executable('docs_code_1', 'docs_code_1.cpp', \
             include_directories : inc, dependencies : [optional, variant])"
        );
    }

    #[test]
    fn per_document_scope_prefixes_slug() {
        let mut config = Config::new("docs", "test");
        config.scope = NamingScope::PerDocument;

        let target = Target::derive(&doc("docs/Getting Started.md"), &block(1, "x"), &config);
        assert_eq!(target.name, "getting_started_code_2");
        assert_eq!(target.file_name, "getting_started_code_2.cpp");
    }

    #[test]
    fn empty_dependency_list_templates_empty_brackets() {
        let config = Config::new("docs", "test");
        let target = Target::derive(&doc("docs/a.md"), &block(0, "x"), &config);
        assert!(target.line.ends_with("dependencies : [])"));
    }

    #[test]
    fn extension_is_configurable() {
        let mut config = Config::new("docs", "out");
        config.tag = "rust".into();
        config.extension = "rs".into();
        let target = Target::derive(&doc("docs/a.md"), &block(0, "x"), &config);
        assert_eq!(target.file_name, "docs_code_1.rs");
    }
}
