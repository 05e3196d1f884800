use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

/// One tagged fenced code block extracted from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// 0-based position among the extracted blocks of the owning document.
    pub ordinal: usize,
    /// Verbatim text between the fences, trailing newline included.
    pub content: String,
    /// Byte span of the whole fenced region in the source.
    pub span: Range<usize>,
}

/// A recoverable extraction problem, reported but never fatal.
#[derive(Debug, Clone)]
pub struct FenceWarning {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
}

impl FenceWarning {
    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(Severity::Warning)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
    }
}

/// Result of scanning one document.
#[derive(Debug, Default)]
pub struct Extraction {
    pub blocks: Vec<CodeBlock>,
    pub warnings: Vec<FenceWarning>,
}

/// Extract every fenced code block whose info string equals `tag`, in document
/// order. Blocks with additional info words (` ```cpp no_run `) are not
/// matched. An opening fence with no closing fence before end of text emits a
/// warning instead of a truncated block.
pub fn extract_blocks(source: &str, tag: &str, file_id: usize) -> Extraction {
    let mut extraction = Extraction::default();
    let events: Vec<(Event<'_>, Range<usize>)> =
        Parser::new(source).into_offset_iter().collect();

    let mut i = 0;
    while i < events.len() {
        let (ref ev, ref range) = events[i];
        match ev {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if &**info == tag =>
            {
                i += 1;
                let content = collect_block_text(&events, &mut i);
                let region = &source[range.clone()];
                if fence_is_closed(region) {
                    let ordinal = extraction.blocks.len();
                    extraction.blocks.push(CodeBlock {
                        ordinal,
                        content,
                        span: range.clone(),
                    });
                } else {
                    // The parser auto-closes at end of input, so the event
                    // stream alone cannot tell a closed block from a truncated
                    // one; the raw source can.
                    extraction.warnings.push(FenceWarning {
                        message: format!("unclosed ```{} fence", tag),
                        span: range.start..range.start + opening_line_len(region),
                        file_id,
                    });
                }
            }
            _ => {
                i += 1;
            }
        }
    }

    extraction
}

/// Collect all text content until the code block's End event.
fn collect_block_text(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> String {
    let mut text = String::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(TagEnd::CodeBlock) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                text.push_str(s);
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    text
}

/// Whether the fenced region's raw source contains a closing fence line:
/// a line of nothing but the opening fence character, at least as long as the
/// opening run.
fn fence_is_closed(region: &str) -> bool {
    let mut lines = region.lines();
    let Some(opener) = lines.next() else {
        return false;
    };
    let opener = opener.trim_start();
    let fence_char = match opener.chars().next() {
        Some(c @ ('`' | '~')) => c,
        _ => return false,
    };
    let fence_len = opener.chars().take_while(|&c| c == fence_char).count();
    lines.any(|line| {
        let t = line.trim();
        !t.is_empty() && t.chars().all(|c| c == fence_char) && t.chars().count() >= fence_len
    })
}

/// Length of the region's first line, for pointing a warning at the opener.
fn opening_line_len(region: &str) -> usize {
    region.find('\n').unwrap_or(region.len())
}
