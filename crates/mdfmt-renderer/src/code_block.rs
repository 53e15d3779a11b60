//! Code formatter hook for fenced code and HTML blocks.
//!
//! The renderer never formats source code itself. Instead it hands the
//! concatenated lines of every fenced code block (and every HTML block, keyed
//! by `html`) to a [`CodeFormatter`], and writes back whatever the formatter
//! returns. Unknown languages should return [`FormatResult::PassThrough`].
//!
//! # Example
//!
//! ```
//! use mdfmt_renderer::{CodeFormatter, FormatResult};
//!
//! struct TrimTrailing;
//!
//! impl CodeFormatter for TrimTrailing {
//!     fn format(&self, language: &str, source: &str) -> FormatResult {
//!         if language != "sh" {
//!             return FormatResult::PassThrough;
//!         }
//!         let lines: Vec<&str> = source.lines().map(str::trim_end).collect();
//!         FormatResult::Formatted(lines.join("\n"))
//!     }
//! }
//! ```

/// Result of formatting a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatResult {
    /// Replace the block content with this text.
    Formatted(String),
    /// Keep the block content unchanged.
    PassThrough,
}

/// Formats code block content for a language tag.
///
/// Implementations must be idempotent: formatting already formatted source
/// returns it unchanged, otherwise rendered documents would not be stable.
pub trait CodeFormatter: Send + Sync {
    /// Format `source`, the concatenated lines of a block tagged `language`.
    ///
    /// `language` is empty for untagged blocks.
    fn format(&self, language: &str, source: &str) -> FormatResult;
}

/// Formatter that leaves every block unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughFormatter;

impl CodeFormatter for PassThroughFormatter {
    fn format(&self, _language: &str, _source: &str) -> FormatResult {
        FormatResult::PassThrough
    }
}

impl<F> CodeFormatter for F
where
    F: Fn(&str, &str) -> FormatResult + Send + Sync,
{
    fn format(&self, language: &str, source: &str) -> FormatResult {
        self(language, source)
    }
}

/// Number of backticks needed to fence `content`: one more than its longest
/// backtick run, and at least three.
pub(crate) fn fence_length(content: &[u8]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for &b in content {
        if b == b'`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest.max(2) + 1
}
