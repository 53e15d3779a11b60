//! Render context, traversal and entry points.

use std::borrow::Cow;

use mdfmt_writers::{TrimWriter, Writer};
use serde_yaml::Value;

use crate::code_block::{CodeFormatter, FormatResult, PassThroughFormatter};
use crate::dispatch::{DispatchTable, NodeRenderFn, NodeRenderFns, WalkStatus};
use crate::error::{FormatError, RenderError};
use crate::front_matter::write_front_matter;
use crate::parse::parse_markdown;
use crate::tree::{NodeKind, NodeRef, Segment, Tree};

/// Options affecting layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render soft line breaks as paragraph breaks.
    pub hard_wraps: bool,
    /// Style emphasis with ANSI escape sequences instead of markdown delimiters.
    pub terminal_styling: bool,
}

/// Per-render context handed to every render function.
///
/// Holds the source bytes, the options, the code formatter and the resolved
/// dispatch table. Render functions that need a narrowed writer for their
/// subtree call [`render_children`](Self::render_children) with it and return
/// [`WalkStatus::SkipChildren`].
pub struct Renderer<'a> {
    source: &'a [u8],
    options: RenderOptions,
    formatter: &'a dyn CodeFormatter,
    table: DispatchTable,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(
        source: &'a [u8],
        options: RenderOptions,
        formatter: &'a dyn CodeFormatter,
        overrides: &NodeRenderFns,
    ) -> Self {
        Self {
            source,
            options,
            formatter,
            table: DispatchTable::new(overrides),
        }
    }

    /// Source bytes the tree's segments point into.
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render function in effect for `kind`.
    pub fn render_fn(&self, kind: NodeKind) -> &NodeRenderFn {
        self.table.get(kind)
    }

    /// Visit `node` and its subtree depth-first, writing into `w`.
    pub fn walk(&self, w: &mut dyn Writer, node: NodeRef<'_>) -> Result<(), RenderError> {
        let render = self.table.get(node.kind());
        if render(self, &mut *w, node, true)? == WalkStatus::Continue {
            self.render_children(&mut *w, node)?;
        }
        render(self, w, node, false)?;
        Ok(())
    }

    /// Visit every child of `node` in order, writing into `w`.
    pub fn render_children(&self, w: &mut dyn Writer, node: NodeRef<'_>) -> Result<(), RenderError> {
        for child in node.children() {
            self.walk(w, child)?;
        }
        Ok(())
    }

    /// Write the concatenated `lines` through the code formatter.
    ///
    /// Formatted output always ends with a newline so a closing fence stays on
    /// its own line.
    pub fn write_code(
        &self,
        w: &mut dyn Writer,
        language: &str,
        lines: &[Segment],
    ) -> Result<(), RenderError> {
        let code = self.concat(lines);
        let Ok(text) = std::str::from_utf8(&code) else {
            tracing::warn!(language, "Code block is not valid UTF-8, skipping formatter");
            w.write_bytes(&code)?;
            return Ok(());
        };

        let formatted = match self.formatter.format(language, text) {
            FormatResult::Formatted(formatted) => Cow::Owned(formatted.into_bytes()),
            FormatResult::PassThrough => code,
        };
        w.write_bytes(&formatted)?;
        if formatted.last().is_some_and(|&b| b != b'\n') {
            w.write_byte(b'\n')?;
        }
        Ok(())
    }

    /// Bytes of `segments`, joined.
    pub fn concat(&self, segments: &[Segment]) -> Cow<'a, [u8]> {
        match segments {
            [] => Cow::Borrowed(&[]),
            [only] => Cow::Borrowed(only.value(self.source)),
            _ => Cow::Owned(
                segments
                    .iter()
                    .flat_map(|s| s.value(self.source))
                    .copied()
                    .collect(),
            ),
        }
    }
}

/// Render `tree` to canonical markdown.
///
/// Front matter from `metadata` comes first, then the body. The output ends
/// with exactly one newline.
pub fn render(
    metadata: Option<&Value>,
    source: &[u8],
    tree: &Tree,
    overrides: &NodeRenderFns,
    options: RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    render_with(metadata, source, tree, overrides, options, &PassThroughFormatter)
}

fn render_with(
    metadata: Option<&Value>,
    source: &[u8],
    tree: &Tree,
    overrides: &NodeRenderFns,
    options: RenderOptions,
    formatter: &dyn CodeFormatter,
) -> Result<Vec<u8>, RenderError> {
    tracing::debug!(
        nodes = tree.len(),
        overrides = overrides.len(),
        hard_wraps = options.hard_wraps,
        terminal_styling = options.terminal_styling,
        "Rendering document"
    );

    let mut out = Vec::with_capacity(source.len() + source.len() / 8 + 64);
    write_front_matter(&mut out, metadata).map_err(RenderError::in_document)?;

    let renderer = Renderer::new(source, options, formatter, overrides);
    let mut body = TrimWriter::new(&mut out, b'\n');
    renderer
        .walk(&mut body, tree.root())
        .map_err(RenderError::in_document)?;
    body.finalize();
    out.push(b'\n');
    Ok(out)
}

/// Configurable markdown formatter.
///
/// # Example
///
/// ```
/// use mdfmt_renderer::MarkdownFormatter;
///
/// let out = MarkdownFormatter::new()
///     .format("Title\n=====\n\n* one\n* two\n")
///     .unwrap();
/// assert_eq!(out, b"# Title\n\n- one\n- two\n");
/// ```
pub struct MarkdownFormatter {
    overrides: NodeRenderFns,
    options: RenderOptions,
    formatter: Box<dyn CodeFormatter>,
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MarkdownFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownFormatter")
            .field("overrides", &self.overrides)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl MarkdownFormatter {
    /// Create a formatter with default rendering and no code formatting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            overrides: NodeRenderFns::new(),
            options: RenderOptions::default(),
            formatter: Box::new(PassThroughFormatter),
        }
    }

    /// Replace render functions per node kind.
    #[must_use]
    pub fn with_overrides(mut self, overrides: NodeRenderFns) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Render soft line breaks as paragraph breaks.
    #[must_use]
    pub fn with_hard_wraps(mut self, enabled: bool) -> Self {
        self.options.hard_wraps = enabled;
        self
    }

    /// Style emphasis with ANSI escape sequences for terminal display.
    ///
    /// Output in this mode is meant for reading, not for re-parsing.
    #[must_use]
    pub fn with_terminal_styling(mut self, enabled: bool) -> Self {
        self.options.terminal_styling = enabled;
        self
    }

    /// Format fenced code and HTML blocks with `formatter`.
    #[must_use]
    pub fn with_code_formatter<F: CodeFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render a tree built from `source`.
    pub fn render(
        &self,
        metadata: Option<&Value>,
        source: &[u8],
        tree: &Tree,
    ) -> Result<Vec<u8>, RenderError> {
        render_with(
            metadata,
            source,
            tree,
            &self.overrides,
            self.options,
            self.formatter.as_ref(),
        )
    }

    /// Parse `source` and render it back as canonical markdown.
    pub fn format(&self, source: &str) -> Result<Vec<u8>, FormatError> {
        let doc = parse_markdown(source)?;
        Ok(self.render(doc.metadata.as_ref(), source.as_bytes(), &doc.tree)?)
    }
}

/// Parse `source` and render it back as canonical markdown.
pub fn format_markdown(source: &str, options: RenderOptions) -> Result<Vec<u8>, FormatError> {
    MarkdownFormatter::new().with_options(options).format(source)
}
