//! Node kind to render function dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use mdfmt_writers::Writer;

use crate::blocks;
use crate::error::RenderError;
use crate::inlines;
use crate::renderer::Renderer;
use crate::tree::{NodeKind, NodeRef};

/// Traversal instruction returned by render functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStatus {
    /// Visit children, then the node's leave event.
    Continue,
    /// Skip the children; the node's leave event still fires.
    SkipChildren,
}

/// Function rendering one node for its entering or leaving event.
pub type NodeRenderFn = Arc<
    dyn Fn(&Renderer<'_>, &mut dyn Writer, NodeRef<'_>, bool) -> Result<WalkStatus, RenderError>
        + Send
        + Sync,
>;

/// Caller-supplied render functions replacing the defaults per node kind.
///
/// An override fully replaces the default for its kind; it is never chained
/// with it.
#[derive(Clone, Default)]
pub struct NodeRenderFns {
    overrides: HashMap<NodeKind, NodeRenderFn>,
}

impl std::fmt::Debug for NodeRenderFns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.overrides.keys().collect();
        kinds.sort();
        f.debug_struct("NodeRenderFns")
            .field("overrides", &kinds)
            .finish()
    }
}

impl NodeRenderFns {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the render function for `kind`.
    pub fn insert<F>(&mut self, kind: NodeKind, render: F)
    where
        F: Fn(&Renderer<'_>, &mut dyn Writer, NodeRef<'_>, bool) -> Result<WalkStatus, RenderError>
            + Send
            + Sync
            + 'static,
    {
        self.overrides.insert(kind, Arc::new(render));
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<F>(mut self, kind: NodeKind, render: F) -> Self
    where
        F: Fn(&Renderer<'_>, &mut dyn Writer, NodeRef<'_>, bool) -> Result<WalkStatus, RenderError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(kind, render);
        self
    }

    pub fn get(&self, kind: NodeKind) -> Option<&NodeRenderFn> {
        self.overrides.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Resolved per-render dispatch: one function for every [`NodeKind`].
pub(crate) struct DispatchTable {
    funcs: Vec<NodeRenderFn>,
}

impl DispatchTable {
    /// Defaults overlaid by `overrides`.
    pub(crate) fn new(overrides: &NodeRenderFns) -> Self {
        let funcs = NodeKind::ALL
            .iter()
            .map(|&kind| {
                overrides
                    .get(kind)
                    .map_or_else(|| default_fn(kind), Arc::clone)
            })
            .collect();
        Self { funcs }
    }

    pub(crate) fn get(&self, kind: NodeKind) -> &NodeRenderFn {
        &self.funcs[kind.index()]
    }
}

/// Built-in render function for `kind`.
pub fn default_fn(kind: NodeKind) -> NodeRenderFn {
    match kind {
        NodeKind::Document => Arc::new(blocks::render_document),
        NodeKind::Heading => Arc::new(blocks::render_heading),
        NodeKind::Paragraph => Arc::new(blocks::render_paragraph),
        NodeKind::TextBlock => Arc::new(blocks::render_text_block),
        NodeKind::Blockquote => Arc::new(blocks::render_blockquote),
        NodeKind::List => Arc::new(blocks::render_list),
        NodeKind::ListItem => Arc::new(blocks::render_list_item),
        NodeKind::CodeBlock => Arc::new(blocks::render_code_block),
        NodeKind::FencedCodeBlock => Arc::new(blocks::render_fenced_code_block),
        NodeKind::HtmlBlock => Arc::new(blocks::render_html_block),
        NodeKind::ThematicBreak => Arc::new(blocks::render_thematic_break),
        NodeKind::Strikethrough => Arc::new(inlines::render_strikethrough),
        NodeKind::AutoLink => Arc::new(inlines::render_auto_link),
        NodeKind::CodeSpan => Arc::new(inlines::render_code_span),
        NodeKind::Emphasis => Arc::new(inlines::render_emphasis),
        NodeKind::Link => Arc::new(inlines::render_link),
        NodeKind::Image => Arc::new(inlines::render_image),
        NodeKind::RawHtml => Arc::new(inlines::render_raw_html),
        NodeKind::Text => Arc::new(inlines::render_text),
        NodeKind::String => Arc::new(inlines::render_string),
    }
}
