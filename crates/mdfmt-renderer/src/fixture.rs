//! Hand-built trees for renderer tests.

use crate::dispatch::NodeRenderFns;
use crate::renderer::{RenderOptions, Renderer, render};
use crate::tree::{Node, NodeId, Segment, Tree};
use crate::PassThroughFormatter;

/// A tree together with the source its text segments point into.
pub(crate) struct Fixture {
    pub tree: Tree,
    pub source: String,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            source: String::new(),
        }
    }

    pub fn node(&mut self, parent: NodeId, node: Node) -> NodeId {
        self.tree.append(parent, node)
    }

    pub fn segment(&mut self, text: &str) -> Segment {
        let start = self.source.len();
        self.source.push_str(text);
        Segment::new(start, self.source.len())
    }

    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let segment = self.segment(text);
        self.node(parent, Node::text(segment))
    }

    pub fn soft_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let segment = self.segment(text);
        self.node(
            parent,
            Node::Text {
                segment,
                raw: false,
                soft_break: true,
                hard_break: false,
            },
        )
    }

    pub fn paragraph(&mut self, parent: NodeId, text: &str) -> NodeId {
        let para = self.node(parent, Node::Paragraph);
        self.text(para, text);
        para
    }

    pub fn list(&mut self, parent: NodeId, ordered: bool) -> NodeId {
        self.node(parent, Node::List { ordered, start: 1 })
    }

    /// Tight list item holding `text`.
    pub fn item(&mut self, list: NodeId, text: &str) -> NodeId {
        let item = self.node(list, Node::ListItem);
        let block = self.node(item, Node::TextBlock);
        self.text(block, text);
        item
    }

    pub fn lines(&mut self, lines: &[&str]) -> Vec<Segment> {
        lines.iter().map(|line| self.segment(line)).collect()
    }

    /// Final output with default options.
    pub fn render(&self) -> String {
        self.render_with(RenderOptions::default(), &NodeRenderFns::new())
    }

    pub fn render_with(&self, options: RenderOptions, overrides: &NodeRenderFns) -> String {
        let out = render(None, self.source.as_bytes(), &self.tree, overrides, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Raw body of the walk, before trailing newlines are trimmed.
    pub fn body(&self) -> String {
        let renderer = Renderer::new(
            self.source.as_bytes(),
            RenderOptions::default(),
            &PassThroughFormatter,
            &NodeRenderFns::new(),
        );
        let mut out = Vec::new();
        renderer.walk(&mut out, self.tree.root()).unwrap();
        String::from_utf8(out).unwrap()
    }
}
