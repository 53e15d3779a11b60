//! Arena-backed document tree.
//!
//! A [`Tree`] owns every node of a parsed document. Nodes are addressed by
//! [`NodeId`] and navigated through the read-only [`NodeRef`] handle, which is
//! all a render function ever sees. Text-bearing leaves reference byte ranges
//! ([`Segment`]) of the source instead of owning copies.

/// Index of a node inside its [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The document root, present in every tree.
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0
    }
}

/// Byte range `[start, end)` of the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Bytes of `source` covered by this segment.
    ///
    /// Out-of-range segments yield an empty slice.
    pub fn value<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        source.get(self.start..self.end).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A document node and its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Document,
    Heading {
        level: u8,
    },
    Paragraph,
    /// Inline content of a tight list item, without paragraph spacing.
    TextBlock,
    Blockquote,
    List {
        ordered: bool,
        /// Start index from the source. Rendering always renumbers from 1.
        start: u64,
    },
    ListItem,
    /// Indented code block.
    CodeBlock {
        lines: Vec<Segment>,
    },
    FencedCodeBlock {
        language: Option<String>,
        lines: Vec<Segment>,
    },
    HtmlBlock {
        lines: Vec<Segment>,
        closure: Option<Segment>,
    },
    ThematicBreak,
    Strikethrough,
    AutoLink {
        url: String,
    },
    CodeSpan,
    /// Level 1 is italic, 2 bold, 3 underline.
    Emphasis {
        level: u8,
    },
    Link {
        destination: String,
        title: String,
    },
    Image {
        destination: String,
        title: String,
        alt: String,
    },
    RawHtml {
        segments: Vec<Segment>,
    },
    Text {
        segment: Segment,
        /// Raw text is written as-is and never carries line breaks.
        raw: bool,
        soft_break: bool,
        hard_break: bool,
    },
    /// Literal value not backed by the source.
    String {
        value: String,
    },
}

impl Node {
    /// Plain text node over `segment` without line breaks.
    #[must_use]
    pub fn text(segment: Segment) -> Self {
        Node::Text {
            segment,
            raw: false,
            soft_break: false,
            hard_break: false,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Document => NodeKind::Document,
            Node::Heading { .. } => NodeKind::Heading,
            Node::Paragraph => NodeKind::Paragraph,
            Node::TextBlock => NodeKind::TextBlock,
            Node::Blockquote => NodeKind::Blockquote,
            Node::List { .. } => NodeKind::List,
            Node::ListItem => NodeKind::ListItem,
            Node::CodeBlock { .. } => NodeKind::CodeBlock,
            Node::FencedCodeBlock { .. } => NodeKind::FencedCodeBlock,
            Node::HtmlBlock { .. } => NodeKind::HtmlBlock,
            Node::ThematicBreak => NodeKind::ThematicBreak,
            Node::Strikethrough => NodeKind::Strikethrough,
            Node::AutoLink { .. } => NodeKind::AutoLink,
            Node::CodeSpan => NodeKind::CodeSpan,
            Node::Emphasis { .. } => NodeKind::Emphasis,
            Node::Link { .. } => NodeKind::Link,
            Node::Image { .. } => NodeKind::Image,
            Node::RawHtml { .. } => NodeKind::RawHtml,
            Node::Text { .. } => NodeKind::Text,
            Node::String { .. } => NodeKind::String,
        }
    }
}

/// Payload-free tag of a [`Node`], used as the dispatch key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Document,
    Heading,
    Paragraph,
    TextBlock,
    Blockquote,
    List,
    ListItem,
    CodeBlock,
    FencedCodeBlock,
    HtmlBlock,
    ThematicBreak,
    Strikethrough,
    AutoLink,
    CodeSpan,
    Emphasis,
    Link,
    Image,
    RawHtml,
    Text,
    String,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NodeKind; 20] = [
        NodeKind::Document,
        NodeKind::Heading,
        NodeKind::Paragraph,
        NodeKind::TextBlock,
        NodeKind::Blockquote,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::CodeBlock,
        NodeKind::FencedCodeBlock,
        NodeKind::HtmlBlock,
        NodeKind::ThematicBreak,
        NodeKind::Strikethrough,
        NodeKind::AutoLink,
        NodeKind::CodeSpan,
        NodeKind::Emphasis,
        NodeKind::Link,
        NodeKind::Image,
        NodeKind::RawHtml,
        NodeKind::Text,
        NodeKind::String,
    ];

    /// Position of this kind in [`NodeKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether nodes of this kind live inside a block's inline content.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            NodeKind::Strikethrough
                | NodeKind::AutoLink
                | NodeKind::CodeSpan
                | NodeKind::Emphasis
                | NodeKind::Link
                | NodeKind::Image
                | NodeKind::RawHtml
                | NodeKind::Text
                | NodeKind::String
        )
    }
}

#[derive(Debug)]
struct Entry {
    node: Node,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Entry {
    fn new(node: Node, parent: Option<NodeId>) -> Self {
        Self {
            node,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// A parsed document.
///
/// Trees are built by appending nodes under existing parents and are not
/// modified while rendering.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Entry>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only the [`Node::Document`] root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Entry::new(Node::Document, None)],
        }
    }

    /// Navigation handle for the document root.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId::ROOT,
        }
    }

    /// Navigation handle for `id`, if it belongs to this tree.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.index() < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Mutable access to a node's payload, for builders that fill in data
    /// after the node was appended.
    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).map(|entry| &mut entry.node)
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());

        let mut entry = Entry::new(node, Some(parent));
        let prev = self.nodes[parent.index()].last_child;
        entry.prev_sibling = prev;
        self.nodes.push(entry);

        if let Some(prev) = prev {
            self.nodes[prev.index()].next_sibling = Some(id);
        } else {
            self.nodes[parent.index()].first_child = Some(id);
        }
        self.nodes[parent.index()].last_child = Some(id);
        id
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn entry(&self, id: NodeId) -> &Entry {
        &self.nodes[id.index()]
    }
}

/// Read-only navigation handle for one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node", self.value())
            .finish()
    }
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn value(self) -> &'a Node {
        &self.tree.entry(self.id).node
    }

    pub fn kind(self) -> NodeKind {
        self.value().kind()
    }

    fn link(self, id: Option<NodeId>) -> Option<NodeRef<'a>> {
        id.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.link(self.tree.entry(self.id).parent)
    }

    pub fn first_child(self) -> Option<NodeRef<'a>> {
        self.link(self.tree.entry(self.id).first_child)
    }

    pub fn last_child(self) -> Option<NodeRef<'a>> {
        self.link(self.tree.entry(self.id).last_child)
    }

    pub fn prev_sibling(self) -> Option<NodeRef<'a>> {
        self.link(self.tree.entry(self.id).prev_sibling)
    }

    pub fn next_sibling(self) -> Option<NodeRef<'a>> {
        self.link(self.tree.entry(self.id).next_sibling)
    }

    pub fn has_children(self) -> bool {
        self.tree.entry(self.id).first_child.is_some()
    }

    /// Children in stored order.
    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> {
        std::iter::successors(self.first_child(), |child| child.next_sibling())
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(self) -> impl Iterator<Item = NodeRef<'a>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Number of enclosing list items, counted up to the nearest blockquote.
    ///
    /// A blockquote starts a fresh layout context: its content is rendered
    /// with top-level spacing even when the quote itself sits in a list.
    pub fn list_depth(self) -> usize {
        self.ancestors()
            .take_while(|a| a.kind() != NodeKind::Blockquote)
            .filter(|a| a.kind() == NodeKind::ListItem)
            .count()
    }

    /// One-based position among sibling list items.
    pub fn item_position(self) -> usize {
        std::iter::successors(self.prev_sibling(), |n| n.prev_sibling())
            .filter(|n| n.kind() == NodeKind::ListItem)
            .count()
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_tree() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let list = tree.append(
            NodeId::ROOT,
            Node::List {
                ordered: false,
                start: 1,
            },
        );
        let first = tree.append(list, Node::ListItem);
        let second = tree.append(list, Node::ListItem);
        (tree, list, first, second)
    }

    #[test]
    fn test_new_tree_has_document_root() {
        let tree = Tree::new();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().kind(), NodeKind::Document);
        assert!(tree.root().parent().is_none());
        assert!(!tree.root().has_children());
    }

    #[test]
    fn test_append_links_siblings() {
        let (tree, list, first, second) = list_tree();
        let list = tree.get(list).unwrap();
        assert_eq!(list.first_child().unwrap().id(), first);
        assert_eq!(list.last_child().unwrap().id(), second);

        let first = tree.get(first).unwrap();
        let second = tree.get(second).unwrap();
        assert!(first.prev_sibling().is_none());
        assert_eq!(first.next_sibling().unwrap().id(), second.id());
        assert_eq!(second.prev_sibling().unwrap().id(), first.id());
        assert!(second.next_sibling().is_none());
        assert_eq!(second.parent().unwrap().id(), list.id());
    }

    #[test]
    fn test_children_in_stored_order() {
        let (tree, list, first, second) = list_tree();
        let ids: Vec<_> = tree.get(list).unwrap().children().map(NodeRef::id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_item_position() {
        let (tree, _, first, second) = list_tree();
        assert_eq!(tree.get(first).unwrap().item_position(), 1);
        assert_eq!(tree.get(second).unwrap().item_position(), 2);
    }

    #[test]
    fn test_list_depth_counts_items() {
        let (mut tree, _, first, _) = list_tree();
        let para = tree.append(first, Node::Paragraph);
        let nested = tree.append(
            first,
            Node::List {
                ordered: true,
                start: 1,
            },
        );
        let nested_item = tree.append(nested, Node::ListItem);
        let deep = tree.append(nested_item, Node::TextBlock);

        assert_eq!(tree.root().list_depth(), 0);
        assert_eq!(tree.get(first).unwrap().list_depth(), 0);
        assert_eq!(tree.get(para).unwrap().list_depth(), 1);
        assert_eq!(tree.get(deep).unwrap().list_depth(), 2);
    }

    #[test]
    fn test_list_depth_resets_inside_blockquote() {
        let (mut tree, _, first, _) = list_tree();
        let quote = tree.append(first, Node::Blockquote);
        let para = tree.append(quote, Node::Paragraph);

        assert_eq!(tree.get(quote).unwrap().list_depth(), 1);
        assert_eq!(tree.get(para).unwrap().list_depth(), 0);
    }

    #[test]
    fn test_value_mut_updates_payload() {
        let mut tree = Tree::new();
        let id = tree.append(NodeId::ROOT, Node::text(Segment::new(0, 3)));
        if let Some(Node::Text { soft_break, .. }) = tree.value_mut(id) {
            *soft_break = true;
        }
        assert!(matches!(
            tree.get(id).unwrap().value(),
            Node::Text {
                soft_break: true,
                ..
            }
        ));
    }

    #[test]
    fn test_segment_value_out_of_range_is_empty() {
        let source = b"hello";
        assert_eq!(Segment::new(1, 4).value(source), b"ell");
        assert_eq!(Segment::new(3, 10).value(source), b"");
        assert!(Segment::new(4, 2).is_empty());
    }

    #[test]
    fn test_kind_index_matches_all() {
        for (i, kind) in NodeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
