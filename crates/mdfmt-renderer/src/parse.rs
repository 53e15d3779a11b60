//! Document tree builder over `pulldown-cmark` events.
//!
//! Parsing itself is left to `pulldown-cmark`. The builder only maps its
//! offset events onto [`Tree`] nodes, keeping byte ranges into the source for
//! text so the renderer can reproduce it verbatim (escapes and entities
//! included).

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};
use serde_yaml::Value;

use crate::error::ParseError;
use crate::tree::{Node, NodeId, NodeKind, Segment, Tree};

/// A parsed markdown document.
#[derive(Debug)]
pub struct ParsedDocument {
    pub tree: Tree,
    /// YAML front matter, if the document starts with one.
    pub metadata: Option<Value>,
}

/// Parser extensions the renderer has node kinds for.
pub fn parser_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Parse `source` into a document tree.
pub fn parse_markdown(source: &str) -> Result<ParsedDocument, ParseError> {
    let mut builder = TreeBuilder::new(source);
    for (event, range) in Parser::new_ext(source, parser_options()).into_offset_iter() {
        builder.event(event, range)?;
    }
    let doc = builder.finish();
    tracing::debug!(
        nodes = doc.tree.len(),
        front_matter = doc.metadata.is_some(),
        "Parsed markdown"
    );
    Ok(doc)
}

/// Open container on the builder stack.
enum Frame {
    Node(NodeId),
    /// Implicit block around inline content placed directly in a list item.
    TextBlock(NodeId),
    /// Autolink text repeats the URL and is dropped.
    AutoLink,
    Image {
        destination: String,
        title: String,
    },
    Code {
        language: Option<String>,
        fenced: bool,
    },
    Html,
    Metadata,
    /// Markup without a node kind; its content goes to the enclosing node.
    Transparent,
}

/// Where text events currently go.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Sink {
    Tree,
    Discard,
    Alt,
    Lines,
    Metadata,
}

struct TreeBuilder<'s> {
    source: &'s str,
    tree: Tree,
    stack: Vec<Frame>,
    lines: Vec<Segment>,
    alt: String,
    metadata_text: String,
    metadata: Option<Value>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            tree: Tree::new(),
            stack: Vec::new(),
            lines: Vec::new(),
            alt: String::new(),
            metadata_text: String::new(),
            metadata: None,
        }
    }

    fn finish(self) -> ParsedDocument {
        ParsedDocument {
            tree: self.tree,
            metadata: self.metadata,
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), ParseError> {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end()?,
            Event::Text(text) => self.text(&text, range),
            Event::Code(code) => self.code_span(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.html(&html, range),
            Event::SoftBreak => self.line_break(false, range),
            Event::HardBreak => self.line_break(true, range),
            Event::Rule => {
                if self.sink() == Sink::Tree {
                    self.close_text_block();
                    self.append(Node::ThematicBreak);
                }
            }
            Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_)
            | Event::TaskListMarker(_) => self.raw(range),
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>) {
        if self.sink() != Sink::Tree {
            // Markup nested in captured content, e.g. emphasis in alt text.
            self.stack.push(Frame::Transparent);
            return;
        }
        if is_block(&tag) {
            self.close_text_block();
        }

        let frame = match tag {
            Tag::Paragraph => self.open(Node::Paragraph),
            Tag::Heading { level, .. } => self.open(Node::Heading {
                level: heading_level_to_num(level),
            }),
            Tag::BlockQuote(_) => self.open(Node::Blockquote),
            Tag::CodeBlock(kind) => {
                self.lines.clear();
                match kind {
                    CodeBlockKind::Fenced(info) => Frame::Code {
                        language: info.split_whitespace().next().map(str::to_owned),
                        fenced: true,
                    },
                    CodeBlockKind::Indented => Frame::Code {
                        language: None,
                        fenced: false,
                    },
                }
            }
            Tag::HtmlBlock => {
                self.lines.clear();
                Frame::Html
            }
            Tag::List(start) => self.open(Node::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
            }),
            Tag::Item => self.open(Node::ListItem),
            Tag::Emphasis => self.open_inline(Node::Emphasis { level: 1 }),
            Tag::Strong => self.open_inline(Node::Emphasis { level: 2 }),
            Tag::Strikethrough => self.open_inline(Node::Strikethrough),
            Tag::Link {
                link_type: LinkType::Autolink | LinkType::Email,
                dest_url,
                ..
            } => {
                self.append_inline(Node::AutoLink {
                    url: dest_url.into_string(),
                });
                Frame::AutoLink
            }
            Tag::Link {
                dest_url, title, ..
            } => self.open_inline(Node::Link {
                destination: dest_url.into_string(),
                title: title.into_string(),
            }),
            Tag::Image {
                dest_url, title, ..
            } => {
                self.alt.clear();
                Frame::Image {
                    destination: dest_url.into_string(),
                    title: title.into_string(),
                }
            }
            Tag::MetadataBlock(_) => {
                self.metadata_text.clear();
                Frame::Metadata
            }
            Tag::FootnoteDefinition(_)
            | Tag::Table(_)
            | Tag::TableHead
            | Tag::TableRow
            | Tag::TableCell
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => Frame::Transparent,
        };
        self.stack.push(frame);
    }

    fn end(&mut self) -> Result<(), ParseError> {
        self.close_text_block();
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };

        match frame {
            Frame::Node(_) | Frame::TextBlock(_) | Frame::AutoLink | Frame::Transparent => {}
            Frame::Code { language, fenced } => {
                let lines = std::mem::take(&mut self.lines);
                let node = if fenced {
                    Node::FencedCodeBlock { language, lines }
                } else {
                    Node::CodeBlock { lines }
                };
                self.append(node);
            }
            Frame::Html => {
                let lines = std::mem::take(&mut self.lines);
                self.append(Node::HtmlBlock {
                    lines,
                    closure: None,
                });
            }
            Frame::Image { destination, title } => {
                let alt = std::mem::take(&mut self.alt);
                self.append_inline(Node::Image {
                    destination,
                    title,
                    alt,
                });
            }
            Frame::Metadata => {
                let yaml = std::mem::take(&mut self.metadata_text);
                if yaml.trim().is_empty() {
                    tracing::warn!("Empty front matter block ignored");
                    self.metadata = None;
                } else {
                    self.metadata = Some(serde_yaml::from_str(&yaml)?);
                }
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str, range: Range<usize>) {
        match self.sink() {
            Sink::Tree => {
                let segment = self.text_segment(text, range);
                self.append_inline(Node::text(segment));
            }
            Sink::Alt => self.alt.push_str(text),
            Sink::Lines => self.lines.push(Segment::new(range.start, range.end)),
            Sink::Metadata => self.metadata_text.push_str(text),
            Sink::Discard => {}
        }
    }

    fn code_span(&mut self, code: &str) {
        match self.sink() {
            Sink::Tree => {
                let span = self.append_inline(Node::CodeSpan);
                self.tree.append(
                    span,
                    Node::String {
                        value: code.to_owned(),
                    },
                );
            }
            Sink::Alt => self.alt.push_str(code),
            Sink::Discard | Sink::Lines | Sink::Metadata => {}
        }
    }

    fn html(&mut self, html: &str, range: Range<usize>) {
        let segment = Segment::new(range.start, range.end);
        match self.sink() {
            Sink::Tree => {
                self.append_inline(Node::RawHtml {
                    segments: vec![segment],
                });
            }
            Sink::Lines => self.lines.push(segment),
            Sink::Alt => self.alt.push_str(html),
            Sink::Discard | Sink::Metadata => {}
        }
    }

    fn line_break(&mut self, hard: bool, range: Range<usize>) {
        match self.sink() {
            Sink::Tree => {}
            Sink::Alt => {
                self.alt.push(' ');
                return;
            }
            Sink::Discard | Sink::Lines | Sink::Metadata => return,
        }

        let parent = self.inline_parent();
        let last = self
            .tree
            .get(parent)
            .and_then(|p| p.last_child())
            .map(|c| c.id());
        if let Some(id) = last
            && let Some(Node::Text {
                raw: false,
                soft_break,
                hard_break,
                ..
            }) = self.tree.value_mut(id)
        {
            if hard {
                *hard_break = true;
            } else {
                *soft_break = true;
            }
            return;
        }

        self.tree.append(
            parent,
            Node::Text {
                segment: Segment::new(range.start, range.start),
                raw: false,
                soft_break: !hard,
                hard_break: hard,
            },
        );
    }

    fn raw(&mut self, range: Range<usize>) {
        if self.sink() == Sink::Tree {
            self.append_inline(Node::Text {
                segment: Segment::new(range.start, range.end),
                raw: true,
                soft_break: false,
                hard_break: false,
            });
        }
    }

    /// Source range of a text event, widened to cover a backslash escape.
    ///
    /// An escaped punctuation character is reported without its backslash;
    /// writing the bare character back would turn it into markup.
    fn text_segment(&self, text: &str, range: Range<usize>) -> Segment {
        let bytes = self.source.as_bytes();
        let escaped = range.start > 0
            && bytes.get(range.start - 1) == Some(&b'\\')
            && text
                .as_bytes()
                .first()
                .is_some_and(|&b| b.is_ascii_punctuation() && bytes.get(range.start) == Some(&b));
        if escaped {
            Segment::new(range.start - 1, range.end)
        } else {
            Segment::new(range.start, range.end)
        }
    }

    fn sink(&self) -> Sink {
        let capturing = self
            .stack
            .iter()
            .rev()
            .find(|frame| !matches!(frame, Frame::Transparent));
        match capturing {
            Some(Frame::AutoLink) => Sink::Discard,
            Some(Frame::Image { .. }) => Sink::Alt,
            Some(Frame::Code { .. } | Frame::Html) => Sink::Lines,
            Some(Frame::Metadata) => Sink::Metadata,
            Some(Frame::Node(_) | Frame::TextBlock(_) | Frame::Transparent) | None => Sink::Tree,
        }
    }

    fn parent(&self) -> NodeId {
        self.stack
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Node(id) | Frame::TextBlock(id) => Some(*id),
                _ => None,
            })
            .unwrap_or(NodeId::ROOT)
    }

    /// Parent for inline content, opening a text block inside list items.
    fn inline_parent(&mut self) -> NodeId {
        let parent = self.parent();
        let in_item = matches!(self.stack.last(), Some(Frame::Node(id)) if *id == parent)
            && self
                .tree
                .get(parent)
                .is_some_and(|n| n.kind() == NodeKind::ListItem);
        if !in_item {
            return parent;
        }
        let block = self.tree.append(parent, Node::TextBlock);
        self.stack.push(Frame::TextBlock(block));
        block
    }

    fn close_text_block(&mut self) {
        if matches!(self.stack.last(), Some(Frame::TextBlock(_))) {
            self.stack.pop();
        }
    }

    fn append(&mut self, node: Node) -> NodeId {
        let parent = self.parent();
        self.tree.append(parent, node)
    }

    fn append_inline(&mut self, node: Node) -> NodeId {
        let parent = self.inline_parent();
        self.tree.append(parent, node)
    }

    fn open(&mut self, node: Node) -> Frame {
        Frame::Node(self.append(node))
    }

    fn open_inline(&mut self, node: Node) -> Frame {
        Frame::Node(self.append_inline(node))
    }
}

fn is_block(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Paragraph
            | Tag::Heading { .. }
            | Tag::BlockQuote(_)
            | Tag::CodeBlock(_)
            | Tag::HtmlBlock
            | Tag::List(_)
            | Tag::Item
            | Tag::FootnoteDefinition(_)
            | Tag::Table(_)
            | Tag::DefinitionList
            | Tag::MetadataBlock(_)
    )
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
