//! Default render functions for block nodes.
//!
//! Blocks separate themselves from what follows with a blank line (`\n\n` on
//! leave). Inside list items spacing is tighter: paragraphs and text blocks
//! only break the line, so tight lists stay tight. Nested layout is expressed
//! by narrowing the writer (indentation for list items, `> ` markers for
//! blockquotes) and rendering the children through it.

use mdfmt_writers::{IndentWriter, PrefixWriter, TrimWriter, Writer};

use crate::code_block::fence_length;
use crate::dispatch::WalkStatus;
use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::tree::{Node, NodeKind, NodeRef, Segment};

const NEWLINE: u8 = b'\n';
const BLANK_LINE: &[u8] = b"\n\n";
const BULLET: &str = "- ";
const QUOTE_MARKER: &str = "> ";
const THEMATIC_BREAK: &str = "***";
const CODE_INDENT: usize = 4;
const HTML_LANGUAGE: &str = "html";

type RenderResult = Result<WalkStatus, RenderError>;

pub(crate) fn render_document(
    _r: &Renderer<'_>,
    _w: &mut dyn Writer,
    _node: NodeRef<'_>,
    _entering: bool,
) -> RenderResult {
    Ok(WalkStatus::Continue)
}

pub(crate) fn render_heading(
    _r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if !entering {
        w.write_bytes(BLANK_LINE)?;
        return Ok(WalkStatus::Continue);
    }

    let level = match node.value() {
        Node::Heading { level } => *level,
        _ => 1,
    };
    for _ in 0..level {
        w.write_byte(b'#')?;
    }
    w.write_byte(b' ')?;
    Ok(WalkStatus::Continue)
}

pub(crate) fn render_thematic_break(
    _r: &Renderer<'_>,
    w: &mut dyn Writer,
    _node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if entering {
        w.write_str(THEMATIC_BREAK)?;
    } else {
        w.write_bytes(BLANK_LINE)?;
    }
    Ok(WalkStatus::Continue)
}

pub(crate) fn render_paragraph(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    let in_list = node.list_depth() > 0;

    if !entering {
        if !in_list {
            w.write_bytes(BLANK_LINE)?;
        } else if node.next_sibling().is_some() {
            w.write_byte(NEWLINE)?;
        }
        return Ok(WalkStatus::Continue);
    }

    if in_list && node.prev_sibling().is_some() {
        w.write_byte(NEWLINE)?;
        r.render_children(&mut *w, node)?;
        w.write_byte(NEWLINE)?;
    } else {
        r.render_children(w, node)?;
    }
    Ok(WalkStatus::SkipChildren)
}

pub(crate) fn render_text_block(
    _r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if !entering && node.next_sibling().is_some() {
        w.write_byte(NEWLINE)?;
    }
    Ok(WalkStatus::Continue)
}

pub(crate) fn render_blockquote(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if !entering {
        w.write_bytes(BLANK_LINE)?;
        return Ok(WalkStatus::Continue);
    }

    if node.list_depth() > 0 && node.prev_sibling().is_some() {
        w.write_byte(NEWLINE)?;
    }

    let marked = PrefixWriter::new(&mut *w, QUOTE_MARKER).starting_at_line_start();
    let mut quote = TrimWriter::new(marked, NEWLINE);
    r.render_children(&mut quote, node)?;
    quote.finalize();
    Ok(WalkStatus::SkipChildren)
}

pub(crate) fn render_list(
    _r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if entering {
        return Ok(WalkStatus::Continue);
    }

    let nested = node
        .parent()
        .is_some_and(|p| p.kind() == NodeKind::ListItem);
    if !nested {
        w.write_bytes(BLANK_LINE)?;
    } else if node.next_sibling().is_some() {
        // Keeps the item's next block from reading as a lazy continuation.
        w.write_byte(NEWLINE)?;
    }
    Ok(WalkStatus::Continue)
}

pub(crate) fn render_list_item(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if !entering {
        let ends_with_quote = node
            .last_child()
            .is_some_and(|c| c.kind() == NodeKind::Blockquote);
        if node.next_sibling().is_some() && !ends_with_quote {
            w.write_byte(NEWLINE)?;
        }
        return Ok(WalkStatus::Continue);
    }

    let marker = list_item_marker(node);
    let mut item = IndentWriter::new(&mut *w, marker.len());
    item.write_str(&marker)?;
    r.render_children(&mut item, node)?;
    Ok(WalkStatus::SkipChildren)
}

/// `- ` for bullet items, `N. ` for the N-th item of an ordered list.
fn list_item_marker(node: NodeRef<'_>) -> String {
    let ordered = node
        .parent()
        .is_some_and(|p| matches!(p.value(), Node::List { ordered: true, .. }));
    if ordered {
        format!("{}. ", node.item_position())
    } else {
        BULLET.to_owned()
    }
}

/// Indented code. Outside lists it is rewritten as a fenced block; inside a
/// list item it stays indented, re-based on its least indented line.
pub(crate) fn render_code_block(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if node.list_depth() == 0 {
        return render_fenced_code_block(r, w, node, entering);
    }
    if !entering {
        return Ok(WalkStatus::Continue);
    }

    let (_, lines) = code_content(node);
    let code = r.concat(lines);
    let strip = common_indent(&code);

    w.write_byte(NEWLINE)?;
    let mut indented = IndentWriter::new(&mut *w, CODE_INDENT).starting_at_line_start();
    for line in code.split_inclusive(|&b| b == NEWLINE) {
        if is_blank(line) {
            indented.write_byte(NEWLINE)?;
        } else {
            indented.write_bytes(line.get(strip..).unwrap_or_default())?;
        }
    }
    Ok(WalkStatus::Continue)
}

pub(crate) fn render_fenced_code_block(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    let (language, lines) = code_content(node);
    let fence = "`".repeat(fence_length(&r.concat(lines)));

    if !entering {
        w.write_str(&fence)?;
        w.write_bytes(BLANK_LINE)?;
        return Ok(WalkStatus::Continue);
    }

    let language = language.unwrap_or_default();
    w.write_str(&fence)?;
    w.write_str(language)?;
    w.write_byte(NEWLINE)?;
    r.write_code(w, language, lines)?;
    Ok(WalkStatus::Continue)
}

pub(crate) fn render_html_block(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    let Node::HtmlBlock { lines, closure } = node.value() else {
        return Ok(WalkStatus::Continue);
    };

    if entering {
        r.write_code(w, HTML_LANGUAGE, lines)?;
        return Ok(WalkStatus::Continue);
    }

    if let Some(closure) = closure {
        w.write_bytes(closure.value(r.source()))?;
    }
    w.write_byte(NEWLINE)?;
    Ok(WalkStatus::Continue)
}

fn code_content(node: NodeRef<'_>) -> (Option<&str>, &[Segment]) {
    match node.value() {
        Node::CodeBlock { lines } => (None, lines),
        Node::FencedCodeBlock { language, lines } => (language.as_deref(), lines),
        _ => (None, &[]),
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Smallest leading-whitespace width over the non-blank lines of `code`.
fn common_indent(code: &[u8]) -> usize {
    code.split(|&b| b == NEWLINE)
        .filter(|line| !is_blank(line))
        .map(|line| line.iter().take_while(|&&b| b == b' ' || b == b'\t').count())
        .min()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture::Fixture;
    use crate::tree::NodeId;
    use crate::{FormatResult, MarkdownFormatter};

    #[test]
    fn test_heading() {
        let mut f = Fixture::new();
        let h = f.node(NodeId::ROOT, Node::Heading { level: 2 });
        f.text(h, "Title");
        assert_eq!(f.body(), "## Title\n\n");
        assert_eq!(f.render(), "## Title\n");
    }

    #[test]
    fn test_unordered_list() {
        let mut f = Fixture::new();
        let list = f.list(NodeId::ROOT, false);
        f.item(list, "a");
        f.item(list, "b");
        assert_eq!(f.body(), "- a\n- b\n\n");
        assert_eq!(f.render(), "- a\n- b\n");
    }

    #[test]
    fn test_ordered_list_renumbers_from_one() {
        let mut f = Fixture::new();
        let list = f.node(
            NodeId::ROOT,
            Node::List {
                ordered: true,
                start: 7,
            },
        );
        f.item(list, "a");
        f.item(list, "b");
        f.item(list, "c");
        assert_eq!(f.render(), "1. a\n2. b\n3. c\n");
    }

    #[test]
    fn test_nested_list_indents_by_marker_width() {
        let mut f = Fixture::new();
        let list = f.list(NodeId::ROOT, true);
        let first = f.item(list, "a");
        let nested = f.list(first, false);
        let inner = f.item(nested, "b");
        let deeper = f.list(inner, false);
        f.item(deeper, "c");
        f.item(list, "d");
        assert_eq!(f.render(), "1. a\n   - b\n     - c\n2. d\n");
    }

    #[test]
    fn test_paragraph_after_nested_list() {
        let mut f = Fixture::new();
        let list = f.list(NodeId::ROOT, false);
        let first = f.node(list, Node::ListItem);
        f.paragraph(first, "a");
        let nested = f.list(first, false);
        f.item(nested, "n");
        f.paragraph(first, "para");
        let second = f.node(list, Node::ListItem);
        f.paragraph(second, "b");
        assert_eq!(f.render(), "- a\n  - n\n\n  para\n\n- b\n");
    }

    #[test]
    fn test_loose_item_paragraphs() {
        let mut f = Fixture::new();
        let list = f.list(NodeId::ROOT, false);
        let first = f.node(list, Node::ListItem);
        f.paragraph(first, "a");
        f.paragraph(first, "b");
        let second = f.node(list, Node::ListItem);
        f.paragraph(second, "c");
        assert_eq!(f.render(), "- a\n\n  b\n\n- c\n");
    }

    #[test]
    fn test_paragraphs_are_separated_by_blank_lines() {
        let mut f = Fixture::new();
        f.paragraph(NodeId::ROOT, "one");
        f.paragraph(NodeId::ROOT, "two");
        assert_eq!(f.body(), "one\n\ntwo\n\n");
        assert_eq!(f.render(), "one\n\ntwo\n");
    }

    #[test]
    fn test_blockquote_marks_every_line() {
        let mut f = Fixture::new();
        let quote = f.node(NodeId::ROOT, Node::Blockquote);
        f.paragraph(quote, "quoted");
        f.paragraph(quote, "more");
        f.paragraph(NodeId::ROOT, "after");
        assert_eq!(f.render(), "> quoted\n>\n> more\n\nafter\n");
    }

    #[test]
    fn test_nested_blockquote() {
        let mut f = Fixture::new();
        let outer = f.node(NodeId::ROOT, Node::Blockquote);
        f.paragraph(outer, "outer");
        let inner = f.node(outer, Node::Blockquote);
        f.paragraph(inner, "inner");
        assert_eq!(f.render(), "> outer\n>\n> > inner\n");
    }

    #[test]
    fn test_blockquote_in_list_item() {
        let mut f = Fixture::new();
        let list = f.list(NodeId::ROOT, false);
        let first = f.item(list, "a");
        let quote = f.node(first, Node::Blockquote);
        f.paragraph(quote, "quote");
        f.item(list, "b");
        assert_eq!(f.render(), "- a\n\n  > quote\n\n- b\n");
    }

    #[test]
    fn test_blockquote_opening_list_item_stays_on_marker_line() {
        let mut f = Fixture::new();
        let list = f.list(NodeId::ROOT, false);
        let first = f.node(list, Node::ListItem);
        let quote = f.node(first, Node::Blockquote);
        f.paragraph(quote, "quote");
        f.item(list, "b");
        assert_eq!(f.render(), "- > quote\n\n- b\n");
    }

    #[test]
    fn test_list_in_blockquote() {
        let mut f = Fixture::new();
        let quote = f.node(NodeId::ROOT, Node::Blockquote);
        let list = f.list(quote, false);
        f.item(list, "a");
        f.item(list, "b");
        assert_eq!(f.render(), "> - a\n> - b\n");
    }

    #[test]
    fn test_indented_code_in_list_is_rebased() {
        let mut f = Fixture::new();
        let list = f.list(NodeId::ROOT, false);
        let item = f.item(list, "a");
        let lines = f.lines(&["  x\n", "\n", "    y\n"]);
        f.node(item, Node::CodeBlock { lines });
        assert_eq!(f.render(), "- a\n\n      x\n\n        y\n");
    }

    #[test]
    fn test_indented_code_at_top_level_is_fenced() {
        let mut f = Fixture::new();
        let lines = f.lines(&["x := 1\n"]);
        f.node(NodeId::ROOT, Node::CodeBlock { lines });
        assert_eq!(f.render(), "```\nx := 1\n```\n");
    }

    #[test]
    fn test_fenced_code_goes_through_formatter() {
        let mut f = Fixture::new();
        let lines = f.lines(&["x:=1\n"]);
        f.node(
            NodeId::ROOT,
            Node::FencedCodeBlock {
                language: Some("go".to_owned()),
                lines,
            },
        );
        let formatter = MarkdownFormatter::new().with_code_formatter(|lang: &str, src: &str| {
            if lang == "go" {
                FormatResult::Formatted(src.replace(":=", " := ").trim_end().to_owned())
            } else {
                FormatResult::PassThrough
            }
        });
        let out = formatter.render(None, f.source.as_bytes(), &f.tree).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "```go\nx := 1\n```\n");
    }

    #[test]
    fn test_fence_grows_past_backtick_runs() {
        let mut f = Fixture::new();
        let lines = f.lines(&["```\n", "nested\n", "```\n"]);
        f.node(
            NodeId::ROOT,
            Node::FencedCodeBlock {
                language: Some("md".to_owned()),
                lines,
            },
        );
        assert_eq!(f.render(), "````md\n```\nnested\n```\n````\n");
    }

    #[test]
    fn test_code_without_final_newline_keeps_fence_on_own_line() {
        let mut f = Fixture::new();
        let lines = f.lines(&["x"]);
        f.node(
            NodeId::ROOT,
            Node::FencedCodeBlock {
                language: None,
                lines,
            },
        );
        assert_eq!(f.render(), "```\nx\n```\n");
    }

    #[test]
    fn test_html_block() {
        let mut f = Fixture::new();
        let lines = f.lines(&["<div>\n", "hi\n", "</div>\n"]);
        f.node(
            NodeId::ROOT,
            Node::HtmlBlock {
                lines,
                closure: None,
            },
        );
        f.paragraph(NodeId::ROOT, "after");
        assert_eq!(f.render(), "<div>\nhi\n</div>\n\nafter\n");
    }

    #[test]
    fn test_html_block_closure_line() {
        let mut f = Fixture::new();
        let lines = f.lines(&["<!--\n", "note\n"]);
        let closure = Some(f.segment("-->"));
        f.node(NodeId::ROOT, Node::HtmlBlock { lines, closure });
        assert_eq!(f.render(), "<!--\nnote\n-->\n");
    }

    #[test]
    fn test_thematic_break() {
        let mut f = Fixture::new();
        f.paragraph(NodeId::ROOT, "a");
        f.node(NodeId::ROOT, Node::ThematicBreak);
        f.paragraph(NodeId::ROOT, "b");
        assert_eq!(f.render(), "a\n\n***\n\nb\n");
    }

    #[test]
    fn test_empty_document_is_single_newline() {
        assert_eq!(Fixture::new().render(), "\n");
    }

    #[test]
    fn test_common_indent_ignores_blank_lines() {
        assert_eq!(common_indent(b"  a\n\n    b\n  \n"), 2);
        assert_eq!(common_indent(b"a\n  b\n"), 0);
        assert_eq!(common_indent(b"\n\n"), 0);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(b"   \n"));
        assert!(is_blank(b""));
        assert!(!is_blank(b" x\n"));
    }
}
