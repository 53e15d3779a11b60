//! Default render functions for inline nodes.

use mdfmt_writers::Writer;

use crate::dispatch::WalkStatus;
use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::tree::{Node, NodeKind, NodeRef};

const BACKTICK: u8 = b'`';

const ITALIC: &str = "\x1b[3m";
const BOLD: &str = "\x1b[1m";
const UNDERLINE: &str = "\x1b[4m";
const RESET: &str = "\x1b[0m";

type RenderResult = Result<WalkStatus, RenderError>;

pub(crate) fn render_strikethrough(
    _r: &Renderer<'_>,
    _w: &mut dyn Writer,
    _node: NodeRef<'_>,
    _entering: bool,
) -> RenderResult {
    Ok(WalkStatus::Continue)
}

pub(crate) fn render_auto_link(
    _r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if !entering {
        w.write_byte(b'>')?;
        return Ok(WalkStatus::Continue);
    }

    w.write_byte(b'<')?;
    if let Node::AutoLink { url } = node.value() {
        w.write_str(url)?;
    }
    Ok(WalkStatus::SkipChildren)
}

/// Code span. When the content contains a backtick one extra backtick is
/// written on both the entering and the leaving visit, giving a double
/// backtick delimiter on each side.
pub(crate) fn render_code_span(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    let content = node.first_child().map(|c| literal(r, c)).unwrap_or_default();
    let has_backtick = content.contains(&BACKTICK);
    let padded = content.first() == Some(&BACKTICK) || content.last() == Some(&BACKTICK);

    if !entering {
        if padded {
            w.write_byte(b' ')?;
        }
        if has_backtick {
            w.write_byte(BACKTICK)?;
        }
        w.write_byte(BACKTICK)?;
        return Ok(WalkStatus::Continue);
    }

    if has_backtick {
        w.write_byte(BACKTICK)?;
    }
    w.write_byte(BACKTICK)?;
    if padded {
        w.write_byte(b' ')?;
    }
    for child in node.children() {
        w.write_bytes(literal(r, child))?;
    }
    Ok(WalkStatus::SkipChildren)
}

/// Source bytes or literal value of a text-bearing leaf.
fn literal<'a>(r: &Renderer<'a>, node: NodeRef<'a>) -> &'a [u8] {
    match node.value() {
        Node::Text { segment, .. } => segment.value(r.source()),
        Node::String { value } => value.as_bytes(),
        _ => &[],
    }
}

pub(crate) fn render_emphasis(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    let level = match node.value() {
        Node::Emphasis { level } => *level,
        _ => 1,
    };

    if is_merged_delimiter(node, level, entering) {
        return Ok(WalkStatus::Continue);
    }

    let delimiter = if r.options().terminal_styling {
        match (entering, level) {
            (false, _) => RESET,
            (true, 1) => ITALIC,
            (true, 2) => BOLD,
            (true, 3) => UNDERLINE,
            (true, _) => return Err(RenderError::UnsupportedEmphasisLevel(level)),
        }
    } else {
        match level {
            1 => "*",
            2 => "**",
            _ => return Err(RenderError::UnsupportedEmphasisLevel(level)),
        }
    };
    w.write_str(delimiter)?;
    Ok(WalkStatus::Continue)
}

/// Whether this delimiter of an emphasis node would repeat one already in
/// effect.
///
/// Adjacent same-level runs share one delimiter pair: the opener is dropped
/// after a same-level previous sibling, the closer before a same-level next
/// sibling. Both are dropped when an enclosing inline node within the same
/// block already applies the level.
fn is_merged_delimiter(node: NodeRef<'_>, level: u8, entering: bool) -> bool {
    let neighbour = if entering {
        node.prev_sibling()
    } else {
        node.next_sibling()
    };
    if neighbour.is_some_and(|n| is_emphasis(n, level)) {
        return true;
    }

    node.ancestors()
        .take_while(|a| a.kind().is_inline())
        .any(|a| is_emphasis(a, level))
}

fn is_emphasis(node: NodeRef<'_>, level: u8) -> bool {
    matches!(node.value(), Node::Emphasis { level: l } if *l == level)
}

pub(crate) fn render_link(
    _r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if entering {
        w.write_byte(b'[')?;
        return Ok(WalkStatus::Continue);
    }

    if let Node::Link { destination, title } = node.value() {
        w.write_str("](")?;
        w.write_str(destination)?;
        write_title(w, title)?;
        w.write_byte(b')')?;
    }
    Ok(WalkStatus::Continue)
}

pub(crate) fn render_image(
    _r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if !entering {
        return Ok(WalkStatus::Continue);
    }

    if let Node::Image {
        destination,
        title,
        alt,
    } = node.value()
    {
        w.write_str("![")?;
        w.write_str(alt)?;
        w.write_str("](")?;
        w.write_str(destination)?;
        write_title(w, title)?;
        w.write_byte(b')')?;
    }

    if node.parent().is_none_or(|p| p.kind() == NodeKind::Document) {
        w.write_str("\n\n")?;
    }
    Ok(WalkStatus::SkipChildren)
}

fn write_title(w: &mut dyn Writer, title: &str) -> Result<(), RenderError> {
    if !title.is_empty() {
        w.write_str(" \"")?;
        w.write_str(title)?;
        w.write_byte(b'"')?;
    }
    Ok(())
}

pub(crate) fn render_raw_html(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if entering && let Node::RawHtml { segments } = node.value() {
        for segment in segments {
            w.write_bytes(segment.value(r.source()))?;
        }
    }
    Ok(WalkStatus::SkipChildren)
}

pub(crate) fn render_text(
    r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if !entering {
        return Ok(WalkStatus::Continue);
    }
    let Node::Text {
        segment,
        raw,
        soft_break,
        hard_break,
    } = node.value()
    else {
        return Ok(WalkStatus::Continue);
    };

    w.write_bytes(segment.value(r.source()))?;
    if *raw {
        return Ok(WalkStatus::Continue);
    }
    if *soft_break {
        let line_break: &[u8] = if r.options().hard_wraps && !in_text_block(node) {
            b"\n\n"
        } else {
            b"\n"
        };
        w.write_bytes(line_break)?;
    } else if *hard_break {
        let line_break: &[u8] = if in_text_block(node) { b"\n" } else { b"\n\n" };
        w.write_bytes(line_break)?;
    }
    Ok(WalkStatus::Continue)
}

/// A blank line inside a tight item would make the list loose.
fn in_text_block(node: NodeRef<'_>) -> bool {
    node.ancestors()
        .find(|a| !a.kind().is_inline())
        .is_some_and(|block| block.kind() == NodeKind::TextBlock)
}

pub(crate) fn render_string(
    _r: &Renderer<'_>,
    w: &mut dyn Writer,
    node: NodeRef<'_>,
    entering: bool,
) -> RenderResult {
    if entering {
        if let Node::String { value } = node.value() {
            w.write_str(value)?;
        }
    } else if node
        .next_sibling()
        .is_some_and(|n| n.kind() == NodeKind::List)
    {
        w.write_byte(b'\n')?;
    }
    Ok(WalkStatus::Continue)
}
