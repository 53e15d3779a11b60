//! Canonical markdown renderer over a typed document tree.
//!
//! This crate turns a parsed markdown document back into markdown text with a
//! single canonical layout. Rendering is deterministic and idempotent:
//! formatting already formatted output returns it unchanged.
//!
//! # Architecture
//!
//! - [`Tree`]: arena of typed nodes whose text points into the source bytes
//! - [`render`]: front matter, then a depth-first walk of the tree, then one
//!   trailing newline
//! - [`NodeRenderFns`]: per-kind overrides of the built-in render functions
//! - [`CodeFormatter`]: hook formatting fenced code and HTML blocks by language
//! - [`parse_markdown`]: builds a [`Tree`] from `pulldown-cmark` events
//!
//! Every render function receives the entering and leaving event of its node
//! and writes into a [`Writer`](mdfmt_writers::Writer). Nested layouts
//! (list item indentation, blockquote markers) narrow the writer for the
//! node's children instead of tracking column state.
//!
//! # Example
//!
//! ```
//! use mdfmt_renderer::{MarkdownFormatter, NodeKind, NodeRenderFns, WalkStatus};
//!
//! // Render thematic breaks as dashes instead of asterisks.
//! let overrides = NodeRenderFns::new().with(NodeKind::ThematicBreak, |_, w, _, entering| {
//!     w.write_str(if entering { "---" } else { "\n\n" })?;
//!     Ok(WalkStatus::Continue)
//! });
//!
//! let out = MarkdownFormatter::new()
//!     .with_overrides(overrides)
//!     .format("above\n\n* * *\n\nbelow\n")
//!     .unwrap();
//! assert_eq!(out, b"above\n\n---\n\nbelow\n");
//! ```

mod blocks;
mod code_block;
mod dispatch;
mod error;
#[cfg(test)]
mod fixture;
mod front_matter;
mod inlines;
mod parse;
mod renderer;
mod tree;

pub use code_block::{CodeFormatter, FormatResult, PassThroughFormatter};
pub use dispatch::{NodeRenderFn, NodeRenderFns, WalkStatus, default_fn};
pub use error::{FormatError, ParseError, RenderError};
pub use parse::{ParsedDocument, parse_markdown, parser_options};
pub use renderer::{MarkdownFormatter, RenderOptions, Renderer, format_markdown, render};
pub use tree::{Node, NodeId, NodeKind, NodeRef, Segment, Tree};
