//! Layered byte writers for markdown output.
//!
//! The renderer never formats into a single flat buffer. Instead it stacks
//! small stateful decorators over one sink and lets each layer handle a single
//! layout concern:
//!
//! - [`Writer`]: the capability set every layer exposes (bytes, single byte, string)
//! - [`upgrade`]: lifts any [`std::io::Write`] sink into a [`Writer`]
//! - [`IndentWriter`]: indents every line after the first by a fixed width
//! - [`PrefixWriter`]: prefixes lines with an arbitrary marker such as `> `
//! - [`TrimWriter`]: withholds a trailing run of one byte until more content arrives
//!
//! # Example
//!
//! ```
//! use mdfmt_writers::{IndentWriter, TrimWriter, Writer};
//!
//! let mut out = Vec::new();
//! let mut trim = TrimWriter::new(&mut out, b'\n');
//! {
//!     let mut item = IndentWriter::new(&mut trim, 2);
//!     item.write_str("- first\nsecond\n\n\n").unwrap();
//! }
//! trim.finalize();
//!
//! assert_eq!(out, b"- first\n  second");
//! ```

mod prefix;
mod trim;
mod writer;

pub use prefix::{IndentWriter, PrefixWriter};
pub use trim::TrimWriter;
pub use writer::{Upgraded, Writer, upgrade};
