//! Line-prefixing decorators.
//!
//! A prefix is emitted lazily: a forwarded newline only arms the prefix, and
//! it is written when the first byte of the following line arrives. Lines
//! that stay empty get the prefix with trailing whitespace removed (nothing at
//! all for pure indentation), so nested layouts never leave trailing spaces.

use std::io;

use crate::Writer;

/// Writes `prefix` at the start of every line after a line break.
///
/// The first line is written bare unless the writer was created with
/// [`starting_at_line_start`](Self::starting_at_line_start). This is what list
/// items want: the marker occupies the first line, continuation lines are
/// indented beneath it.
#[derive(Debug)]
pub struct PrefixWriter<W> {
    inner: W,
    prefix: Vec<u8>,
    /// Length of `prefix` with trailing whitespace removed, used for blank lines.
    blank_len: usize,
    at_line_start: bool,
}

impl<W: Writer> PrefixWriter<W> {
    /// Create a writer that prefixes every line after the first with `prefix`.
    pub fn new(inner: W, prefix: impl Into<Vec<u8>>) -> Self {
        let prefix = prefix.into();
        let blank_len = prefix
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(0, |i| i + 1);
        Self {
            inner,
            prefix,
            blank_len,
            at_line_start: false,
        }
    }

    /// Prefix the first line as well.
    #[must_use]
    pub fn starting_at_line_start(mut self) -> Self {
        self.at_line_start = true;
        self
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_prefix(&mut self, blank: bool) -> io::Result<()> {
        let len = if blank {
            self.blank_len
        } else {
            self.prefix.len()
        };
        if len > 0 {
            self.inner.write_bytes(&self.prefix[..len])?;
        }
        Ok(())
    }
}

impl<W: Writer> Writer for PrefixWriter<W> {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut rest = data;
        while !rest.is_empty() {
            if self.at_line_start {
                self.write_prefix(rest[0] == b'\n')?;
                self.at_line_start = false;
            }
            if let Some(pos) = rest.iter().position(|&b| b == b'\n') {
                self.inner.write_bytes(&rest[..=pos])?;
                self.at_line_start = true;
                rest = &rest[pos + 1..];
            } else {
                self.inner.write_bytes(rest)?;
                rest = &[];
            }
        }
        Ok(data.len())
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        if self.at_line_start {
            self.write_prefix(byte == b'\n')?;
            self.at_line_start = false;
        }
        self.inner.write_byte(byte)?;
        self.at_line_start = byte == b'\n';
        Ok(())
    }
}

/// Indents every line after a line break by `width` spaces.
///
/// Blank lines stay empty.
#[derive(Debug)]
pub struct IndentWriter<W> {
    inner: PrefixWriter<W>,
}

impl<W: Writer> IndentWriter<W> {
    /// Create a writer indenting continuation lines by `width` spaces.
    pub fn new(inner: W, width: usize) -> Self {
        Self {
            inner: PrefixWriter::new(inner, vec![b' '; width]),
        }
    }

    /// Indent the first line as well.
    #[must_use]
    pub fn starting_at_line_start(self) -> Self {
        Self {
            inner: self.inner.starting_at_line_start(),
        }
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Writer> Writer for IndentWriter<W> {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
        self.inner.write_bytes(data)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.inner.write_byte(byte)
    }
}
