//! Trailing-run trimming decorator.

use std::io;

use crate::Writer;

/// Withholds a trailing run of `trim` bytes.
///
/// Runs of the trim byte are counted instead of written. They are flushed as
/// soon as any other byte arrives, so interior runs reach the inner writer
/// unchanged. Whatever run is still pending when [`finalize`](Self::finalize)
/// is called is dropped.
#[derive(Debug)]
pub struct TrimWriter<W> {
    inner: W,
    trim: u8,
    pending: usize,
}

impl<W: Writer> TrimWriter<W> {
    /// Create a writer withholding trailing runs of `trim`.
    pub fn new(inner: W, trim: u8) -> Self {
        Self {
            inner,
            trim,
            pending: 0,
        }
    }

    /// Number of trim bytes currently withheld.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Drop the withheld run and return the inner writer.
    pub fn finalize(self) -> W {
        self.inner
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        const CHUNK: usize = 16;
        let run = [self.trim; CHUNK];
        while self.pending > 0 {
            let n = self.pending.min(CHUNK);
            self.inner.write_bytes(&run[..n])?;
            self.pending -= n;
        }
        Ok(())
    }
}

impl<W: Writer> Writer for TrimWriter<W> {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
        let body_len = data
            .iter()
            .rposition(|&b| b != self.trim)
            .map_or(0, |i| i + 1);
        if body_len > 0 {
            self.flush_pending()?;
            self.inner.write_bytes(&data[..body_len])?;
        }
        self.pending += data.len() - body_len;
        Ok(data.len())
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        if byte == self.trim {
            self.pending += 1;
            return Ok(());
        }
        self.flush_pending()?;
        self.inner.write_byte(byte)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_trailing_run_dropped_on_finalize() {
        let mut out = Vec::new();
        let mut w = TrimWriter::new(&mut out, b'\n');
        w.write_str("# Title\n\n").unwrap();
        assert_eq!(w.pending(), 2);
        w.finalize();
        assert_eq!(out, b"# Title");
    }

    #[test]
    fn test_interior_runs_are_flushed() {
        let mut out = Vec::new();
        let mut w = TrimWriter::new(&mut out, b'\n');
        w.write_str("a\n\n").unwrap();
        w.write_byte(b'\n').unwrap();
        w.write_byte(b'b').unwrap();
        w.write_str("\n").unwrap();
        w.finalize();
        assert_eq!(out, b"a\n\n\nb");
    }

    #[test]
    fn test_only_trim_bytes_writes_nothing() {
        let mut out = Vec::new();
        let mut w = TrimWriter::new(&mut out, b'\n');
        w.write_str("\n\n\n").unwrap();
        w.finalize();
        assert!(out.is_empty());
    }

    #[test]
    fn test_long_runs_flush_in_full() {
        let mut out = Vec::new();
        let mut w = TrimWriter::new(&mut out, b' ');
        w.write_str("a").unwrap();
        w.write_str(&" ".repeat(40)).unwrap();
        w.write_str("b  ").unwrap();
        w.finalize();
        assert_eq!(String::from_utf8(out).unwrap(), format!("a{}b", " ".repeat(40)));
    }

    #[test]
    fn test_nested_trim_writers() {
        let mut out = Vec::new();
        let mut outer = TrimWriter::new(&mut out, b'\n');
        {
            let mut inner = TrimWriter::new(&mut outer, b'\n');
            inner.write_str("quote\n\n").unwrap();
            inner.finalize();
        }
        outer.write_str("\n\nnext\n").unwrap();
        outer.finalize();
        assert_eq!(out, b"quote\n\nnext");
    }
}
