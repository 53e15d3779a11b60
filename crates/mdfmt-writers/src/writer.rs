//! The [`Writer`] capability set and sink upgrading.

use std::io;

/// A byte sink accepting bulk bytes, single bytes and strings.
///
/// Only [`write_bytes`](Writer::write_bytes) is required. Sinks with a cheaper
/// native single-byte or string path override the other two methods.
pub trait Writer {
    /// Write all of `data`, returning the number of bytes accepted.
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Write a single byte.
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write_bytes(&[byte]).map(|_| ())
    }

    /// Write a UTF-8 string, returning the number of bytes accepted.
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.write_bytes(s.as_bytes())
    }
}

impl Writer for Vec<u8> {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
        self.extend_from_slice(data);
        Ok(data.len())
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.push(byte);
        Ok(())
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
        (**self).write_bytes(data)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }

    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        (**self).write_str(s)
    }
}

impl<W: Writer + ?Sized> Writer for Box<W> {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
        (**self).write_bytes(data)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }

    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        (**self).write_str(s)
    }
}

/// An [`io::Write`] sink lifted into a [`Writer`].
///
/// Single bytes and strings are synthesized as one-slice writes through
/// [`io::Write::write_all`], so short writes never leak to the caller.
#[derive(Debug)]
pub struct Upgraded<W> {
    inner: W,
}

impl<W> Upgraded<W> {
    /// Borrow the wrapped sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Writer for Upgraded<W> {
    fn write_bytes(&mut self, data: &[u8]) -> io::Result<usize> {
        self.inner.write_all(data)?;
        Ok(data.len())
    }
}

/// Lift any [`io::Write`] sink into a [`Writer`].
///
/// Types that already implement [`Writer`] (such as `Vec<u8>` and the
/// decorators in this crate) do not need upgrading and keep their native
/// byte and string paths.
pub fn upgrade<W: io::Write>(sink: W) -> Upgraded<W> {
    Upgraded { inner: sink }
}
