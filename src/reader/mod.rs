#![doc = r#"
A position-tracked cursor over a byte buffer.

Every decode operation in this crate runs through a [`Reader`]: a view
over a borrowed slice that hands out bytes, fixed-size arrays, and
sub-slices with bounds checking, and that remembers the offset of the
last read so errors can report where in the buffer they happened.

The codec assumes random-access, length-known buffers; callers that
stream bytes incrementally are responsible for buffering a complete
file (or at least complete chunks) before decoding.
"#]

mod error;
pub use error::*;

use crate::error::{MalformedError, UnsupportedError};

/// A bounds-checked cursor over a borrowed byte buffer.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
    base: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over a byte slice, positioned at its start.
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            base: 0,
        }
    }

    /// A reader over a sub-slice that reports positions relative to
    /// the buffer the slice was cut from.
    pub(crate) const fn with_base(bytes: &'a [u8], base: usize) -> Self {
        Self {
            bytes,
            position: 0,
            base,
        }
    }

    /// The offset of the next unread byte.
    ///
    /// For a reader over a chunk payload this is the offset within the
    /// enclosing file, so error positions stay meaningful.
    pub const fn buffer_position(&self) -> usize {
        self.base + self.position
    }

    /// The number of bytes left to read.
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> ReadResult<u8> {
        let Some(byte) = self.bytes.get(self.position) else {
            return Err(self.malformed(MalformedError::UnexpectedEof));
        };
        self.position += 1;
        Ok(*byte)
    }

    /// Read `count` bytes as a sub-slice, advancing past them.
    pub fn read_exact(&mut self, count: usize) -> ReadResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| self.malformed(MalformedError::UnexpectedEof))?;
        let slice = &self.bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Read a fixed-size array of bytes.
    pub fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_exact(N)?;
        let mut array = [0; N];
        array.copy_from_slice(slice);
        Ok(array)
    }

    /// Un-read the last byte.
    ///
    /// Used when a peeked byte turns out to belong to the next field, as
    /// with the first data byte of a running-status event.
    pub fn step_back(&mut self) {
        debug_assert!(self.position > 0);
        self.position = self.position.saturating_sub(1);
    }

    /// A [`MalformedError`] positioned at the current offset.
    pub fn malformed(&self, error: MalformedError) -> ReaderError {
        ReaderError::new(self.buffer_position(), error.into())
    }

    /// An [`UnsupportedError`] positioned at the current offset.
    pub fn unsupported(&self, error: UnsupportedError) -> ReaderError {
        ReaderError::new(self.buffer_position(), error.into())
    }
}

#[test]
fn reads_advance_and_bound() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[1, 2, 3, 4]);
    assert_eq!(reader.read_byte().unwrap(), 1);
    assert_eq!(reader.read_array::<2>().unwrap(), [2, 3]);
    assert_eq!(reader.buffer_position(), 3);
    assert_eq!(reader.remaining(), 1);

    let err = reader.read_exact(2).unwrap_err();
    assert_eq!(err.position(), 3);
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::Malformed(MalformedError::UnexpectedEof)
    ));
}

#[test]
fn step_back_rereads() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x42]);
    assert_eq!(reader.read_byte().unwrap(), 0x42);
    reader.step_back();
    assert_eq!(reader.read_byte().unwrap(), 0x42);
}
