#![doc = r#"
The chunk envelope shared by every part of a MIDI file.

A chunk is a 4-byte ASCII tag, a 4-byte big-endian payload length, and
exactly that many payload bytes. The header chunk (`MThd`) and track
chunks (`MTrk`) both use this framing; the framer itself does not
interpret the tag, so callers compare it against the tag they expect.
"#]

use crate::{
    error::{EncodeError, EncodeResult},
    reader::{ReadResult, Reader},
};
use alloc::vec::Vec;

/// The tag of the header chunk.
pub const HEADER_TAG: [u8; 4] = *b"MThd";
/// The tag of a track chunk.
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

/// One undecoded chunk: its tag and a borrowed view of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    /// The 4-byte ASCII tag.
    pub tag: [u8; 4],
    /// The payload, exactly as long as the chunk declared.
    pub payload: &'a [u8],
}

impl<'a> RawChunk<'a> {
    /// Read one chunk, advancing the reader past its payload.
    pub fn read(reader: &mut Reader<'a>) -> ReadResult<Self> {
        let tag = reader.read_array::<4>()?;
        let length = u32::from_be_bytes(reader.read_array::<4>()?);
        let payload = reader.read_exact(length as usize)?;
        Ok(Self { tag, payload })
    }
}

/// Write one chunk: tag, big-endian payload length, then the payload.
pub fn write_chunk(tag: [u8; 4], payload: &[u8], out: &mut Vec<u8>) -> EncodeResult<()> {
    let length =
        u32::try_from(payload.len()).map_err(|_| EncodeError::ChunkTooLong(payload.len()))?;
    out.extend_from_slice(&tag);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

#[test]
fn frames_round_trip() {
    use pretty_assertions::assert_eq;
    let mut bytes = Vec::new();
    write_chunk(TRACK_TAG, &[0xAA, 0xBB, 0xCC], &mut bytes).unwrap();
    assert_eq!(bytes, [b'M', b'T', b'r', b'k', 0, 0, 0, 3, 0xAA, 0xBB, 0xCC]);

    let mut reader = Reader::from_byte_slice(&bytes);
    let chunk = RawChunk::read(&mut reader).unwrap();
    assert_eq!(chunk.tag, TRACK_TAG);
    assert_eq!(chunk.payload, [0xAA, 0xBB, 0xCC]);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn truncated_payload_is_an_error() {
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 9, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);
    assert!(RawChunk::read(&mut reader).is_err());
}
