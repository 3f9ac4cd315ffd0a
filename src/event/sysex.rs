#![doc = r#"
System-exclusive events.

Inside a file, a sysex event is its status byte (`0xF0` or `0xF7`), a
variable-length payload length, and that many raw bytes. The payload
is manufacturer-defined and opaque to this crate; it is preserved
verbatim, including any trailing `0xF7` terminator the file carries.
"#]

use crate::{
    error::{EncodeError, EncodeResult},
    reader::{ReadResult, Reader},
    varint::{VAR_INT_MAX, read_var_int, write_var_int},
};
use alloc::vec::Vec;

/// The two framings a sysex event can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SysexKind {
    /// `0xF0`: opens a system-exclusive transmission.
    Start,
    /// `0xF7`: continues a split transmission, or escapes arbitrary
    /// bytes to be sent as-is.
    Continuation,
}

/// A system-exclusive payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysexEvent {
    /// Which delimiter introduced the payload.
    pub kind: SysexKind,
    /// The raw payload bytes.
    pub data: Vec<u8>,
}

impl SysexEvent {
    /// A sysex event with the given framing.
    pub const fn new(kind: SysexKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// Decode the length-prefixed payload following `status`.
    pub(crate) fn read(status: u8, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let kind = if status == 0xF0 {
            SysexKind::Start
        } else {
            SysexKind::Continuation
        };
        let length = read_var_int(reader)? as usize;
        let data = reader.read_exact(length)?.to_vec();
        Ok(Self { kind, data })
    }

    /// The status byte this event encodes to.
    pub const fn status_byte(&self) -> u8 {
        match self.kind {
            SysexKind::Start => 0xF0,
            SysexKind::Continuation => 0xF7,
        }
    }

    /// Write the length and payload; the status byte is the event
    /// codec's job.
    pub(crate) fn write_payload(&self, out: &mut Vec<u8>) -> EncodeResult<()> {
        let length =
            u32::try_from(self.data.len()).map_err(|_| EncodeError::PayloadTooLong(self.data.len()))?;
        write_var_int(length, out)?;
        out.extend_from_slice(&self.data);
        Ok(())
    }

    pub(crate) const fn validate(&self) -> EncodeResult<()> {
        if self.data.len() > VAR_INT_MAX as usize {
            return Err(EncodeError::PayloadTooLong(self.data.len()));
        }
        Ok(())
    }
}

#[test]
fn start_and_continuation_round_trip() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x03, 0x43, 0x12, 0xF7]);
    let event = SysexEvent::read(0xF0, &mut reader).unwrap();
    assert_eq!(event.kind, SysexKind::Start);
    assert_eq!(event.data, [0x43, 0x12, 0xF7]);

    let mut out = Vec::new();
    event.write_payload(&mut out).unwrap();
    assert_eq!(out, [0x03, 0x43, 0x12, 0xF7]);

    let mut reader = Reader::from_byte_slice(&[0x01, 0x55]);
    let event = SysexEvent::read(0xF7, &mut reader).unwrap();
    assert_eq!(event.kind, SysexKind::Continuation);
    assert_eq!(event.status_byte(), 0xF7);
}
