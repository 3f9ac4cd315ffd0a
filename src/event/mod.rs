#![doc = r#"
Track events and their codec.

Every event in a track chunk is a delta time followed by one of three
families, selected by the status byte:

- `0xFF` -- a [`MetaEvent`], file-only metadata.
- `0xF0` / `0xF7` -- a [`SysexEvent`], opaque system-exclusive bytes.
- `0x80..=0xEF` -- a [`ChannelEvent`], a performance message on one of
  the 16 channels.

The remaining system status bytes (`0xF1..=0xF6`, `0xF8..=0xFE`) are
live-wire-only and never valid inside a Standard MIDI File; decoding
one fails loudly instead of guessing at a payload length.
"#]

mod channel;
pub use channel::*;

mod meta;
pub use meta::*;

mod smpte;
pub use smpte::*;

mod sysex;
pub use sysex::*;

use crate::{
    error::{EncodeError, EncodeResult, UnsupportedError},
    file::EncodeOptions,
    reader::{ReadResult, Reader},
    running_status::RunningStatus,
    varint::{read_var_int, var_int_length, write_var_int},
};
use alloc::vec::Vec;

/// One track event: a delta time and the event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    /// Ticks since the previous event in the same track.
    pub delay: u32,
    /// The event family and its payload.
    pub kind: EventKind,
}

/// The three event families a track chunk can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// File-only metadata (tempo, text, end of track, ...).
    Meta(MetaEvent),
    /// A system-exclusive payload.
    Sysex(SysexEvent),
    /// A channel voice message.
    Channel(ChannelEvent),
}

impl From<MetaEvent> for EventKind {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

impl From<SysexEvent> for EventKind {
    fn from(value: SysexEvent) -> Self {
        Self::Sysex(value)
    }
}

impl From<ChannelEvent> for EventKind {
    fn from(value: ChannelEvent) -> Self {
        Self::Channel(value)
    }
}

impl TrackEvent {
    /// An event `delay` ticks after its predecessor.
    pub fn new(delay: u32, kind: impl Into<EventKind>) -> Self {
        Self {
            delay,
            kind: kind.into(),
        }
    }

    /// Decode one event, resolving running status through `ctx`.
    pub fn read(reader: &mut Reader<'_>, ctx: &mut RunningStatus) -> ReadResult<Self> {
        let delay = read_var_int(reader)?;
        let status = ctx.resolve(reader)?;
        let kind = match status {
            0x80..=0xEF => EventKind::Channel(ChannelEvent::read(status, reader)?),
            0xF0 | 0xF7 => EventKind::Sysex(SysexEvent::read(status, reader)?),
            0xFF => EventKind::Meta(MetaEvent::read(reader)?),
            0xF1..=0xF6 => return Err(reader.unsupported(UnsupportedError::SystemCommon(status))),
            _ => return Err(reader.unsupported(UnsupportedError::SystemRealtime(status))),
        };
        Ok(Self { delay, kind })
    }

    /// Encode one event onto `out`.
    ///
    /// The event is validated in full before the first byte is emitted,
    /// so a failed encode leaves `out` untouched.
    pub fn write(
        &self,
        ctx: &mut RunningStatus,
        options: &EncodeOptions,
        out: &mut Vec<u8>,
    ) -> EncodeResult<()> {
        self.validate()?;
        write_var_int(self.delay, out)?;
        match &self.kind {
            EventKind::Channel(event) => {
                let status = event.status_byte();
                let omit = options.running_status && ctx.can_omit(status);
                ctx.observe(status);
                if !omit {
                    out.push(status);
                }
                event.write_payload(out);
            }
            EventKind::Sysex(event) => {
                let status = event.status_byte();
                ctx.observe(status);
                out.push(status);
                event.write_payload(out)?;
            }
            EventKind::Meta(event) => {
                ctx.observe(0xFF);
                out.push(0xFF);
                event.write_payload(out)?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> EncodeResult<()> {
        if var_int_length(self.delay).is_none() {
            return Err(EncodeError::VarIntOverflow(self.delay));
        }
        match &self.kind {
            EventKind::Channel(event) => event.validate(),
            EventKind::Sysex(event) => event.validate(),
            EventKind::Meta(event) => event.validate(),
        }
    }
}
