use crate::{
    chunk::{RawChunk, TRACK_TAG, write_chunk},
    error::{EncodeResult, MalformedError},
    event::TrackEvent,
    file::EncodeOptions,
    reader::{ReadResult, Reader, ReaderError},
    running_status::RunningStatus,
};
use alloc::vec::Vec;

#[doc = r#"
One track: an ordered sequence of delta-timed events.

A track decodes from and encodes to one `MTrk` chunk. Decoding is
bounded by the chunk's declared length, not by an end-of-track marker:
events are read until the payload runs out, and a well-formed file's
final event happens to be [`MetaEvent::EndOfTrack`](crate::event::MetaEvent::EndOfTrack).
Each pass gets its own [`RunningStatus`] context; status never leaks
between tracks.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Track {
    /// A track over the given events.
    pub const fn new(events: Vec<TrackEvent>) -> Self {
        Self { events }
    }

    /// The track's events in file order.
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Append an event.
    pub fn push(&mut self, event: TrackEvent) {
        self.events.push(event);
    }

    /// Consume the track, yielding its events.
    pub fn into_events(self) -> Vec<TrackEvent> {
        self.events
    }

    /// Decode one `MTrk` chunk.
    ///
    /// A chunk with any other tag is a malformed file, not a track.
    pub fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let start = reader.buffer_position();
        let chunk = RawChunk::read(reader)?;
        if chunk.tag != TRACK_TAG {
            return Err(ReaderError::new(
                start,
                MalformedError::ExpectedTrackChunk { found: chunk.tag }.into(),
            ));
        }

        let mut events = Vec::new();
        // payload begins past the 8-byte chunk envelope
        let mut data = Reader::with_base(chunk.payload, start + 8);
        let mut ctx = RunningStatus::new();
        while data.remaining() > 0 {
            events.push(TrackEvent::read(&mut data, &mut ctx)?);
        }
        Ok(Self { events })
    }

    /// Encode this track as an `MTrk` chunk onto `out`.
    pub fn write(&self, options: &EncodeOptions, out: &mut Vec<u8>) -> EncodeResult<()> {
        let mut payload = Vec::new();
        let mut ctx = RunningStatus::new();
        for event in &self.events {
            event.write(&mut ctx, options, &mut payload)?;
        }
        write_chunk(TRACK_TAG, &payload, out)
    }

    /// Encode this track on its own, with default options.
    pub fn to_bytes(&self) -> EncodeResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&EncodeOptions::default(), &mut out)?;
        Ok(out)
    }
}

impl From<Vec<TrackEvent>> for Track {
    fn from(events: Vec<TrackEvent>) -> Self {
        Self::new(events)
    }
}

impl FromIterator<TrackEvent> for Track {
    fn from_iter<I: IntoIterator<Item = TrackEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
