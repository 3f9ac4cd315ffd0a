#![cfg_attr(not(feature = "std"), no_std)]
#![doc = r#"
Read and write Standard MIDI Files.

A Standard MIDI File (SMF) is a sequence of chunks: one `MThd` header
chunk describing the file type and tick resolution, followed by one
`MTrk` chunk per track. Each track is a stream of delta-timed events --
channel voice messages, system-exclusive payloads, and meta events such
as tempo or time-signature changes.

This crate is a pure, synchronous codec between those bytes and a typed
representation:

```
use midifile::prelude::*;

let track = Track::new(vec![
    TrackEvent::new(0, MetaEvent::SetTempo(500_000)),
    TrackEvent::new(
        0,
        ChannelEvent::new(0, VoiceMessage::NoteOn { note: 60, velocity: 90 }),
    ),
    TrackEvent::new(
        96,
        ChannelEvent::new(0, VoiceMessage::NoteOff { note: 60, velocity: 0 }),
    ),
    TrackEvent::new(0, MetaEvent::EndOfTrack),
]);

let file = MidiFile::new(FileType::SingleTrack, 96, vec![track]).unwrap();
let bytes = file.to_bytes().unwrap();
assert_eq!(MidiFile::parse(&bytes).unwrap(), file);
```

Decoding tolerates the quirks of files found in the wild (a wrong track
count in the header, running status, oversized variable-length
integers), while encoding refuses to produce ambiguous output. SMPTE
time division is recognized and rejected; this crate only supports
metrical (ticks-per-beat) timing.
"#]

extern crate alloc;

pub mod chunk;
pub mod error;
pub mod event;
pub mod file;
pub mod reader;
pub mod running_status;
pub mod varint;

/// Commonly used types, glob-importable.
pub mod prelude {
    pub use crate::{
        chunk::{HEADER_TAG, RawChunk, TRACK_TAG},
        error::{EncodeError, EncodeResult, MalformedError, UnsupportedError},
        event::{
            ChannelEvent, EventKind, KeySignature, MetaEvent, SmpteFps, SmpteOffset, SysexEvent,
            SysexKind, TimeSignature, TrackEvent, VoiceMessage,
        },
        file::{EncodeOptions, FileType, MidiFile, Track},
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        running_status::RunningStatus,
    };
}
