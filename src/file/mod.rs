#![doc = r#"
The file codec: a [`MidiFile`] and its byte representation.

A file is one `MThd` header chunk -- file type, track count, time
division -- followed by one `MTrk` chunk per track. Decoding trusts
the chunks actually present over the header's declared track count,
which files in the wild routinely get wrong; encoding writes the real
count. SMPTE time division (header bit 15 set) is rejected loudly:
this crate only represents metrical, ticks-per-beat files.
"#]

mod format;
pub use format::*;

mod track;
pub use track::*;

use crate::{
    chunk::{HEADER_TAG, RawChunk, write_chunk},
    error::{EncodeError, EncodeResult, MalformedError, UnsupportedError},
    reader::{ReadResult, Reader, ReaderError},
};
use alloc::{vec, vec::Vec};

/// Encode-side policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Omit the status byte of a channel event when it repeats the
    /// previous one. On by default; turn it off to produce output for
    /// consumers that cannot track running status.
    pub running_status: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            running_status: true,
        }
    }
}

#[doc = r#"
A decoded Standard MIDI File.

Construction through [`MidiFile::new`] enforces the invariants the
encoder relies on: a metrical tick resolution in 1..=32767, and at
most one track for a [`FileType::SingleTrack`] file.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    file_type: FileType,
    ticks_per_beat: u16,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Build a file, validating the cross-field invariants.
    pub fn new(file_type: FileType, ticks_per_beat: u16, tracks: Vec<Track>) -> EncodeResult<Self> {
        if file_type == FileType::SingleTrack && tracks.len() > 1 {
            return Err(EncodeError::SingleTrackWithMultipleTracks(tracks.len()));
        }
        if ticks_per_beat == 0 || ticks_per_beat > 0x7FFF {
            return Err(EncodeError::TicksPerBeatOutOfRange(ticks_per_beat));
        }
        Ok(Self {
            file_type,
            ticks_per_beat,
            tracks,
        })
    }

    /// The declared file type.
    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    /// The tick resolution of every delta time in the file.
    pub const fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    /// The tracks in file order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Mutable access to the tracks.
    ///
    /// Edits can break the single-track invariant; the encoder
    /// re-checks it and fails rather than truncating.
    pub fn tracks_mut(&mut self) -> &mut Vec<Track> {
        &mut self.tracks
    }

    /// Consume the file, yielding its tracks.
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    /// Decode a complete file from a byte buffer.
    ///
    /// The buffer must start with the header chunk and contain nothing
    /// but track chunks after it. The header's track count is ignored
    /// in favor of the chunks actually present; a
    /// [`FileType::SingleTrack`] file that nevertheless carries extra
    /// tracks is truncated to its first.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);

        // anything short of a well-formed MThd is not ours to decode
        let header = RawChunk::read(&mut reader)
            .ok()
            .filter(|chunk| chunk.tag == HEADER_TAG && chunk.payload.len() >= 6)
            .ok_or_else(|| ReaderError::new(0, MalformedError::NotAMidiFile.into()))?;

        let mut head = Reader::with_base(header.payload, 8);
        let raw_type = u16::from_be_bytes(head.read_array()?);
        let file_type = FileType::try_from(raw_type)
            .map_err(|_| head.malformed(MalformedError::UnknownFileType(raw_type)))?;
        let _track_count_hint = u16::from_be_bytes(head.read_array()?);
        let division = u16::from_be_bytes(head.read_array()?);
        if division & 0x8000 != 0 {
            return Err(head.unsupported(UnsupportedError::SmpteTimeDivision));
        }
        let ticks_per_beat = division & 0x7FFF;

        let mut tracks = Vec::new();
        while reader.remaining() > 0 {
            tracks.push(Track::read(&mut reader)?);
        }
        if file_type == FileType::SingleTrack {
            tracks.truncate(1);
        }

        Ok(Self {
            file_type,
            ticks_per_beat,
            tracks,
        })
    }

    /// Encode the file with default options.
    pub fn to_bytes(&self) -> EncodeResult<Vec<u8>> {
        self.encode_with(&EncodeOptions::default())
    }

    /// Encode the file.
    ///
    /// Unlike decoding, encoding refuses to produce an ambiguous file:
    /// a [`FileType::SingleTrack`] file with more than one track is an
    /// error rather than a silent truncation.
    pub fn encode_with(&self, options: &EncodeOptions) -> EncodeResult<Vec<u8>> {
        if self.file_type == FileType::SingleTrack && self.tracks.len() > 1 {
            return Err(EncodeError::SingleTrackWithMultipleTracks(self.tracks.len()));
        }
        if self.ticks_per_beat == 0 || self.ticks_per_beat > 0x7FFF {
            return Err(EncodeError::TicksPerBeatOutOfRange(self.ticks_per_beat));
        }
        let track_count = u16::try_from(self.tracks.len())
            .map_err(|_| EncodeError::TooManyTracks(self.tracks.len()))?;

        let file_code: u16 = self.file_type.into();
        let mut header = [0u8; 6];
        header[0..2].copy_from_slice(&file_code.to_be_bytes());
        header[2..4].copy_from_slice(&track_count.to_be_bytes());
        header[4..6].copy_from_slice(&self.ticks_per_beat.to_be_bytes());

        let mut out = Vec::new();
        write_chunk(HEADER_TAG, &header, &mut out)?;
        for track in &self.tracks {
            track.write(options, &mut out)?;
        }
        Ok(out)
    }
}

#[cfg(feature = "std")]
impl MidiFile {
    /// Read and decode the file at `path`.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Encode the file with default options and write it to `path`.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let bytes = self
            .to_bytes()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        std::fs::write(path, bytes)
    }
}

#[test]
fn header_fields_round_trip() {
    use crate::event::{MetaEvent, TrackEvent};
    use pretty_assertions::assert_eq;

    let track = Track::new(vec![TrackEvent::new(0, MetaEvent::EndOfTrack)]);
    let file = MidiFile::new(FileType::SyncTracks, 480, vec![track.clone(), track]).unwrap();
    let bytes = file.to_bytes().unwrap();

    assert_eq!(&bytes[0..4], *b"MThd");
    assert_eq!(&bytes[4..8], [0, 0, 0, 6]);
    assert_eq!(&bytes[8..10], [0, 1]);
    assert_eq!(&bytes[10..12], [0, 2]);
    assert_eq!(&bytes[12..14], [0x01, 0xE0]);

    let parsed = MidiFile::parse(&bytes).unwrap();
    assert_eq!(parsed, file);
}

#[test]
fn invalid_construction_is_rejected() {
    use pretty_assertions::assert_eq;

    let err = MidiFile::new(
        FileType::SingleTrack,
        96,
        vec![Track::default(), Track::default()],
    )
    .unwrap_err();
    assert_eq!(err, EncodeError::SingleTrackWithMultipleTracks(2));

    let err = MidiFile::new(FileType::SyncTracks, 0, vec![]).unwrap_err();
    assert_eq!(err, EncodeError::TicksPerBeatOutOfRange(0));

    let err = MidiFile::new(FileType::SyncTracks, 0x8000, vec![]).unwrap_err();
    assert_eq!(err, EncodeError::TicksPerBeatOutOfRange(0x8000));
}
