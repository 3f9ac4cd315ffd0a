#![doc = r#"
The error taxonomy of the codec.

Three failure classes exist, and all of them are terminal for the call
that raised them -- the codec never skips bad input or returns a
partially decoded value:

- [`MalformedError`]: the bytes do not form a structurally valid file.
- [`UnsupportedError`]: the bytes are recognized, but describe a feature
  this crate does not implement.
- [`EncodeError`]: an in-memory value cannot be serialized because one of
  its fields is outside the legal range for the wire format.

Decode-side errors are wrapped with the byte offset at which they were
raised; see [`ReaderError`](crate::reader::ReaderError).
"#]

use thiserror::Error;

/// A structural decode failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MalformedError {
    /// The buffer does not begin with a well-formed `MThd` chunk.
    #[error("not a MIDI file")]
    NotAMidiFile,
    /// A chunk after the header carried a tag other than `MTrk`.
    #[error("expected a track chunk, found tag {found:?}")]
    ExpectedTrackChunk {
        /// The tag that was found instead.
        found: [u8; 4],
    },
    /// A read ran past the end of the buffer or chunk payload.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A data byte appeared where a status byte was required, with no
    /// prior status in effect for this track.
    #[error("no previous status to reuse")]
    OrphanRunningStatus,
    /// The header declared a file type outside 0..=2.
    #[error("unknown file type {0}")]
    UnknownFileType(u16),
    /// A meta event declared a payload length that does not match its
    /// fixed payload shape.
    #[error("meta event {code:#04X} declared {declared} payload bytes, expected {expected}")]
    MetaPayloadLength {
        /// The meta type code.
        code: u8,
        /// The length declared in the stream.
        declared: usize,
        /// The length the payload shape requires.
        expected: usize,
    },
    /// A time signature carried a denominator exponent too large to
    /// represent.
    #[error("time signature denominator exponent {0} out of range")]
    TimeSignatureDenominator(u8),
    /// A time signature carried a beat-rate byte of zero.
    #[error("time signature beat rate byte of zero")]
    TimeSignatureBeatRate,
}

/// Recognized input that this crate deliberately does not implement.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedError {
    /// The header's time division has bit 15 set.
    #[error("SMPTE time division unsupported")]
    SmpteTimeDivision,
    /// A system common status byte (0xF1..=0xF6) appeared in a track.
    #[error("system common status byte {0:#04X} unsupported in MIDI files")]
    SystemCommon(u8),
    /// A system real-time status byte (0xF8..=0xFE) appeared in a track.
    #[error("system real-time status byte {0:#04X} unsupported in MIDI files")]
    SystemRealtime(u8),
}

/// An in-memory value that cannot be serialized.
///
/// Raised before any bytes are emitted for the offending event, so a
/// failed encode never leaves a half-written buffer behind.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// A delta time or payload length exceeds the 28-bit domain of a
    /// variable-length integer.
    #[error("variable-length value {0:#X} exceeds 28 bits")]
    VarIntOverflow(u32),
    /// A payload is too large for the wire format's length field.
    #[error("payload of {0} bytes does not fit a variable-length integer")]
    PayloadTooLong(usize),
    /// A chunk payload is too large for the 4-byte chunk length field.
    #[error("chunk payload of {0} bytes exceeds the u32 length field")]
    ChunkTooLong(usize),
    /// A single-track file was given more than one track.
    #[error("single-track file with {0} tracks")]
    SingleTrackWithMultipleTracks(usize),
    /// A file was given more tracks than the header's count field holds.
    #[error("{0} tracks exceed the u16 header field")]
    TooManyTracks(usize),
    /// The tick resolution is outside the metrical domain.
    #[error("ticks per beat {0} outside 1..=32767")]
    TicksPerBeatOutOfRange(u16),
    /// A channel number does not fit the status byte's low nibble.
    #[error("channel {0} out of range 0..=15")]
    ChannelOutOfRange(u8),
    /// A data byte has its top bit set.
    #[error("data byte {0} out of range 0..=127")]
    DataByteOutOfRange(u8),
    /// A pitch bend is outside the signed 14-bit domain.
    #[error("pitch bend {0} outside -8192..=8191")]
    PitchBendOutOfRange(i16),
    /// A tempo does not fit its 3-byte field.
    #[error("tempo of {0} microseconds per beat exceeds 24 bits")]
    TempoOutOfRange(u32),
    /// A time signature denominator cannot be re-encoded as an exponent.
    #[error("time signature denominator {0} is not a power of two")]
    DenominatorNotPowerOfTwo(u32),
    /// A time signature clock rate would encode to a zero byte.
    #[error("time signature clock signals per beat {0} out of range 1..=192")]
    TimeSignatureClocks(u8),
    /// An SMPTE offset hour above 23.
    #[error("SMPTE offset hour {0} out of range")]
    SmpteHour(u8),
    /// An SMPTE offset minute above 59.
    #[error("SMPTE offset minute {0} out of range")]
    SmpteMinute(u8),
    /// An SMPTE offset second above 59.
    #[error("SMPTE offset second {0} out of range")]
    SmpteSecond(u8),
    /// An SMPTE offset frame not below the frame rate.
    #[error("SMPTE offset frame {0} out of range")]
    SmpteFrame(u8),
    /// An SMPTE offset subframe above 99.
    #[error("SMPTE offset subframe {0} out of range")]
    SmpteSubframe(u8),
}

/// The encode result type (see [`EncodeError`]).
pub type EncodeResult<T> = Result<T, EncodeError>;
