#![doc = r#"
Meta events.

A meta event is `0xFF`, a type code, a variable-length payload length,
and the payload itself. The known codes and their payload shapes are
fixed by the SMF specification; unrecognized codes are preserved as
[`MetaEvent::Unknown`] so that decode-encode round trips do not lose
data. Meta events exist only inside files and are never sent over a
live MIDI wire.
"#]

use super::SmpteOffset;
use crate::{
    error::{EncodeError, EncodeResult, MalformedError},
    reader::{ReadResult, Reader},
    varint::{read_var_int, var_int_length, write_var_int},
};
use alloc::{borrow::Cow, string::String, vec::Vec};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The known meta type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
enum MetaType {
    SequenceNumber = 0x00,
    Text = 0x01,
    CopyrightNotice = 0x02,
    SequenceName = 0x03,
    InstrumentName = 0x04,
    Lyrics = 0x05,
    Marker = 0x06,
    CuePoint = 0x07,
    ProgramName = 0x08,
    DeviceName = 0x09,
    ChannelPrefix = 0x20,
    MidiPort = 0x21,
    EndOfTrack = 0x2F,
    SetTempo = 0x51,
    SmpteOffset = 0x54,
    TimeSignature = 0x58,
    KeySignature = 0x59,
    SequencerSpecific = 0x7F,
}

/// A decoded meta event.
///
/// Text-bearing variants keep the raw payload bytes rather than a
/// `String`; files in the wild carry text in arbitrary encodings, and
/// round trips must reproduce them exactly. Use [`MetaEvent::text`]
/// for a lossy UTF-8 view.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaEvent {
    /// The sequence's number within a larger collection.
    SequenceNumber(u16),
    /// Arbitrary text at an instant.
    Text(Vec<u8>),
    /// A copyright notice.
    CopyrightNotice(Vec<u8>),
    /// The name of the sequence or track.
    SequenceName(Vec<u8>),
    /// The name of the instrument on this track.
    InstrumentName(Vec<u8>),
    /// A lyric fragment.
    Lyrics(Vec<u8>),
    /// A rehearsal or section marker.
    Marker(Vec<u8>),
    /// A cue to something happening outside the music.
    CuePoint(Vec<u8>),
    /// The name of the program on this track.
    ProgramName(Vec<u8>),
    /// The name of the device this track addresses.
    DeviceName(Vec<u8>),
    /// The channel that subsequent meta events apply to (0..=15).
    ChannelPrefix(u8),
    /// The output port this track addresses (0..=127).
    MidiPort(u8),
    /// Closes a track. A well-formed track ends with one, but the
    /// codec does not insert or require it; a track chunk ends when
    /// its declared length runs out.
    EndOfTrack,
    /// Microseconds per quarter note.
    SetTempo(u32),
    /// The track's absolute starting time.
    SmpteOffset(SmpteOffset),
    /// The musical meter.
    TimeSignature(TimeSignature),
    /// The key, as a count of sharps or flats.
    KeySignature(KeySignature),
    /// Opaque data addressed to the sequencer itself.
    SequencerSpecific(Vec<u8>),
    /// An unrecognized meta code, preserved verbatim.
    Unknown {
        /// The type code.
        code: u8,
        /// The raw payload.
        data: Vec<u8>,
    },
}

impl MetaEvent {
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let code = reader.read_byte()?;
        let declared = read_var_int(reader)? as usize;
        let payload = reader.read_exact(declared)?;

        let Ok(kind) = MetaType::try_from(code) else {
            return Ok(Self::Unknown {
                code,
                data: payload.to_vec(),
            });
        };
        Ok(match kind {
            MetaType::SequenceNumber => {
                Self::SequenceNumber(u16::from_be_bytes(fixed(reader, code, payload)?))
            }
            MetaType::Text => Self::Text(payload.to_vec()),
            MetaType::CopyrightNotice => Self::CopyrightNotice(payload.to_vec()),
            MetaType::SequenceName => Self::SequenceName(payload.to_vec()),
            MetaType::InstrumentName => Self::InstrumentName(payload.to_vec()),
            MetaType::Lyrics => Self::Lyrics(payload.to_vec()),
            MetaType::Marker => Self::Marker(payload.to_vec()),
            MetaType::CuePoint => Self::CuePoint(payload.to_vec()),
            MetaType::ProgramName => Self::ProgramName(payload.to_vec()),
            MetaType::DeviceName => Self::DeviceName(payload.to_vec()),
            MetaType::ChannelPrefix => {
                let [channel] = fixed(reader, code, payload)?;
                Self::ChannelPrefix(channel)
            }
            MetaType::MidiPort => {
                let [port] = fixed(reader, code, payload)?;
                Self::MidiPort(port)
            }
            MetaType::EndOfTrack => {
                fixed::<0>(reader, code, payload)?;
                Self::EndOfTrack
            }
            MetaType::SetTempo => {
                let [high, mid, low] = fixed(reader, code, payload)?;
                Self::SetTempo(u32::from_be_bytes([0, high, mid, low]))
            }
            MetaType::SmpteOffset => Self::SmpteOffset(SmpteOffset::parse(&fixed(
                reader, code, payload,
            )?)),
            MetaType::TimeSignature => {
                Self::TimeSignature(TimeSignature::parse(reader, fixed(reader, code, payload)?)?)
            }
            MetaType::KeySignature => {
                let [accidentals, minor] = fixed(reader, code, payload)?;
                Self::KeySignature(KeySignature {
                    accidentals: accidentals as i8,
                    minor: minor != 0,
                })
            }
            MetaType::SequencerSpecific => Self::SequencerSpecific(payload.to_vec()),
        })
    }

    /// Writes the type code, payload length, and payload; the leading
    /// `0xFF` is the event codec's job.
    pub(crate) fn write_payload(&self, out: &mut Vec<u8>) -> EncodeResult<()> {
        let mut data = Vec::new();
        let code = self.encode_into(&mut data)?;
        let length =
            u32::try_from(data.len()).map_err(|_| EncodeError::PayloadTooLong(data.len()))?;
        out.push(code);
        write_var_int(length, out)?;
        out.extend_from_slice(&data);
        Ok(())
    }

    fn encode_into(&self, data: &mut Vec<u8>) -> EncodeResult<u8> {
        Ok(match self {
            Self::SequenceNumber(number) => {
                data.extend_from_slice(&number.to_be_bytes());
                MetaType::SequenceNumber.into()
            }
            Self::Text(text) => {
                data.extend_from_slice(text);
                MetaType::Text.into()
            }
            Self::CopyrightNotice(text) => {
                data.extend_from_slice(text);
                MetaType::CopyrightNotice.into()
            }
            Self::SequenceName(text) => {
                data.extend_from_slice(text);
                MetaType::SequenceName.into()
            }
            Self::InstrumentName(text) => {
                data.extend_from_slice(text);
                MetaType::InstrumentName.into()
            }
            Self::Lyrics(text) => {
                data.extend_from_slice(text);
                MetaType::Lyrics.into()
            }
            Self::Marker(text) => {
                data.extend_from_slice(text);
                MetaType::Marker.into()
            }
            Self::CuePoint(text) => {
                data.extend_from_slice(text);
                MetaType::CuePoint.into()
            }
            Self::ProgramName(text) => {
                data.extend_from_slice(text);
                MetaType::ProgramName.into()
            }
            Self::DeviceName(text) => {
                data.extend_from_slice(text);
                MetaType::DeviceName.into()
            }
            Self::ChannelPrefix(channel) => {
                data.push(*channel);
                MetaType::ChannelPrefix.into()
            }
            Self::MidiPort(port) => {
                data.push(*port);
                MetaType::MidiPort.into()
            }
            Self::EndOfTrack => MetaType::EndOfTrack.into(),
            Self::SetTempo(tempo) => {
                data.extend_from_slice(&tempo.to_be_bytes()[1..]);
                MetaType::SetTempo.into()
            }
            Self::SmpteOffset(offset) => {
                data.extend_from_slice(&offset.encode()?);
                MetaType::SmpteOffset.into()
            }
            Self::TimeSignature(signature) => {
                data.extend_from_slice(&signature.encode()?);
                MetaType::TimeSignature.into()
            }
            Self::KeySignature(signature) => {
                data.push(signature.accidentals as u8);
                data.push(signature.minor as u8);
                MetaType::KeySignature.into()
            }
            Self::SequencerSpecific(bytes) => {
                data.extend_from_slice(bytes);
                MetaType::SequencerSpecific.into()
            }
            Self::Unknown { code, data: bytes } => {
                data.extend_from_slice(bytes);
                *code
            }
        })
    }

    pub(crate) fn validate(&self) -> EncodeResult<()> {
        match self {
            Self::Text(text)
            | Self::CopyrightNotice(text)
            | Self::SequenceName(text)
            | Self::InstrumentName(text)
            | Self::Lyrics(text)
            | Self::Marker(text)
            | Self::CuePoint(text)
            | Self::ProgramName(text)
            | Self::DeviceName(text)
            | Self::SequencerSpecific(text)
            | Self::Unknown { data: text, .. } => payload_fits(text.len()),
            Self::ChannelPrefix(channel) if *channel > 15 => {
                Err(EncodeError::ChannelOutOfRange(*channel))
            }
            Self::MidiPort(port) if *port > 127 => Err(EncodeError::DataByteOutOfRange(*port)),
            Self::SetTempo(tempo) if *tempo > 0xFF_FFFF => Err(EncodeError::TempoOutOfRange(*tempo)),
            Self::SmpteOffset(offset) => offset.validate(),
            Self::TimeSignature(signature) => signature.validate(),
            _ => Ok(()),
        }
    }

    /// The payload of a text-bearing event as UTF-8, replacing invalid
    /// sequences. `None` for non-text events.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text)
            | Self::CopyrightNotice(text)
            | Self::SequenceName(text)
            | Self::InstrumentName(text)
            | Self::Lyrics(text)
            | Self::Marker(text)
            | Self::CuePoint(text)
            | Self::ProgramName(text)
            | Self::DeviceName(text) => Some(String::from_utf8_lossy(text)),
            _ => None,
        }
    }

    /// The tempo of a [`MetaEvent::SetTempo`] in beats per minute.
    pub fn beats_per_minute(&self) -> Option<f64> {
        match self {
            Self::SetTempo(micros_per_beat) => Some(60_000_000. / *micros_per_beat as f64),
            _ => None,
        }
    }
}

fn fixed<const N: usize>(reader: &Reader<'_>, code: u8, payload: &[u8]) -> ReadResult<[u8; N]> {
    if payload.len() != N {
        return Err(reader.malformed(MalformedError::MetaPayloadLength {
            code,
            declared: payload.len(),
            expected: N,
        }));
    }
    let mut array = [0; N];
    array.copy_from_slice(payload);
    Ok(array)
}

const fn payload_fits(length: usize) -> EncodeResult<()> {
    if length > crate::varint::VAR_INT_MAX as usize {
        return Err(EncodeError::PayloadTooLong(length));
    }
    Ok(())
}

/// The musical meter, as carried by the time signature meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar.
    pub numerator: u8,
    /// The beat unit. Stored on the wire as a power-of-two exponent,
    /// so encoding any other value fails.
    pub denominator: u32,
    /// MIDI clocks per metronome click.
    pub metronome: u8,
    /// Clock signals per beat, derived from the event's beat-rate byte
    /// as `192 / rate`. Values that are not `192 / n` for an integer
    /// `n` re-encode to the nearest representable rate.
    pub clock_signals_per_beat: u8,
}

impl TimeSignature {
    fn parse(reader: &Reader<'_>, bytes: [u8; 4]) -> ReadResult<Self> {
        let [numerator, exponent, metronome, rate] = bytes;
        if exponent > 31 {
            return Err(reader.malformed(MalformedError::TimeSignatureDenominator(exponent)));
        }
        if rate == 0 {
            return Err(reader.malformed(MalformedError::TimeSignatureBeatRate));
        }
        Ok(Self {
            numerator,
            denominator: 1 << exponent,
            metronome,
            clock_signals_per_beat: (192 / rate as u16) as u8,
        })
    }

    fn encode(&self) -> EncodeResult<[u8; 4]> {
        self.validate()?;
        let exponent = self.denominator.trailing_zeros() as u8;
        let rate = (192 / self.clock_signals_per_beat as u16) as u8;
        Ok([self.numerator, exponent, self.metronome, rate])
    }

    const fn validate(&self) -> EncodeResult<()> {
        if !self.denominator.is_power_of_two() {
            return Err(EncodeError::DenominatorNotPowerOfTwo(self.denominator));
        }
        if self.clock_signals_per_beat == 0 || self.clock_signals_per_beat > 192 {
            return Err(EncodeError::TimeSignatureClocks(self.clock_signals_per_beat));
        }
        Ok(())
    }
}

/// The key, as carried by the key signature meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Sharps when positive, flats when negative.
    pub accidentals: i8,
    /// Minor when true, major when false.
    pub minor: bool,
}

#[test]
fn time_signature_derivations() {
    use pretty_assertions::assert_eq;
    let reader = Reader::from_byte_slice(&[]);
    let signature = TimeSignature::parse(&reader, [6, 3, 24, 8]).unwrap();
    assert_eq!(signature.numerator, 6);
    assert_eq!(signature.denominator, 8);
    assert_eq!(signature.metronome, 24);
    assert_eq!(signature.clock_signals_per_beat, 24);
    assert_eq!(signature.encode().unwrap(), [6, 3, 24, 8]);
}

#[test]
fn time_signature_rejects_non_power_of_two() {
    use pretty_assertions::assert_eq;
    let signature = TimeSignature {
        numerator: 4,
        denominator: 6,
        metronome: 24,
        clock_signals_per_beat: 24,
    };
    assert_eq!(
        signature.encode().unwrap_err(),
        EncodeError::DenominatorNotPowerOfTwo(6)
    );
}

#[test]
fn tempo_in_beats_per_minute() {
    let event = MetaEvent::SetTempo(500_000);
    assert!((event.beats_per_minute().unwrap() - 120.0).abs() < f64::EPSILON);
    assert_eq!(MetaEvent::EndOfTrack.beats_per_minute(), None);
}
