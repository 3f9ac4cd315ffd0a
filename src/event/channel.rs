#![doc = r#"
Channel voice events.

A channel event's status byte carries the message type in its high
nibble and the channel number in its low nibble; the payload is one or
two data bytes whose meaning is fixed per type. These are the events a
live MIDI output understands, and the only events that participate in
running status.
"#]

use crate::{
    error::{EncodeError, EncodeResult},
    reader::{ReadResult, Reader},
};
use alloc::vec::Vec;

/// A performance event scoped to one of the 16 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    /// The channel (0..=15).
    pub channel: u8,
    /// The message and its data.
    pub message: VoiceMessage,
}

/// The seven channel voice message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceMessage {
    /// Stop a note.
    NoteOff {
        /// The key to release.
        note: u8,
        /// The release velocity.
        velocity: u8,
    },
    /// Start a note.
    ///
    /// By convention a `NoteOn` with velocity 0 means `NoteOff`.
    NoteOn {
        /// The key to press.
        note: u8,
        /// How hard to press it.
        velocity: u8,
    },
    /// Change the pressure on a held note.
    NoteAftertouch {
        /// The held key.
        note: u8,
        /// The new pressure.
        pressure: u8,
    },
    /// Change a controller's value.
    Controller {
        /// The controller index.
        controller: u8,
        /// The new value.
        value: u8,
    },
    /// Change the channel's program (instrument).
    ProgramChange {
        /// The new program number.
        program: u8,
    },
    /// Change the pressure on the whole channel.
    ChannelAftertouch {
        /// The new pressure.
        pressure: u8,
    },
    /// Bend the channel's pitch.
    PitchBend {
        /// The bend, centered on 0 (-8192..=8191).
        value: i16,
    },
}

impl ChannelEvent {
    /// A message on `channel`.
    pub const fn new(channel: u8, message: VoiceMessage) -> Self {
        Self { channel, message }
    }

    /// Decode the data bytes following `status` (0x80..=0xEF).
    pub(crate) fn read(status: u8, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let channel = status & 0x0F;
        let message = match status >> 4 {
            0x8 => {
                let [note, velocity] = reader.read_array()?;
                VoiceMessage::NoteOff { note, velocity }
            }
            0x9 => {
                let [note, velocity] = reader.read_array()?;
                VoiceMessage::NoteOn { note, velocity }
            }
            0xA => {
                let [note, pressure] = reader.read_array()?;
                VoiceMessage::NoteAftertouch { note, pressure }
            }
            0xB => {
                let [controller, value] = reader.read_array()?;
                VoiceMessage::Controller { controller, value }
            }
            0xC => {
                let program = reader.read_byte()?;
                VoiceMessage::ProgramChange { program }
            }
            0xD => {
                let pressure = reader.read_byte()?;
                VoiceMessage::ChannelAftertouch { pressure }
            }
            _ => {
                // 0xE; the dispatcher only passes channel statuses here
                let [lsb, msb] = reader.read_array()?;
                let raw = ((msb & 0x7F) as i16) << 7 | (lsb & 0x7F) as i16;
                VoiceMessage::PitchBend { value: raw - 8192 }
            }
        };
        Ok(Self { channel, message })
    }

    /// The status byte this event encodes to.
    pub const fn status_byte(&self) -> u8 {
        self.message.status_nibble() << 4 | (self.channel & 0x0F)
    }

    /// Write the data bytes, not including the status byte.
    pub(crate) fn write_payload(&self, out: &mut Vec<u8>) {
        match self.message {
            VoiceMessage::NoteOff { note, velocity } => out.extend_from_slice(&[note, velocity]),
            VoiceMessage::NoteOn { note, velocity } => out.extend_from_slice(&[note, velocity]),
            VoiceMessage::NoteAftertouch { note, pressure } => {
                out.extend_from_slice(&[note, pressure])
            }
            VoiceMessage::Controller { controller, value } => {
                out.extend_from_slice(&[controller, value])
            }
            VoiceMessage::ProgramChange { program } => out.push(program),
            VoiceMessage::ChannelAftertouch { pressure } => out.push(pressure),
            VoiceMessage::PitchBend { value } => {
                let biased = (value + 8192) as u16;
                out.extend_from_slice(&[(biased & 0x7F) as u8, (biased >> 7) as u8]);
            }
        }
    }

    pub(crate) fn validate(&self) -> EncodeResult<()> {
        if self.channel > 15 {
            return Err(EncodeError::ChannelOutOfRange(self.channel));
        }
        self.message.validate()
    }

    /// The self-contained wire form of this event: status byte plus
    /// data bytes, as a live MIDI output expects them.
    ///
    /// Wire messages never use running status.
    pub fn to_wire(&self) -> EncodeResult<Vec<u8>> {
        self.validate()?;
        let mut bytes = Vec::with_capacity(3);
        bytes.push(self.status_byte());
        self.write_payload(&mut bytes);
        Ok(bytes)
    }
}

impl VoiceMessage {
    /// The high nibble of the status byte for this message type.
    pub(crate) const fn status_nibble(&self) -> u8 {
        match self {
            Self::NoteOff { .. } => 0x8,
            Self::NoteOn { .. } => 0x9,
            Self::NoteAftertouch { .. } => 0xA,
            Self::Controller { .. } => 0xB,
            Self::ProgramChange { .. } => 0xC,
            Self::ChannelAftertouch { .. } => 0xD,
            Self::PitchBend { .. } => 0xE,
        }
    }

    fn validate(&self) -> EncodeResult<()> {
        match *self {
            Self::NoteOff { note: a, velocity: b }
            | Self::NoteOn { note: a, velocity: b }
            | Self::NoteAftertouch { note: a, pressure: b }
            | Self::Controller {
                controller: a,
                value: b,
            } => {
                data_byte(a)?;
                data_byte(b)
            }
            Self::ProgramChange { program: a } | Self::ChannelAftertouch { pressure: a } => {
                data_byte(a)
            }
            Self::PitchBend { value } => {
                if value < -8192 || value > 8191 {
                    return Err(EncodeError::PitchBendOutOfRange(value));
                }
                Ok(())
            }
        }
    }
}

const fn data_byte(byte: u8) -> EncodeResult<()> {
    if byte > 127 {
        return Err(EncodeError::DataByteOutOfRange(byte));
    }
    Ok(())
}

#[test]
fn pitch_bend_bias() {
    use pretty_assertions::assert_eq;
    // 0x00 0x40 is the centered 14-bit value 0x2000
    let mut reader = Reader::from_byte_slice(&[0x00, 0x40]);
    let event = ChannelEvent::read(0xE3, &mut reader).unwrap();
    assert_eq!(event.channel, 3);
    assert_eq!(event.message, VoiceMessage::PitchBend { value: 0 });

    let mut out = Vec::new();
    event.write_payload(&mut out);
    assert_eq!(out, [0x00, 0x40]);
}

#[test]
fn pitch_bend_extremes() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x00, 0x00, 0x7F, 0x7F]);
    let low = ChannelEvent::read(0xE0, &mut reader).unwrap();
    let high = ChannelEvent::read(0xE0, &mut reader).unwrap();
    assert_eq!(low.message, VoiceMessage::PitchBend { value: -8192 });
    assert_eq!(high.message, VoiceMessage::PitchBend { value: 8191 });
}

#[test]
fn wire_bytes_are_self_contained() {
    use pretty_assertions::assert_eq;
    let event = ChannelEvent::new(
        9,
        VoiceMessage::NoteOn {
            note: 38,
            velocity: 100,
        },
    );
    assert_eq!(event.to_wire().unwrap(), [0x99, 38, 100]);

    let event = ChannelEvent::new(0, VoiceMessage::ProgramChange { program: 41 });
    assert_eq!(event.to_wire().unwrap(), [0xC0, 41]);
}

#[test]
fn out_of_range_fields_fail_validation() {
    use pretty_assertions::assert_eq;
    let event = ChannelEvent::new(
        16,
        VoiceMessage::NoteOn {
            note: 60,
            velocity: 64,
        },
    );
    assert_eq!(
        event.to_wire().unwrap_err(),
        EncodeError::ChannelOutOfRange(16)
    );

    let event = ChannelEvent::new(0, VoiceMessage::PitchBend { value: 8192 });
    assert_eq!(
        event.to_wire().unwrap_err(),
        EncodeError::PitchBendOutOfRange(8192)
    );
}
