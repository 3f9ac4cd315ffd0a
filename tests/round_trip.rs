use midifile::prelude::*;
use pretty_assertions::assert_eq;

/// A canonical two-voice file: tempo and meter up front, two notes
/// struck and released with running status, end-of-track marker last.
///
/// Every status byte that the default encoder would omit is omitted
/// here, so the buffer is byte-for-byte what encoding produces.
fn canonical_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();

    // MIDI header: format 1, one track, 96 ticks per beat
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x01]);
    bytes.extend_from_slice(&[0x00, 0x01]);
    bytes.extend_from_slice(&[0x00, 0x60]);

    bytes.extend_from_slice(b"MTrk");
    let length_pos = bytes.len();
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // placeholder
    let track_start = bytes.len();

    // 120 bpm
    bytes.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    // 4/4, 24 clocks per metronome click
    bytes.extend_from_slice(&[0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08]);
    // two notes on channel 0; the second reuses the status byte
    bytes.extend_from_slice(&[0x00, 0x90, 0x3C, 0x64]);
    bytes.extend_from_slice(&[0x00, 0x43, 0x64]);
    // releases 192 ticks later, running status again
    bytes.extend_from_slice(&[0x81, 0x40, 0x80, 0x3C, 0x40]);
    bytes.extend_from_slice(&[0x00, 0x47, 0x40]);
    // end of track
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let track_length = bytes.len() - track_start;
    bytes[length_pos..length_pos + 4].copy_from_slice(&(track_length as u32).to_be_bytes());
    bytes
}

#[test]
fn canonical_bytes_survive_decode_encode() {
    let bytes = canonical_bytes();
    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.to_bytes().unwrap(), bytes);
}

#[test]
fn canonical_bytes_decode_as_expected() {
    let file = MidiFile::parse(&canonical_bytes()).unwrap();
    assert_eq!(file.file_type(), FileType::SyncTracks);
    assert_eq!(file.ticks_per_beat(), 96);
    assert_eq!(file.tracks().len(), 1);

    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 7);
    assert_eq!(events[0].kind, EventKind::Meta(MetaEvent::SetTempo(500_000)));
    assert_eq!(
        events[1].kind,
        EventKind::Meta(MetaEvent::TimeSignature(TimeSignature {
            numerator: 4,
            denominator: 4,
            metronome: 24,
            clock_signals_per_beat: 24,
        }))
    );

    // the running-status event decodes as a full channel event
    let EventKind::Channel(second_note) = &events[3].kind else {
        panic!("expected a channel event");
    };
    assert_eq!(second_note.channel, 0);
    assert_eq!(
        second_note.message,
        VoiceMessage::NoteOn {
            note: 0x43,
            velocity: 0x64,
        }
    );
    assert_eq!(events[4].delay, 192);
    assert_eq!(events[6].kind, EventKind::Meta(MetaEvent::EndOfTrack));
}

/// One of every event family, exercising each meta payload shape.
fn every_event_kind() -> Vec<TrackEvent> {
    vec![
        TrackEvent::new(0, MetaEvent::SequenceNumber(3)),
        TrackEvent::new(0, MetaEvent::SequenceName(b"fanfare".to_vec())),
        TrackEvent::new(0, MetaEvent::CopyrightNotice(b"(c) 1993".to_vec())),
        TrackEvent::new(0, MetaEvent::InstrumentName(b"brass".to_vec())),
        TrackEvent::new(0, MetaEvent::Lyrics(b"la".to_vec())),
        TrackEvent::new(0, MetaEvent::Marker(b"verse".to_vec())),
        TrackEvent::new(0, MetaEvent::CuePoint(b"lights".to_vec())),
        TrackEvent::new(0, MetaEvent::ProgramName(b"lead".to_vec())),
        TrackEvent::new(0, MetaEvent::DeviceName(b"port a".to_vec())),
        TrackEvent::new(0, MetaEvent::ChannelPrefix(4)),
        TrackEvent::new(0, MetaEvent::MidiPort(1)),
        TrackEvent::new(0, MetaEvent::SetTempo(750_000)),
        TrackEvent::new(
            0,
            MetaEvent::SmpteOffset(SmpteOffset {
                fps: SmpteFps::TwentyFive,
                hour: 1,
                minute: 2,
                second: 3,
                frame: 4,
                subframe: 5,
            }),
        ),
        TrackEvent::new(
            0,
            MetaEvent::TimeSignature(TimeSignature {
                numerator: 6,
                denominator: 8,
                metronome: 36,
                clock_signals_per_beat: 24,
            }),
        ),
        TrackEvent::new(
            0,
            MetaEvent::KeySignature(KeySignature {
                accidentals: -3,
                minor: true,
            }),
        ),
        TrackEvent::new(0, MetaEvent::SequencerSpecific(vec![0x00, 0x41, 0x7F])),
        TrackEvent::new(
            0,
            MetaEvent::Unknown {
                code: 0x4B,
                data: vec![0x01, 0x02],
            },
        ),
        TrackEvent::new(0, SysexEvent::new(SysexKind::Start, vec![0x43, 0x12, 0xF7])),
        TrackEvent::new(0, SysexEvent::new(SysexKind::Continuation, vec![0x55])),
        TrackEvent::new(
            5,
            ChannelEvent::new(
                2,
                VoiceMessage::NoteOn {
                    note: 64,
                    velocity: 101,
                },
            ),
        ),
        TrackEvent::new(
            1,
            ChannelEvent::new(
                2,
                VoiceMessage::NoteAftertouch {
                    note: 64,
                    pressure: 10,
                },
            ),
        ),
        TrackEvent::new(
            0,
            ChannelEvent::new(
                2,
                VoiceMessage::Controller {
                    controller: 7,
                    value: 100,
                },
            ),
        ),
        TrackEvent::new(
            0,
            ChannelEvent::new(
                2,
                VoiceMessage::Controller {
                    controller: 10,
                    value: 64,
                },
            ),
        ),
        TrackEvent::new(0, ChannelEvent::new(2, VoiceMessage::ProgramChange { program: 56 })),
        TrackEvent::new(0, ChannelEvent::new(2, VoiceMessage::ChannelAftertouch { pressure: 3 })),
        TrackEvent::new(0, ChannelEvent::new(2, VoiceMessage::PitchBend { value: -6000 })),
        TrackEvent::new(
            7,
            ChannelEvent::new(
                2,
                VoiceMessage::NoteOff {
                    note: 64,
                    velocity: 0,
                },
            ),
        ),
        TrackEvent::new(0x0FFF_FFFF, MetaEvent::EndOfTrack),
    ]
}

#[test]
fn every_event_kind_round_trips() {
    let track: Track = every_event_kind().into_iter().collect();
    let file = MidiFile::new(FileType::AsyncTracks, 480, vec![track]).unwrap();

    let bytes = file.to_bytes().unwrap();
    assert_eq!(MidiFile::parse(&bytes).unwrap(), file);

    // and the same without running status in the output
    let plain = file
        .encode_with(&EncodeOptions {
            running_status: false,
        })
        .unwrap();
    assert_eq!(MidiFile::parse(&plain).unwrap(), file);
    assert!(plain.len() > bytes.len());
}

#[test]
fn running_status_collapses_repeated_statuses() {
    let track = Track::new(vec![
        TrackEvent::new(
            0,
            ChannelEvent::new(
                5,
                VoiceMessage::NoteOn {
                    note: 60,
                    velocity: 80,
                },
            ),
        ),
        TrackEvent::new(
            3,
            ChannelEvent::new(
                5,
                VoiceMessage::NoteOn {
                    note: 64,
                    velocity: 80,
                },
            ),
        ),
    ]);

    let bytes = track.to_bytes().unwrap();
    // payload: 00 95 3C 50 | 03 40 50 -- no second 0x95
    assert_eq!(&bytes[8..], [0x00, 0x95, 0x3C, 0x50, 0x03, 0x40, 0x50]);

    let mut reader = Reader::from_byte_slice(&bytes);
    let decoded = Track::read(&mut reader).unwrap();
    assert_eq!(decoded.events().len(), 2);
    let EventKind::Channel(first) = &decoded.events()[0].kind else {
        panic!("expected a channel event");
    };
    let EventKind::Channel(second) = &decoded.events()[1].kind else {
        panic!("expected a channel event");
    };
    assert_eq!(first.channel, second.channel);
    assert_eq!(first.status_byte(), second.status_byte());
    assert_eq!(
        second.message,
        VoiceMessage::NoteOn {
            note: 64,
            velocity: 80,
        }
    );
}

#[test]
fn meta_and_sysex_interrupt_running_status() {
    let note = |delay: u32| {
        TrackEvent::new(
            delay,
            ChannelEvent::new(
                0,
                VoiceMessage::NoteOn {
                    note: 60,
                    velocity: 64,
                },
            ),
        )
    };
    let track = Track::new(vec![
        note(0),
        TrackEvent::new(0, MetaEvent::Marker(b"m".to_vec())),
        note(0),
    ]);

    let bytes = track.to_bytes().unwrap();
    // the note after the marker carries its status byte again
    assert_eq!(
        &bytes[8..],
        [
            0x00, 0x90, 0x3C, 0x40, // first note
            0x00, 0xFF, 0x06, 0x01, b'm', // marker
            0x00, 0x90, 0x3C, 0x40, // second note, explicit status
        ]
    );
}

#[test]
fn pitch_bend_survives_the_wire() {
    let bend = |value: i16| {
        Track::new(vec![TrackEvent::new(
            0,
            ChannelEvent::new(1, VoiceMessage::PitchBend { value }),
        )])
    };

    for value in [-8192, -6000, -1, 0, 1, 8191] {
        let bytes = bend(value).to_bytes().unwrap();
        let mut reader = Reader::from_byte_slice(&bytes);
        let decoded = Track::read(&mut reader).unwrap();
        let EventKind::Channel(event) = &decoded.events()[0].kind else {
            panic!("expected a channel event");
        };
        assert_eq!(event.message, VoiceMessage::PitchBend { value });
    }

    let err = bend(8192).to_bytes().unwrap_err();
    assert_eq!(err, EncodeError::PitchBendOutOfRange(8192));
}

#[test]
fn single_track_decode_keeps_only_the_first_track() {
    let track_one = Track::new(vec![
        TrackEvent::new(0, MetaEvent::Marker(b"one".to_vec())),
        TrackEvent::new(0, MetaEvent::EndOfTrack),
    ]);
    let track_two = Track::new(vec![
        TrackEvent::new(0, MetaEvent::Marker(b"two".to_vec())),
        TrackEvent::new(0, MetaEvent::EndOfTrack),
    ]);

    // a two-track body declared as format 0: encode the tracks
    // ourselves under a hand-written single-track header
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x00]);
    bytes.extend_from_slice(&[0x00, 0x02]);
    bytes.extend_from_slice(&[0x00, 0x60]);
    bytes.extend_from_slice(&track_one.to_bytes().unwrap());
    bytes.extend_from_slice(&track_two.to_bytes().unwrap());

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.file_type(), FileType::SingleTrack);
    assert_eq!(file.tracks(), [track_one]);
}

#[test]
fn single_track_encode_refuses_extra_tracks() {
    let mut file = MidiFile::new(FileType::SingleTrack, 96, vec![Track::default()]).unwrap();
    file.tracks_mut().push(Track::default());

    let err = file.to_bytes().unwrap_err();
    assert_eq!(err, EncodeError::SingleTrackWithMultipleTracks(2));

    // the constructor refuses the same shape up front
    let err = MidiFile::new(
        FileType::SingleTrack,
        96,
        vec![Track::default(), Track::default()],
    )
    .unwrap_err();
    assert_eq!(err, EncodeError::SingleTrackWithMultipleTracks(2));
}

#[test]
fn unknown_meta_codes_are_preserved() {
    let track = Track::new(vec![TrackEvent::new(
        0,
        MetaEvent::Unknown {
            code: 0x60,
            data: vec![0xDE, 0xAD],
        },
    )]);

    let bytes = track.to_bytes().unwrap();
    assert_eq!(&bytes[8..], [0x00, 0xFF, 0x60, 0x02, 0xDE, 0xAD]);

    let mut reader = Reader::from_byte_slice(&bytes);
    let decoded = Track::read(&mut reader).unwrap();
    assert_eq!(decoded, track);
}

#[test]
fn meta_text_is_viewable_and_lossless() {
    let name = MetaEvent::SequenceName(b"pi\xC3\xA8ce".to_vec());
    assert_eq!(name.text().unwrap(), "pi\u{e8}ce");

    // invalid utf-8 stays intact on the wire even though the view is lossy
    let raw = MetaEvent::Marker(vec![0xFF, 0x00]);
    assert_eq!(raw.text().unwrap(), "\u{fffd}\u{0}");
    let track = Track::new(vec![TrackEvent::new(0, raw)]);
    let bytes = track.to_bytes().unwrap();
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(Track::read(&mut reader).unwrap(), track);
}
