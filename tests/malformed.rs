use midifile::{
    error::{MalformedError, UnsupportedError},
    prelude::*,
};
use pretty_assertions::assert_eq;

fn header(file_type: u16, track_count: u16, division: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&file_type.to_be_bytes());
    bytes.extend_from_slice(&track_count.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes
}

fn malformed_kind(err: &ReaderError) -> &MalformedError {
    match err.error_kind() {
        ReaderErrorKind::Malformed(kind) => kind,
        other => panic!("expected a malformed error, got {other:?}"),
    }
}

#[test]
fn garbage_is_not_a_midi_file() {
    for bytes in [
        &b""[..],
        &b"MT"[..],
        &b"RIFF\x00\x00\x00\x00"[..],
        // right tag, truncated payload
        &b"MThd\x00\x00\x00\x06\x00\x01"[..],
        // right tag, payload shorter than a header
        &b"MThd\x00\x00\x00\x02\x00\x01"[..],
    ] {
        let err = MidiFile::parse(bytes).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(malformed_kind(&err), &MalformedError::NotAMidiFile);
        assert!(err.to_string().contains("not a MIDI file"));
    }
}

#[test]
fn second_header_is_not_a_track() {
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        malformed_kind(&err),
        &MalformedError::ExpectedTrackChunk { found: *b"MThd" }
    );
    assert!(err.to_string().contains("expected a track chunk"));
    assert_eq!(err.position(), 14);
}

#[test]
fn smpte_division_fails_loudly() {
    // 25 fps, 40 ticks per frame: bit 15 set
    let bytes = header(0, 0, 0xE728);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Unsupported(UnsupportedError::SmpteTimeDivision)
    );
    assert!(err.to_string().contains("SMPTE time division"));
}

#[test]
fn file_type_above_two_is_rejected() {
    let bytes = header(3, 0, 96);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(malformed_kind(&err), &MalformedError::UnknownFileType(3));
}

#[test]
fn truncated_track_payload() {
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x08]);
    bytes.extend_from_slice(&[0x00, 0x90]); // six bytes missing

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(malformed_kind(&err), &MalformedError::UnexpectedEof);
}

#[test]
fn event_cut_off_inside_its_payload() {
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x03]);
    // a note-on with only one of its two data bytes
    bytes.extend_from_slice(&[0x00, 0x90, 0x3C]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(malformed_kind(&err), &MalformedError::UnexpectedEof);
}

#[test]
fn data_byte_with_no_running_status() {
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x03]);
    bytes.extend_from_slice(&[0x00, 0x3C, 0x40]); // 0x3C is not a status

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(malformed_kind(&err), &MalformedError::OrphanRunningStatus);
    assert!(err.to_string().contains("no previous status"));
}

#[test]
fn system_bytes_are_unsupported_in_tracks() {
    for (status, expected) in [
        (0xF1u8, UnsupportedError::SystemCommon(0xF1)),
        (0xF3, UnsupportedError::SystemCommon(0xF3)),
        (0xF8, UnsupportedError::SystemRealtime(0xF8)),
        (0xFE, UnsupportedError::SystemRealtime(0xFE)),
    ] {
        let mut bytes = header(1, 1, 96);
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x02]);
        bytes.extend_from_slice(&[0x00, status]);

        let err = MidiFile::parse(&bytes).unwrap_err();
        assert_eq!(err.error_kind(), &ReaderErrorKind::Unsupported(expected));
    }
}

#[test]
fn meta_length_must_match_its_shape() {
    // end-of-track with a declared one-byte payload
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x05]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x01, 0x00]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        malformed_kind(&err),
        &MalformedError::MetaPayloadLength {
            code: 0x2F,
            declared: 1,
            expected: 0,
        }
    );

    // set-tempo with two bytes instead of three
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        malformed_kind(&err),
        &MalformedError::MetaPayloadLength {
            code: 0x51,
            declared: 2,
            expected: 3,
        }
    );
}

#[test]
fn meta_payload_longer_than_its_chunk() {
    // marker declares four bytes but the chunk ends after one
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x05]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x06, 0x04, b'x']);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(malformed_kind(&err), &MalformedError::UnexpectedEof);
}

#[test]
fn time_signature_beat_rate_of_zero() {
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x08]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x00]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        malformed_kind(&err),
        &MalformedError::TimeSignatureBeatRate
    );
}

#[test]
fn errors_carry_the_failing_offset() {
    let mut bytes = header(1, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x02]);
    bytes.extend_from_slice(&[0x00, 0xF1]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    // ... MThd(14) + tag(4) + length(4) + delta(1) + status(1)
    assert_eq!(err.position(), 24);
}
