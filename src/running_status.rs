#![doc = r#"
Running-status state for one track pass.

A track stream may omit the status byte of a channel event when it
matches the status of the previous event; the decoder then sees a data
byte (top bit clear) where a status byte belongs and must reuse the
last status. A [`RunningStatus`] value holds that one piece of state.

The context is scoped to exactly one track's decode or encode pass. It
is constructed fresh by the track codec and never shared across tracks
or files -- status never carries over a chunk boundary.
"#]

use crate::{
    error::MalformedError,
    reader::{ReadResult, Reader},
};

/// The last status byte seen or emitted within one track pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunningStatus {
    last: Option<u8>,
}

impl RunningStatus {
    /// A fresh context with no status in effect.
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Resolve the status byte of the next event.
    ///
    /// Reads one byte. A byte with its top bit set is a genuine status
    /// byte and is recorded per the family rules below. A byte with its
    /// top bit clear is the first data byte of an event reusing the
    /// previous status; the reader is stepped back so the byte is read
    /// again as payload. Reuse without a prior status is malformed.
    pub fn resolve(&mut self, reader: &mut Reader<'_>) -> ReadResult<u8> {
        let candidate = reader.read_byte()?;
        if candidate & 0x80 == 0 {
            let Some(status) = self.last else {
                return Err(reader.malformed(MalformedError::OrphanRunningStatus));
            };
            reader.step_back();
            return Ok(status);
        }
        self.observe(candidate);
        Ok(candidate)
    }

    /// True if an event with this status byte may omit it.
    ///
    /// Only channel statuses participate; meta and sysex events are
    /// always written with an explicit status byte.
    pub const fn can_omit(&self, status: u8) -> bool {
        match self.last {
            Some(last) => status < 0xF0 && last == status,
            None => false,
        }
    }

    /// Record a status byte that was read or written.
    ///
    /// Channel statuses (0x80..=0xEF) become the new running status,
    /// system common and sysex statuses (0xF0..=0xF7) clear it, system
    /// real-time statuses (0xF8..=0xFE) leave it untouched, and meta
    /// (0xFF) clears it.
    pub const fn observe(&mut self, status: u8) {
        match status {
            0x80..=0xEF => self.last = Some(status),
            0xF0..=0xF7 => self.last = None,
            0xF8..=0xFE => {}
            _ => self.last = None,
        }
    }
}

#[test]
fn reuses_previous_channel_status() {
    use pretty_assertions::assert_eq;
    let mut ctx = RunningStatus::new();
    let mut reader = Reader::from_byte_slice(&[0x91, 0x3C]);

    assert_eq!(ctx.resolve(&mut reader).unwrap(), 0x91);
    // next byte has its top bit clear: same status, byte stays readable
    assert_eq!(ctx.resolve(&mut reader).unwrap(), 0x91);
    assert_eq!(reader.read_byte().unwrap(), 0x3C);
}

#[test]
fn reuse_without_prior_status_is_malformed() {
    use crate::reader::ReaderErrorKind;
    let mut ctx = RunningStatus::new();
    let mut reader = Reader::from_byte_slice(&[0x3C]);
    let err = ctx.resolve(&mut reader).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::Malformed(MalformedError::OrphanRunningStatus)
    ));
}

#[test]
fn family_rules() {
    use pretty_assertions::assert_eq;
    let mut ctx = RunningStatus::new();

    ctx.observe(0x91);
    assert!(ctx.can_omit(0x91));
    assert!(!ctx.can_omit(0x92));

    // real-time bytes pass through without touching the state
    ctx.observe(0xF8);
    assert!(ctx.can_omit(0x91));

    // sysex clears it
    ctx.observe(0xF0);
    assert!(!ctx.can_omit(0x91));

    ctx.observe(0x91);
    ctx.observe(0xFF);
    assert_eq!(ctx, RunningStatus::new());
}
