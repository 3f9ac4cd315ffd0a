#![doc = r#"
The SMPTE offset meta event.

An SMPTE offset pins a track's starting point to an absolute time code
(hours:minutes:seconds:frames:subframes) instead of a tick count. The
event is carried and round-tripped by this crate; note that SMPTE
*time division* in the file header is a separate, unsupported feature
-- a file may be tick-timed and still carry an offset event.
"#]

use crate::error::{EncodeError, EncodeResult};
use num_enum::IntoPrimitive;

/// The four frame rates the MIDI specification defines.
///
/// The discriminant is the 2-bit code stored in the payload's first
/// byte. `TwentyNine` is the NTSC drop-frame rate of 30000/1001 fps;
/// despite the name, no frames are dropped -- the time code numbering
/// skips values to stay aligned with real time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SmpteFps {
    /// 24 frames per second, the film standard.
    TwentyFour = 0,
    /// 25 frames per second, the PAL/SECAM standard.
    TwentyFive = 1,
    /// 29.97 frames per second, NTSC drop-frame.
    TwentyNine = 2,
    /// 30 frames per second.
    Thirty = 3,
}

/// The precise NTSC drop-frame rate.
const DROP_FRAME: f64 = 30_000. / 1001.;

impl SmpteFps {
    /// The nominal whole-frame count per second.
    ///
    /// Drop-frame 29.97 fps returns 30 here; frame numbers still run
    /// 0..=29 within a second.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 30,
            Self::Thirty => 30,
        }
    }

    /// The exact frame rate.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// A track's starting position in SMPTE time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// The frame rate the frame and subframe counts are measured in.
    pub fps: SmpteFps,
    /// Hour component (0..=23).
    pub hour: u8,
    /// Minute component (0..=59).
    pub minute: u8,
    /// Second component (0..=59).
    pub second: u8,
    /// Frame within the current second (0..fps).
    pub frame: u8,
    /// Hundredths of a frame (0..=99).
    pub subframe: u8,
}

impl SmpteOffset {
    /// Decode the 5-byte payload.
    ///
    /// Byte 0 holds the 2-bit frame rate code in its top bits and the
    /// hour in its low six bits. Out-of-range components are accepted
    /// as-is; files in the wild carry them, and rejecting them is the
    /// encoder's job.
    pub(crate) const fn parse(data: &[u8; 5]) -> Self {
        let fps = match data[0] >> 6 {
            0 => SmpteFps::TwentyFour,
            1 => SmpteFps::TwentyFive,
            2 => SmpteFps::TwentyNine,
            _ => SmpteFps::Thirty,
        };
        Self {
            fps,
            hour: data[0] & 0x3F,
            minute: data[1],
            second: data[2],
            frame: data[3],
            subframe: data[4],
        }
    }

    pub(crate) fn encode(&self) -> EncodeResult<[u8; 5]> {
        self.validate()?;
        let code: u8 = self.fps.into();
        Ok([
            (code << 6) | self.hour,
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ])
    }

    pub(crate) const fn validate(&self) -> EncodeResult<()> {
        if self.hour > 23 {
            return Err(EncodeError::SmpteHour(self.hour));
        }
        if self.minute > 59 {
            return Err(EncodeError::SmpteMinute(self.minute));
        }
        if self.second > 59 {
            return Err(EncodeError::SmpteSecond(self.second));
        }
        if self.frame >= self.fps.as_division() {
            return Err(EncodeError::SmpteFrame(self.frame));
        }
        if self.subframe > 99 {
            return Err(EncodeError::SmpteSubframe(self.subframe));
        }
        Ok(())
    }

    /// Convert this offset to microseconds from time-code zero.
    pub const fn as_micros(&self) -> f64 {
        ((((self.hour as u64 * 3600) + (self.minute as u64) * 60 + self.second as u64) * 1_000_000)
            as f64)
            + ((self.frame as u64) * 1_000_000) as f64 / self.fps.as_f64()
            + ((self.subframe as u32) * 10_000) as f64 / self.fps.as_f64()
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // these are the bytes after 00 FF 54 05,
    // where 54 is smpte offset and 05 is length five.
    let bytes = [0x81, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::parse(&bytes);

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.hour, 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);

    assert_eq!(offset.encode().unwrap(), bytes);
}

#[test]
fn encode_rejects_invalid_components() {
    use pretty_assertions::assert_eq;
    let offset = SmpteOffset {
        fps: SmpteFps::TwentyFour,
        hour: 31,
        minute: 23,
        second: 45,
        frame: 12,
        subframe: 34,
    };
    assert_eq!(offset.encode().unwrap_err(), EncodeError::SmpteHour(31));

    let offset = SmpteOffset {
        fps: SmpteFps::TwentyFour,
        hour: 1,
        minute: 80,
        second: 45,
        frame: 12,
        subframe: 34,
    };
    assert_eq!(offset.encode().unwrap_err(), EncodeError::SmpteMinute(80));

    // frame 24 exists at 25 fps but not at 24 fps
    let offset = SmpteOffset {
        fps: SmpteFps::TwentyFour,
        hour: 1,
        minute: 2,
        second: 3,
        frame: 24,
        subframe: 0,
    };
    assert_eq!(offset.encode().unwrap_err(), EncodeError::SmpteFrame(24));
}

#[test]
fn micros_of_one_frame() {
    let offset = SmpteOffset {
        fps: SmpteFps::TwentyFour,
        hour: 0,
        minute: 0,
        second: 0,
        frame: 1,
        subframe: 0,
    };
    let expected = 1_000_000.0 / 24.0;
    assert!((offset.as_micros() - expected).abs() < 0.001);
}
