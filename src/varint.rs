#![doc = r#"
MIDI variable-length integers.

Delta times and payload lengths are stored as big-endian 7-bit groups,
one group per byte, with the top bit of every byte except the last set
as a continuation flag. The encoding is one to four bytes long, which
bounds the value domain to 28 bits.
"#]

use crate::{
    error::{EncodeError, EncodeResult},
    reader::{ReadResult, Reader},
};
use alloc::vec::Vec;

/// The largest value a variable-length integer can hold.
pub const VAR_INT_MAX: u32 = 0x0FFF_FFFF;

/// Decode a variable-length integer, advancing the reader past it.
///
/// At most four bytes are consumed. If the fourth byte still has its
/// continuation bit set the accumulated 28 bits are returned as-is;
/// tolerating the malformed tail guarantees termination on adversarial
/// input instead of walking the rest of the buffer.
pub fn read_var_int(reader: &mut Reader<'_>) -> ReadResult<u32> {
    let mut value: u32 = 0;
    for _ in 0..4 {
        let byte = reader.read_byte()?;
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            break;
        }
    }
    Ok(value)
}

/// Encode `value` onto the end of `out`.
///
/// Values above [`VAR_INT_MAX`] cannot be represented and fail before
/// anything is written.
pub fn write_var_int(value: u32, out: &mut Vec<u8>) -> EncodeResult<()> {
    if value > VAR_INT_MAX {
        return Err(EncodeError::VarIntOverflow(value));
    }
    let mut started = false;
    for group in (1..4).rev() {
        let byte = ((value >> (group * 7)) & 0x7F) as u8;
        if started || byte != 0 {
            started = true;
            out.push(byte | 0x80);
        }
    }
    out.push((value & 0x7F) as u8);
    Ok(())
}

/// The number of bytes [`write_var_int`] would emit for `value`, or
/// `None` if the value exceeds the 28-bit domain.
pub const fn var_int_length(value: u32) -> Option<usize> {
    match value {
        0..=0x7F => Some(1),
        0x80..=0x3FFF => Some(2),
        0x4000..=0x1F_FFFF => Some(3),
        0x20_0000..=VAR_INT_MAX => Some(4),
        _ => None,
    }
}

#[test]
fn boundary_values_round_trip() {
    use pretty_assertions::assert_eq;
    for value in [
        0u32, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000, VAR_INT_MAX,
    ] {
        let mut bytes = Vec::new();
        write_var_int(value, &mut bytes).unwrap();
        assert_eq!(bytes.len(), var_int_length(value).unwrap());

        let mut reader = Reader::from_byte_slice(&bytes);
        assert_eq!(read_var_int(&mut reader).unwrap(), value);
        assert_eq!(reader.remaining(), 0);
    }
}

#[test]
fn zero_is_a_single_byte() {
    use pretty_assertions::assert_eq;
    let mut bytes = Vec::new();
    write_var_int(0, &mut bytes).unwrap();
    assert_eq!(bytes, [0x00]);
}

#[test]
fn overflow_is_rejected() {
    use pretty_assertions::assert_eq;
    let mut bytes = Vec::new();
    let err = write_var_int(VAR_INT_MAX + 1, &mut bytes).unwrap_err();
    assert_eq!(err, EncodeError::VarIntOverflow(VAR_INT_MAX + 1));
    assert!(bytes.is_empty());
    assert_eq!(var_int_length(VAR_INT_MAX + 1), None);
}

#[test]
fn oversized_input_is_capped_at_four_bytes() {
    use pretty_assertions::assert_eq;
    // a fifth byte would extend the value, but decoding stops after four
    let mut reader = Reader::from_byte_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
    assert_eq!(read_var_int(&mut reader).unwrap(), VAR_INT_MAX);
    assert_eq!(reader.buffer_position(), 4);
}

#[test]
fn known_encodings() {
    use pretty_assertions::assert_eq;
    let mut bytes = Vec::new();
    write_var_int(0x40, &mut bytes).unwrap();
    assert_eq!(bytes, [0x40]);

    bytes.clear();
    write_var_int(0x2000, &mut bytes).unwrap();
    assert_eq!(bytes, [0xC0, 0x00]);

    bytes.clear();
    write_var_int(VAR_INT_MAX, &mut bytes).unwrap();
    assert_eq!(bytes, [0xFF, 0xFF, 0xFF, 0x7F]);
}
