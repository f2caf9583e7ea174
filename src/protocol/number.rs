//! Base-253 number encoding shared by packets and data files.
//!
//! Every number is stored as 1 to 4 digit bytes, most significant digit first.
//! Each digit `d` in `0..253` is written as the byte `d + 1`, so a literal `0`
//! byte never appears in an encoded number:
//!
//! ```text
//! value = (b[0]-1)·253^(n-1) + … + (b[n-2]-1)·253 + (b[n-1]-1)
//! ```
//!
//! Bytes 254 and 255 have meanings outside the number itself (record fill and
//! the wire break byte). This module decodes them arithmetically and leaves any
//! special treatment to the caller.

use bytes::{BufMut, BytesMut};

use crate::error::CodecError;

/// Radix of the encoding.
pub const NUMBER_BASE: u32 = 253;

/// First value that does not fit in one byte.
pub const ONE_BYTE_MAX: u32 = NUMBER_BASE;

/// First value that does not fit in two bytes.
pub const TWO_BYTE_MAX: u32 = NUMBER_BASE * NUMBER_BASE;

/// First value that does not fit in three bytes.
pub const THREE_BYTE_MAX: u32 = TWO_BYTE_MAX * NUMBER_BASE;

/// Fill byte for record positions that were never written.
pub const FILL_BYTE: u8 = 254;

/// Field separator on the wire.
pub const BREAK_BYTE: u8 = 255;

/// Widest supported encoding.
pub const MAX_WIDTH: usize = 4;

/// Encodes `value` into exactly `width` digit bytes.
///
/// Values that need more than `width` digits keep only their low-order digits.
/// Servers rely on this truncation, so it is not reported as an error.
///
/// # Panics
///
/// Panics if `width` is not in `1..=4`.
#[must_use]
pub fn encode(value: u32, width: usize) -> Vec<u8> {
    assert!(
        (1..=MAX_WIDTH).contains(&width),
        "number width must be between 1 and 4"
    );

    let mut out = vec![0u8; width];
    let mut rest = value;
    for slot in out.iter_mut().rev() {
        *slot = (rest % NUMBER_BASE) as u8 + 1;
        rest /= NUMBER_BASE;
    }
    out
}

/// Appends the encoding of `value` to `buf`.
///
/// # Panics
///
/// Panics if `width` is not in `1..=4`.
pub fn put_number(buf: &mut BytesMut, value: u32, width: usize) {
    buf.put_slice(&encode(value, width));
}

/// Decodes 1 to 4 digit bytes, most significant first.
///
/// # Errors
///
/// Returns [`CodecError::MalformedInput`] if any byte is `0`, or
/// [`CodecError::InvalidWidth`] if `bytes` is empty or longer than 4.
pub fn decode(bytes: &[u8]) -> Result<u32, CodecError> {
    if bytes.is_empty() || bytes.len() > MAX_WIDTH {
        return Err(CodecError::InvalidWidth(bytes.len()));
    }

    let mut value: u32 = 0;
    for (position, &byte) in bytes.iter().enumerate() {
        if byte == 0 {
            return Err(CodecError::MalformedInput { byte, position });
        }
        // Four digits of at most 254 stay below u32::MAX.
        value = value * NUMBER_BASE + u32::from(byte - 1);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_byte_round_trip() {
        for v in 0..ONE_BYTE_MAX {
            assert_eq!(decode(&encode(v, 1)).unwrap(), v);
        }
    }

    #[test]
    fn test_two_byte_round_trip() {
        for v in (0..TWO_BYTE_MAX).step_by(7).chain([TWO_BYTE_MAX - 1]) {
            assert_eq!(decode(&encode(v, 2)).unwrap(), v);
        }
    }

    #[test]
    fn test_wide_values() {
        assert_eq!(decode(&encode(123_456, 3)).unwrap(), 123_456);
        assert_eq!(
            decode(&encode(THREE_BYTE_MAX + 17, 4)).unwrap(),
            THREE_BYTE_MAX + 17
        );
    }

    #[test]
    fn test_zero_is_all_ones() {
        for width in 1..=MAX_WIDTH {
            assert_eq!(encode(0, width), vec![1u8; width]);
        }
    }

    #[test]
    fn test_most_significant_first() {
        // 253 = 1·253 + 0
        assert_eq!(encode(253, 2), vec![2, 1]);
        assert_eq!(decode(&[2, 1]).unwrap(), 253);
        assert_eq!(encode(254, 2), vec![2, 2]);
    }

    #[test]
    fn test_overflow_truncates_to_low_digits() {
        assert_eq!(encode(253, 1), vec![1]);
        assert_eq!(encode(300, 1), encode(300 - 253, 1));
        assert_eq!(decode(&encode(TWO_BYTE_MAX + 5, 2)).unwrap(), 5);
    }

    #[test]
    fn test_zero_byte_is_malformed() {
        assert_eq!(
            decode(&[5, 0]),
            Err(CodecError::MalformedInput {
                byte: 0,
                position: 1
            })
        );
        assert!(matches!(
            decode(&[0]),
            Err(CodecError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_invalid_widths() {
        assert_eq!(decode(&[]), Err(CodecError::InvalidWidth(0)));
        assert_eq!(decode(&[1; 5]), Err(CodecError::InvalidWidth(5)));
    }

    #[test]
    fn test_sentinels_decode_arithmetically() {
        assert_eq!(decode(&[FILL_BYTE]).unwrap(), 253);
        assert_eq!(decode(&[BREAK_BYTE]).unwrap(), 254);
        assert!(decode(&[BREAK_BYTE; 4]).is_ok());
    }

    #[test]
    #[should_panic(expected = "number width")]
    fn test_encode_rejects_width_zero() {
        let _ = encode(1, 0);
    }

    #[test]
    fn test_put_number_appends() {
        let mut buf = BytesMut::new();
        buf.put_u8(9);
        put_number(&mut buf, 10, 2);
        assert_eq!(&buf[..], &[9, 1, 11]);
    }
}
