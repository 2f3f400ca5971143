/***********************************************************************************************************************
 * Copyright (c) 2019 by the authors
 *
 * Author: André Borrmann
 * License: Apache License 2.0
 **********************************************************************************************************************/

//! # Numeric formatting
//!
//! Conversion between ASCII digit sequences and integers without any allocation. The output buffers are NUL
//! terminated so they can be passed on to ``put_string`` style consumers that stop at the sentinel.
//!
//! # Example
//! ```
//! # use ruspiro_uart_gpio::numfmt::*;
//! let mut buffer = [0u8; FORMAT_BUFFER_LEN];
//! assert_eq!(format_unsigned(255, 16, &mut buffer), Ok("ff"));
//! assert_eq!(format_signed(-42, &mut buffer), Ok("-42"));
//!
//! let mut cursor: &[u8] = b"23abc";
//! assert_eq!(parse_unsigned(b'1', &mut cursor, 10), (b'a', 123));
//! assert_eq!(cursor, b"bc");
//! ```

use crate::errors::{HalError, HalErrorType::*};

/// Size of an output buffer that fits any ``u32`` in base 2 or any ``i32`` in base 10, including the NUL.
pub const FORMAT_BUFFER_LEN: usize = 34;

const MIN_BASE: u32 = 2;
const MAX_BASE: u32 = 36;

/// Value of a single ASCII hex digit, case insensitive. Returns ``None`` for anything that is not ``0-9``, ``a-f``
/// or ``A-F``.
pub fn ascii_digit_to_value(ch: u8) -> Option<u32> {
    match ch {
        b'0'..=b'9' => Some((ch - b'0') as u32),
        b'a'..=b'f' => Some((ch - b'a') as u32 + 10),
        b'A'..=b'F' => Some((ch - b'A') as u32 + 10),
        _ => None,
    }
}

/// Accumulate the digits valid in ``base`` starting with ``first``, pulling further characters from ``cursor``.
///
/// Returns the first character that ended the number together with the accumulated value. That terminating
/// character has already been taken from the cursor. Running out of input reads as a NUL. The accumulation wraps
/// on overflow.
pub fn parse_unsigned(first: u8, cursor: &mut &[u8], base: u32) -> (u8, u32) {
    let mut ch = first;
    let mut value: u32 = 0;
    while let Some(digit) = ascii_digit_to_value(ch) {
        if digit >= base {
            break;
        }
        value = value.wrapping_mul(base).wrapping_add(digit);
        ch = next_char(cursor);
    }
    (ch, value)
}

fn next_char(cursor: &mut &[u8]) -> u8 {
    match cursor.split_first() {
        Some((&ch, rest)) => {
            *cursor = rest;
            ch
        }
        None => 0,
    }
}

/// Render ``value`` in ``base`` into ``buffer`` with no leading zeros and lowercase letters for digits above 9.
/// The digits are followed by a NUL. Returns the digits as string slice of the buffer.
pub fn format_unsigned(value: u32, base: u32, buffer: &mut [u8]) -> Result<&str, HalError> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(HalError::new(InvalidBase));
    }

    // largest power of base not above value, never overflows as divisor * base <= value
    let mut divisor: u32 = 1;
    let mut len = 1;
    while value / divisor >= base {
        divisor *= base;
        len += 1;
    }
    if buffer.len() < len + 1 {
        return Err(HalError::new(BufferTooSmall));
    }

    let mut rest = value;
    for slot in buffer.iter_mut().take(len) {
        let digit = rest / divisor;
        rest %= divisor;
        divisor /= base;
        *slot = if digit < 10 {
            b'0' + digit as u8
        } else {
            b'a' + (digit - 10) as u8
        };
    }
    buffer[len] = 0;

    as_text(&buffer[..len])
}

/// Render ``value`` in base 10 into ``buffer``, with a leading ``-`` for negative values.
pub fn format_signed(value: i32, buffer: &mut [u8]) -> Result<&str, HalError> {
    if value >= 0 {
        return format_unsigned(value as u32, 10, buffer);
    }

    let (sign, digits) = buffer
        .split_first_mut()
        .ok_or(HalError::new(BufferTooSmall))?;
    *sign = b'-';
    let len = format_unsigned(value.unsigned_abs(), 10, digits)?.len();

    as_text(&buffer[..=len])
}

// the formatters only write ascii, so this never fails
fn as_text(bytes: &[u8]) -> Result<&str, HalError> {
    core::str::from_utf8(bytes).map_err(|_| HalError::new(InvalidBase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HalErrorType;

    fn parse_all(text: &[u8], base: u32) -> (u8, u32) {
        let (first, mut cursor) = text.split_first().map_or((0, &[][..]), |(f, r)| (*f, r));
        parse_unsigned(first, &mut cursor, base)
    }

    #[test]
    fn digit_values() {
        assert_eq!(ascii_digit_to_value(b'0'), Some(0));
        assert_eq!(ascii_digit_to_value(b'9'), Some(9));
        assert_eq!(ascii_digit_to_value(b'a'), Some(10));
        assert_eq!(ascii_digit_to_value(b'F'), Some(15));
        assert_eq!(ascii_digit_to_value(b'g'), None);
        assert_eq!(ascii_digit_to_value(b' '), None);
        assert_eq!(ascii_digit_to_value(0), None);
    }

    #[test]
    fn parse_stops_at_first_digit_outside_base() {
        let mut cursor: &[u8] = b"23abc";
        assert_eq!(parse_unsigned(b'1', &mut cursor, 10), (b'a', 123));
        // the terminator is consumed along with the digits
        assert_eq!(cursor, b"bc");

        assert_eq!(parse_all(b"ff", 16), (0, 255));
        assert_eq!(parse_all(b"FF", 16), (0, 255));
        assert_eq!(parse_all(b"102", 2), (b'2', 2));
        assert_eq!(parse_all(b"9", 9), (b'9', 0));
    }

    #[test]
    fn parse_without_digits_yields_zero() {
        let mut cursor: &[u8] = b"rest";
        assert_eq!(parse_unsigned(b'x', &mut cursor, 10), (b'x', 0));
        assert_eq!(cursor, b"rest");
    }

    #[test]
    fn format_zero_in_every_base() {
        let mut buffer = [0xAAu8; FORMAT_BUFFER_LEN];
        for base in 2..=36 {
            assert_eq!(format_unsigned(0, base, &mut buffer), Ok("0"));
            assert_eq!(buffer[1], 0);
        }
    }

    #[test]
    fn format_values() {
        let mut buffer = [0u8; FORMAT_BUFFER_LEN];
        assert_eq!(format_unsigned(255, 16, &mut buffer), Ok("ff"));
        assert_eq!(format_unsigned(10, 10, &mut buffer), Ok("10"));
        assert_eq!(format_unsigned(35, 36, &mut buffer), Ok("z"));
        assert_eq!(format_unsigned(5, 2, &mut buffer), Ok("101"));
        assert_eq!(
            format_unsigned(u32::MAX, 2, &mut buffer),
            Ok("11111111111111111111111111111111")
        );
        assert_eq!(buffer[32], 0);
    }

    #[test]
    fn format_signed_values() {
        let mut buffer = [0u8; 12];
        assert_eq!(format_signed(-42, &mut buffer), Ok("-42"));
        assert_eq!(&buffer[..4], b"-42\0");
        assert_eq!(format_signed(7, &mut buffer), Ok("7"));
        assert_eq!(format_signed(i32::MIN, &mut buffer), Ok("-2147483648"));
    }

    #[test]
    fn formatted_text_is_the_buffer_prefix() {
        let mut buffer = [0xAAu8; FORMAT_BUFFER_LEN];
        let text = format_unsigned(0xdead, 16, &mut buffer).map(|s| (s.as_ptr(), s.len()));
        assert_eq!(text, Ok((buffer.as_ptr(), 4)));
        assert_eq!(&buffer[..5], b"dead\0");

        let text = format_signed(-1995, &mut buffer).map(|s| (s.as_ptr(), s.len()));
        assert_eq!(text, Ok((buffer.as_ptr(), 5)));
        assert_eq!(&buffer[..6], b"-1995\0");
    }

    #[test]
    fn format_rejects_bad_base_and_short_buffer() {
        let mut buffer = [0u8; 3];
        assert_eq!(
            format_unsigned(1, 1, &mut buffer).map_err(|e| e.error_type()),
            Err(HalErrorType::InvalidBase)
        );
        assert_eq!(
            format_unsigned(1, 37, &mut buffer).map_err(|e| e.error_type()),
            Err(HalErrorType::InvalidBase)
        );
        assert_eq!(
            format_unsigned(100, 10, &mut buffer).map_err(|e| e.error_type()),
            Err(HalErrorType::BufferTooSmall)
        );
        assert_eq!(
            format_signed(-10, &mut buffer[..2]).map_err(|e| e.error_type()),
            Err(HalErrorType::BufferTooSmall)
        );
        assert_eq!(
            format_signed(-1, &mut []).map_err(|e| e.error_type()),
            Err(HalErrorType::BufferTooSmall)
        );
    }

    #[test]
    fn parse_recovers_formatted_value() {
        let mut buffer = [0u8; FORMAT_BUFFER_LEN];
        let values = [0u32, 1, 9, 10, 15, 16, 255, 1000, 65_535, 0x8000_0000, u32::MAX];
        // letters above 'f' are not digits for the parser, so the round trip covers bases up to 16
        for base in 2..=16 {
            for &value in values.iter() {
                let text = format_unsigned(value, base, &mut buffer).map(|s| s.as_bytes().to_vec());
                let text = text.unwrap();
                assert_eq!(parse_all(&text, base), (0, value), "value {} base {}", value, base);
            }
        }
    }
}
