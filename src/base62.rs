//! Base62 codec used for fixed-length string ids
//!
//! Digits are `0-9A-Za-z`, most significant first. Padding with the zero
//! digit keeps the mapping injective for a fixed width.
use once_cell::sync::Lazy;

/// Character set for base62 encoding (0-9, A-Z, a-z)
const BASE62_CHARS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Lookup table for decoding base62 characters to their values
static DECODE_MAP: Lazy<[i8; 256]> = Lazy::new(|| {
    let mut map = [-1i8; 256];
    for (i, &c) in BASE62_CHARS.iter().enumerate() {
        map[c as usize] = i as i8;
    }
    map
});

/// Maximum length of a base62 encoded u64 (11 characters)
pub const MAX_LEN: usize = 11;

/// Encode into a stack buffer, returning the buffer and the start of the
/// significant digits
#[inline]
fn encode_digits(mut value: u64) -> ([u8; MAX_LEN], usize) {
    let mut buffer = [b'0'; MAX_LEN];
    let mut position = MAX_LEN;

    loop {
        position -= 1;
        buffer[position] = BASE62_CHARS[(value % 62) as usize];
        value /= 62;
        if value == 0 {
            break;
        }
    }

    (buffer, position)
}

/// Encode a value to its shortest base62 form
pub fn encode(value: u64) -> String {
    let (buffer, position) = encode_digits(value);
    buffer[position..].iter().map(|&b| b as char).collect()
}

/// Encode a value left-padded with `'0'` to exactly `width` characters
///
/// Returns `None` when the value needs more than `width` digits.
pub fn encode_padded(value: u64, width: usize) -> Option<String> {
    let (buffer, position) = encode_digits(value);
    let digits = &buffer[position..];
    if digits.len() > width {
        return None;
    }

    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat_n('0', width - digits.len()));
    out.extend(digits.iter().map(|&b| b as char));
    Some(out)
}

/// Decode a base62 string (padded or not) back to its value
pub fn decode(encoded: &str) -> Result<u64, DecodeError> {
    if encoded.is_empty() {
        return Err(DecodeError::EmptyString);
    }

    encoded.bytes().try_fold(0u64, |acc, c| {
        let value = DECODE_MAP[c as usize];
        if value == -1 {
            return Err(DecodeError::InvalidCharacter(c as char));
        }
        acc.checked_mul(62)
            .and_then(|v| v.checked_add(value as u64))
            .ok_or(DecodeError::Overflow)
    })
}

/// Errors that can occur during base62 decoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input string is empty
    #[error("Cannot decode an empty string")]
    EmptyString,

    /// The input string contains an invalid character
    #[error("Invalid base62 character: {0}")]
    InvalidCharacter(char),

    /// The decoded value would overflow a u64
    #[error("Decoded value would overflow u64")]
    Overflow,
}
