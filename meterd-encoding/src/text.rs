//! Byte-pair-swapped text decode
//!
//! Some registers carry text with the two characters of every register in
//! little endian order. Decoding swaps each adjacent byte pair of a copy of
//! the input before interpreting the result as text.

use crate::error::{EncodingError, EncodingResult};

/// Decode register bytes as text with each byte pair swapped
///
/// The caller's buffer is never modified. Input must consist of whole
/// register byte pairs; an odd length fails with
/// [`EncodingError::OddLength`].
pub fn decode_text_swapped(b: &[u8]) -> EncodingResult<String> {
    if b.len() % 2 != 0 {
        return Err(EncodingError::OddLength(b.len()));
    }

    let mut swapped = b.to_vec();
    for pair in swapped.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }

    Ok(String::from_utf8_lossy(&swapped).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_swapped() {
        assert_eq!(decode_text_swapped(b"BADC").unwrap(), "ABCD");
        assert_eq!(decode_text_swapped(b"").unwrap(), "");
    }

    #[test]
    fn test_input_is_not_modified() {
        let input = b"BADC".to_vec();
        let _ = decode_text_swapped(&input).unwrap();
        assert_eq!(input, b"BADC");
    }

    #[test]
    fn test_odd_length_fails() {
        assert_eq!(decode_text_swapped(b"BAD"), Err(EncodingError::OddLength(3)));
    }
}
