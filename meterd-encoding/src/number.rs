//! Fixed-width numeric decode/encode in register byte order
//!
//! Decoders accept buffers that are at least as long as the target width;
//! extra trailing bytes are ignored so callers can decode at an offset into
//! a larger register block. A buffer shorter than the target width is a
//! boundary violation and fails with [`EncodingError::ShortBuffer`].

use crate::error::{EncodingError, EncodingResult};

fn ensure(b: &[u8], need: usize) -> EncodingResult<()> {
    if b.len() < need {
        return Err(EncodingError::ShortBuffer { need, got: b.len() });
    }
    Ok(())
}

/// Decode bytes as u16 in network byte order (big endian)
pub fn decode_u16(b: &[u8]) -> EncodingResult<u16> {
    ensure(b, 2)?;
    Ok(u16::from_be_bytes([b[0], b[1]]))
}

/// Decode bytes as i16 in network byte order (big endian)
pub fn decode_i16(b: &[u8]) -> EncodingResult<i16> {
    Ok(decode_u16(b)? as i16)
}

/// Decode bytes as u32 in network byte order (big endian)
pub fn decode_u32(b: &[u8]) -> EncodingResult<u32> {
    ensure(b, 4)?;
    Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Decode bytes as i32 in network byte order (big endian)
pub fn decode_i32(b: &[u8]) -> EncodingResult<i32> {
    Ok(decode_u32(b)? as i32)
}

/// Decode bytes as u64 in network byte order (big endian)
pub fn decode_u64(b: &[u8]) -> EncodingResult<u64> {
    ensure(b, 8)?;
    Ok(u64::from_be_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ]))
}

/// Decode bytes as i64 in network byte order (big endian)
pub fn decode_i64(b: &[u8]) -> EncodingResult<i64> {
    Ok(decode_u64(b)? as i64)
}

/// Decode bytes as IEEE 754 float32 in network byte order (big endian)
pub fn decode_f32(b: &[u8]) -> EncodingResult<f32> {
    Ok(f32::from_bits(decode_u32(b)?))
}

/// Decode bytes as IEEE 754 float64 in network byte order (big endian)
pub fn decode_f64(b: &[u8]) -> EncodingResult<f64> {
    Ok(f64::from_bits(decode_u64(b)?))
}

/// Decode bytes as u32 with the least significant 16 bit word first
pub fn decode_u32_lsw(b: &[u8]) -> EncodingResult<u32> {
    ensure(b, 4)?;
    Ok(u32::from_be_bytes([b[2], b[3], b[0], b[1]]))
}

/// Decode bytes as i32 with the least significant 16 bit word first
pub fn decode_i32_lsw(b: &[u8]) -> EncodingResult<i32> {
    Ok(decode_u32_lsw(b)? as i32)
}

/// Decode bytes as IEEE 754 float32 with the least significant word first
pub fn decode_f32_lsw(b: &[u8]) -> EncodingResult<f32> {
    Ok(f32::from_bits(decode_u32_lsw(b)?))
}

/// Decode bytes as u64 with the least significant 16 bit word first
pub fn decode_u64_lsw(b: &[u8]) -> EncodingResult<u64> {
    ensure(b, 8)?;
    Ok(u64::from_be_bytes([
        b[6], b[7], b[4], b[5], b[2], b[3], b[0], b[1],
    ]))
}

/// Decode bytes as i64 with the least significant 16 bit word first
pub fn decode_i64_lsw(b: &[u8]) -> EncodingResult<i64> {
    Ok(decode_u64_lsw(b)? as i64)
}

/// Decode bytes as IEEE 754 float64 with the least significant word first
pub fn decode_f64_lsw(b: &[u8]) -> EncodingResult<f64> {
    Ok(f64::from_bits(decode_u64_lsw(b)?))
}

/// Encode u16 in network byte order (big endian)
pub fn encode_u16(v: u16) -> [u8; 2] {
    v.to_be_bytes()
}

/// Encode i16 in network byte order (big endian)
pub fn encode_i16(v: i16) -> [u8; 2] {
    v.to_be_bytes()
}

/// Encode u32 in network byte order (big endian)
pub fn encode_u32(v: u32) -> [u8; 4] {
    v.to_be_bytes()
}

/// Encode i32 in network byte order (big endian)
pub fn encode_i32(v: i32) -> [u8; 4] {
    v.to_be_bytes()
}

/// Encode u64 in network byte order (big endian)
pub fn encode_u64(v: u64) -> [u8; 8] {
    v.to_be_bytes()
}

/// Encode i64 in network byte order (big endian)
pub fn encode_i64(v: i64) -> [u8; 8] {
    v.to_be_bytes()
}

/// Encode IEEE 754 float32 in network byte order (big endian)
pub fn encode_f32(v: f32) -> [u8; 4] {
    v.to_bits().to_be_bytes()
}

/// Encode IEEE 754 float64 in network byte order (big endian)
pub fn encode_f64(v: f64) -> [u8; 8] {
    v.to_bits().to_be_bytes()
}

/// Encode u32 with the least significant 16 bit word first
pub fn encode_u32_lsw(v: u32) -> [u8; 4] {
    let b = v.to_be_bytes();
    [b[2], b[3], b[0], b[1]]
}

/// Encode i32 with the least significant 16 bit word first
pub fn encode_i32_lsw(v: i32) -> [u8; 4] {
    encode_u32_lsw(v as u32)
}

/// Encode IEEE 754 float32 with the least significant word first
pub fn encode_f32_lsw(v: f32) -> [u8; 4] {
    encode_u32_lsw(v.to_bits())
}

/// Encode u64 with the least significant 16 bit word first
pub fn encode_u64_lsw(v: u64) -> [u8; 8] {
    let b = v.to_be_bytes();
    [b[6], b[7], b[4], b[5], b[2], b[3], b[0], b[1]]
}

/// Encode i64 with the least significant 16 bit word first
pub fn encode_i64_lsw(v: i64) -> [u8; 8] {
    encode_u64_lsw(v as u64)
}

/// Encode IEEE 754 float64 with the least significant word first
pub fn encode_f64_lsw(v: f64) -> [u8; 8] {
    encode_u64_lsw(v.to_bits())
}

/// Flatten 16 bit registers to their network byte order representation
pub fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 2);
    for w in words {
        bytes.extend_from_slice(&w.to_be_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_round_trip() {
        assert_eq!(decode_u16(&encode_u16(0x1234)).unwrap(), 0x1234);
        assert_eq!(decode_i16(&encode_i16(-12345)).unwrap(), -12345);
        assert_eq!(decode_u32(&encode_u32(0x12345678)).unwrap(), 0x12345678);
        assert_eq!(decode_i32(&encode_i32(-19_088_744)).unwrap(), -19_088_744);
        assert_eq!(
            decode_u64(&encode_u64(0x1234_5678_9abc_def0)).unwrap(),
            0x1234_5678_9abc_def0
        );
        assert_eq!(decode_i64(&encode_i64(i64::MIN + 1)).unwrap(), i64::MIN + 1);
        assert_eq!(decode_f32(&encode_f32(230.25)).unwrap(), 230.25);
        assert_eq!(decode_f64(&encode_f64(-0.001)).unwrap(), -0.001);
    }

    #[test]
    fn test_lsw_round_trip() {
        assert_eq!(
            decode_u32_lsw(&encode_u32_lsw(0x12345678)).unwrap(),
            0x12345678
        );
        assert_eq!(decode_i32_lsw(&encode_i32_lsw(-1)).unwrap(), -1);
        assert_eq!(decode_f32_lsw(&encode_f32_lsw(49.98)).unwrap(), 49.98);
        assert_eq!(
            decode_u64_lsw(&encode_u64_lsw(0x1234_5678_9abc_def0)).unwrap(),
            0x1234_5678_9abc_def0
        );
        assert_eq!(decode_i64_lsw(&encode_i64_lsw(i64::MIN)).unwrap(), i64::MIN);
        assert_eq!(decode_f64_lsw(&encode_f64_lsw(1.5e300)).unwrap(), 1.5e300);
    }

    #[test]
    fn test_lsw_word_order() {
        // 0x12345678 LSW-first: low word 0x5678 transmitted before 0x1234
        assert_eq!(encode_u32_lsw(0x12345678), [0x56, 0x78, 0x12, 0x34]);
        assert_eq!(decode_u32_lsw(&[0x56, 0x78, 0x12, 0x34]).unwrap(), 0x12345678);
        assert_eq!(
            encode_u64_lsw(0x1234_5678_9abc_def0),
            [0xde, 0xf0, 0x9a, 0xbc, 0x56, 0x78, 0x12, 0x34]
        );
    }

    #[test]
    fn test_decode_at_offset_ignores_trailing_bytes() {
        let block = [0x00, 0x64, 0x00, 0xc8, 0xff, 0xff];
        assert_eq!(decode_u16(&block[2..]).unwrap(), 200);
    }

    #[test]
    fn test_short_buffer_fails() {
        assert_eq!(
            decode_u16(&[0x12]),
            Err(EncodingError::ShortBuffer { need: 2, got: 1 })
        );
        assert_eq!(
            decode_u32(&[0x12, 0x34]),
            Err(EncodingError::ShortBuffer { need: 4, got: 2 })
        );
        assert_eq!(
            decode_u64_lsw(&[0; 7]),
            Err(EncodingError::ShortBuffer { need: 8, got: 7 })
        );
        assert!(decode_f64(&[0; 4]).is_err());
    }

    #[test]
    fn test_words_to_bytes() {
        assert_eq!(
            words_to_bytes(&[0x1234, 0x5678]),
            vec![0x12, 0x34, 0x56, 0x78]
        );
        assert!(words_to_bytes(&[]).is_empty());
    }
}
