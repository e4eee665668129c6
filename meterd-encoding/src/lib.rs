//! Register byte codec for Modbus meter payloads
//!
//! Modbus transfers data as 16 bit registers in network byte order. Wider
//! values occupy consecutive registers; most devices keep the most
//! significant word first, some transmit the least significant word first
//! ("LSW-first"). This crate provides the decode/encode primitives for both
//! layouts plus the byte-pair-swapped text decode used by register-encoded
//! strings.
//!
//! All functions are pure and stateless and can be shared freely across
//! threads.

pub mod error;
pub mod number;
pub mod text;

pub use error::{EncodingError, EncodingResult};
pub use number::{
    decode_f32, decode_f32_lsw, decode_f64, decode_f64_lsw, decode_i16, decode_i32,
    decode_i32_lsw, decode_i64, decode_i64_lsw, decode_u16, decode_u32, decode_u32_lsw,
    decode_u64, decode_u64_lsw, encode_f32, encode_f32_lsw, encode_f64, encode_f64_lsw,
    encode_i16, encode_i32, encode_i32_lsw, encode_i64, encode_i64_lsw, encode_u16, encode_u32,
    encode_u32_lsw, encode_u64, encode_u64_lsw, words_to_bytes,
};
pub use text::decode_text_swapped;
