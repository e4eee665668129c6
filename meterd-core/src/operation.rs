//! Operation model: register reads and their value decoding
//!
//! An [`Operation`] describes one physical bus read: a function code, a
//! 0-based absolute register address and a register count, together with
//! exactly one way to decode the response — either a [`Transform`] that
//! yields a single value for one measurement, or a [`Splitter`] that breaks
//! a register block into several measurements sharing one scale factor.
//!
//! SunSpec devices mark unavailable readings with sentinel bit patterns
//! (0xFFFF, 0x8000, 0xFFFFFFFF and the wider equivalents). The SunSpec
//! value kinds decode those patterns to NaN; splitters drop NaN results,
//! direct transforms hand NaN to the caller to filter.

use crate::error::{MeterError, MeterResult};
use crate::measurement::Measurement;
use meterd_encoding as encoding;
use serde::{Deserialize, Serialize};

/// Modbus function code used for register reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionCode {
    ReadHolding,
    ReadInput,
}

impl FunctionCode {
    /// Wire value of the function code
    pub fn code(&self) -> u8 {
        match self {
            FunctionCode::ReadHolding => 3,
            FunctionCode::ReadInput => 4,
        }
    }
}

/// Natural register type of a raw value
///
/// The `SunSpec*` kinds apply the sentinel-to-NaN mapping on top of the
/// plain big endian decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Uint16,
    Int16,
    Uint32,
    Int32,
    Uint64,
    Int64,
    Float32,
    Float64,
    Uint32LswFirst,
    Int32LswFirst,
    Float32LswFirst,
    Uint64LswFirst,
    Int64LswFirst,
    Float64LswFirst,
    SunSpecUint16,
    SunSpecInt16,
    SunSpecUint32,
    SunSpecInt32,
    SunSpecUint64,
    SunSpecInt64,
}

impl ValueKind {
    /// Width of the encoded value in bytes
    pub fn size(&self) -> usize {
        use ValueKind::*;
        match self {
            Uint16 | Int16 | SunSpecUint16 | SunSpecInt16 => 2,
            Uint32 | Int32 | Float32 | Uint32LswFirst | Int32LswFirst | Float32LswFirst
            | SunSpecUint32 | SunSpecInt32 => 4,
            Uint64 | Int64 | Float64 | Uint64LswFirst | Int64LswFirst | Float64LswFirst
            | SunSpecUint64 | SunSpecInt64 => 8,
        }
    }

    /// Number of 16 bit registers the value occupies
    pub fn registers(&self) -> u16 {
        (self.size() / 2) as u16
    }

    /// Decode the raw value at the start of `b`
    ///
    /// SunSpec kinds return NaN for the "unavailable" sentinel patterns.
    /// Fails if `b` is shorter than the value width.
    pub fn decode(&self, b: &[u8]) -> MeterResult<f64> {
        use ValueKind::*;
        let value = match self {
            Uint16 => encoding::decode_u16(b)? as f64,
            Int16 => encoding::decode_i16(b)? as f64,
            Uint32 => encoding::decode_u32(b)? as f64,
            Int32 => encoding::decode_i32(b)? as f64,
            Uint64 => encoding::decode_u64(b)? as f64,
            Int64 => encoding::decode_i64(b)? as f64,
            Float32 => encoding::decode_f32(b)? as f64,
            Float64 => encoding::decode_f64(b)?,
            Uint32LswFirst => encoding::decode_u32_lsw(b)? as f64,
            Int32LswFirst => encoding::decode_i32_lsw(b)? as f64,
            Float32LswFirst => encoding::decode_f32_lsw(b)? as f64,
            Uint64LswFirst => encoding::decode_u64_lsw(b)? as f64,
            Int64LswFirst => encoding::decode_i64_lsw(b)? as f64,
            Float64LswFirst => encoding::decode_f64_lsw(b)?,
            SunSpecUint16 => match encoding::decode_u16(b)? {
                0xffff => f64::NAN,
                u => u as f64,
            },
            SunSpecInt16 => match encoding::decode_u16(b)? {
                0x8000 => f64::NAN,
                u => u as i16 as f64,
            },
            SunSpecUint32 => match encoding::decode_u32(b)? {
                0xffff_ffff => f64::NAN,
                u => u as f64,
            },
            SunSpecInt32 => match encoding::decode_u32(b)? {
                0x8000_0000 => f64::NAN,
                u => u as i32 as f64,
            },
            SunSpecUint64 => match encoding::decode_u64(b)? {
                0xffff_ffff_ffff_ffff => f64::NAN,
                u => u as f64,
            },
            SunSpecInt64 => match encoding::decode_u64(b)? {
                0x8000_0000_0000_0000 => f64::NAN,
                u => u as i64 as f64,
            },
        };
        Ok(value)
    }
}

/// Power-of-ten scaling applied to a decoded raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// No scaling
    None,
    /// Exponent fixed at producer construction time: value = raw × 10^k
    Fixed(i16),
    /// Signed 16 bit exponent read from a byte offset of the same response
    /// at query time
    Embedded { offset: usize },
}

impl Scale {
    fn factor(&self, b: &[u8]) -> MeterResult<f64> {
        match self {
            Scale::None => Ok(1.0),
            Scale::Fixed(k) => Ok(10f64.powi(*k as i32)),
            Scale::Embedded { offset } => {
                let bytes = b
                    .get(*offset..)
                    .ok_or(MeterError::ShortBlock {
                        need: offset + 2,
                        got: b.len(),
                    })?;
                let exponent = encoding::decode_i16(bytes)?;
                Ok(10f64.powi(exponent as i32))
            }
        }
    }
}

/// Converts the raw bytes of a single-value read into a physical value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub kind: ValueKind,
    pub scale: Scale,
}

impl Transform {
    /// Transform that decodes the natural type without scaling
    pub fn raw(kind: ValueKind) -> Self {
        Self {
            kind,
            scale: Scale::None,
        }
    }

    /// Transform with a fixed power-of-ten exponent
    pub fn scaled(kind: ValueKind, exponent: i16) -> Self {
        Self {
            kind,
            scale: Scale::Fixed(exponent),
        }
    }

    /// Transform whose exponent is embedded in the response buffer
    pub fn embedded(kind: ValueKind, offset: usize) -> Self {
        Self {
            kind,
            scale: Scale::Embedded { offset },
        }
    }

    /// Apply the transform to a response buffer
    ///
    /// A sentinel raw value stays NaN; scaling never turns it into a
    /// finite number.
    pub fn apply(&self, b: &[u8]) -> MeterResult<f64> {
        let raw = self.kind.decode(b)?;
        if raw.is_nan() {
            return Ok(f64::NAN);
        }
        Ok(raw * self.scale.factor(b)?)
    }
}

/// One element of a splitter's output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitResult {
    /// Absolute register address the value was read from
    pub address: u16,
    pub measurement: Measurement,
    pub value: f64,
}

/// Splits a register block with a trailing scale factor into measurements
///
/// The block spans the `[min, max]` register addresses of its composite
/// measurements plus one trailing signed 16 bit exponent register. Each
/// measurement sits at byte offset `size × (address − min)` within the
/// block.
#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
    kind: ValueKind,
    /// Absolute address of the first value register of the block
    block_address: u16,
    /// Minimum producer-map address among the composite measurements
    base: u16,
    /// Fixed exponent applied on top of the block scale factor
    extra_exponent: i16,
    measurements: Vec<(Measurement, u16)>,
}

impl Splitter {
    pub fn new(
        kind: ValueKind,
        block_address: u16,
        base: u16,
        extra_exponent: i16,
        measurements: Vec<(Measurement, u16)>,
    ) -> Self {
        Self {
            kind,
            block_address,
            base,
            extra_exponent,
            measurements,
        }
    }

    /// Split a response buffer into individual readings
    ///
    /// Readings whose raw pattern decodes to NaN are omitted.
    pub fn split(&self, b: &[u8]) -> MeterResult<Vec<SplitResult>> {
        if b.len() < 2 {
            return Err(MeterError::ShortBlock {
                need: 2,
                got: b.len(),
            });
        }

        // scale factor is the last register of the block
        let exponent = encoding::decode_i16(&b[b.len() - 2..])?;
        let scaler = 10f64.powi((exponent + self.extra_exponent) as i32);

        let mut results = Vec::with_capacity(self.measurements.len());
        for (measurement, address) in &self.measurements {
            let offset = self.kind.size() * (*address - self.base) as usize;
            let bytes = b.get(offset..).ok_or(MeterError::ShortBlock {
                need: offset + self.kind.size(),
                got: b.len(),
            })?;

            let raw = self.kind.decode(bytes)?;
            if raw.is_nan() {
                continue;
            }

            results.push(SplitResult {
                address: self.block_address + (address - self.base),
                measurement: *measurement,
                value: scaler * raw,
            });
        }

        Ok(results)
    }
}

/// How an operation's response bytes are decoded
#[derive(Debug, Clone, PartialEq)]
pub enum OperationKind {
    /// Single value for one measurement
    Value {
        measurement: Measurement,
        transform: Transform,
    },
    /// Register block split into several measurements
    Block(Splitter),
}

/// A physical bus operation: what to read and how to decode it
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub function_code: FunctionCode,
    /// 0-based absolute register address
    pub address: u16,
    /// Number of 16 bit registers to read
    pub count: u16,
    pub kind: OperationKind,
}

impl Operation {
    /// Operation decoding a single value
    pub fn value(
        function_code: FunctionCode,
        address: u16,
        count: u16,
        measurement: Measurement,
        transform: Transform,
    ) -> Self {
        Self {
            function_code,
            address,
            count,
            kind: OperationKind::Value {
                measurement,
                transform,
            },
        }
    }

    /// Operation decoding a register block
    pub fn block(function_code: FunctionCode, address: u16, count: u16, splitter: Splitter) -> Self {
        Self {
            function_code,
            address,
            count,
            kind: OperationKind::Block(splitter),
        }
    }
}
