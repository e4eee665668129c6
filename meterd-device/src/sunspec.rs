//! Shared decoding logic for SunSpec-compliant devices
//!
//! SunSpec devices expose a discoverable common information block at a
//! well-known base register and model blocks whose registers share a
//! per-block scale factor. The register offsets below follow the SunSpec
//! documentation, which numbers registers starting at 1; operations adjust
//! them to protocol addresses as `base + offset − 1`.

use crate::producer::Opcodes;
use meterd_core::{
    DeviceDescriptor, FunctionCode, Measurement, MeterError, MeterResult, Operation, Scale,
    Splitter, Transform, ValueKind,
};
use meterd_encoding as encoding;

/// Absolute base register of the SunSpec register map
pub const SUNSPEC_BASE: u16 = 40000;

/// Size of the common information block in registers
const COMMON_BLOCK_REGS: u16 = 69;

/// "SunS" marker leading the common block
const SIGNATURE: u32 = 0x5375_6e53;

// 1-based register offsets and lengths of the common block text fields
const MANUFACTURER: (u16, u16) = (5, 16);
const MODEL: (u16, u16) = (21, 16);
const OPTIONS: (u16, u16) = (37, 8);
const VERSION: (u16, u16) = (45, 8);
const SERIAL: (u16, u16) = (53, 16);

/// Shared state of a SunSpec-compliant producer: its register map
#[derive(Debug, Clone)]
pub struct SunSpec {
    opcodes: Opcodes,
}

impl SunSpec {
    pub fn new(opcodes: Opcodes) -> Self {
        Self { opcodes }
    }

    pub fn opcodes(&self) -> &Opcodes {
        &self.opcodes
    }

    /// Register read covering the common information block
    ///
    /// The response must lead with the "SunS" signature and is decoded by
    /// [`SunSpec::decode_common_block`].
    pub fn common_block_read() -> (FunctionCode, u16, u16) {
        (FunctionCode::ReadHolding, SUNSPEC_BASE, COMMON_BLOCK_REGS)
    }

    /// Decode the common information block into a device descriptor
    ///
    /// Fails with a length error if the buffer is shorter than the block
    /// and with a signature error if the leading 32 bits are not "SunS".
    pub fn decode_common_block(b: &[u8]) -> MeterResult<DeviceDescriptor> {
        let need = 2 * COMMON_BLOCK_REGS as usize;
        if b.len() < need {
            return Err(MeterError::ShortBlock {
                need,
                got: b.len(),
            });
        }

        let signature = encoding::decode_u32(b)?;
        if signature != SIGNATURE {
            return Err(MeterError::Signature(signature));
        }

        Ok(DeviceDescriptor {
            manufacturer: Self::text_field(b, MANUFACTURER)?,
            model: Self::text_field(b, MODEL)?,
            options: Self::text_field(b, OPTIONS)?,
            version: Self::text_field(b, VERSION)?,
            serial: Self::text_field(b, SERIAL)?,
        })
    }

    fn text_field(b: &[u8], (reg, len): (u16, u16)) -> MeterResult<String> {
        let start = 2 * (reg - 1) as usize;
        let end = 2 * (reg + len - 1) as usize;
        let text = encoding::decode_text_swapped(&b[start..end])?;
        Ok(text.trim_end_matches(|c| c == ' ' || c == '\0').to_string())
    }

    /// Single-register operation with the documentation address adjustment
    pub fn value(
        &self,
        kind: ValueKind,
        measurement: Measurement,
        scale: Scale,
    ) -> Option<Operation> {
        let offset = self.opcodes.get(measurement)?;
        Some(Operation::value(
            FunctionCode::ReadHolding,
            SUNSPEC_BASE + offset - 1,
            kind.registers(),
            measurement,
            Transform { kind, scale },
        ))
    }

    /// Block operation over single-register values plus the trailing scale
    /// factor register
    pub fn block16(&self, kind: ValueKind, measurements: &[Measurement]) -> Option<Operation> {
        let (entries, min, max) = self.block_entries(measurements)?;

        let splitter = Splitter::new(kind, SUNSPEC_BASE + min - 1, min, 0, entries);
        Some(Operation::block(
            FunctionCode::ReadHolding,
            SUNSPEC_BASE + min - 1,
            max - min + 2, // registers plus int16 scale factor
            splitter,
        ))
    }

    /// Block operation over double-register values plus the trailing scale
    /// factor register
    ///
    /// `extra_exponent` is applied on top of the block scale factor, e.g.
    /// −3 for Wh counters reported in kWh.
    pub fn block32(
        &self,
        kind: ValueKind,
        extra_exponent: i16,
        measurements: &[Measurement],
    ) -> Option<Operation> {
        let (entries, min, max) = self.block_entries(measurements)?;

        let splitter = Splitter::new(kind, SUNSPEC_BASE + min - 1, min, extra_exponent, entries);
        Some(Operation::block(
            FunctionCode::ReadHolding,
            SUNSPEC_BASE + min - 1,
            (max - min + 1) * 2 + 1,
            splitter,
        ))
    }

    fn block_entries(
        &self,
        measurements: &[Measurement],
    ) -> Option<(Vec<(Measurement, u16)>, u16, u16)> {
        let entries: Vec<(Measurement, u16)> = measurements
            .iter()
            .filter_map(|m| self.opcodes.get(*m).map(|address| (*m, address)))
            .collect();

        let min = entries.iter().map(|(_, a)| *a).min()?;
        let max = entries.iter().map(|(_, a)| *a).max()?;
        Some((entries, min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meterd_core::OperationKind;

    fn common_block(manufacturer: &str, model: &str, serial: &str) -> Vec<u8> {
        let mut b = vec![0u8; 2 * COMMON_BLOCK_REGS as usize];
        b[..4].copy_from_slice(&SIGNATURE.to_be_bytes());
        write_field(&mut b, MANUFACTURER, manufacturer);
        write_field(&mut b, MODEL, model);
        write_field(&mut b, SERIAL, serial);
        b
    }

    // encode a text field the way devices transmit it: byte pairs swapped
    fn write_field(b: &mut [u8], (reg, len): (u16, u16), text: &str) {
        let start = 2 * (reg - 1) as usize;
        let mut field = vec![0u8; 2 * len as usize];
        field[..text.len()].copy_from_slice(text.as_bytes());
        for pair in field.chunks_exact_mut(2) {
            pair.swap(0, 1);
        }
        b[start..start + field.len()].copy_from_slice(&field);
    }

    fn test_core() -> SunSpec {
        SunSpec::new(Opcodes::new(&[
            (Measurement::VoltageL1, 196),
            (Measurement::VoltageL2, 197),
            (Measurement::VoltageL3, 198),
            (Measurement::Export, 210),
        ]))
    }

    #[test]
    fn test_decode_common_block() {
        let b = common_block("Acme Energy", "INV-3000", "A123456 ");
        let descriptor = SunSpec::decode_common_block(&b).unwrap();
        assert_eq!(descriptor.manufacturer, "Acme Energy");
        assert_eq!(descriptor.model, "INV-3000");
        assert_eq!(descriptor.serial, "A123456");
        assert_eq!(descriptor.options, "");
    }

    #[test]
    fn test_bad_signature() {
        let mut b = common_block("Acme", "X", "1");
        b[..4].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(
            SunSpec::decode_common_block(&b),
            Err(MeterError::Signature(0xdeadbeef))
        ));
    }

    #[test]
    fn test_short_block() {
        let b = common_block("Acme", "X", "1");
        assert!(matches!(
            SunSpec::decode_common_block(&b[..40]),
            Err(MeterError::ShortBlock { .. })
        ));
    }

    #[test]
    fn test_value_address_adjustment() {
        let op = test_core()
            .value(ValueKind::SunSpecUint16, Measurement::VoltageL1, Scale::Fixed(-1))
            .unwrap();
        assert_eq!(op.address, 40195);
        assert_eq!(op.count, 1);
    }

    #[test]
    fn test_block16_span() {
        let op = test_core()
            .block16(
                ValueKind::SunSpecUint16,
                &[
                    Measurement::VoltageL1,
                    Measurement::VoltageL2,
                    Measurement::VoltageL3,
                ],
            )
            .unwrap();
        assert_eq!(op.address, 40195);
        assert_eq!(op.count, 4); // three registers plus scale factor
        assert!(matches!(op.kind, OperationKind::Block(_)));
    }

    #[test]
    fn test_block32_span() {
        let op = test_core()
            .block32(ValueKind::SunSpecUint32, -3, &[Measurement::Export])
            .unwrap();
        assert_eq!(op.address, 40209);
        assert_eq!(op.count, 3); // one double register plus scale factor
    }

    #[test]
    fn test_unmapped_measurements_yield_no_operation() {
        assert!(test_core().value(ValueKind::SunSpecInt16, Measurement::Power, Scale::None).is_none());
        assert!(test_core().block16(ValueKind::SunSpecInt16, &[Measurement::Power]).is_none());
    }
}
