//! Janitza MID B-series meters

use crate::producer::{Opcodes, Producer};
use meterd_core::{FunctionCode, Measurement, Operation, Scale, Transform, ValueKind};

/// Janitza MID B-series meters (e.g. B23)
///
/// All values are IEEE 754 floats in holding registers.
pub struct Janitza {
    opcodes: Opcodes,
    probe: Operation,
}

impl Janitza {
    pub fn new() -> Self {
        use Measurement::*;
        let opcodes = Opcodes::new(&[
            (VoltageL1, 0x4a38),
            (VoltageL2, 0x4a3a),
            (VoltageL3, 0x4a3c),
            (CurrentL1, 0x4a44),
            (CurrentL2, 0x4a46),
            (CurrentL3, 0x4a48),
            (PowerL1, 0x4a4c),
            (PowerL2, 0x4a4e),
            (PowerL3, 0x4a50),
            (CosphiL1, 0x4a64),
            (CosphiL2, 0x4a66),
            (CosphiL3, 0x4a68),
            (ImportL1, 0x4a76),
            (ImportL2, 0x4a78),
            (ImportL3, 0x4a7a),
            (Import, 0x4a7c),
            (ExportL1, 0x4a7e),
            (ExportL2, 0x4a80),
            (ExportL3, 0x4a82),
            (Export, 0x4a84),
        ]);

        let probe = Operation::value(
            FunctionCode::ReadHolding,
            0x4a38,
            2,
            VoltageL1,
            Transform::raw(ValueKind::Float32),
        );

        Self { opcodes, probe }
    }
}

impl Default for Janitza {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for Janitza {
    fn device_type(&self) -> &'static str {
        "JANITZA"
    }

    fn description(&self) -> &'static str {
        "Janitza MID B-Series meters"
    }

    fn probe(&self) -> Operation {
        self.probe.clone()
    }

    fn produce(&self) -> Vec<Operation> {
        self.opcodes
            .measurements()
            .filter_map(|m| {
                self.opcodes.value(
                    FunctionCode::ReadHolding,
                    ValueKind::Float32,
                    m,
                    Scale::None,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_produce_covers_all_opcodes() {
        let janitza = Janitza::new();
        assert_eq!(janitza.produce().len(), janitza.opcodes.len());
    }

    #[test]
    fn test_probe() {
        let probe = Janitza::new().probe();
        assert_eq!(probe.address, 0x4a38);
        assert_eq!(probe.function_code, FunctionCode::ReadHolding);
    }
}
