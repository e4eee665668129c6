//! Eastron SDM meters

use crate::producer::{Opcodes, Producer};
use meterd_core::{FunctionCode, Measurement, Operation, Scale, Transform, ValueKind};

/// Eastron SDM630 three-phase meters
///
/// The opcode set is to a large extent a superset of all SDM devices;
/// some registers are absent on the smaller models. All values are IEEE
/// 754 floats in input registers.
pub struct Sdm {
    opcodes: Opcodes,
    probe: Operation,
}

impl Sdm {
    pub fn new() -> Self {
        use Measurement::*;
        let opcodes = Opcodes::new(&[
            (VoltageL1, 0x0000),
            (VoltageL2, 0x0002),
            (VoltageL3, 0x0004),
            (CurrentL1, 0x0006),
            (CurrentL2, 0x0008),
            (CurrentL3, 0x000a),
            (PowerL1, 0x000c),
            (PowerL2, 0x000e),
            (PowerL3, 0x0010),
            (CosphiL1, 0x001e),
            (CosphiL2, 0x0020),
            (CosphiL3, 0x0022),
            (Power, 0x0034),
            (ApparentPower, 0x0038),
            (ReactivePower, 0x003c),
            (Cosphi, 0x003e),
            (Frequency, 0x0046),
            (Import, 0x0048),
            (Export, 0x004a),
            (ImportPower, 0x0054),
            (ThdL1, 0x00ea),
            (ThdL2, 0x00ec),
            (ThdL3, 0x00ee),
            (Thd, 0x00f8),
            (Sum, 0x0156),
            (ImportL1, 0x015a),
            (ImportL2, 0x015c),
            (ImportL3, 0x015e),
            (ExportL1, 0x0160),
            (ExportL2, 0x0162),
            (ExportL3, 0x0164),
            (SumL1, 0x0166),
            (SumL2, 0x0168),
            (SumL3, 0x016a),
        ]);

        let probe = Operation::value(
            FunctionCode::ReadInput,
            0x0000,
            2,
            VoltageL1,
            Transform::raw(ValueKind::Float32),
        );

        Self { opcodes, probe }
    }
}

impl Default for Sdm {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for Sdm {
    fn device_type(&self) -> &'static str {
        "SDM"
    }

    fn description(&self) -> &'static str {
        "Eastron SDM630"
    }

    fn probe(&self) -> Operation {
        self.probe.clone()
    }

    fn produce(&self) -> Vec<Operation> {
        self.opcodes
            .measurements()
            .filter_map(|m| {
                self.opcodes.value(
                    FunctionCode::ReadInput,
                    ValueKind::Float32,
                    m,
                    Scale::None,
                )
            })
            .collect()
    }
}
