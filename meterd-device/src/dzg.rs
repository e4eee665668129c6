//! DZG Metering meters

use crate::producer::{Opcodes, Producer};
use meterd_core::{FunctionCode, Measurement, Operation, Scale, ValueKind};

/// DZG Metering GmbH DVH4013 meters
///
/// Unsigned double registers with per-group fixed scaling: voltages in
/// 1/100 V, currents and energy counters in thousandths, demand power in
/// 1/10 W.
pub struct Dzg {
    opcodes: Opcodes,
    probe: Operation,
}

impl Dzg {
    pub fn new() -> Self {
        use Measurement::*;
        let opcodes = Opcodes::new(&[
            (ImportPower, 0x0000),
            (ExportPower, 0x0002),
            (VoltageL1, 0x0004),
            (VoltageL2, 0x0006),
            (VoltageL3, 0x0008),
            (CurrentL1, 0x000a),
            (CurrentL2, 0x000c),
            (CurrentL3, 0x000e),
            (Cosphi, 0x0010),
            (Frequency, 0x0012),
            (Import, 0x4000),
            (ImportL1, 0x4020),
            (ImportL2, 0x4040),
            (ImportL3, 0x4060),
            (Export, 0x4100),
            (ExportL1, 0x4120),
            (ExportL2, 0x4140),
            (ExportL3, 0x4160),
        ]);

        let probe = opcodes
            .value(
                FunctionCode::ReadHolding,
                ValueKind::Uint32,
                VoltageL1,
                Scale::Fixed(-2),
            )
            .expect("probe register is mapped");

        Self { opcodes, probe }
    }

    fn value(&self, measurement: Measurement, exponent: i16) -> Option<Operation> {
        self.opcodes.value(
            FunctionCode::ReadHolding,
            ValueKind::Uint32,
            measurement,
            Scale::Fixed(exponent),
        )
    }
}

impl Default for Dzg {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for Dzg {
    fn device_type(&self) -> &'static str {
        "DZG"
    }

    fn description(&self) -> &'static str {
        "DZG Metering GmbH DVH4013 meters"
    }

    fn probe(&self) -> Operation {
        self.probe.clone()
    }

    fn produce(&self) -> Vec<Operation> {
        use Measurement::*;

        let voltages = [VoltageL1, VoltageL2, VoltageL3]
            .into_iter()
            .filter_map(|m| self.value(m, -2));

        let thousandths = [CurrentL1, CurrentL2, CurrentL3, Cosphi, Frequency]
            .into_iter()
            .filter_map(|m| self.value(m, -3));

        let power = [ImportPower, ExportPower]
            .into_iter()
            .filter_map(|m| self.value(m, -1));

        let energy = [
            Import, ImportL1, ImportL2, ImportL3, Export, ExportL1, ExportL2, ExportL3,
        ]
        .into_iter()
        .filter_map(|m| self.value(m, -3));

        voltages.chain(thousandths).chain(power).chain(energy).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meterd_core::OperationKind;

    #[test]
    fn test_produce_covers_all_opcodes() {
        let dzg = Dzg::new();
        assert_eq!(dzg.produce().len(), dzg.opcodes.len());
    }

    #[test]
    fn test_voltage_scaling() {
        let dzg = Dzg::new();
        let op = dzg
            .produce()
            .into_iter()
            .find(|op| {
                matches!(
                    op.kind,
                    OperationKind::Value {
                        measurement: Measurement::VoltageL1,
                        ..
                    }
                )
            })
            .unwrap();

        let OperationKind::Value { transform, .. } = op.kind else {
            unreachable!()
        };
        let value = transform.apply(&23112u32.to_be_bytes()).unwrap();
        assert!((value - 231.12).abs() < 1e-9);
    }
}
