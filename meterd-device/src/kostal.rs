//! Kostal SunSpec-compatible inverters

use crate::producer::{Opcodes, Producer};
use crate::sunspec::SunSpec;
use meterd_core::{Measurement, Operation, Scale, ValueKind};

/// Kostal SunSpec-compatible inverters (e.g. Pico IQ)
///
/// Register offsets per the Kostal Modbus/SunSpec interface description.
/// Every value register is followed by its own scale factor register, so
/// the reading cycle is built from single-measurement blocks.
pub struct Kostal {
    sunspec: SunSpec,
    probe: Operation,
}

impl Kostal {
    pub fn new() -> Self {
        use Measurement::*;
        let sunspec = SunSpec::new(Opcodes::new(&[
            (DcPower, 100),
            (Cosphi, 150),
            (Frequency, 152),
            (CurrentL1, 154),
            (PowerL1, 156),
            (VoltageL1, 158),
            (CurrentL2, 160),
            (PowerL2, 162),
            (VoltageL2, 164),
            (CurrentL3, 166),
            (PowerL3, 168),
            (VoltageL3, 170),
            (Power, 172),
            (ReactivePower, 174),
            (ApparentPower, 176),
        ]));

        let probe = sunspec
            .value(ValueKind::SunSpecUint16, VoltageL1, Scale::Fixed(-1))
            .expect("probe register is mapped");

        Self { sunspec, probe }
    }
}

impl Default for Kostal {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for Kostal {
    fn device_type(&self) -> &'static str {
        "KOSTAL"
    }

    fn description(&self) -> &'static str {
        "Kostal SunSpec-compatible inverters (e.g. Pico IQ)"
    }

    fn probe(&self) -> Operation {
        self.probe.clone()
    }

    fn produce(&self) -> Vec<Operation> {
        use Measurement::*;

        [
            CurrentL1, PowerL1, VoltageL1, CurrentL2, PowerL2, VoltageL2, CurrentL3, PowerL3,
            VoltageL3, Power, DcPower, Cosphi, Frequency,
        ]
        .into_iter()
        .filter_map(|m| self.sunspec.block16(ValueKind::SunSpecInt16, &[m]))
        .collect()
    }

    fn sun_spec(&self) -> Option<&SunSpec> {
        Some(&self.sunspec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meterd_core::{FunctionCode, OperationKind};

    #[test]
    fn test_probe() {
        let probe = Kostal::new().probe();
        assert_eq!(probe.function_code, FunctionCode::ReadHolding);
        assert_eq!(probe.address, 40157);
        assert_eq!(probe.count, 1);
    }

    #[test]
    fn test_produce_single_measurement_blocks() {
        let ops = Kostal::new().produce();
        assert_eq!(ops.len(), 13);
        for op in &ops {
            // one value register plus its scale factor
            assert_eq!(op.count, 2);
            assert!(matches!(op.kind, OperationKind::Block(_)));
        }
    }
}
