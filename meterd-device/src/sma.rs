//! SMA SunSpec-compatible inverters

use crate::producer::{Opcodes, Producer};
use crate::sunspec::SunSpec;
use meterd_core::{Measurement, Operation, Scale, ValueKind};

/// SMA SunSpec-compatible inverters (e.g. Sunny Boy or Tripower)
///
/// Register offsets per the SMA SunSpec Modbus technical information.
pub struct Sma {
    sunspec: SunSpec,
    probe: Operation,
}

impl Sma {
    pub fn new() -> Self {
        use Measurement::*;
        let sunspec = SunSpec::new(Opcodes::new(&[
            (Current, 188),
            (CurrentL1, 189),
            (CurrentL2, 190),
            (CurrentL3, 191),
            (VoltageL1, 196),
            (VoltageL2, 197),
            (VoltageL3, 198),
            (Power, 200),
            (Frequency, 202),
            (Cosphi, 208),
            (Export, 210),
            (DcPower, 217),
            (HeatSinkTemp, 219),
        ]));

        let probe = sunspec
            .value(ValueKind::SunSpecUint16, VoltageL1, Scale::Fixed(-1))
            .expect("probe register is mapped");

        Self { sunspec, probe }
    }
}

impl Default for Sma {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for Sma {
    fn device_type(&self) -> &'static str {
        "SMA"
    }

    fn description(&self) -> &'static str {
        "SMA SunSpec-compatible inverters (e.g. Sunny Boy or Tripower)"
    }

    fn probe(&self) -> Operation {
        self.probe.clone()
    }

    fn produce(&self) -> Vec<Operation> {
        use Measurement::*;
        use ValueKind::{SunSpecInt16, SunSpecUint16, SunSpecUint32};

        [
            self.sunspec
                .block16(SunSpecUint16, &[VoltageL1, VoltageL2, VoltageL3]),
            self.sunspec.block16(SunSpecUint16, &[Frequency]),
            self.sunspec
                .block16(SunSpecInt16, &[Current, CurrentL1, CurrentL2, CurrentL3]),
            self.sunspec.block16(SunSpecInt16, &[Cosphi]),
            self.sunspec.block16(SunSpecInt16, &[Power]),
            self.sunspec.block16(SunSpecInt16, &[DcPower]),
            self.sunspec.block16(SunSpecInt16, &[HeatSinkTemp]),
            // Wh counter reported in kWh
            self.sunspec.block32(SunSpecUint32, -3, &[Export]),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sun_spec(&self) -> Option<&SunSpec> {
        Some(&self.sunspec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meterd_core::OperationKind;

    #[test]
    fn test_voltage_block_span() {
        let ops = Sma::new().produce();
        // first operation is the L1..L3 voltage block
        assert_eq!(ops[0].address, 40195);
        assert_eq!(ops[0].count, 4);
    }

    #[test]
    fn test_export_block_is_double_width() {
        let ops = Sma::new().produce();
        let export = ops
            .iter()
            .find(|op| op.address == 40209)
            .expect("export block present");
        assert_eq!(export.count, 3);
        assert!(matches!(export.kind, OperationKind::Block(_)));
    }

    #[test]
    fn test_produce_is_ordered_and_stable() {
        let sma = Sma::new();
        assert_eq!(sma.produce(), sma.produce());
        assert_eq!(sma.produce().len(), 8);
    }
}
