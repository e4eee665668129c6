//! SolarEdge SunSpec-compatible inverters

use crate::producer::{Opcodes, Producer};
use crate::sunspec::SunSpec;
use meterd_core::{Measurement, Operation, Scale, ValueKind};

/// SolarEdge SunSpec-compatible inverters (e.g. SolarEdge 9k)
///
/// Register offsets per the SolarEdge SunSpec implementation note; these
/// follow the standard inverter model layout.
pub struct SolarEdge {
    sunspec: SunSpec,
    probe: Operation,
}

impl SolarEdge {
    pub fn new() -> Self {
        use Measurement::*;
        let sunspec = SunSpec::new(Opcodes::new(&[
            (Current, 72),
            (CurrentL1, 73),
            (CurrentL2, 74),
            (CurrentL3, 75),
            (VoltageL1, 80),
            (VoltageL2, 81),
            (VoltageL3, 82),
            (Power, 84),
            (Frequency, 86),
            (ApparentPower, 88),
            (ReactivePower, 90),
            (Cosphi, 92),
            (Export, 94),
            (DcCurrent, 97),
            (DcVoltage, 99),
            (DcPower, 101),
            (HeatSinkTemp, 104),
        ]));

        let probe = sunspec
            .value(ValueKind::SunSpecUint16, VoltageL1, Scale::Fixed(-1))
            .expect("probe register is mapped");

        Self { sunspec, probe }
    }
}

impl Default for SolarEdge {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for SolarEdge {
    fn device_type(&self) -> &'static str {
        "SOLAREDGE"
    }

    fn description(&self) -> &'static str {
        "SolarEdge SunSpec-compatible inverters (e.g. SolarEdge 9k)"
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
            self.sunspec
                .block16(SunSpecUint16, &[Current, CurrentL1, CurrentL2, CurrentL3]),
            self.sunspec.block16(SunSpecUint16, &[Frequency]),
            self.sunspec.block16(SunSpecUint16, &[DcCurrent]),
            self.sunspec.block16(SunSpecUint16, &[DcVoltage]),
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

    #[test]
    fn test_probe_address() {
        // documentation offset 80 adjusted to protocol addressing
        assert_eq!(SolarEdge::new().probe().address, 40079);
    }

    #[test]
    fn test_current_block_span() {
        let ops = SolarEdge::new().produce();
        let current = ops
            .iter()
            .find(|op| op.address == 40071)
            .expect("current block present");
        // registers 72..75 plus scale factor
        assert_eq!(current.count, 5);
    }
}
