//! Generic SunSpec inverter producer

use crate::producer::{Opcodes, Producer};
use crate::sunspec::SunSpec;
use meterd_core::{Measurement, Operation, Scale, ValueKind};

/// Generic SunSpec-compliant inverter
///
/// Uses the standard inverter model register offsets and composes only the
/// measurements every compliant device provides. Vendor-specific producers
/// cover the extended registers.
pub struct SunSpecInverter {
    sunspec: SunSpec,
    probe: Operation,
}

impl SunSpecInverter {
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
            (Cosphi, 92),
            (Export, 94),
        ]));

        let probe = sunspec
            .value(ValueKind::SunSpecUint16, VoltageL1, Scale::Fixed(-1))
            .expect("probe register is mapped");

        Self { sunspec, probe }
    }
}

impl Default for SunSpecInverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for SunSpecInverter {
    fn device_type(&self) -> &'static str {
        "SUNSPEC"
    }

    fn description(&self) -> &'static str {
        "Generic SunSpec-compliant inverters"
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
            self.sunspec.block16(SunSpecInt16, &[Cosphi]),
            self.sunspec.block16(SunSpecInt16, &[Power]),
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
    fn test_produce_composition() {
        let ops = SunSpecInverter::new().produce();
        assert_eq!(ops.len(), 6);
    }

    #[test]
    fn test_common_block_read_span() {
        let (_, address, count) = SunSpec::common_block_read();
        assert_eq!(address, 40000);
        assert_eq!(count, 69);
    }
}
