//! ABB B-series meters

use crate::producer::{Opcodes, Producer};
use meterd_core::{FunctionCode, Measurement, Operation, Scale, Transform, ValueKind};

/// ABB B-series energy meters
///
/// Register layout per the B-series manual; voltage, current and power are
/// double registers scaled by 1/100, power factor and frequency are plain
/// single registers.
pub struct Abb {
    opcodes: Opcodes,
    probe: Operation,
}

impl Abb {
    pub fn new() -> Self {
        use Measurement::*;
        let opcodes = Opcodes::new(&[
            (VoltageL1, 0x5b00),
            (VoltageL2, 0x5b02),
            (VoltageL3, 0x5b04),
            (CurrentL1, 0x5b0c),
            (CurrentL2, 0x5b0e),
            (CurrentL3, 0x5b10),
            (Power, 0x5b24),
            (PowerL1, 0x5b26),
            (PowerL2, 0x5b28),
            (PowerL3, 0x5b2a),
            (Frequency, 0x5b2c),
            (Cosphi, 0x5b3a),
            (CosphiL1, 0x5b3b),
            (CosphiL2, 0x5b3c),
            (CosphiL3, 0x5b3d),
        ]);

        let probe = Operation::value(
            FunctionCode::ReadHolding,
            0x5b00,
            1,
            VoltageL1,
            Transform::raw(ValueKind::Uint16),
        );

        Self { opcodes, probe }
    }

    fn value32(&self, measurement: Measurement, exponent: i16) -> Option<Operation> {
        self.opcodes.value(
            FunctionCode::ReadHolding,
            ValueKind::Uint32,
            measurement,
            Scale::Fixed(exponent),
        )
    }

    fn value16(&self, measurement: Measurement) -> Option<Operation> {
        self.opcodes.value(
            FunctionCode::ReadHolding,
            ValueKind::Uint16,
            measurement,
            Scale::None,
        )
    }
}

impl Default for Abb {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for Abb {
    fn device_type(&self) -> &'static str {
        "ABB"
    }

    fn description(&self) -> &'static str {
        "ABB B-series meters"
    }

    fn probe(&self) -> Operation {
        self.probe.clone()
    }

    fn produce(&self) -> Vec<Operation> {
        use Measurement::*;

        let scaled = [
            VoltageL1, VoltageL2, VoltageL3, CurrentL1, CurrentL2, CurrentL3, Power, PowerL1,
            PowerL2, PowerL3,
        ]
        .into_iter()
        .filter_map(|m| self.value32(m, -2));

        let plain = [Cosphi, CosphiL1, CosphiL2, CosphiL3, Frequency]
            .into_iter()
            .filter_map(|m| self.value16(m));

        scaled.chain(plain).collect()
    }
}
