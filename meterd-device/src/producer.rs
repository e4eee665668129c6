//! Producer trait and the measurement-to-register map

use crate::sunspec::SunSpec;
use meterd_core::{FunctionCode, Measurement, Operation, Scale, Transform, ValueKind};
use std::collections::BTreeMap;

/// A producer emits the Modbus operations for one device family
///
/// Implementations are immutable after construction; all methods are pure.
pub trait Producer: Send + Sync {
    /// Short upper-case device type identifier, e.g. `"ABB"`
    fn device_type(&self) -> &'static str;

    /// Human readable device description
    fn description(&self) -> &'static str;

    /// Ordered operations of one full reading cycle
    fn produce(&self) -> Vec<Operation>;

    /// A single minimal, widely supported operation used to detect the
    /// device type during scanning, typically an L1 voltage read
    fn probe(&self) -> Operation;

    /// SunSpec common-block support, if the device family is
    /// SunSpec-compliant
    fn sun_spec(&self) -> Option<&SunSpec> {
        None
    }
}

/// Measurement-to-register map, built once per producer instance
///
/// Register addresses are unique per measurement; the constructor asserts
/// this so the guarantee holds from construction onwards.
#[derive(Debug, Clone)]
pub struct Opcodes(BTreeMap<Measurement, u16>);

impl Opcodes {
    pub fn new(entries: &[(Measurement, u16)]) -> Self {
        let map: BTreeMap<Measurement, u16> = entries.iter().copied().collect();
        assert_eq!(map.len(), entries.len(), "duplicate measurement in opcode map");

        let mut addresses: Vec<u16> = map.values().copied().collect();
        addresses.sort_unstable();
        addresses.dedup();
        assert_eq!(addresses.len(), map.len(), "duplicate register address in opcode map");

        Self(map)
    }

    /// Physical register address for a measurement
    pub fn get(&self, measurement: Measurement) -> Option<u16> {
        self.0.get(&measurement).copied()
    }

    /// Mapped measurements in deterministic order
    pub fn measurements(&self) -> impl Iterator<Item = Measurement> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single-value operation at the mapped register
    ///
    /// Returns `None` for measurements the map does not cover.
    pub fn value(
        &self,
        function_code: FunctionCode,
        kind: ValueKind,
        measurement: Measurement,
        scale: Scale,
    ) -> Option<Operation> {
        let address = self.get(measurement)?;
        Some(Operation::value(
            function_code,
            address,
            kind.registers(),
            measurement,
            Transform { kind, scale },
        ))
    }
}
