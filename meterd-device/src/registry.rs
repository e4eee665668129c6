//! Producer registry
//!
//! An explicit table of known device types, constructed once at startup and
//! passed by reference to the scanner and to device construction. There is
//! no process-global registration list; extending the catalog means
//! registering another factory on the instance.

use crate::abb::Abb;
use crate::dzg::Dzg;
use crate::janitza::Janitza;
use crate::kostal::Kostal;
use crate::producer::Producer;
use crate::sdm::Sdm;
use crate::sma::Sma;
use crate::solaredge::SolarEdge;
use crate::sunspec_inverter::SunSpecInverter;
use meterd_core::{MeterError, MeterResult};
use std::collections::BTreeMap;

/// Factory creating a fresh producer instance
pub type ProducerFactory = fn() -> Box<dyn Producer>;

/// Table of known device producers, keyed by device type
///
/// Iteration order is deterministic (sorted by type name) so discovery
/// probes devices in a reproducible order.
pub struct ProducerRegistry {
    factories: BTreeMap<&'static str, ProducerFactory>,
}

impl ProducerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry containing every built-in device type
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults: [ProducerFactory; 8] = [
            || Box::new(Abb::new()),
            || Box::new(Dzg::new()),
            || Box::new(Janitza::new()),
            || Box::new(Kostal::new()),
            || Box::new(Sdm::new()),
            || Box::new(Sma::new()),
            || Box::new(SolarEdge::new()),
            || Box::new(SunSpecInverter::new()),
        ];
        for factory in defaults {
            registry
                .register(factory)
                .expect("built-in device types are unique");
        }
        registry
    }

    /// Register a producer factory under its device type
    pub fn register(&mut self, factory: ProducerFactory) -> MeterResult<()> {
        let device_type = factory().device_type();
        if self.factories.contains_key(device_type) {
            return Err(MeterError::DuplicateProducer(device_type.to_string()));
        }
        self.factories.insert(device_type, factory);
        Ok(())
    }

    /// Create a producer for a device type name (case insensitive)
    pub fn create(&self, device_type: &str) -> MeterResult<Box<dyn Producer>> {
        let key = device_type.to_uppercase();
        let factory = self
            .factories
            .get(key.as_str())
            .ok_or_else(|| MeterError::UnknownDeviceType(device_type.to_string()))?;
        Ok(factory())
    }

    /// Known device type names in deterministic order
    pub fn types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Producers in deterministic order
    pub fn producers(&self) -> impl Iterator<Item = Box<dyn Producer>> + '_ {
        self.factories.values().map(|factory| factory())
    }
}

impl Default for ProducerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_types_are_sorted() {
        let registry = ProducerRegistry::with_defaults();
        let types: Vec<&str> = registry.types().collect();
        assert_eq!(
            types,
            vec![
                "ABB",
                "DZG",
                "JANITZA",
                "KOSTAL",
                "SDM",
                "SMA",
                "SOLAREDGE",
                "SUNSPEC"
            ]
        );
    }

    #[test]
    fn test_create_is_case_insensitive() {
        let registry = ProducerRegistry::with_defaults();
        assert_eq!(registry.create("abb").unwrap().device_type(), "ABB");
        assert!(matches!(
            registry.create("NOPE"),
            Err(MeterError::UnknownDeviceType(_))
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ProducerRegistry::with_defaults();
        assert!(matches!(
            registry.register(|| Box::new(Abb::new())),
            Err(MeterError::DuplicateProducer(_))
        ));
    }

    #[test]
    fn test_every_producer_has_probe_and_operations() {
        for producer in ProducerRegistry::with_defaults().producers() {
            assert!(!producer.produce().is_empty(), "{}", producer.device_type());
            assert!(producer.probe().count >= 1);
        }
    }
}
