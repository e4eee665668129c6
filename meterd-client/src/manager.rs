//! Device manager multiplexing devices over one bus

use crate::device::Device;
use meterd_core::{MeasurementResult, MeterError, MeterResult};
use meterd_transport::Bus;
use std::collections::BTreeMap;

/// Operates the devices registered on one bus
///
/// The manager owns the bus exclusively, which serializes every
/// select-and-read pair. Devices are registered before the query loop
/// starts and keyed by station address.
pub struct DeviceManager {
    bus: Box<dyn Bus>,
    devices: BTreeMap<u8, Device>,
}

impl DeviceManager {
    /// Create a manager operating devices on the given bus
    pub fn new(bus: Box<dyn Bus>) -> Self {
        Self {
            bus,
            devices: BTreeMap::new(),
        }
    }

    /// Register a device at a station address
    ///
    /// Fails with [`MeterError::DuplicateDevice`] if the address is taken;
    /// the existing registration is untouched.
    pub fn add(&mut self, station: u8, device: Device) -> MeterResult<()> {
        if self.devices.contains_key(&station) {
            return Err(MeterError::DuplicateDevice(station));
        }
        self.devices.insert(station, device);
        Ok(())
    }

    /// Access the underlying bus, e.g. to adjust the timeout
    pub fn bus(&mut self) -> &mut dyn Bus {
        self.bus.as_mut()
    }

    pub fn device(&self, station: u8) -> Option<&Device> {
        self.devices.get(&station)
    }

    /// Registered station addresses in ascending order
    pub fn stations(&self) -> impl Iterator<Item = u8> + '_ {
        self.devices.keys().copied()
    }

    /// Initialize all registered devices
    ///
    /// Initialization failures are logged and do not abort the remaining
    /// devices; an uninitialized device keeps its static descriptor.
    pub async fn initialize(&mut self) {
        for (station, device) in self.devices.iter_mut() {
            self.bus.select(*station);
            if let Err(e) = device.initialize(self.bus.as_mut()).await {
                log::warn!("station {}: initialization failed: {}", station, e);
            }
        }
    }

    /// Run one query cycle over all registered devices
    ///
    /// Each device's station is selected immediately before its operations
    /// are issued. A transport error on one device is logged and recorded
    /// in its outcome; iteration continues with the next device — a single
    /// unreachable device never aborts the whole cycle.
    pub async fn run(&mut self) -> Vec<(u8, MeterResult<Vec<MeasurementResult>>)> {
        let mut outcomes = Vec::with_capacity(self.devices.len());

        for (station, device) in self.devices.iter_mut() {
            self.bus.select(*station);
            let result = device.query(self.bus.as_mut()).await;
            if let Err(e) = &result {
                log::warn!("station {}: query failed: {}", station, e);
            }
            outcomes.push((*station, result));
        }

        outcomes
    }
}
