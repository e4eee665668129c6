//! A logical device on the bus

use meterd_core::{
    DeviceDescriptor, MeasurementResult, MeterError, MeterResult, Operation, OperationKind,
};
use meterd_device::{Producer, ProducerRegistry, SunSpec};
use meterd_transport::Bus;
use std::collections::VecDeque;

/// Whether the device responded to its last cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Available,
    Unavailable,
}

/// Execute one operation against the currently selected station
///
/// Reads the operation's registers and applies its transform or splitter.
/// A direct transform yields exactly one result, NaN included for the
/// caller to filter; a splitter yields one result per available
/// measurement.
pub async fn execute(
    bus: &mut dyn Bus,
    operation: &Operation,
) -> MeterResult<Vec<MeasurementResult>> {
    let bytes = bus
        .read(operation.function_code, operation.address, operation.count)
        .await?;

    match &operation.kind {
        OperationKind::Value {
            measurement,
            transform,
        } => {
            let value = transform.apply(&bytes)?;
            Ok(vec![MeasurementResult::new(*measurement, value)])
        }
        OperationKind::Block(splitter) => Ok(splitter
            .split(&bytes)?
            .into_iter()
            .map(|r| MeasurementResult::new(r.measurement, r.value))
            .collect()),
    }
}

/// A Modbus device bound to one producer
///
/// The device keeps a queue of pending operations so a cycle interrupted
/// by a transport error resumes at the failed operation. On a flaky
/// connection this keeps all registers read at an equal rate instead of
/// re-reading the head of the cycle over and over.
pub struct Device {
    producer: Box<dyn Producer>,
    descriptor: DeviceDescriptor,
    queue: VecDeque<Operation>,
    state: DeviceState,
}

impl Device {
    pub fn new(producer: Box<dyn Producer>) -> Self {
        let descriptor = DeviceDescriptor {
            manufacturer: producer.device_type().to_string(),
            model: producer.description().to_string(),
            ..DeviceDescriptor::default()
        };

        Self {
            producer,
            descriptor,
            queue: VecDeque::new(),
            state: DeviceState::Available,
        }
    }

    /// Create a device whose type must exist in the producer registry
    pub fn by_type(registry: &ProducerRegistry, device_type: &str) -> MeterResult<Self> {
        Ok(Self::new(registry.create(device_type)?))
    }

    pub fn producer(&self) -> &dyn Producer {
        self.producer.as_ref()
    }

    /// Device descriptor, prepared during initialization
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Prepare the device for usage
    ///
    /// SunSpec devices read and decode the common information block; other
    /// families keep the statically known type and description. Requires
    /// the device's station to be selected on the bus.
    pub async fn initialize(&mut self, bus: &mut dyn Bus) -> MeterResult<()> {
        if self.producer.sun_spec().is_some() {
            let (function_code, address, count) = SunSpec::common_block_read();
            let bytes = bus.read(function_code, address, count).await?;
            self.descriptor = SunSpec::decode_common_block(&bytes)?;
        }
        Ok(())
    }

    /// Test whether the device's probe register can be read
    ///
    /// Requires the device's station to be selected on the bus.
    pub async fn probe(&self, bus: &mut dyn Bus) -> MeterResult<MeasurementResult> {
        let operation = self.producer.probe();
        execute(bus, &operation)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MeterError::Transport("probe produced no reading".to_string()))
    }

    /// Run one full reading cycle
    ///
    /// Executes as many operations as the producer emits per cycle,
    /// starting with any operations left over from a failed cycle. On a
    /// transport error the failed operation stays queued and the error is
    /// returned; the results read so far are discarded.
    pub async fn query(&mut self, bus: &mut dyn Bus) -> MeterResult<Vec<MeasurementResult>> {
        let cycle_len = self.producer.produce().len();
        let mut results = Vec::new();

        for _ in 0..cycle_len {
            if self.queue.is_empty() {
                self.queue.extend(self.producer.produce());
            }

            let Some(operation) = self.queue.front().cloned() else {
                break;
            };

            match execute(bus, &operation).await {
                Ok(mut readings) => {
                    self.queue.pop_front();
                    results.append(&mut readings);
                }
                Err(e) => {
                    self.state = DeviceState::Unavailable;
                    return Err(e);
                }
            }
        }

        self.state = DeviceState::Available;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meterd_core::Measurement;
    use meterd_device::Abb;
    use meterd_transport::MockBus;

    fn abb_device() -> Device {
        Device::new(Box::new(Abb::new()))
    }

    fn script_abb(bus: &mut MockBus, station: u8) {
        // double registers, 1/100 scaling
        for (address, raw) in [
            (0x5b00u16, 23012u32),
            (0x5b02, 23120),
            (0x5b04, 22987),
            (0x5b0c, 150),
            (0x5b0e, 160),
            (0x5b10, 170),
            (0x5b24, 100_000),
            (0x5b26, 33_000),
            (0x5b28, 33_500),
            (0x5b2a, 33_500),
        ] {
            let words = [(raw >> 16) as u16, raw as u16];
            bus.insert(station, address, &words);
        }
        // plain single registers
        for (address, raw) in [
            (0x5b3au16, 99u16),
            (0x5b3b, 98),
            (0x5b3c, 97),
            (0x5b3d, 96),
            (0x5b2c, 50),
        ] {
            bus.insert(station, address, &[raw]);
        }
    }

    #[tokio::test]
    async fn test_full_cycle() {
        let mut bus = MockBus::new();
        script_abb(&mut bus, 1);
        bus.select(1);

        let mut device = abb_device();
        let results = device.query(&mut bus).await.unwrap();
        assert_eq!(results.len(), 15);
        assert_eq!(device.state(), DeviceState::Available);

        let l1 = results
            .iter()
            .find(|r| r.measurement == Measurement::VoltageL1)
            .unwrap();
        assert!((l1.value - 230.12).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_failed_cycle_resumes_at_failed_operation() {
        // remove one mid-cycle register so the cycle fails there
        let mut broken = MockBus::new();
        script_abb(&mut broken, 1);
        broken.remove(1, 0x5b24);

        let mut device = abb_device();
        broken.select(1);
        assert!(device.query(&mut broken).await.is_err());
        assert_eq!(device.state(), DeviceState::Unavailable);
        let reads_after_failure = broken.reads.len();

        // scripting the register again lets the next cycle pick up where
        // the failed one stopped
        broken.insert(1, 0x5b24, &[0x0001, 0x86a0]);
        let results = device.query(&mut broken).await.unwrap();
        assert_eq!(broken.reads[reads_after_failure].1, 0x5b24);
        assert_eq!(results.len(), 15);
        assert_eq!(device.state(), DeviceState::Available);
    }

    #[test]
    fn test_probe() {
        let mut bus = MockBus::new();
        script_abb(&mut bus, 1);
        bus.select(1);

        let device = abb_device();
        let reading = tokio_test::block_on(device.probe(&mut bus)).unwrap();
        assert_eq!(reading.measurement, Measurement::VoltageL1);
    }

    #[test]
    fn test_descriptor_defaults() {
        let device = abb_device();
        assert_eq!(device.descriptor().manufacturer, "ABB");
        assert_eq!(device.descriptor().model, "ABB B-series meters");
    }

    #[tokio::test]
    async fn test_initialize_reads_sunspec_common_block() {
        let mut bus = MockBus::new();
        let mut words = vec![0u16; 69];
        // leading "SunS" signature
        words[0] = 0x5375;
        words[1] = 0x6e53;
        // "SMA" in byte-pair-swapped text at the manufacturer offset
        words[4] = (b'M' as u16) << 8 | b'S' as u16;
        words[5] = b'A' as u16;
        bus.insert(3, 40000, &words);
        bus.select(3);

        let mut device = Device::new(Box::new(meterd_device::Sma::new()));
        device.initialize(&mut bus).await.unwrap();
        assert_eq!(device.descriptor().manufacturer, "SMA");
        assert_eq!(device.descriptor().model, "");
    }

    #[tokio::test]
    async fn test_initialize_without_common_block_fails() {
        let mut bus = MockBus::new();
        bus.select(3);

        let mut device = Device::new(Box::new(meterd_device::Sma::new()));
        assert!(device.initialize(&mut bus).await.is_err());
        // non-SunSpec devices skip the common block read entirely
        let mut abb = abb_device();
        abb.initialize(&mut bus).await.unwrap();
    }
}
