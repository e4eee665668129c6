//! Bus scan: device discovery by probing station addresses

use crate::device::execute;
use meterd_core::MeasurementResult;
use meterd_device::ProducerRegistry;
use meterd_transport::Bus;
use std::time::Duration;

/// Timeout used while scanning; absent stations fail fast
const SCAN_TIMEOUT: Duration = Duration::from_millis(50);

/// Pause after an unmatched station so the bus can recover
const RECOVERY_DELAY: Duration = Duration::from_millis(40);

/// First and last station address probed
const STATION_RANGE: std::ops::RangeInclusive<u8> = 1..=247;

/// One discovered device
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub station: u8,
    pub device_type: String,
    pub reading: MeasurementResult,
}

/// Probes a station address range with every known producer
pub struct Scanner<'a> {
    registry: &'a ProducerRegistry,
}

impl<'a> Scanner<'a> {
    pub fn new(registry: &'a ProducerRegistry) -> Self {
        Self { registry }
    }

    /// Scan the bus for devices
    ///
    /// For each station address the producers' probe operations are tried
    /// in registry order; the first successful read determines the device
    /// type. The bus timeout is lowered for the duration of the scan and
    /// restored afterwards no matter how the scan went.
    ///
    /// Only devices matching a known probe are detected. A silent station
    /// is reported absent, which is not proof of absence.
    pub async fn scan(&self, bus: &mut dyn Bus) -> Vec<ScanResult> {
        let previous_timeout = bus.timeout(SCAN_TIMEOUT);
        log::info!("starting bus scan on {}", bus.name());

        let mut found = Vec::new();
        for station in STATION_RANGE {
            if let Some(result) = self.probe_station(bus, station).await {
                log::info!(
                    "station {}: {} device found, {}",
                    station,
                    result.device_type,
                    result.reading
                );
                found.push(result);
            } else {
                log::debug!("station {}: n/a", station);
                tokio::time::sleep(RECOVERY_DELAY).await;
            }
        }

        bus.timeout(previous_timeout);

        log::info!("scan found {} devices", found.len());
        log::warn!(
            "only devices responding to a known probe request are detected; \
             devices with different register layouts may be missed"
        );

        found
    }

    async fn probe_station(&self, bus: &mut dyn Bus, station: u8) -> Option<ScanResult> {
        for producer in self.registry.producers() {
            let operation = producer.probe();
            bus.select(station);

            match execute(bus, &operation).await {
                Ok(readings) => {
                    if let Some(reading) = readings.into_iter().next() {
                        return Some(ScanResult {
                            station,
                            device_type: producer.device_type().to_string(),
                            reading,
                        });
                    }
                }
                Err(_) => {
                    // expected outcome for an absent or foreign device
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meterd_core::Measurement;
    use meterd_transport::{Bus, MockBus};

    #[tokio::test(start_paused = true)]
    async fn test_scan_finds_single_abb_device() {
        let mut bus = MockBus::new();
        // only station 5 answers, and only to the ABB probe register
        bus.insert(5, 0x5b00, &[230]);

        let registry = ProducerRegistry::with_defaults();
        let results = Scanner::new(&registry).scan(&mut bus).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].station, 5);
        assert_eq!(results[0].device_type, "ABB");
        assert_eq!(results[0].reading.measurement, Measurement::VoltageL1);
        assert!((results[0].reading.value - 230.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_restores_timeout() {
        let mut bus = MockBus::new();
        let original = bus.timeout(Duration::from_millis(300));
        assert_eq!(original, Duration::from_millis(300));

        let registry = ProducerRegistry::with_defaults();
        let _ = Scanner::new(&registry).scan(&mut bus).await;

        // setting a new value returns what the scan left behind
        assert_eq!(bus.timeout(Duration::from_secs(1)), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_selects_station_before_each_probe() {
        let mut bus = MockBus::new();
        bus.insert(1, 0x5b00, &[230]);

        let registry = ProducerRegistry::with_defaults();
        let _ = Scanner::new(&registry).scan(&mut bus).await;

        // every recorded read was preceded by selecting its station
        assert_eq!(bus.selects.len(), bus.reads.len());
        for (select, read) in bus.selects.iter().zip(bus.reads.iter()) {
            assert_eq!(*select, read.0);
        }
    }

    #[test]
    fn test_scan_runs_under_block_on() {
        // the scanner only needs a timer-capable runtime
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        let mut bus = MockBus::new();
        bus.insert(247, 0x5b00, &[231]);
        let registry = ProducerRegistry::with_defaults();

        let results = runtime.block_on(Scanner::new(&registry).scan(&mut bus));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].station, 247);
    }
}
