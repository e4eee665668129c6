//! In-memory bus for tests and simulations
//!
//! Plays back a scripted register map instead of talking to hardware.
//! Stations and registers that are not scripted answer with a transport
//! error, which is how silent devices appear to the scanner.

use crate::bus::{Bus, TraceSink};
use async_trait::async_trait;
use bytes::Bytes;
use meterd_core::{FunctionCode, MeterError, MeterResult};
use meterd_encoding::words_to_bytes;
use std::collections::BTreeMap;
use std::time::Duration;

/// Scripted in-memory bus
///
/// The recorded select and read sequences let tests assert that callers
/// select the station immediately before each operation.
pub struct MockBus {
    registers: BTreeMap<(u8, u16), Vec<u16>>,
    timeout: Duration,
    station: u8,
    trace: Option<Box<dyn TraceSink>>,
    /// Recorded station selections, in order
    pub selects: Vec<u8>,
    /// Recorded reads as (station, address, count), in order
    pub reads: Vec<(u8, u16, u16)>,
    /// Number of reconnects requested
    pub reconnects: usize,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            registers: BTreeMap::new(),
            timeout: Duration::from_millis(300),
            station: 0,
            trace: None,
            selects: Vec::new(),
            reads: Vec::new(),
            reconnects: 0,
        }
    }

    /// Script a register block for a station
    ///
    /// A read is answered when it starts at `address` and fits within the
    /// scripted registers.
    pub fn insert(&mut self, station: u8, address: u16, registers: &[u16]) {
        self.registers
            .insert((station, address), registers.to_vec());
    }

    /// Remove a scripted register block, simulating a failing register
    pub fn remove(&mut self, station: u8, address: u16) {
        self.registers.remove(&(station, address));
    }

    /// Currently selected station
    pub fn station(&self) -> u8 {
        self.station
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bus for MockBus {
    fn name(&self) -> String {
        "mock".to_string()
    }

    fn select(&mut self, station: u8) {
        self.station = station;
        self.selects.push(station);
    }

    fn timeout(&mut self, timeout: Duration) -> Duration {
        let previous = self.timeout;
        self.timeout = timeout;
        previous
    }

    async fn reconnect(&mut self) {
        self.reconnects += 1;
    }

    async fn read(
        &mut self,
        function_code: FunctionCode,
        address: u16,
        count: u16,
    ) -> MeterResult<Bytes> {
        self.reads.push((self.station, address, count));

        let result = match self.registers.get(&(self.station, address)) {
            Some(registers) if registers.len() >= count as usize => {
                Ok(Bytes::from(words_to_bytes(&registers[..count as usize])))
            }
            _ => Err(MeterError::Transport(format!(
                "no response from station {}",
                self.station
            ))),
        };

        if let Some(sink) = &self.trace {
            sink.line(&format!(
                "mock slave {}: fc{} 0x{:04x}/{} -> {}",
                self.station,
                function_code.code(),
                address,
                count,
                match &result {
                    Ok(bytes) => format!("{} bytes", bytes.len()),
                    Err(e) => e.to_string(),
                }
            ));
        }

        result
    }

    fn set_trace(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = Some(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct CollectTrace(Arc<Mutex<Vec<String>>>);

    impl TraceSink for CollectTrace {
        fn line(&self, line: &str) {
            self.0.lock().unwrap().push(line.to_string());
        }
    }

    #[tokio::test]
    async fn test_scripted_read() {
        let mut bus = MockBus::new();
        bus.insert(5, 0x5b00, &[0x00e6, 0x00e7]);

        bus.select(5);
        let bytes = bus
            .read(FunctionCode::ReadHolding, 0x5b00, 2)
            .await
            .unwrap();
        assert_eq!(&bytes[..], &[0x00, 0xe6, 0x00, 0xe7]);
        assert_eq!(bus.selects, vec![5]);
        assert_eq!(bus.reads, vec![(5, 0x5b00, 2)]);
    }

    #[tokio::test]
    async fn test_unscripted_station_errors() {
        let mut bus = MockBus::new();
        bus.select(9);
        assert!(matches!(
            bus.read(FunctionCode::ReadHolding, 0, 1).await,
            Err(MeterError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_short_script_errors() {
        let mut bus = MockBus::new();
        bus.insert(1, 0, &[1]);
        bus.select(1);
        assert!(bus.read(FunctionCode::ReadInput, 0, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_trace_sink_receives_lines() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let mut bus = MockBus::new();
        bus.set_trace(Box::new(CollectTrace(lines.clone())));
        bus.insert(3, 100, &[42]);

        bus.select(3);
        let _ = bus.read(FunctionCode::ReadHolding, 100, 1).await;

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("slave 3"));
        assert!(lines[0].contains("2 bytes"));
    }

    #[tokio::test]
    async fn test_timeout_set_and_restore() {
        let mut bus = MockBus::new();
        let previous = bus.timeout(Duration::from_millis(50));
        assert_eq!(previous, Duration::from_millis(300));
        assert_eq!(bus.timeout(previous), Duration::from_millis(50));
    }
}
