//! TCP bus implementation

use crate::bus::{Bus, TraceSink};
use async_trait::async_trait;
use bytes::Bytes;
use meterd_core::{FunctionCode, MeterError, MeterResult};
use meterd_encoding::words_to_bytes;
use std::net::SocketAddr;
use std::time::Duration;
use tokio_modbus::client::{Context, Reader};
use tokio_modbus::slave::{Slave, SlaveContext};

/// TCP bus settings
#[derive(Debug, Clone)]
pub struct TcpSettings {
    pub address: SocketAddr,
    pub timeout: Duration,
}

impl TcpSettings {
    /// Create new TCP settings with the default timeout
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            timeout: Duration::from_secs(1),
        }
    }

    /// Create TCP settings with an explicit timeout
    pub fn with_timeout(address: SocketAddr, timeout: Duration) -> Self {
        Self { address, timeout }
    }
}

/// Bus over a Modbus TCP connection
pub struct TcpBus {
    settings: TcpSettings,
    context: Option<Context>,
    station: u8,
    trace: Option<Box<dyn TraceSink>>,
}

impl TcpBus {
    /// Create a new TCP bus; the connection is opened on first read
    pub fn new(settings: TcpSettings) -> Self {
        Self {
            settings,
            context: None,
            station: 0,
            trace: None,
        }
    }

    /// Create a TCP bus from an address string
    pub fn from_address(address: &str) -> MeterResult<Self> {
        let address: SocketAddr = address
            .parse()
            .map_err(|e| MeterError::Transport(format!("invalid TCP address: {}", e)))?;
        Ok(Self::new(TcpSettings::new(address)))
    }

    async fn context(&mut self) -> MeterResult<&mut Context> {
        if self.context.is_none() {
            let connect = tokio_modbus::client::tcp::connect(self.settings.address);
            let mut context = tokio::time::timeout(self.settings.timeout, connect)
                .await
                .map_err(|_| MeterError::Timeout)?
                .map_err(MeterError::Connection)?;
            context.set_slave(Slave(self.station));
            self.context = Some(context);
        }

        self.context.as_mut().ok_or_else(|| {
            MeterError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "TCP connection unavailable",
            ))
        })
    }

    fn trace(&self, line: String) {
        if let Some(sink) = &self.trace {
            sink.line(&line);
        }
    }
}

#[async_trait]
impl Bus for TcpBus {
    fn name(&self) -> String {
        self.settings.address.to_string()
    }

    fn select(&mut self, station: u8) {
        self.station = station;
        if let Some(context) = self.context.as_mut() {
            context.set_slave(Slave(station));
        }
    }

    fn timeout(&mut self, timeout: Duration) -> Duration {
        let previous = self.settings.timeout;
        self.settings.timeout = timeout;
        previous
    }

    async fn reconnect(&mut self) {
        self.context = None;
    }

    async fn read(
        &mut self,
        function_code: FunctionCode,
        address: u16,
        count: u16,
    ) -> MeterResult<Bytes> {
        let timeout = self.settings.timeout;
        let station = self.station;

        let io_result = {
            let context = self.context().await?;
            let io = async {
                match function_code {
                    FunctionCode::ReadHolding => {
                        context.read_holding_registers(address, count).await
                    }
                    FunctionCode::ReadInput => context.read_input_registers(address, count).await,
                }
            };
            tokio::time::timeout(timeout, io).await
        };

        let result = match io_result {
            Err(_) => {
                // stale responses could corrupt the next request
                self.context = None;
                Err(MeterError::Timeout)
            }
            Ok(Err(e)) => {
                self.context = None;
                Err(MeterError::Connection(e))
            }
            Ok(Ok(words)) => Ok(Bytes::from(words_to_bytes(&words))),
        };

        self.trace(format!(
            "{} slave {}: fc{} 0x{:04x}/{} -> {}",
            self.name(),
            station,
            function_code.code(),
            address,
            count,
            match &result {
                Ok(bytes) => format!("{} bytes", bytes.len()),
                Err(e) => e.to_string(),
            }
        ));

        result
    }

    fn set_trace(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = Some(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcp_settings() {
        let address: SocketAddr = "127.0.0.1:502".parse().unwrap();
        let settings = TcpSettings::new(address);
        assert_eq!(settings.address, address);
        assert_eq!(settings.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_address() {
        assert!(TcpBus::from_address("not an address").is_err());
    }

    #[tokio::test]
    async fn test_timeout_returns_previous() {
        let mut bus = TcpBus::from_address("127.0.0.1:502").unwrap();
        let previous = bus.timeout(Duration::from_millis(50));
        assert_eq!(previous, Duration::from_secs(1));
        assert_eq!(bus.timeout(previous), Duration::from_millis(50));
    }
}
