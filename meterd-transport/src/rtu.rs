//! RTU serial bus implementation

use crate::bus::{Bus, TraceSink};
use async_trait::async_trait;
use bytes::Bytes;
use meterd_core::{FunctionCode, MeterError, MeterResult};
use meterd_encoding::words_to_bytes;
use std::time::Duration;
use tokio_modbus::client::{Context, Reader};
use tokio_modbus::slave::{Slave, SlaveContext};
use tokio_serial::SerialPortBuilderExt;

/// Serial line settings for an RTU bus
#[derive(Debug, Clone)]
pub struct SerialSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: tokio_serial::DataBits,
    pub stop_bits: tokio_serial::StopBits,
    pub parity: tokio_serial::Parity,
    pub timeout: Duration,
}

impl SerialSettings {
    /// Create new serial settings with 8N1 framing and the default timeout
    pub fn new(port_name: String, baud_rate: u32) -> Self {
        Self {
            port_name,
            baud_rate,
            data_bits: tokio_serial::DataBits::Eight,
            stop_bits: tokio_serial::StopBits::One,
            parity: tokio_serial::Parity::None,
            timeout: Duration::from_millis(300),
        }
    }

    /// Create serial settings with an explicit timeout
    pub fn with_timeout(port_name: String, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::new(port_name, baud_rate)
        }
    }
}

/// Bus over a Modbus RTU serial line
pub struct RtuBus {
    settings: SerialSettings,
    context: Option<Context>,
    station: u8,
    trace: Option<Box<dyn TraceSink>>,
}

impl RtuBus {
    /// Create a new RTU bus; the port is opened on first read
    pub fn new(settings: SerialSettings) -> Self {
        Self {
            settings,
            context: None,
            station: 0,
            trace: None,
        }
    }

    /// Create an RTU bus with port name and baud rate
    pub fn new_simple(port_name: String, baud_rate: u32) -> Self {
        Self::new(SerialSettings::new(port_name, baud_rate))
    }

    fn context(&mut self) -> MeterResult<&mut Context> {
        if self.context.is_none() {
            let port = tokio_serial::new(&self.settings.port_name, self.settings.baud_rate)
                .data_bits(self.settings.data_bits)
                .stop_bits(self.settings.stop_bits)
                .parity(self.settings.parity)
                .open_native_async()
                .map_err(|e| {
                    MeterError::Connection(std::io::Error::other(format!(
                        "failed to open serial port: {}",
                        e
                    )))
                })?;

            let context = tokio_modbus::client::rtu::attach_slave(port, Slave(self.station));
            self.context = Some(context);
        }

        self.context.as_mut().ok_or_else(|| {
            MeterError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "serial port unavailable",
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
impl Bus for RtuBus {
    fn name(&self) -> String {
        self.settings.port_name.clone()
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
            let context = self.context()?;
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
                // a late response would corrupt the next request on the wire
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
