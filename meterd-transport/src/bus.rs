//! Bus trait and transport tracing

use async_trait::async_trait;
use bytes::Bytes;
use meterd_core::{FunctionCode, MeterResult};
use std::time::Duration;

/// Injectable sink for transport-level trace lines
pub trait TraceSink: Send + Sync {
    /// Called with one formatted line per physical bus operation
    fn line(&self, line: &str);
}

/// Default trace sink forwarding to the `log` crate at trace level
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn line(&self, line: &str) {
        log::trace!("{}", line);
    }
}

/// One physical Modbus transport shared by several logical devices
///
/// The bus keeps the currently selected station address, the per-operation
/// timeout and the connection handle as its only mutable state. All methods
/// take `&mut self`; a select-and-read pair must not be interleaved with
/// another device's pair.
#[async_trait]
pub trait Bus: Send {
    /// Bus device or address, for diagnostics
    fn name(&self) -> String;

    /// Select the station address targeted by subsequent reads
    ///
    /// Retargets the transport without reopening the connection. Must be
    /// called immediately before each device's operation.
    fn select(&mut self, station: u8);

    /// Set the per-operation timeout, returning the previous value
    ///
    /// The returned value lets callers shrink the timeout temporarily and
    /// restore it afterwards, as discovery does.
    fn timeout(&mut self, timeout: Duration) -> Duration;

    /// Close the current connection
    ///
    /// Registered state is unaffected; the next read reopens lazily.
    async fn reconnect(&mut self);

    /// Read `count` registers at `address` from the selected station
    ///
    /// Returns `2 × count` bytes in register order.
    async fn read(&mut self, function_code: FunctionCode, address: u16, count: u16)
        -> MeterResult<Bytes>;

    /// Install a sink receiving transport-level trace lines
    fn set_trace(&mut self, sink: Box<dyn TraceSink>);
}
