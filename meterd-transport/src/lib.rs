//! Bus layer for Modbus meter communication
//!
//! A [`Bus`] owns one physical transport (TCP or RTU serial) and serializes
//! access to the logical devices sharing it. Exactly one station address is
//! selected at any instant; callers select the station immediately before
//! issuing an operation. The bus holds mutable transport state and is not
//! safe for concurrent use — give it a single owner or wrap it in a mutex
//! around each select-and-read pair.
//!
//! The actual Modbus master is `tokio-modbus`; this layer adds station
//! multiplexing, lazy reconnection, per-operation timeouts and request
//! tracing on top of it.

pub mod bus;
pub mod mock;
pub mod rtu;
pub mod tcp;

pub use bus::{Bus, LogTrace, TraceSink};
pub use mock::MockBus;
pub use rtu::{RtuBus, SerialSettings};
pub use tcp::{TcpBus, TcpSettings};
