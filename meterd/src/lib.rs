//! meterd - Modbus energy meter and solar inverter daemon core
//!
//! This library decodes manufacturer- and protocol-specific Modbus register
//! layouts of energy meters and solar inverters into a uniform set of
//! physical measurements.
//!
//! # Architecture
//!
//! The library is organized as a workspace with multiple crates:
//!
//! - `meterd-encoding`: register byte codec (big endian, LSW-first,
//!   byte-pair-swapped text)
//! - `meterd-core`: measurement catalog, operation/transform/splitter model
//! - `meterd-device`: per-vendor device producers and SunSpec decoding
//! - `meterd-transport`: bus layer over one physical Modbus transport
//! - `meterd-client`: device query cycle, device manager and bus scanner
//!
//! # Usage
//!
//! ```no_run
//! use meterd::client::{Device, DeviceManager};
//! use meterd::device::ProducerRegistry;
//! use meterd::transport::TcpBus;
//!
//! # async fn run() -> meterd::MeterResult<()> {
//! let registry = ProducerRegistry::with_defaults();
//! let bus = TcpBus::from_address("192.168.1.10:502")?;
//!
//! let mut manager = DeviceManager::new(Box::new(bus));
//! manager.add(1, Device::by_type(&registry, "SMA")?)?;
//! manager.initialize().await;
//!
//! for (station, outcome) in manager.run().await {
//!     if let Ok(readings) = outcome {
//!         for reading in readings {
//!             println!("station {}: {}", station, reading);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use meterd_core::{
    DeviceDescriptor, FunctionCode, Measurement, MeasurementResult, MeterError, MeterResult,
    Operation, OperationKind, Scale, SplitResult, Splitter, Transform, ValueKind,
};

// Re-export the codec
pub mod encoding {
    pub use meterd_encoding::*;
}

// Re-export device producers
pub mod device {
    pub use meterd_device::*;
}

// Re-export the transport layer
pub mod transport {
    pub use meterd_transport::*;
}

// Re-export the client API
pub mod client {
    pub use meterd_client::*;
}
