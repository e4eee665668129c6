//! Device producers for Modbus meters and inverters
//!
//! A [`Producer`] holds a fixed measurement-to-register map for one device
//! family and emits the ordered [`Operation`](meterd_core::Operation)s of a
//! full reading cycle plus one lightweight identification operation. Each
//! vendor variant is a configuration value (register map and metadata)
//! driving the shared decode engine; SunSpec-compliant vendors additionally
//! compose the shared [`SunSpec`] common-block logic.
//!
//! Producers are constructed once at startup and are immutable and freely
//! shareable afterwards.

pub mod producer;
pub mod registry;
pub mod sunspec;

mod abb;
mod dzg;
mod janitza;
mod kostal;
mod sdm;
mod sma;
mod solaredge;
mod sunspec_inverter;

pub use abb::Abb;
pub use dzg::Dzg;
pub use janitza::Janitza;
pub use kostal::Kostal;
pub use producer::{Opcodes, Producer};
pub use registry::{ProducerFactory, ProducerRegistry};
pub use sdm::Sdm;
pub use sma::Sma;
pub use solaredge::SolarEdge;
pub use sunspec::{SunSpec, SUNSPEC_BASE};
pub use sunspec_inverter::SunSpecInverter;
