//! Core types for Modbus meter decoding
//!
//! This crate provides the measurement catalog, the operation model that
//! maps logical measurements to physical register reads, and the transform
//! and splitter primitives that turn raw register bytes into physical
//! values.

pub mod descriptor;
pub mod error;
pub mod measurement;
pub mod operation;

pub use descriptor::DeviceDescriptor;
pub use error::{MeterError, MeterResult};
pub use measurement::{Measurement, MeasurementResult};
pub use operation::{
    FunctionCode, Operation, OperationKind, Scale, SplitResult, Splitter, Transform, ValueKind,
};
