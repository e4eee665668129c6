//! Device orchestration: query cycles, bus management and discovery
//!
//! This crate drives the producers from `meterd-device` over a bus from
//! `meterd-transport`: a [`Device`] runs the reading cycle of one station,
//! the [`DeviceManager`] multiplexes several devices over one bus, and the
//! [`Scanner`] discovers device types on a bus by probing every station
//! address.

pub mod device;
pub mod manager;
pub mod scanner;

pub use device::{execute, Device, DeviceState};
pub use manager::DeviceManager;
pub use scanner::{ScanResult, Scanner};
