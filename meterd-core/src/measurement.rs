//! Measurement catalog
//!
//! [`Measurement`] is the closed set of canonical physical quantities this
//! daemon can report. The variants carry no payload; producers use them as
//! map keys when wiring measurements to device registers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical physical quantity reported by a meter or inverter
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Measurement {
    Frequency,

    Current,
    CurrentL1,
    CurrentL2,
    CurrentL3,

    Voltage,
    VoltageL1,
    VoltageL2,
    VoltageL3,

    Power,
    PowerL1,
    PowerL2,
    PowerL3,

    ImportPower,
    ExportPower,

    ReactivePower,
    ReactivePowerL1,
    ReactivePowerL2,
    ReactivePowerL3,

    ApparentPower,
    ApparentPowerL1,
    ApparentPowerL2,
    ApparentPowerL3,

    Cosphi,
    CosphiL1,
    CosphiL2,
    CosphiL3,

    Thd,
    ThdL1,
    ThdL2,
    ThdL3,

    // energy counters
    Sum,
    SumT1,
    SumT2,
    SumL1,
    SumL2,
    SumL3,

    Import,
    ImportT1,
    ImportT2,
    ImportL1,
    ImportL2,
    ImportL3,

    Export,
    ExportT1,
    ExportT2,
    ExportL1,
    ExportL2,
    ExportL3,

    ReactiveSum,
    ReactiveImport,
    ReactiveExport,

    // DC side
    DcCurrent,
    DcVoltage,
    DcPower,
    HeatSinkTemp,

    // battery
    ChargeState,
    BatteryVoltage,

    PhaseAngle,
}

impl Measurement {
    /// Human readable name of the measurement
    pub fn description(&self) -> &'static str {
        use Measurement::*;
        match self {
            Frequency => "Frequency",
            Current => "Current",
            CurrentL1 => "L1 Current",
            CurrentL2 => "L2 Current",
            CurrentL3 => "L3 Current",
            Voltage => "Voltage",
            VoltageL1 => "L1 Voltage",
            VoltageL2 => "L2 Voltage",
            VoltageL3 => "L3 Voltage",
            Power => "Power",
            PowerL1 => "L1 Power",
            PowerL2 => "L2 Power",
            PowerL3 => "L3 Power",
            ImportPower => "Import Power",
            ExportPower => "Export Power",
            ReactivePower => "Reactive Power",
            ReactivePowerL1 => "L1 Reactive Power",
            ReactivePowerL2 => "L2 Reactive Power",
            ReactivePowerL3 => "L3 Reactive Power",
            ApparentPower => "Apparent Power",
            ApparentPowerL1 => "L1 Apparent Power",
            ApparentPowerL2 => "L2 Apparent Power",
            ApparentPowerL3 => "L3 Apparent Power",
            Cosphi => "Power Factor Cosphi",
            CosphiL1 => "L1 Power Factor Cosphi",
            CosphiL2 => "L2 Power Factor Cosphi",
            CosphiL3 => "L3 Power Factor Cosphi",
            Thd => "Average voltage to neutral THD",
            ThdL1 => "L1 Voltage to neutral THD",
            ThdL2 => "L2 Voltage to neutral THD",
            ThdL3 => "L3 Voltage to neutral THD",
            Sum => "Total Energy Sum",
            SumT1 => "Tariff 1 Energy Sum",
            SumT2 => "Tariff 2 Energy Sum",
            SumL1 => "L1 Energy Sum",
            SumL2 => "L2 Energy Sum",
            SumL3 => "L3 Energy Sum",
            Import => "Total Import Energy",
            ImportT1 => "Tariff 1 Import Energy",
            ImportT2 => "Tariff 2 Import Energy",
            ImportL1 => "L1 Import Energy",
            ImportL2 => "L2 Import Energy",
            ImportL3 => "L3 Import Energy",
            Export => "Total Export Energy",
            ExportT1 => "Tariff 1 Export Energy",
            ExportT2 => "Tariff 2 Export Energy",
            ExportL1 => "L1 Export Energy",
            ExportL2 => "L2 Export Energy",
            ExportL3 => "L3 Export Energy",
            ReactiveSum => "Total Reactive Energy",
            ReactiveImport => "Reactive Import Energy",
            ReactiveExport => "Reactive Export Energy",
            DcCurrent => "DC Current",
            DcVoltage => "DC Voltage",
            DcPower => "DC Power",
            HeatSinkTemp => "Heat Sink Temperature",
            ChargeState => "Charge State",
            BatteryVoltage => "Battery Voltage",
            PhaseAngle => "Phase Angle",
        }
    }

    /// Unit abbreviation, if the measurement has one
    pub fn unit(&self) -> Option<&'static str> {
        use Measurement::*;
        match self {
            Frequency => Some("Hz"),
            Current | CurrentL1 | CurrentL2 | CurrentL3 | DcCurrent => Some("A"),
            Voltage | VoltageL1 | VoltageL2 | VoltageL3 | DcVoltage | BatteryVoltage => Some("V"),
            Power | PowerL1 | PowerL2 | PowerL3 | ImportPower | ExportPower | DcPower => Some("W"),
            ReactivePower | ReactivePowerL1 | ReactivePowerL2 | ReactivePowerL3 => Some("var"),
            ApparentPower | ApparentPowerL1 | ApparentPowerL2 | ApparentPowerL3 => Some("VA"),
            Cosphi | CosphiL1 | CosphiL2 | CosphiL3 => None,
            Thd | ThdL1 | ThdL2 | ThdL3 | ChargeState => Some("%"),
            Sum | SumT1 | SumT2 | SumL1 | SumL2 | SumL3 | Import | ImportT1 | ImportT2
            | ImportL1 | ImportL2 | ImportL3 | Export | ExportT1 | ExportT2 | ExportL1
            | ExportL2 | ExportL3 => Some("kWh"),
            ReactiveSum | ReactiveImport | ReactiveExport => Some("kvarh"),
            HeatSinkTemp => Some("°C"),
            PhaseAngle => Some("°"),
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Result of a single decoded register read
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementResult {
    pub measurement: Measurement,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl MeasurementResult {
    /// Create a result stamped with the current time
    pub fn new(measurement: Measurement, value: f64) -> Self {
        Self {
            measurement,
            value,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}", self.measurement, self.value)?;
        if let Some(unit) = self.measurement.unit() {
            write!(f, "{}", unit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_and_unit() {
        assert_eq!(Measurement::VoltageL1.description(), "L1 Voltage");
        assert_eq!(Measurement::VoltageL1.unit(), Some("V"));
        assert_eq!(Measurement::Cosphi.unit(), None);
        assert_eq!(Measurement::Import.unit(), Some("kWh"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Measurement::CurrentL2.to_string(), "CurrentL2");
        let result = MeasurementResult::new(Measurement::VoltageL1, 229.954);
        assert_eq!(result.to_string(), "VoltageL1: 229.95V");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Measurement::HeatSinkTemp).unwrap();
        assert_eq!(json, "\"HeatSinkTemp\"");
        let back: Measurement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Measurement::HeatSinkTemp);
    }
}
