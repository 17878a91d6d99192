//! The measurement value type produced by every sensor source.
//!
//! A [`Measurement`] is a flat, immutable record. Sources build fresh ones on
//! every sampling call; nothing about a measurement survives between calls.

use serde::{Deserialize, Serialize};

/// What a measurement reads. Downstream formatters key on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Logon-session counters.
    UserSessions,
    /// String-valued reading; the payload lives in `text_value`.
    Text,
    /// Degrees Celsius.
    Temperature,
    /// Utilisation percentage.
    Load,
    /// Frequency in MHz.
    Clock,
    /// Watts.
    Power,
    /// Revolutions per minute.
    Fan,
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserSessions => write!(f, "user_sessions"),
            Self::Text => write!(f, "text"),
            Self::Temperature => write!(f, "temperature"),
            Self::Load => write!(f, "load"),
            Self::Clock => write!(f, "clock"),
            Self::Power => write!(f, "power"),
            Self::Fan => write!(f, "fan"),
        }
    }
}

/// The kind of logical device that owns a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareKind {
    OperatingSystem,
    Cpu,
    Gpu,
    Memory,
    Storage,
    Motherboard,
    Network,
}

impl std::fmt::Display for HardwareKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OperatingSystem => write!(f, "operating_system"),
            Self::Cpu => write!(f, "cpu"),
            Self::Gpu => write!(f, "gpu"),
            Self::Memory => write!(f, "memory"),
            Self::Storage => write!(f, "storage"),
            Self::Motherboard => write!(f, "motherboard"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// One named, typed reading.
///
/// `identifier` is a stable hierarchical path (e.g. `/users/0/usersessions/1`)
/// that backends can key on even if `sensor_label` is renamed. Within one
/// sampling call of one source, `(identifier, ordinal)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub identifier: String,
    pub sensor_label: String,
    /// Numeric reading; `0.0` for text measurements.
    pub value: f64,
    pub sensor_kind: SensorKind,
    /// Short label of the owning device, e.g. `"Win11"`.
    pub hardware_label: String,
    pub hardware_kind: HardwareKind,
    /// Textual payload. `None` on numeric measurements.
    pub text_value: Option<String>,
    pub ordinal: u32,
}

impl Measurement {
    /// Build a numeric measurement.
    pub fn numeric(
        identifier: impl Into<String>,
        sensor_label: impl Into<String>,
        value: f64,
        sensor_kind: SensorKind,
        hardware_label: impl Into<String>,
        hardware_kind: HardwareKind,
        ordinal: u32,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            sensor_label: sensor_label.into(),
            value,
            sensor_kind,
            hardware_label: hardware_label.into(),
            hardware_kind,
            text_value: None,
            ordinal,
        }
    }

    /// Build a string-valued measurement. `value` is fixed at `0.0`.
    pub fn text(
        identifier: impl Into<String>,
        sensor_label: impl Into<String>,
        text_value: impl Into<String>,
        hardware_label: impl Into<String>,
        hardware_kind: HardwareKind,
        ordinal: u32,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            sensor_label: sensor_label.into(),
            value: 0.0,
            sensor_kind: SensorKind::Text,
            hardware_label: hardware_label.into(),
            hardware_kind,
            text_value: Some(text_value.into()),
            ordinal,
        }
    }

    /// Whether this measurement carries a text payload.
    pub fn is_text(&self) -> bool {
        self.text_value.is_some()
    }
}
