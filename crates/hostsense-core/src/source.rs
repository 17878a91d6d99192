//! Sensor source trait and its metadata.
//!
//! Every data source implements the [`SensorSource`] trait: a one-time
//! `start`, any number of independent `read_all_sensors` snapshots, and a
//! final `dispose`. [`CompositeSource`](crate::composite::CompositeSource)
//! implements it too, so sources nest.

use crate::error::SensorResult;
use crate::measurement::{HardwareKind, Measurement};

/// Target platform for a sensor source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Works on any platform.
    Any,
    /// Requires Windows.
    Windows,
    /// Requires Linux.
    Linux,
    /// Requires macOS.
    MacOS,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
            Self::MacOS => write!(f, "macos"),
        }
    }
}

/// Metadata about a sensor source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Unique identifier (e.g. `"sessions"`). Used in config files.
    pub name: &'static str,
    /// One-line human-readable description.
    pub description: &'static str,
    /// Kind of device the source's measurements belong to. `None` when a
    /// source mixes devices.
    pub hardware_kind: Option<HardwareKind>,
    /// Target platform.
    pub platforms: &'static [Platform],
    /// Whether this source only fans in other sources.
    pub composite: bool,
}

/// One snapshot from a source: a finite, non-restartable sequence.
///
/// An `Err` item means the snapshot failed; consumers stop at the first one.
pub type Readings<'a> = Box<dyn Iterator<Item = SensorResult<Measurement>> + 'a>;

/// Trait that every sensor source must implement.
pub trait SensorSource: Send {
    /// Source metadata.
    fn info(&self) -> &SourceInfo;

    /// Check if this source can operate on the current machine.
    fn is_available(&self) -> bool;

    /// One-time setup before the first snapshot. A failure is fatal for the
    /// source.
    fn start(&mut self) -> SensorResult<()> {
        Ok(())
    }

    /// Produce a snapshot of every measurement at the current instant.
    ///
    /// Each call is an independent poll. Work is deferred until the returned
    /// iterator is first advanced.
    fn read_all_sensors(&self) -> Readings<'_>;

    /// Release whatever `start` acquired. Must not fail, and must be safe
    /// without a prior `start` or when called twice.
    fn dispose(&mut self) {}

    /// Convenience: name from info.
    fn name(&self) -> &'static str {
        self.info().name
    }
}
