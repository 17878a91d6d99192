//! # hostsense-core
//!
//! **One stream of named, typed measurements from every sensor on the host.**
//!
//! `hostsense-core` samples live state from one or more sensor sources and
//! exposes the result as one stream of named, typed [`Measurement`]s, ready
//! for an exporter to ship to a metrics backend.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hostsense_core::{CompositeSource, SensorSource, SessionSource};
//!
//! let mut agent = CompositeSource::new(vec![Box::new(SessionSource::new())]);
//! agent.start().expect("start");
//!
//! for reading in agent.read_all_sensors() {
//!     let m = reading.expect("session table");
//!     println!("{} {} = {}", m.identifier, m.sensor_label, m.value);
//! }
//!
//! agent.dispose();
//! ```
//!
//! ## Architecture
//!
//! Sources → Composite (concatenate, in registration order) → Exporter
//!
//! Every source implements the [`SensorSource`] trait. The
//! [`CompositeSource`] fans in any number of them, so the rest of a pipeline
//! sees one source. The built-in [`SessionSource`] reports interactive logon
//! sessions: totals, remote-desktop vs console, disconnected, and who is
//! logged on.
//!
//! Sampling is synchronous and pull-based. Nothing runs in the background and
//! nothing is cached between snapshots.

pub mod composite;
pub mod config;
pub mod error;
pub mod measurement;
pub mod platform;
pub mod source;
pub mod sources;

pub use composite::{CompositeReadings, CompositeSource};
pub use config::{AgentConfig, ConfigError};
pub use error::{SensorError, SensorResult};
pub use measurement::{HardwareKind, Measurement, SensorKind};
pub use platform::{
    OsFamily, OsVersion, PlatformInfo, detect_available_sources, edition_label, host_os_version,
    platform_info,
};
pub use source::{Platform, Readings, SensorSource, SourceInfo};
pub use sources::sessions::{
    ClientProtocol, ConnectState, RawSession, RawSessions, SessionRecord, SessionTableProvider,
    SessionTally,
};
pub use sources::{SessionSource, WhoOrder};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
