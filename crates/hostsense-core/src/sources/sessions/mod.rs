//! # Logon-session telemetry
//!
//! [`SessionSource`] polls the host's interactive logon sessions (local
//! console and remote desktop) and reports them as a fixed set of five
//! measurements under `/users/0/usersessions`:
//!
//! | ordinal | label                    | reading                              |
//! |---------|--------------------------|--------------------------------------|
//! | 0       | `logged_in`              | sessions with a user                 |
//! | 1       | `rdp_logged_in`          | of those, remote-desktop sessions    |
//! | 2       | `console_logged_in`      | of those, everything else            |
//! | 3       | `disconnected_logged_in` | of those, disconnected sessions      |
//! | 4       | `who`                    | `domain\user` identities, or `Idle`  |
//!
//! ## Architecture
//!
//! ```text
//! sessions/
//! ├── mod.rs   ← you are here (classification, aggregation, the source)
//! ├── wts.rs   ← Windows Remote Desktop Services session table
//! └── utmp.rs  ← utmpx login records on Linux and macOS
//! ```
//!
//! The OS session table sits behind [`SessionTableProvider`], so the
//! classification rules run unchanged against a fake table in tests. Each
//! snapshot enumerates the table from scratch; nothing is held between calls.

use serde::{Deserialize, Serialize};

use crate::error::{SensorError, SensorResult};
use crate::measurement::{HardwareKind, Measurement, SensorKind};
use crate::platform::{OsVersion, edition_label};
use crate::source::{Platform, Readings, SensorSource, SourceInfo};

#[cfg(any(target_os = "linux", target_os = "macos"))]
mod utmp;
#[cfg(windows)]
mod wts;

#[cfg(any(target_os = "linux", target_os = "macos"))]
pub use utmp::UtmpSessionTable;
#[cfg(windows)]
pub use wts::WtsSessionTable;

/// Parent path shared by every session measurement.
pub const PARENT_PATH: &str = "/users/0/usersessions";

/// Counter labels, indexed by ordinal.
const COUNTER_LABELS: [&str; 4] = [
    "logged_in",
    "rdp_logged_in",
    "console_logged_in",
    "disconnected_logged_in",
];

const WHO_LABEL: &str = "who";
const WHO_ORDINAL: u32 = 4;
/// "who" value when nobody is logged on.
const IDLE: &str = "Idle";
/// Domain substituted when a session reports none.
const LOCAL_DOMAIN: &str = "local";

// ---------------------------------------------------------------------------
// Raw session table
// ---------------------------------------------------------------------------

/// Connection state of a session slot, in platform code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectState {
    Active,
    Connected,
    ConnectQuery,
    Shadow,
    Disconnected,
    Idle,
    Listen,
    Reset,
    Down,
    Init,
}

impl ConnectState {
    /// Map a platform connect-state code. Unknown codes give `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Active,
            1 => Self::Connected,
            2 => Self::ConnectQuery,
            3 => Self::Shadow,
            4 => Self::Disconnected,
            5 => Self::Idle,
            6 => Self::Listen,
            7 => Self::Reset,
            8 => Self::Down,
            9 => Self::Init,
            _ => return None,
        })
    }

    /// Only active and disconnected slots can have a logged-on user.
    pub fn has_logon(self) -> bool {
        matches!(self, Self::Active | Self::Disconnected)
    }
}

/// Client protocol a session is attached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientProtocol {
    /// Local console, platform code 0.
    Console,
    /// Remote desktop, platform code 2.
    Rdp,
    /// Any other nonzero code.
    Other(u16),
}

impl ClientProtocol {
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Console,
            2 => Self::Rdp,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            Self::Console => 0,
            Self::Rdp => 2,
            Self::Other(code) => code,
        }
    }
}

/// One row of the OS session table, as enumerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSession {
    pub session_id: u32,
    pub username: Option<String>,
    pub domain: Option<String>,
    pub state: ConnectState,
    pub protocol: ClientProtocol,
}

/// Rows of one enumeration. Dropping the iterator releases every native
/// resource the enumeration holds, whether or not it was fully consumed.
pub type RawSessions<'a> = Box<dyn Iterator<Item = RawSession> + 'a>;

/// Access to the host's session table and OS version.
pub trait SessionTableProvider: Send {
    /// Enumerate the current session table.
    ///
    /// Fails with [`SensorError::Enumeration`] when the platform call fails.
    fn enumerate_sessions(&self) -> SensorResult<RawSessions<'_>>;

    /// Version of the OS the table belongs to.
    fn os_version(&self) -> OsVersion;

    /// Whether enumeration can work on this host at all.
    fn is_supported(&self) -> bool {
        true
    }
}

/// Provider for hosts with no session-table implementation.
pub struct UnsupportedSessionTable;

impl SessionTableProvider for UnsupportedSessionTable {
    fn enumerate_sessions(&self) -> SensorResult<RawSessions<'_>> {
        Err(SensorError::Unsupported(std::env::consts::OS))
    }

    fn os_version(&self) -> OsVersion {
        crate::platform::host_os_version()
    }

    fn is_supported(&self) -> bool {
        false
    }
}

/// The session table of the running host.
pub fn host_provider() -> Box<dyn SessionTableProvider> {
    #[cfg(windows)]
    {
        Box::new(WtsSessionTable)
    }
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        Box::new(UtmpSessionTable)
    }
    #[cfg(not(any(windows, target_os = "linux", target_os = "macos")))]
    {
        Box::new(UnsupportedSessionTable)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A session with a logged-on user, classified for counting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: u32,
    pub username: String,
    pub domain: Option<String>,
    /// `domain\username`, or bare `username` when there is no domain.
    pub full_name: String,
    pub is_rdp: bool,
    pub is_disconnected: bool,
}

impl SessionRecord {
    /// Classify a raw row. Rows without a logon state or without a username
    /// (service and system sessions) give `None`.
    pub fn classify(raw: RawSession) -> Option<Self> {
        if !raw.state.has_logon() {
            return None;
        }
        let username = raw.username.filter(|u| !u.is_empty())?;
        let domain = raw.domain.filter(|d| !d.is_empty());
        let full_name = match &domain {
            Some(d) => format!("{d}\\{username}"),
            None => username.clone(),
        };
        Some(Self {
            session_id: raw.session_id,
            username,
            domain,
            full_name,
            is_rdp: raw.protocol == ClientProtocol::Rdp,
            is_disconnected: raw.state == ConnectState::Disconnected,
        })
    }

    /// Identity reported by "who": `domain\username` with `local` standing in
    /// for a missing domain.
    pub fn identity(&self) -> String {
        let domain = self.domain.as_deref().unwrap_or(LOCAL_DOMAIN);
        format!("{domain}\\{}", self.username)
    }
}

/// Session counters for one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub total: u32,
    pub rdp: u32,
    pub console: u32,
    pub disconnected: u32,
}

impl SessionTally {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.add(record);
        }
        tally
    }

    /// Count one record: into exactly one of rdp/console, and independently
    /// into disconnected.
    pub fn add(&mut self, record: &SessionRecord) {
        self.total += 1;
        if record.is_rdp {
            self.rdp += 1;
        } else {
            self.console += 1;
        }
        if record.is_disconnected {
            self.disconnected += 1;
        }
    }

    /// Counter values in ordinal order.
    fn values(&self) -> [u32; 4] {
        [self.total, self.rdp, self.console, self.disconnected]
    }
}

/// Order of identities in the "who" value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhoOrder {
    /// The order the OS returned the sessions in.
    #[default]
    Enumeration,
    /// Lexically sorted.
    Sorted,
}

/// Distinct identities across `records`, in the requested order.
pub fn distinct_identities(records: &[SessionRecord], order: WhoOrder) -> Vec<String> {
    let mut identities: Vec<String> = Vec::with_capacity(records.len());
    for record in records {
        let identity = record.identity();
        if !identities.contains(&identity) {
            identities.push(identity);
        }
    }
    if order == WhoOrder::Sorted {
        identities.sort();
    }
    identities
}

/// The "who" text: `Idle`, one identity, or identities joined by `", "`.
pub fn who_value(records: &[SessionRecord], order: WhoOrder) -> String {
    let identities = distinct_identities(records, order);
    if identities.is_empty() {
        IDLE.to_string()
    } else {
        identities.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

static SESSIONS_INFO: SourceInfo = SourceInfo {
    name: "sessions",
    description: "Interactive logon sessions: totals, remote vs console, disconnected, who",
    hardware_kind: Some(HardwareKind::OperatingSystem),
    platforms: &[Platform::Windows, Platform::Linux, Platform::MacOS],
    composite: false,
};

/// Sensor source reporting the host's logon sessions.
///
/// `start` and `dispose` are no-ops; every snapshot acquires and releases its
/// own OS resources.
pub struct SessionSource {
    provider: Box<dyn SessionTableProvider>,
    who_order: WhoOrder,
}

impl SessionSource {
    /// Session source over the running host's session table.
    pub fn new() -> Self {
        Self::with_provider(host_provider())
    }

    /// Session source over an arbitrary session table.
    pub fn with_provider(provider: Box<dyn SessionTableProvider>) -> Self {
        Self {
            provider,
            who_order: WhoOrder::default(),
        }
    }

    pub fn with_who_order(mut self, who_order: WhoOrder) -> Self {
        self.who_order = who_order;
        self
    }

    /// Take one snapshot of the session table as five measurements.
    pub fn snapshot(&self) -> SensorResult<Vec<Measurement>> {
        let mut enumerated = 0usize;
        let records: Vec<SessionRecord> = self
            .provider
            .enumerate_sessions()?
            .inspect(|_| enumerated += 1)
            .filter_map(SessionRecord::classify)
            .collect();
        log::debug!(
            "session table: {enumerated} row(s) enumerated, {} with a logged-on user",
            records.len()
        );

        let hardware_label = edition_label(&self.provider.os_version());
        let tally = SessionTally::from_records(&records);

        let mut out = Vec::with_capacity(COUNTER_LABELS.len() + 1);
        for (ordinal, (label, value)) in (0u32..).zip(COUNTER_LABELS.iter().zip(tally.values())) {
            out.push(Measurement::numeric(
                format!("{PARENT_PATH}/{ordinal}"),
                *label,
                f64::from(value),
                SensorKind::UserSessions,
                hardware_label.as_str(),
                HardwareKind::OperatingSystem,
                ordinal,
            ));
        }
        out.push(Measurement::text(
            format!("{PARENT_PATH}/{WHO_ORDINAL}"),
            WHO_LABEL,
            who_value(&records, self.who_order),
            hardware_label,
            HardwareKind::OperatingSystem,
            WHO_ORDINAL,
        ));
        Ok(out)
    }
}

impl Default for SessionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for SessionSource {
    fn info(&self) -> &SourceInfo {
        &SESSIONS_INFO
    }

    fn is_available(&self) -> bool {
        self.provider.is_supported()
    }

    fn read_all_sensors(&self) -> Readings<'_> {
        Box::new(
            std::iter::once_with(move || self.snapshot()).flat_map(|snapshot| match snapshot {
                Ok(measurements) => measurements.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            }),
        )
    }
}
