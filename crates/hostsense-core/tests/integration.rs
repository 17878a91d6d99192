//! Integration tests for hostsense-core.
//!
//! These tests drive the public API end to end:
//! fake session table → session source → composite → measurements.

use std::sync::{Arc, Mutex};

use hostsense_core::{
    AgentConfig, ClientProtocol, CompositeSource, ConnectState, HardwareKind, Measurement,
    OsVersion, RawSession, RawSessions, Readings, SensorError, SensorKind, SensorResult,
    SensorSource, SessionSource, SessionTableProvider, SourceInfo, WhoOrder,
    detect_available_sources,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Session table whose rows can be swapped between snapshots.
struct ScriptedTable {
    rows: Arc<Mutex<Vec<RawSession>>>,
    version: OsVersion,
}

impl SessionTableProvider for ScriptedTable {
    fn enumerate_sessions(&self) -> SensorResult<RawSessions<'_>> {
        let rows = self.rows.lock().unwrap().clone();
        Ok(Box::new(rows.into_iter()))
    }

    fn os_version(&self) -> OsVersion {
        self.version.clone()
    }
}

struct BrokenTable;

impl SessionTableProvider for BrokenTable {
    fn enumerate_sessions(&self) -> SensorResult<RawSessions<'_>> {
        Err(SensorError::Enumeration(std::io::Error::from_raw_os_error(
            1722,
        )))
    }

    fn os_version(&self) -> OsVersion {
        OsVersion::windows(10, 0, 19041)
    }
}

static CPU_INFO: SourceInfo = SourceInfo {
    name: "cpu",
    description: "fixed cpu readings",
    hardware_kind: Some(HardwareKind::Cpu),
    platforms: &[hostsense_core::Platform::Any],
    composite: false,
};

/// Stand-in for a hardware sensor provider.
struct CpuSource;

impl SensorSource for CpuSource {
    fn info(&self) -> &SourceInfo {
        &CPU_INFO
    }

    fn is_available(&self) -> bool {
        true
    }

    fn read_all_sensors(&self) -> Readings<'_> {
        Box::new((0..2).map(|i| {
            Ok(Measurement::numeric(
                format!("/amdcpu/0/temperature/{i}"),
                format!("core_{i}"),
                40.0 + f64::from(i),
                SensorKind::Temperature,
                "Ryzen",
                HardwareKind::Cpu,
                i,
            ))
        }))
    }
}

fn session(id: u32, user: &str, domain: Option<&str>, rdp: bool) -> RawSession {
    RawSession {
        session_id: id,
        username: Some(user.to_string()),
        domain: domain.map(str::to_string),
        state: ConnectState::Active,
        protocol: if rdp {
            ClientProtocol::Rdp
        } else {
            ClientProtocol::Console
        },
    }
}

fn scripted(rows: Vec<RawSession>) -> (SessionSource, Arc<Mutex<Vec<RawSession>>>) {
    let rows = Arc::new(Mutex::new(rows));
    let table = ScriptedTable {
        rows: Arc::clone(&rows),
        version: OsVersion::windows(10, 0, 19041),
    };
    (SessionSource::with_provider(Box::new(table)), rows)
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn composite_of_hardware_and_sessions() {
    let (sessions, _rows) = scripted(vec![
        session(2, "bob", Some("DOM"), true),
        session(1, "alice", None, false),
    ]);
    let mut agent = CompositeSource::new(vec![Box::new(CpuSource), Box::new(sessions)]);
    agent.start().unwrap();

    let readings: Vec<Measurement> = agent
        .read_all_sensors()
        .collect::<SensorResult<_>>()
        .unwrap();
    agent.dispose();

    assert_eq!(readings.len(), 2 + 5);
    assert_eq!(readings[0].hardware_kind, HardwareKind::Cpu);
    assert_eq!(readings[1].hardware_kind, HardwareKind::Cpu);
    let session_part = &readings[2..];
    assert!(
        session_part
            .iter()
            .all(|m| m.hardware_kind == HardwareKind::OperatingSystem && m.hardware_label == "Win10")
    );
    assert_eq!(session_part[0].value, 2.0);
    assert_eq!(session_part[1].value, 1.0);
    assert_eq!(session_part[2].value, 1.0);
    assert_eq!(session_part[3].value, 0.0);
    assert_eq!(
        session_part[4].text_value.as_deref(),
        Some("DOM\\bob, local\\alice")
    );
}

#[test]
fn identifiers_unique_per_snapshot() {
    let (sessions, _rows) = scripted(vec![session(1, "alice", None, false)]);
    let agent = CompositeSource::new(vec![Box::new(CpuSource), Box::new(sessions)]);
    let readings: Vec<Measurement> = agent
        .read_all_sensors()
        .collect::<SensorResult<_>>()
        .unwrap();
    let mut keys: Vec<(String, u32)> = readings
        .iter()
        .map(|m| (m.identifier.clone(), m.ordinal))
        .collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), readings.len());
}

#[test]
fn snapshots_track_session_changes() {
    let (sessions, rows) = scripted(vec![]);
    let who = |source: &SessionSource| source.snapshot().unwrap()[4].text_value.clone();

    assert_eq!(who(&sessions).as_deref(), Some("Idle"));
    rows.lock().unwrap().push(session(3, "carol", Some("CORP"), true));
    assert_eq!(who(&sessions).as_deref(), Some("CORP\\carol"));
    rows.lock().unwrap().clear();
    assert_eq!(who(&sessions).as_deref(), Some("Idle"));
}

#[test]
fn broken_table_stops_the_composite_snapshot() {
    let agent = CompositeSource::new(vec![
        Box::new(SessionSource::with_provider(Box::new(BrokenTable))),
        Box::new(CpuSource),
    ]);
    let items: Vec<SensorResult<Measurement>> = agent.read_all_sensors().collect();
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], Err(SensorError::Enumeration(_))));
}

#[test]
fn sorted_who_order_via_builder() {
    let (sessions, _rows) = scripted(vec![
        session(1, "zoe", None, false),
        session(2, "adam", None, true),
    ]);
    let sessions = sessions.with_who_order(WhoOrder::Sorted);
    let m = sessions.snapshot().unwrap();
    assert_eq!(m[4].text_value.as_deref(), Some("local\\adam, local\\zoe"));
}

#[test]
fn measurements_serialize_for_exporters() {
    let (sessions, _rows) = scripted(vec![session(1, "alice", None, false)]);
    let readings = sessions.snapshot().unwrap();
    let json = serde_json::to_value(&readings).unwrap();
    assert_eq!(json[0]["identifier"], "/users/0/usersessions/0");
    assert_eq!(json[0]["sensor_kind"], "user_sessions");
    assert_eq!(json[0]["hardware_kind"], "operating_system");
    assert!(json[0]["text_value"].is_null());
    assert_eq!(json[4]["text_value"], "local\\alice");
}

#[test]
fn default_config_builds_session_composite() {
    let composite = AgentConfig::default().build_composite().unwrap();
    assert_eq!(composite.len(), 1);
    assert_eq!(composite.source_infos()[0].name, "sessions");
}

// ---------------------------------------------------------------------------
// Host-dependent
// ---------------------------------------------------------------------------

#[test]
fn detect_sources_runs() {
    // On Windows, Linux and macOS the session source is available.
    let sources = detect_available_sources();
    if cfg!(any(windows, target_os = "linux", target_os = "macos")) {
        assert!(sources.iter().any(|s| s.name() == "sessions"));
    }
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn host_session_snapshot_shape() {
    let source = SessionSource::new();
    let readings = source.snapshot().unwrap();
    assert_eq!(readings.len(), 5);
    let total = readings[0].value;
    assert_eq!(readings[1].value + readings[2].value, total);
    assert!(readings[3].value <= total);
}
