//! Session table from the utmpx login database (Linux, macOS).
//!
//! Every `USER_PROCESS` record is a logged-on, active session. A record with
//! a remote host (ssh, xrdp, ...) is counted as a remote-desktop session; a
//! host that is an X display such as `:0` is local. utmpx has no notion of
//! domains or disconnected sessions.
//!
//! The utmpx cursor is process-global and `getutxent` is not reentrant, so
//! every open cursor holds [`CURSOR_LOCK`]. Enumerations on different threads
//! run one after another.

use std::sync::{Mutex, MutexGuard};

use crate::error::SensorResult;
use crate::platform::{OsVersion, host_os_version};

use super::{ClientProtocol, ConnectState, RawSession, RawSessions, SessionTableProvider};

/// Session table backed by `getutxent`.
pub struct UtmpSessionTable;

impl SessionTableProvider for UtmpSessionTable {
    fn enumerate_sessions(&self) -> SensorResult<RawSessions<'_>> {
        Ok(Box::new(UtmpxCursor::open()))
    }

    fn os_version(&self) -> OsVersion {
        host_os_version()
    }
}

/// Serializes access to the process-global utmpx cursor.
static CURSOR_LOCK: Mutex<()> = Mutex::new(());

/// Open handle on the utmpx database. Closed on drop, then the lock is
/// released.
///
/// A thread must not open a second cursor while it still holds one.
struct UtmpxCursor {
    _guard: MutexGuard<'static, ()>,
}

impl UtmpxCursor {
    fn open() -> Self {
        // The guarded data is `()`, so a poisoned lock is still usable.
        let guard = CURSOR_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        // SAFETY: rewinds (or opens) the process-global utmpx cursor, which
        // this thread now holds exclusively.
        unsafe { libc::setutxent() };
        Self { _guard: guard }
    }
}

impl Drop for UtmpxCursor {
    fn drop(&mut self) {
        // SAFETY: closes the cursor opened in `open`; safe to call at any time.
        unsafe { libc::endutxent() };
    }
}

impl Iterator for UtmpxCursor {
    type Item = RawSession;

    fn next(&mut self) -> Option<RawSession> {
        loop {
            // SAFETY: the cursor is open for the lifetime of `self`. The
            // returned record is only read before the next call.
            let entry = unsafe { libc::getutxent() };
            if entry.is_null() {
                return None;
            }
            // SAFETY: non-null pointers from getutxent point at a valid record.
            let entry = unsafe { &*entry };
            if entry.ut_type != libc::USER_PROCESS {
                continue;
            }
            let host = c_field(&entry.ut_host);
            return Some(RawSession {
                session_id: entry.ut_pid as u32,
                username: c_field(&entry.ut_user),
                domain: None,
                state: ConnectState::Active,
                protocol: if host.as_deref().is_some_and(is_remote_host) {
                    ClientProtocol::Rdp
                } else {
                    ClientProtocol::Console
                },
            });
        }
    }
}

/// Read a fixed-size, possibly unterminated C string field.
fn c_field(field: &[libc::c_char]) -> Option<String> {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    let s = String::from_utf8_lossy(&bytes).trim().to_string();
    if s.is_empty() { None } else { Some(s) }
}

/// Local X displays show up as `:0` or `:0.0`.
fn is_remote_host(host: &str) -> bool {
    !host.starts_with(':')
}
