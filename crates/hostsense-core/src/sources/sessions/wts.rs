//! Session table from Windows Remote Desktop Services (`wtsapi32`).
//!
//! `WTSEnumerateSessionsW` returns one buffer holding every session slot;
//! each username/domain/protocol query returns another buffer. Every buffer
//! is owned by a [`WtsBuffer`] and handed back to `WTSFreeMemory` on drop, so
//! nothing leaks when the caller stops iterating early.

use std::ffi::c_void;
use std::ptr;

use crate::error::{SensorError, SensorResult};
use crate::platform::{OsVersion, host_os_version};

use super::{ClientProtocol, ConnectState, RawSession, RawSessions, SessionTableProvider};

/// `WTS_CURRENT_SERVER_HANDLE`.
const CURRENT_SERVER: *mut c_void = ptr::null_mut();

// WTS_INFO_CLASS values.
const WTS_USER_NAME: u32 = 5;
const WTS_DOMAIN_NAME: u32 = 7;
const WTS_CLIENT_PROTOCOL_TYPE: u32 = 16;

/// `WTS_SESSION_INFOW`.
#[repr(C)]
struct WtsSessionInfo {
    session_id: u32,
    _win_station_name: *mut u16,
    state: i32,
}

unsafe extern "system" {
    fn WTSEnumerateSessionsW(
        server: *mut c_void,
        reserved: u32,
        version: u32,
        session_info: *mut *mut WtsSessionInfo,
        count: *mut u32,
    ) -> i32;

    fn WTSQuerySessionInformationW(
        server: *mut c_void,
        session_id: u32,
        info_class: u32,
        buffer: *mut *mut u16,
        bytes_returned: *mut u32,
    ) -> i32;

    fn WTSFreeMemory(memory: *mut c_void);
}

/// A `len`-element array allocated by the WTS API.
struct WtsBuffer<T> {
    ptr: *mut T,
    len: usize,
}

impl<T> WtsBuffer<T> {
    fn as_slice(&self) -> &[T] {
        if self.ptr.is_null() || self.len == 0 {
            return &[];
        }
        // SAFETY: the WTS call that produced `ptr` reported `len` elements,
        // and the memory stays valid until `WTSFreeMemory` in drop.
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl<T> Drop for WtsBuffer<T> {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            // SAFETY: `ptr` came from a successful WTS call and is freed once.
            unsafe { WTSFreeMemory(self.ptr.cast()) };
        }
    }
}

/// Session table of the local Remote Desktop Session Host.
pub struct WtsSessionTable;

impl SessionTableProvider for WtsSessionTable {
    fn enumerate_sessions(&self) -> SensorResult<RawSessions<'_>> {
        let mut info: *mut WtsSessionInfo = ptr::null_mut();
        let mut count = 0u32;
        // SAFETY: both out-pointers reference locals of the right type.
        let ok = unsafe { WTSEnumerateSessionsW(CURRENT_SERVER, 0, 1, &mut info, &mut count) };
        if ok == 0 {
            return Err(SensorError::last_os_error());
        }
        Ok(Box::new(WtsSessions {
            table: WtsBuffer {
                ptr: info,
                len: count as usize,
            },
            next: 0,
        }))
    }

    fn os_version(&self) -> OsVersion {
        host_os_version()
    }
}

/// Walks the enumerated slots, querying identity only for slots that can
/// hold a logon.
struct WtsSessions {
    table: WtsBuffer<WtsSessionInfo>,
    next: usize,
}

impl Iterator for WtsSessions {
    type Item = RawSession;

    fn next(&mut self) -> Option<RawSession> {
        while let Some(slot) = self.table.as_slice().get(self.next) {
            self.next += 1;
            let Some(state) = ConnectState::from_code(slot.state) else {
                continue;
            };
            if !state.has_logon() {
                continue;
            }
            let id = slot.session_id;
            return Some(RawSession {
                session_id: id,
                username: query_string(id, WTS_USER_NAME),
                domain: query_string(id, WTS_DOMAIN_NAME),
                state,
                protocol: ClientProtocol::from_code(query_u16(id, WTS_CLIENT_PROTOCOL_TYPE)),
            });
        }
        None
    }
}

/// Query one info class; `None` if the call fails.
fn query(session_id: u32, info_class: u32) -> Option<WtsBuffer<u16>> {
    let mut buffer: *mut u16 = ptr::null_mut();
    let mut bytes = 0u32;
    // SAFETY: both out-pointers reference locals of the right type.
    let ok = unsafe {
        WTSQuerySessionInformationW(CURRENT_SERVER, session_id, info_class, &mut buffer, &mut bytes)
    };
    if ok == 0 || buffer.is_null() {
        return None;
    }
    Some(WtsBuffer {
        ptr: buffer,
        len: bytes as usize / std::mem::size_of::<u16>(),
    })
}

fn query_string(session_id: u32, info_class: u32) -> Option<String> {
    let buffer = query(session_id, info_class)?;
    let units = buffer.as_slice();
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    Some(String::from_utf16_lossy(&units[..end]))
}

fn query_u16(session_id: u32, info_class: u32) -> u16 {
    query(session_id, info_class)
        .and_then(|buffer| buffer.as_slice().first().copied())
        .unwrap_or(0)
}
