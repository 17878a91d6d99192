//! Host platform probing: OS version, edition label and source discovery.

use crate::source::SensorSource;

/// Operating system family of a version record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOS,
    Other,
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
            Self::MacOS => write!(f, "macos"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// OS version as reported by the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsVersion {
    pub family: OsFamily,
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    /// Version string as the platform reports it, used in fallback labels.
    pub raw: String,
}

impl OsVersion {
    /// A Windows version; `raw` is rendered as `major.minor.build`.
    pub fn windows(major: u32, minor: u32, build: u32) -> Self {
        Self {
            family: OsFamily::Windows,
            major,
            minor,
            build,
            raw: format!("{major}.{minor}.{build}"),
        }
    }

    /// Parse a dotted release string such as `6.8.0-45-generic` or `23.1.0`.
    ///
    /// Leading digits of each of the first three dot-separated fields are
    /// taken; anything missing or unparsable becomes 0.
    pub fn parse_release(family: OsFamily, release: &str) -> Self {
        let mut fields = release.trim().split('.').map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u32>().unwrap_or(0)
        });
        Self {
            family,
            major: fields.next().unwrap_or(0),
            minor: fields.next().unwrap_or(0),
            build: fields.next().unwrap_or(0),
            raw: release.trim().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Edition label
// ---------------------------------------------------------------------------

/// A `(predicate, label)` pair in [`EDITION_RULES`].
pub type EditionRule = (fn(&OsVersion) -> bool, &'static str);

fn is_win11(v: &OsVersion) -> bool {
    v.family == OsFamily::Windows && v.major == 10 && v.build >= 22000
}

fn is_win10(v: &OsVersion) -> bool {
    v.family == OsFamily::Windows && v.major == 10
}

fn is_win81(v: &OsVersion) -> bool {
    v.family == OsFamily::Windows && v.major == 6 && v.minor == 3
}

fn is_win8(v: &OsVersion) -> bool {
    v.family == OsFamily::Windows && v.major == 6 && v.minor == 2
}

fn is_win7(v: &OsVersion) -> bool {
    v.family == OsFamily::Windows && v.major == 6 && v.minor == 1
}

/// Ordered edition rules, evaluated top to bottom. First match wins.
pub static EDITION_RULES: &[EditionRule] = &[
    (is_win11, "Win11"),
    (is_win10, "Win10"),
    (is_win81, "Win8.1"),
    (is_win8, "Win8"),
    (is_win7, "Win7"),
];

/// Short edition label for `version`, e.g. `"Win11"`.
///
/// Versions no rule matches map to `Unknown (<raw>)`.
pub fn edition_label(version: &OsVersion) -> String {
    EDITION_RULES
        .iter()
        .find(|(matches, _)| matches(version))
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| format!("Unknown ({})", version.raw))
}

// ---------------------------------------------------------------------------
// Host probes
// ---------------------------------------------------------------------------

/// Version of the running OS.
#[cfg(windows)]
pub fn host_os_version() -> OsVersion {
    #[repr(C)]
    struct OsVersionInfoW {
        size: u32,
        major: u32,
        minor: u32,
        build: u32,
        platform_id: u32,
        csd_version: [u16; 128],
    }

    unsafe extern "system" {
        fn RtlGetVersion(info: *mut OsVersionInfoW) -> i32;
    }

    let mut info = OsVersionInfoW {
        size: std::mem::size_of::<OsVersionInfoW>() as u32,
        major: 0,
        minor: 0,
        build: 0,
        platform_id: 0,
        csd_version: [0; 128],
    };
    // SAFETY: `info` is a properly sized OSVERSIONINFOW with its size field
    // set; RtlGetVersion only writes within it and always returns success.
    let status = unsafe { RtlGetVersion(&mut info) };
    if status != 0 {
        log::debug!("RtlGetVersion returned status {status:#x}");
    }
    OsVersion::windows(info.major, info.minor, info.build)
}

/// Version of the running OS.
#[cfg(unix)]
pub fn host_os_version() -> OsVersion {
    let family = if cfg!(target_os = "linux") {
        OsFamily::Linux
    } else if cfg!(target_os = "macos") {
        OsFamily::MacOS
    } else {
        OsFamily::Other
    };

    // SAFETY: `utsname` is plain old data; an all-zero value is valid.
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    // SAFETY: `uname` fills the struct we own and has no other side effects.
    if unsafe { libc::uname(&mut uts) } != 0 {
        return OsVersion::parse_release(family, "");
    }
    // SAFETY: on success `release` holds a NUL-terminated string.
    let release = unsafe { std::ffi::CStr::from_ptr(uts.release.as_ptr()) };
    OsVersion::parse_release(family, &release.to_string_lossy())
}

/// Version of the running OS.
#[cfg(not(any(windows, unix)))]
pub fn host_os_version() -> OsVersion {
    OsVersion::parse_release(OsFamily::Other, "")
}

/// Basic platform description for display.
#[derive(Debug, Clone)]
pub struct PlatformInfo {
    pub system: &'static str,
    pub machine: &'static str,
    pub edition: String,
}

/// Describe the running host.
pub fn platform_info() -> PlatformInfo {
    PlatformInfo {
        system: std::env::consts::OS,
        machine: std::env::consts::ARCH,
        edition: edition_label(&host_os_version()),
    }
}

/// Every known source that reports itself available on this machine.
pub fn detect_available_sources() -> Vec<Box<dyn SensorSource>> {
    crate::sources::all_sources()
        .into_iter()
        .filter(|s| s.is_available())
        .collect()
}
