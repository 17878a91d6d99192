fn main() {
    // Link the Remote Desktop Services and NT runtime import libraries on Windows
    // for session enumeration (WTSEnumerateSessionsW) and RtlGetVersion.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        println!("cargo:rustc-link-lib=dylib=wtsapi32");
        println!("cargo:rustc-link-lib=dylib=ntdll");
    }
}
