use hostsense_core::platform::platform_info;
use hostsense_core::sources::all_sources;

pub fn run() {
    let info = platform_info();
    println!("Platform: {} {} ({})", info.system, info.machine, info.edition);
    println!();

    let sources = all_sources();
    let available = sources.iter().filter(|s| s.is_available()).count();

    println!(
        "Found {available} of {} sensor source(s) available:\n",
        sources.len()
    );
    for src in &sources {
        let info = src.info();
        let mark = if src.is_available() {
            "\u{2705}"
        } else {
            "\u{274C}"
        };
        let platforms = info
            .platforms
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {mark} {:<12} {}", info.name, info.description);
        println!("     {:<12} platforms: {platforms}", "");
    }

    if sources.is_empty() {
        println!("  (none found)");
    }
}
