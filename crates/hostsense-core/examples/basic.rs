//! Basic session sampling example.
//!
//! Builds a composite from every source available on this machine, takes
//! one snapshot, and prints it.
//!
//! Run: `cargo run --example basic`

use hostsense_core::{CompositeSource, SensorSource, detect_available_sources, platform_info};

fn main() {
    let info = platform_info();
    println!("Host: {} {} ({})", info.system, info.machine, info.edition);

    let mut agent = CompositeSource::new(detect_available_sources());
    println!("Sources registered: {}", agent.len());

    if let Err(e) = agent.start() {
        eprintln!("start failed: {e}");
        agent.dispose();
        return;
    }

    for reading in agent.read_all_sensors() {
        match reading {
            Ok(m) => match &m.text_value {
                Some(text) => println!("{:<28} {:<24} {text}", m.identifier, m.sensor_label),
                None => println!("{:<28} {:<24} {}", m.identifier, m.sensor_label, m.value),
            },
            Err(e) => {
                eprintln!("snapshot failed: {e}");
                break;
            }
        }
    }

    agent.dispose();
}
