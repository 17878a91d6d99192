use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use hostsense_core::{AgentConfig, Measurement, SensorResult, SensorSource};

use super::OutputFormat;

/// Snapshot the configured sources every `interval_secs` until Ctrl+C or
/// `count` snapshots. A failed snapshot is reported and the loop carries on.
pub fn run(config: &AgentConfig, format: OutputFormat, count: Option<u64>) {
    let mut agent = super::make_composite(config);

    if let Err(e) = agent.start() {
        eprintln!("Error starting sources: {e}");
        agent.dispose();
        std::process::exit(1);
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        log::warn!("could not install Ctrl+C handler: {e}");
    }

    let interval = Duration::from_secs_f64(config.interval_secs);
    let started = Instant::now();
    let mut taken: u64 = 0;
    let mut failed: u64 = 0;

    eprintln!(
        "Watching {} source(s) every {:.1}s (Ctrl+C to stop)",
        agent.len(),
        config.interval_secs
    );

    while running.load(Ordering::SeqCst) {
        if reached_count(count, taken) {
            break;
        }

        let tick = Instant::now();
        let snapshot: SensorResult<Vec<Measurement>> = agent.read_all_sensors().collect();
        taken += 1;

        match snapshot {
            Ok(readings) => print_tick(&readings, format, started.elapsed()),
            Err(e) => {
                failed += 1;
                log::warn!("snapshot {taken} failed: {e}");
                eprintln!("[{:>8.1}s] snapshot failed: {e}", started.elapsed().as_secs_f64());
            }
        }

        if reached_count(count, taken) {
            break;
        }

        let Some(deadline) = tick.checked_add(interval) else {
            log::warn!("interval {interval:?} overflows the clock, stopping");
            break;
        };
        while Instant::now() < deadline && running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    agent.dispose();

    eprintln!(
        "\nTook {taken} snapshot(s) in {:.1}s, {failed} failed",
        started.elapsed().as_secs_f64()
    );
}

/// Whether `taken` snapshots satisfy the optional `count` limit.
fn reached_count(count: Option<u64>, taken: u64) -> bool {
    count.is_some_and(|max| taken >= max)
}

fn print_tick(readings: &[Measurement], format: OutputFormat, elapsed: Duration) {
    match format {
        OutputFormat::Json => println!("{}", super::render(readings, format, false)),
        OutputFormat::Table => {
            println!("--- {:.1}s ---", elapsed.as_secs_f64());
            print!("{}", super::render(readings, format, false));
        }
    }
}
