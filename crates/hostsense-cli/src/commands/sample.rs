use hostsense_core::{AgentConfig, Measurement, SensorResult, SensorSource};

use super::OutputFormat;

/// Start, take one snapshot, dispose. Any failure exits with status 1.
pub fn run(config: &AgentConfig, format: OutputFormat) {
    let mut agent = super::make_composite(config);

    match snapshot_once(&mut agent) {
        Ok(readings) => print!("{}", super::render(&readings, format, true)),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// One full start/snapshot/dispose cycle. `dispose` runs on every path.
fn snapshot_once(agent: &mut dyn SensorSource) -> SensorResult<Vec<Measurement>> {
    if let Err(e) = agent.start() {
        agent.dispose();
        return Err(e);
    }
    let snapshot = agent.read_all_sensors().collect();
    agent.dispose();
    snapshot
}
