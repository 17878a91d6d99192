pub mod sample;
pub mod scan;
pub mod watch;

use std::path::Path;

use hostsense_core::{AgentConfig, CompositeSource, Measurement, WhoOrder};

/// How snapshots are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Parse an output format string into the enum.
pub fn parse_format(s: &str) -> OutputFormat {
    match s {
        "json" => OutputFormat::Json,
        "table" => OutputFormat::Table,
        _ => {
            eprintln!("Unknown format '{s}', using table");
            OutputFormat::Table
        }
    }
}

/// Load the config file, or defaults when none is given. Exits on error.
pub fn load_config(path: Option<&Path>) -> AgentConfig {
    let Some(path) = path else {
        return AgentConfig::default();
    };
    match AgentConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}

/// Apply command-line overrides on top of the loaded config. Exits if the
/// result does not validate.
pub fn apply_overrides(
    config: &mut AgentConfig,
    sources: Option<&str>,
    interval: Option<f64>,
    sort_who: bool,
) {
    if let Some(filter) = sources {
        config.sources = split_sources(filter);
    }
    if let Some(secs) = interval {
        config.interval_secs = secs;
    }
    if sort_who {
        config.who_order = WhoOrder::Sorted;
    }
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }
}

fn split_sources(filter: &str) -> Vec<String> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the composite for `config`. Exits on error.
pub fn make_composite(config: &AgentConfig) -> CompositeSource {
    match config.build_composite() {
        Ok(composite) => composite,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}

/// Render one snapshot.
pub fn render(readings: &[Measurement], format: OutputFormat, pretty: bool) -> String {
    match format {
        OutputFormat::Json => {
            let json = if pretty {
                serde_json::to_string_pretty(readings)
            } else {
                serde_json::to_string(readings)
            };
            json.unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
        }
        OutputFormat::Table => render_table(readings),
    }
}

fn render_table(readings: &[Measurement]) -> String {
    let mut out = format!(
        "{:<28} {:<24} {:<24} {}\n",
        "IDENTIFIER", "SENSOR", "VALUE", "DEVICE"
    );
    for m in readings {
        out.push_str(&format!(
            "{:<28} {:<24} {:<24} {} ({})\n",
            m.identifier,
            m.sensor_label,
            format_value(m),
            m.hardware_label,
            m.hardware_kind
        ));
    }
    if readings.is_empty() {
        out.push_str("  (no readings)\n");
    }
    out
}

fn format_value(m: &Measurement) -> String {
    match &m.text_value {
        Some(text) => text.clone(),
        None if m.value.fract() == 0.0 => format!("{:.0}", m.value),
        None => format!("{:.2}", m.value),
    }
}
