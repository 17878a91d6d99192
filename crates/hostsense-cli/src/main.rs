//! CLI for hostsense: who is logged on, and what every other sensor says.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hostsense")]
#[command(about = "hostsense: sample logon sessions and other host sensors")]
#[command(version = hostsense_core::VERSION)]
struct Cli {
    /// JSON config file (sources, interval_secs, who_order)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every known sensor source and whether it runs on this machine
    Scan,

    /// Take one snapshot of the configured sources and print it
    Sample {
        /// Comma-separated source names (overrides the config file)
        #[arg(long)]
        sources: Option<String>,

        /// Output format
        #[arg(long, default_value = "table", value_parser = ["table", "json"])]
        format: String,

        /// Sort identities in the "who" reading instead of keeping OS order
        #[arg(long)]
        sort_who: bool,
    },

    /// Take snapshots repeatedly until Ctrl+C
    Watch {
        /// Seconds between snapshots (overrides the config file)
        #[arg(long)]
        interval: Option<f64>,

        /// Stop after this many snapshots
        #[arg(long)]
        count: Option<u64>,

        /// Comma-separated source names (overrides the config file)
        #[arg(long)]
        sources: Option<String>,

        /// Output format; json prints one array per line
        #[arg(long, default_value = "table", value_parser = ["table", "json"])]
        format: String,

        /// Sort identities in the "who" reading instead of keeping OS order
        #[arg(long)]
        sort_who: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = commands::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Scan => commands::scan::run(),
        Commands::Sample {
            sources,
            format,
            sort_who,
        } => {
            commands::apply_overrides(&mut config, sources.as_deref(), None, sort_who);
            commands::sample::run(&config, commands::parse_format(&format));
        }
        Commands::Watch {
            interval,
            count,
            sources,
            format,
            sort_who,
        } => {
            commands::apply_overrides(&mut config, sources.as_deref(), interval, sort_who);
            commands::watch::run(&config, commands::parse_format(&format), count);
        }
    }
}
