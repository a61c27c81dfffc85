use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use lifecycle_mining::core::event_data::lifecycle::record_ingest::RecordImportOptions;
use lifecycle_mining::{
    Exportable, Importable, LifecycleInductiveMiner, LifecycleLog, LifecycleMinerConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Usage: binary <path_to_log> [output_net.json] [--config <config.json>] [--process <name>]";

#[derive(Debug, Default)]
struct Args {
    log_path: PathBuf,
    output_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    process_name: Option<String>,
}

fn parse_args() -> Option<Args> {
    let mut args = env::args().skip(1);
    let mut positional: Vec<PathBuf> = Vec::new();
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config_path = Some(PathBuf::from(args.next()?)),
            "--process" => parsed.process_name = Some(args.next()?),
            _ => positional.push(PathBuf::from(arg)),
        }
    }
    let mut positional = positional.into_iter();
    parsed.log_path = positional.next()?;
    parsed.output_path = positional.next();
    if positional.next().is_some() {
        return None;
    }
    Some(parsed)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(args) = parse_args() else {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    };

    let config = match &args.config_path {
        Some(path) => LifecycleMinerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => LifecycleMinerConfig::default(),
    };

    let now = Instant::now();
    let log = LifecycleLog::import_from_path_with_options(
        &args.log_path,
        RecordImportOptions {
            process_name: args.process_name.clone(),
        },
    )?;
    info!(
        "Imported log with {} traces and {} activities in {:#?}",
        log.traces.len(),
        log.activities().len(),
        now.elapsed()
    );
    if log.is_empty() {
        warn!("Log {:?} contains no traces", args.log_path);
    }

    let now = Instant::now();
    let mut miner = LifecycleInductiveMiner::with_config(&log, config);
    miner.discover();
    info!("Discovered process tree in {:#?}", now.elapsed());
    println!("{}", miner.process_tree_expression());

    if let Some(net) = miner.petri_net() {
        println!(
            "Net with {} places, {} transitions and {} arcs",
            net.places.len(),
            net.transitions.len(),
            net.arcs.len()
        );
        if let Some(output_path) = &args.output_path {
            net.export_to_path(output_path)?;
            info!("Exported net to {:?}", output_path);
        }
    }
    Ok(())
}
