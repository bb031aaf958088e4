//! Batch solver: runs the ILS on every `.dzn` instance of a directory.

use clap::Parser;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use warehouse_ils::config::{Config, StoreOrder};
use warehouse_ils::problem::Problem;
use warehouse_ils::utils::{save_solution, SearchStatistics};
use warehouse_ils::WarehouseIls;

#[derive(Parser, Debug)]
#[command(name = "warehouse-ils", version, about = "Warehouse location with Iterated Local Search")]
struct Args {
    /// Instance file or directory of `.dzn` instances
    #[arg(short, long, default_value = "inputs")]
    input: PathBuf,

    /// Directory for the solution files
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_iterations: Option<u32>,

    /// Time limit per instance in seconds
    #[arg(long)]
    time_limit: Option<u64>,

    /// Place stores in random order during construction
    #[arg(long)]
    shuffle: bool,

    /// Write a JSON summary of all instances to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::new(),
    };

    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(iterations) = args.max_iterations {
        config = config.with_max_iterations(iterations);
    }
    if let Some(seconds) = args.time_limit {
        config = config.with_time_limit(Duration::from_secs(seconds));
    }
    if args.shuffle {
        config = config.with_store_order(StoreOrder::Shuffled);
    }

    Ok(config)
}

fn collect_instances(input: &Path) -> std::io::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut instances: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext == "dzn"))
        .collect();
    instances.sort();
    Ok(instances)
}

fn solve_instance(
    path: &Path,
    output: &Path,
    config: &Config,
) -> Result<SearchStatistics, Box<dyn std::error::Error>> {
    let problem = Problem::from_file(path)?;
    info!(
        "Loaded {}: {} warehouses, {} stores",
        problem.name,
        problem.warehouse_count(),
        problem.store_count()
    );

    let mut algorithm = WarehouseIls::new(problem, config.clone());
    let result = algorithm.run()?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output_path = output.join(format!("opt_{}.txt", file_name));
    save_solution(&result.best, &output_path)?;
    info!("Solution saved to {}", output_path.display());

    Ok(SearchStatistics::from_result(
        &algorithm.problem.name,
        &result,
        algorithm.run_time,
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    fs::create_dir_all(&args.output)?;

    let instances = collect_instances(&args.input)?;
    if instances.is_empty() {
        warn!("No .dzn instances found in {}", args.input.display());
    }

    let mut summary = Vec::with_capacity(instances.len());
    for path in &instances {
        info!("Processing {}", path.display());
        match solve_instance(path, &args.output, &config) {
            Ok(stats) => {
                info!("{}", stats.format());
                summary.push(stats);
            }
            Err(e) => error!("Failed to solve {}: {}", path.display(), e),
        }
    }

    if let Some(summary_path) = &args.summary {
        fs::write(summary_path, serde_json::to_string_pretty(&summary)?)?;
        info!("Summary written to {}", summary_path.display());
    }

    Ok(())
}
