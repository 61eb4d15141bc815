//! predation-sim - CLI Entry Point
//!
//! Grid-based predator-prey simulation.

use clap::{Parser, Subcommand};
use predation_sim::observer::LogObserver;
use predation_sim::{benchmark, Config, Simulator};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "predation-sim")]
#[command(version)]
#[command(about = "Grid-based predator-prey simulation with seasons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Maximum number of steps to simulate
        #[arg(short, long, default_value = "500")]
        steps: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Delay between steps in milliseconds (overrides the config)
        #[arg(short, long)]
        delay: Option<u64>,

        /// Write the stats history as JSON to this path
        #[arg(long)]
        stats_out: Option<PathBuf>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of steps
        #[arg(short, long, default_value = "500")]
        steps: u64,

        /// Side length of the square field
        #[arg(long, default_value = "100")]
        size: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            steps,
            seed,
            delay,
            stats_out,
            quiet,
        } => run_simulation(config, steps, seed, delay, stats_out, quiet),

        Commands::Benchmark { steps, size } => {
            init_logging("warn");
            run_benchmark(steps, size)
        }

        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }
    }
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run_simulation(
    config_path: PathBuf,
    steps: u64,
    seed: Option<u64>,
    delay: Option<u64>,
    stats_out: Option<PathBuf>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };
    init_logging(&config.logging.log_level);
    if config_path.exists() {
        log::info!("Loaded config from {:?}", config_path);
    } else {
        log::info!("Using default configuration");
    }

    let mut sim = match seed {
        Some(s) => {
            log::info!("Using seed: {}", s);
            Simulator::with_seed(config.clone(), s)
        }
        None => Simulator::new(config.clone()),
    };
    if let Some(ms) = delay {
        sim.set_speed(ms);
    }
    if !quiet {
        sim.set_observer(Box::new(LogObserver));
    }

    println!("Starting simulation");
    println!("  Field: {}x{}", sim.field().depth(), sim.field().width());
    println!("  Population: {}", sim.population_details());
    println!("  Food: {}", sim.food_level());
    println!("  Steps: {}", steps);
    println!("  Seed: {}", sim.seed());
    println!();

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval.max(1);

    sim.run_with_callback(steps, |sim, _| {
        if !quiet && sim.step_count() % stats_interval == 0 {
            println!("{}", sim.stats().summary());
        }
    });

    let elapsed = start.elapsed();

    println!();
    println!("=== Simulation Complete ===");
    if !sim.is_viable() {
        println!("Halted: fewer than two species left");
    }
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Steps: {}", sim.step_count());
    println!("Season: {}", sim.season());
    println!("Population: {}", sim.population_details());

    let food = sim.history().food_series();
    let lowest = food.iter().map(|&(_, level)| level).min();
    let highest = food.iter().map(|&(_, level)| level).max();
    if let (Some(lowest), Some(highest)) = (lowest, highest) {
        println!("Food range: {}..{} over {} snapshots", lowest, highest, food.len());
    }

    if let Some(path) = stats_out {
        let path = path.to_string_lossy().to_string();
        sim.history().save(&path)?;
        println!("Stats history: {}", path);
    }

    Ok(())
}

fn run_benchmark(steps: u64, size: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== predation-sim Benchmark ===");
    println!("Steps: {}", steps);
    println!("Field: {}x{}", size, size);
    println!();

    let result = benchmark(steps, size);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    log::info!("Configuration saved to: {:?}", output);
    Ok(())
}
