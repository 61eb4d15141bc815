//! # predation-sim
//!
//! Grid-based predator-prey simulation with seasons and a shared food pool.
//!
//! ## Features
//!
//! - **Three species**: prey forage, predators eat prey, apex hunters eat both
//! - **Double-buffered**: agents read one field and write the next, so acting
//!   order does not bias outcomes
//! - **Seasonal**: breeding and hunger shift with the season, the prey food
//!   pool is replenished and depleted on season changes
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: Seeded random number generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use predation_sim::{Config, Simulator};
//!
//! let mut sim = Simulator::new(Config::default());
//!
//! // Run until 500 steps or until only one species is left
//! let steps = sim.run_for(500);
//!
//! println!("Ran {} steps: {}", steps, sim.population_details());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use predation_sim::Config;
//!
//! let mut config = Config::default();
//! config.world.depth = 80;
//! config.world.width = 120;
//! config.predator.breeding_probability = 0.12;
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Driving from another thread
//!
//! ```rust,no_run
//! use predation_sim::shared::SimulationHandle;
//! use predation_sim::{Config, Simulator};
//!
//! let mut handle = SimulationHandle::spawn(Simulator::new(Config::default()));
//! handle.set_speed(50);
//! handle.start();
//! for event in handle.try_recv_events() {
//!     println!("{:?}", event);
//! }
//! handle.shutdown();
//! ```

pub mod agent;
pub mod config;
pub mod ecology;
pub mod field;
pub mod location;
pub mod observer;
pub mod shared;
pub mod simulator;
pub mod stats;

// Re-export main types
pub use agent::{Agent, DeathCause, Species};
pub use config::{Config, ConfigError};
pub use ecology::{Season, SharedResourcePool, WorldState};
pub use field::Field;
pub use location::Location;
pub use observer::{SimulationObserver, ViewEvent};
pub use simulator::{SimPhase, Simulator};
pub use stats::{FieldStats, Stats, StepReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark on a square field of side `size`
pub fn benchmark(steps: u64, size: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.depth = size;
    config.world.width = size;

    let mut sim = Simulator::new(config);
    let initial_population = sim.agents().len();

    let start = Instant::now();
    let taken = sim.run_for(steps);
    let elapsed = start.elapsed();

    BenchmarkResult {
        steps: taken,
        field_size: size,
        initial_population,
        final_population: sim.agents().len(),
        elapsed_secs: elapsed.as_secs_f64(),
        steps_per_second: taken as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub steps: u64,
    pub field_size: usize,
    pub initial_population: usize,
    pub final_population: usize,
    pub elapsed_secs: f64,
    pub steps_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Field: {}x{}", self.field_size, self.field_size)?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Population: {} -> {}", self.initial_population, self.final_population)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} steps/s", self.steps_per_second)?;
        Ok(())
    }
}
