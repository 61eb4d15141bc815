//! Simulation engine - owns the fields and the roster and drives each step.

use crate::agent::{Agent, Species, TickContext};
use crate::config::{Config, SeasonPhase, WorldConfig};
use crate::ecology::{Season, SeasonTransition, WorldState};
use crate::field::Field;
use crate::location::Location;
use crate::observer::{NullObserver, SimulationObserver};
use crate::stats::{FieldStats, PopulationCounts, Stats, StatsHistory, StepReport};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Where the simulator is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Created, nothing placed yet
    Idle,
    /// Field populated, no step taken
    Populated,
    Stepping,
    /// Fewer than two species left
    Halted,
}

/// The predator-prey simulation.
///
/// Two fields are kept: agents read `current` and write `next`, then the two
/// are swapped. Roster slot `i` is the agent stored with index `i` in the
/// current field.
pub struct Simulator {
    current: Field,
    next: Field,
    roster: Vec<Agent>,
    newborns: Vec<Agent>,

    world: WorldState,
    stats: FieldStats,
    history: StatsHistory,
    last_report: StepReport,

    step: u64,
    phase: SimPhase,
    delay: Duration,
    last_food_level: i64,

    config: Config,
    observer: Box<dyn SimulationObserver>,

    rng: ChaCha8Rng,
    seed: u64,
}

impl Simulator {
    /// Create and populate a simulator with a random seed
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::with_seed(config, seed)
    }

    /// Create and populate a simulator with a specific seed for reproducibility
    pub fn with_seed(config: Config, seed: u64) -> Self {
        let mut sim = Self::empty(config, seed);
        sim.populate();
        sim
    }

    /// Create a simulator with empty fields. Agents can be added with
    /// [`spawn`](Simulator::spawn) or [`populate`](Simulator::populate).
    pub fn empty(config: Config, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (depth, width) = field_dimensions(&config.world);
        let world = WorldState::new(&config.seasons, &config.resources, &mut rng);
        let last_food_level = world.food_level();

        Self {
            current: Field::new(depth, width),
            next: Field::new(depth, width),
            roster: Vec::new(),
            newborns: Vec::new(),
            world,
            stats: FieldStats::new(),
            history: StatsHistory::new(config.logging.stats_interval),
            last_report: StepReport::default(),
            step: 0,
            phase: SimPhase::Idle,
            delay: Duration::from_millis(config.world.step_delay_ms),
            last_food_level,
            config,
            observer: Box::new(NullObserver),
            rng,
            seed,
        }
    }

    /// Replace the display surface
    pub fn set_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observer = observer;
    }

    /// Fill the field at random.
    ///
    /// Each cell independently rolls for a predator, then a prey, then an
    /// apex hunter; the first hit wins. The roster is shuffled afterwards so
    /// acting order carries no positional bias.
    pub fn populate(&mut self) {
        self.current.clear();
        self.next.clear();
        self.roster.clear();
        self.newborns.clear();
        self.stats.reset();

        let order = [Species::Predator, Species::Prey, Species::ApexHunter];
        for row in 0..self.current.depth() {
            for col in 0..self.current.width() {
                let location = Location::new(row, col);
                for species in order {
                    let config = self.config.species(species);
                    if self.rng.gen::<f64>() < config.creation_probability {
                        self.roster.push(Agent::random(species, location, config, &mut self.rng));
                        break;
                    }
                }
            }
        }

        self.roster.shuffle(&mut self.rng);
        for (index, agent) in self.roster.iter().enumerate() {
            self.current.place(agent.occupant(index), agent.location);
        }

        self.phase = SimPhase::Populated;
        log::info!(
            "Populated {}x{} field: {}",
            self.current.depth(),
            self.current.width(),
            self.stats.population_details(&self.current)
        );

        self.observer.on_step(self.step, &self.current);
        self.observer.on_season_changed(self.world.season().name());
        self.last_food_level = self.world.food_level();
        self.observer.on_food_level_changed(self.last_food_level);
    }

    /// Place a newborn of `species` at `location` and return its roster index.
    ///
    /// Panics if the cell is already taken.
    pub fn spawn(&mut self, species: Species, location: Location) -> usize {
        let agent = Agent::newborn(species, location, self.config.species(species));
        self.insert(agent)
    }

    /// Add a fully specified agent to the current field.
    pub fn insert(&mut self, agent: Agent) -> usize {
        assert!(agent.active, "cannot insert an inactive agent");
        assert!(
            self.current.is_free(agent.location),
            "two active agents placed at {}",
            agent.location
        );
        let index = self.roster.len();
        self.current.place(agent.occupant(index), agent.location);
        self.roster.push(agent);
        self.stats.reset();
        if self.phase == SimPhase::Idle {
            self.phase = SimPhase::Populated;
        }
        index
    }

    /// Advance the simulation by one step
    pub fn step(&mut self) -> StepReport {
        if self.phase == SimPhase::Idle {
            log::warn!("Stepping a simulator that was never populated");
        }
        self.step += 1;
        if self.phase != SimPhase::Halted {
            self.phase = SimPhase::Stepping;
        }
        let elapsed = self.step - 1;

        let mut transition = None;
        if self.config.world.season_phase == SeasonPhase::BeforeTick {
            transition = self.world.advance_season(elapsed);
        }

        self.newborns.clear();
        let mut report = StepReport::default();
        let acting = self.roster.len();
        {
            let mut ctx = TickContext {
                current: &self.current,
                next: &mut self.next,
                roster: &mut self.roster,
                newborns: &mut self.newborns,
                world: &mut self.world,
                config: &self.config,
                rng: &mut self.rng,
                report: &mut report,
            };
            for index in 0..acting {
                ctx.act(index);
            }
        }

        self.roster.append(&mut self.newborns);
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
        self.prune();

        if self.config.world.season_phase == SeasonPhase::AfterTick {
            transition = self.world.advance_season(elapsed);
        }

        self.stats.reset();
        self.notify(transition);

        #[cfg(debug_assertions)]
        self.check_invariants();

        if !self.stats.is_viable(&self.current) && self.phase != SimPhase::Halted {
            self.phase = SimPhase::Halted;
            log::info!(
                "Halted at step {}: {}",
                self.step,
                self.stats.population_details(&self.current)
            );
            self.observer.on_halted(self.step);
        }

        if self.history.is_due(self.step) {
            let stats = self.snapshot(&report);
            log::debug!("{}", stats.summary());
            self.history.record(stats);
        }

        self.last_report = report;
        report
    }

    /// Drop inactive agents and renumber the field to match.
    fn prune(&mut self) {
        let mut kept = 0;
        let remap: Vec<Option<usize>> = self
            .roster
            .iter()
            .map(|agent| {
                agent.active.then(|| {
                    kept += 1;
                    kept - 1
                })
            })
            .collect();
        self.roster.retain(|agent| agent.active);
        self.current.remap_indices(&remap);
    }

    fn notify(&mut self, transition: Option<SeasonTransition>) {
        self.observer.on_step(self.step, &self.current);
        if let Some(transition) = transition {
            log::info!(
                "Step {}: {} begins, prey food {:+} -> {}",
                self.step,
                transition.season,
                transition.food_delta,
                transition.food_level
            );
            self.observer.on_season_changed(transition.season.name());
        }
        let food_level = self.world.food_level();
        if food_level != self.last_food_level {
            self.last_food_level = food_level;
            self.observer.on_food_level_changed(food_level);
        }
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        for (index, agent) in self.roster.iter().enumerate() {
            assert!(agent.active, "inactive agent {} survived pruning", index);
            assert_eq!(
                self.current.object_at(agent.location),
                Some(agent.occupant(index)),
                "agent {} is not stored at {}",
                index,
                agent.location
            );
        }
        assert_eq!(self.current.occupants().count(), self.roster.len());
    }

    /// Step until `max_steps` were taken or the field stops being viable.
    ///
    /// Returns the number of steps taken.
    pub fn run_for(&mut self, max_steps: u64) -> u64 {
        self.run_with_callback(max_steps, |_, _| {})
    }

    /// Like [`run_for`](Simulator::run_for), calling `callback` after each
    /// step. Sleeps for the configured delay between steps.
    pub fn run_with_callback<F>(&mut self, max_steps: u64, mut callback: F) -> u64
    where
        F: FnMut(&mut Simulator, &StepReport),
    {
        let mut taken = 0;
        while taken < max_steps && self.is_viable() {
            let report = self.step();
            taken += 1;
            callback(self, &report);
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
        }
        taken
    }

    /// More than one species still alive
    pub fn is_viable(&mut self) -> bool {
        self.stats.is_viable(&self.current)
    }

    /// Start over: step zero, spring, a fresh food pool and a new population.
    pub fn reset(&mut self) {
        self.step = 0;
        self.world.reset(&mut self.rng);
        self.history.clear();
        self.last_report = StepReport::default();
        self.populate();
    }

    /// Pause between steps in [`run_for`](Simulator::run_for), in milliseconds
    pub fn set_speed(&mut self, delay_ms: u64) {
        self.delay = Duration::from_millis(delay_ms);
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn snapshot(&mut self, report: &StepReport) -> Stats {
        let population = self.stats.counts(&self.current);
        Stats::new(
            self.step,
            self.world.season(),
            self.world.food_level(),
            population,
            report,
        )
    }

    /// Stats for the current step
    pub fn stats(&mut self) -> Stats {
        let report = self.last_report;
        self.snapshot(&report)
    }

    pub fn counts(&mut self) -> PopulationCounts {
        self.stats.counts(&self.current)
    }

    pub fn population_details(&mut self) -> String {
        self.stats.population_details(&self.current)
    }

    #[inline]
    pub fn field(&self) -> &Field {
        &self.current
    }

    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.roster
    }

    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step
    }

    #[inline]
    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    #[inline]
    pub fn season(&self) -> Season {
        self.world.season()
    }

    /// Prey food level, floored at zero
    pub fn food_level(&self) -> i64 {
        self.world.food_level()
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn history(&self) -> &StatsHistory {
        &self.history
    }

    pub fn last_report(&self) -> &StepReport {
        &self.last_report
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Configured dimensions, or the defaults when either is zero.
fn field_dimensions(world: &WorldConfig) -> (usize, usize) {
    if world.depth == 0 || world.width == 0 {
        log::warn!(
            "Field dimensions {}x{} must be positive, using {}x{}",
            world.depth,
            world.width,
            WorldConfig::DEFAULT_DEPTH,
            WorldConfig::DEFAULT_WIDTH
        );
        return (WorldConfig::DEFAULT_DEPTH, WorldConfig::DEFAULT_WIDTH);
    }
    (world.depth, world.width)
}
