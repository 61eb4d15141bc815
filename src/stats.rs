//! Statistics tracking for the simulation.

use crate::agent::{DeathCause, Species};
use crate::ecology::Season;
use crate::field::Field;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Live count for one species
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    species: Species,
    count: usize,
}

impl Counter {
    pub fn new(species: Species) -> Self {
        Self { species, count: 0 }
    }

    #[inline]
    pub fn species(&self) -> Species {
        self.species
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn increment(&mut self) {
        self.count += 1;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Per-species population counts for a field.
///
/// Counts are computed lazily: [`reset`](FieldStats::reset) marks them stale
/// and the next query rescans the whole field.
#[derive(Clone, Debug, Default)]
pub struct FieldStats {
    counters: HashMap<Species, Counter>,
    valid: bool,
}

impl FieldStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter and mark the counts stale.
    pub fn reset(&mut self) {
        self.valid = false;
        for counter in self.counters.values_mut() {
            counter.reset();
        }
    }

    pub fn increment_count(&mut self, species: Species) {
        self.counters
            .entry(species)
            .or_insert_with(|| Counter::new(species))
            .increment();
    }

    /// Mark the counts as up to date.
    pub fn count_finished(&mut self) {
        self.valid = true;
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Full rescan of `field`.
    pub fn recompute(&mut self, field: &Field) {
        self.reset();
        for (_, occupant) in field.occupants() {
            self.increment_count(occupant.species);
        }
        self.count_finished();
    }

    fn ensure_valid(&mut self, field: &Field) {
        if !self.valid {
            self.recompute(field);
        }
    }

    /// More than one species still alive
    pub fn is_viable(&mut self, field: &Field) -> bool {
        self.ensure_valid(field);
        self.counters.values().filter(|c| c.count() > 0).count() > 1
    }

    /// Last computed count for `species`. Zero while stale.
    pub fn count(&self, species: Species) -> usize {
        if !self.valid {
            return 0;
        }
        self.counters.get(&species).map_or(0, Counter::count)
    }

    /// Counts for `field`, recomputing if stale
    pub fn counts(&mut self, field: &Field) -> PopulationCounts {
        self.ensure_valid(field);
        PopulationCounts {
            prey: self.count(Species::Prey),
            predators: self.count(Species::Predator),
            apex_hunters: self.count(Species::ApexHunter),
        }
    }

    /// e.g. `"Prey: 120 Predator: 14"`; species with no members are left out.
    pub fn population_details(&mut self, field: &Field) -> String {
        self.ensure_valid(field);
        Species::ALL
            .iter()
            .filter_map(|&species| {
                let count = self.count(species);
                (count > 0).then(|| format!("{}: {}", species.name(), count))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Live members per species
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub prey: usize,
    pub predators: usize,
    pub apex_hunters: usize,
}

impl PopulationCounts {
    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::Prey => self.prey,
            Species::Predator => self.predators,
            Species::ApexHunter => self.apex_hunters,
        }
    }

    pub fn total(&self) -> usize {
        self.prey + self.predators + self.apex_hunters
    }
}

/// Deaths per cause
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathCounts {
    pub old_age: usize,
    pub starvation: usize,
    pub overcrowding: usize,
    pub predation: usize,
    pub fight: usize,
}

impl DeathCounts {
    pub fn record(&mut self, cause: DeathCause) {
        match cause {
            DeathCause::OldAge => self.old_age += 1,
            DeathCause::Starvation => self.starvation += 1,
            DeathCause::Overcrowding => self.overcrowding += 1,
            DeathCause::Predation => self.predation += 1,
            DeathCause::Fight => self.fight += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.old_age + self.starvation + self.overcrowding + self.predation + self.fight
    }
}

/// What happened during one step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Newborns actually placed
    pub births: usize,
    pub deaths: DeathCounts,
}

impl StepReport {
    pub fn record_death(&mut self, cause: DeathCause) {
        self.deaths.record(cause);
    }
}

/// Statistics snapshot for a simulation step
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stats {
    /// Steps completed
    pub step: u64,
    pub season: Season,
    /// Prey food level, floored at zero
    pub food_level: i64,
    pub population: PopulationCounts,
    /// Births this step
    pub births: usize,
    /// Deaths this step
    pub deaths: DeathCounts,
}

impl Stats {
    pub fn new(
        step: u64,
        season: Season,
        food_level: i64,
        population: PopulationCounts,
        report: &StepReport,
    ) -> Self {
        Self {
            step,
            season,
            food_level,
            population,
            births: report.births,
            deaths: report.deaths,
        }
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | {:6} | Food:{:6} | Prey:{:5} | Pred:{:4} | Apex:{:3} | Born:{:3} | Died:{:3}",
            self.step,
            self.season.name(),
            self.food_level,
            self.population.prey,
            self.population.predators,
            self.population.apex_hunters,
            self.births,
            self.deaths.total(),
        )
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded stats snapshots
    pub snapshots: Vec<Stats>,
    /// Recording interval
    pub interval: u64,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval: interval.max(1),
        }
    }

    /// Whether a snapshot is due after `step` completed steps
    #[inline]
    pub fn is_due(&self, step: u64) -> bool {
        step % self.interval.max(1) == 0
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn latest(&self) -> Option<&Stats> {
        self.snapshots.last()
    }

    /// Get population of one species over time
    pub fn population_series(&self, species: Species) -> Vec<(u64, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.step, s.population.get(species)))
            .collect()
    }

    /// Get prey food level over time
    pub fn food_series(&self) -> Vec<(u64, i64)> {
        self.snapshots.iter().map(|s| (s.step, s.food_level)).collect()
    }

    /// Save history to file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
