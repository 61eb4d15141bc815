//! Agents and their per-step life cycle.
//!
//! Every species shares one [`Agent`] record and behaviour is selected by
//! matching on [`Species`]. During a step an agent reads the current field and
//! writes only into the next one:
//!
//! 1. Age, dying past the species' max age
//! 2. Feed (prey draw from the shared pool, carnivores burn stored food)
//! 3. Breed into free neighbouring cells of the next field
//! 4. Hunt (carnivores) and move, dying if no cell is reachable

use crate::config::{Config, SpeciesConfig};
use crate::ecology::predation::{self, Encounter};
use crate::ecology::{WorldState, PREY_FOOD_LEVEL};
use crate::field::{Field, Occupant};
use crate::location::Location;
use crate::stats::StepReport;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of species
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Prey,
    Predator,
    ApexHunter,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Prey, Species::Predator, Species::ApexHunter];

    pub fn name(&self) -> &'static str {
        match self {
            Species::Prey => "Prey",
            Species::Predator => "Predator",
            Species::ApexHunter => "ApexHunter",
        }
    }

    /// Carnivores keep a private food level and hunt instead of foraging.
    #[inline]
    pub fn is_carnivore(&self) -> bool {
        !matches!(self, Species::Prey)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why an agent became inactive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    OldAge,
    Starvation,
    Overcrowding,
    /// Eaten by a carnivore
    Predation,
    /// Killed by the agent it tried to eat
    Fight,
}

/// A single simulation participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub species: Species,
    pub age: u32,
    /// `false` once dead; never set back
    pub active: bool,
    pub location: Location,
    /// Steps left before starving. Always zero for prey.
    pub food_level: i32,
}

impl Agent {
    /// Age zero, fully fed.
    pub fn newborn(species: Species, location: Location, config: &SpeciesConfig) -> Self {
        Self {
            species,
            age: 0,
            active: true,
            location,
            food_level: config.food_value.max(0),
        }
    }

    /// Random age below the species' max age and a random food level, as
    /// used when populating a field.
    pub fn random<R: Rng + ?Sized>(
        species: Species,
        location: Location,
        config: &SpeciesConfig,
        rng: &mut R,
    ) -> Self {
        let age = if config.max_age == 0 {
            0
        } else {
            rng.gen_range(0..config.max_age)
        };
        Self {
            species,
            age,
            active: true,
            location,
            food_level: config.random_food_level(rng),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Field entry for this agent stored at roster slot `index`
    #[inline]
    pub fn occupant(&self, index: usize) -> Occupant {
        Occupant::new(index, self.species)
    }
}

/// Everything an agent may touch during its step.
///
/// `roster` holds every agent that was alive at the start of the step. Agents
/// only flip `active` on other entries (predation); newborns go to `newborns`
/// and take the roster slots after the current end, in push order.
pub struct TickContext<'a, R: Rng + ?Sized> {
    pub current: &'a Field,
    pub next: &'a mut Field,
    pub roster: &'a mut [Agent],
    pub newborns: &'a mut Vec<Agent>,
    pub world: &'a mut WorldState,
    pub config: &'a Config,
    pub rng: &'a mut R,
    pub report: &'a mut StepReport,
}

enum Hunt {
    Caught(Location),
    Fought,
    Missed,
}

impl<'a, R: Rng + ?Sized> TickContext<'a, R> {
    /// Run one step for the roster entry at `index`.
    ///
    /// Inactive agents are skipped. Returns the cause when the agent died
    /// during its own step.
    pub fn act(&mut self, index: usize) -> Option<DeathCause> {
        let mut agent = self.roster[index];
        if !agent.active {
            return None;
        }
        let death = self.live(index, &mut agent);
        if let Some(cause) = death {
            agent.active = false;
            self.report.record_death(cause);
        }
        self.roster[index] = agent;
        death
    }

    fn live(&mut self, index: usize, agent: &mut Agent) -> Option<DeathCause> {
        let config = self.config;
        let config = config.species(agent.species);

        agent.age += 1;
        if agent.age > config.max_age {
            return Some(DeathCause::OldAge);
        }

        if !self.feed(agent) {
            return Some(DeathCause::Starvation);
        }

        self.breed(agent, config);

        let caught = if agent.species.is_carnivore() {
            match self.hunt(agent) {
                Hunt::Caught(location) => Some(location),
                Hunt::Fought => return Some(DeathCause::Fight),
                Hunt::Missed => None,
            }
        } else {
            None
        };

        let destination =
            caught.or_else(|| self.next.free_adjacent_location(agent.location, self.rng));
        match destination {
            Some(location) => {
                agent.location = location;
                self.settle(agent.occupant(index), location);
                None
            }
            None => Some(DeathCause::Overcrowding),
        }
    }

    /// Returns `false` when the agent starves.
    fn feed(&mut self, agent: &mut Agent) -> bool {
        match agent.species {
            Species::Prey => {
                let draw = self.config.foraging.draw_for_age(agent.age);
                self.world.resources_mut().try_draw(PREY_FOOD_LEVEL, draw)
            }
            Species::Predator | Species::ApexHunter => {
                agent.food_level -= 1 + self.world.season().hunger_adjust();
                agent.food_level > 0
            }
        }
    }

    fn breed(&mut self, parent: &Agent, config: &SpeciesConfig) {
        if parent.age < config.breeding_age || self.rng.gen::<f64>() >= config.breeding_probability {
            return;
        }
        let bound = if parent.species.is_carnivore() {
            config.max_litter_size * (self.world.season().breeding_adjust() + 1)
        } else {
            config.max_litter_size
        };
        let litter = self.rng.gen_range(1..=bound.max(1)) as usize;

        let free = self.next.free_adjacent_locations(parent.location, self.rng);
        if free.len() < litter {
            log::trace!(
                "{} at {} dropped {} of {} newborns",
                parent.species,
                parent.location,
                litter - free.len(),
                litter
            );
        }
        for location in free.into_iter().take(litter) {
            let index = self.roster.len() + self.newborns.len();
            let young = Agent::newborn(parent.species, location, config);
            self.settle(young.occupant(index), location);
            self.newborns.push(young);
            self.report.births += 1;
        }
    }

    /// Scan neighbours of the current field for something to eat.
    ///
    /// A target is only reachable while its cell in the next field is empty
    /// or still holds the target itself.
    fn hunt(&mut self, hunter: &mut Agent) -> Hunt {
        let config = self.config;
        for location in self.current.adjacent_locations(hunter.location, self.rng) {
            let Some(target) = self.current.object_at(location) else {
                continue;
            };
            if !self.roster[target.index].active {
                continue;
            }
            if matches!(self.next.object_at(location), Some(other) if other.index != target.index) {
                continue;
            }
            match predation::resolve_encounter(hunter.species, target.species, &config.predation, self.rng) {
                Encounter::Ignore => continue,
                Encounter::HunterKilled => return Hunt::Fought,
                Encounter::Eat => {
                    self.kill(target.index);
                    hunter.food_level = config.species(hunter.species).food_value;
                    return Hunt::Caught(location);
                }
            }
        }
        Hunt::Missed
    }

    /// Deactivate a roster entry and pull it out of the next field if it
    /// already moved there.
    fn kill(&mut self, index: usize) {
        let victim = &mut self.roster[index];
        victim.active = false;
        let location = victim.location;
        if self.next.object_at(location).map(|o| o.index) == Some(index) {
            self.next.take(location);
        }
        self.report.record_death(DeathCause::Predation);
    }

    fn settle(&mut self, occupant: Occupant, location: Location) {
        assert!(
            self.next.is_free(location),
            "two active agents placed at {}",
            location
        );
        self.next.place(occupant, location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecology::{ResourcesConfig, Season};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Harness {
        config: Config,
        world: WorldState,
        current: Field,
        next: Field,
        roster: Vec<Agent>,
        newborns: Vec<Agent>,
        rng: ChaCha8Rng,
        report: StepReport,
    }

    impl Harness {
        fn new(depth: usize, width: usize, food: i64) -> Self {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let mut config = Config::default();
            config.prey.breeding_probability = 0.0;
            config.predator.breeding_probability = 0.0;
            config.apex_hunter.breeding_probability = 0.0;
            let resources = ResourcesConfig {
                initial_min: food,
                initial_max: food,
                adjust_factor: 2,
            };
            let world = WorldState::new(&config.seasons, &resources, &mut rng);
            Self {
                config,
                world,
                current: Field::new(depth, width),
                next: Field::new(depth, width),
                roster: Vec::new(),
                newborns: Vec::new(),
                rng,
                report: StepReport::default(),
            }
        }

        fn spawn(&mut self, species: Species, location: Location, age: u32, food_level: i32) -> usize {
            let index = self.roster.len();
            self.roster.push(Agent {
                species,
                age,
                active: true,
                location,
                food_level,
            });
            self.current.place(Occupant::new(index, species), location);
            index
        }

        fn act(&mut self, index: usize) -> Option<DeathCause> {
            let mut ctx = TickContext {
                current: &self.current,
                next: &mut self.next,
                roster: &mut self.roster,
                newborns: &mut self.newborns,
                world: &mut self.world,
                config: &self.config,
                rng: &mut self.rng,
                report: &mut self.report,
            };
            ctx.act(index)
        }
    }

    #[test]
    fn test_dies_of_old_age() {
        let mut h = Harness::new(3, 3, 1000);
        let max_age = h.config.prey.max_age;
        let prey = h.spawn(Species::Prey, Location::new(1, 1), max_age, 0);
        assert_eq!(h.act(prey), Some(DeathCause::OldAge));
        assert!(!h.roster[prey].active);
        assert_eq!(h.roster[prey].age, max_age + 1);
        assert_eq!(h.next.occupants().count(), 0);
        assert_eq!(h.report.deaths.old_age, 1);
    }

    #[test]
    fn test_prey_starves_on_empty_pool() {
        let mut h = Harness::new(1, 1, 0);
        let prey = h.spawn(Species::Prey, Location::new(0, 0), 0, 0);
        assert_eq!(h.act(prey), Some(DeathCause::Starvation));
        assert_eq!(h.roster[prey].age, 1);
        assert!(h.next.is_free(Location::new(0, 0)));
    }

    #[test]
    fn test_prey_draw_depends_on_age() {
        let mut h = Harness::new(3, 3, 100);
        let young = h.spawn(Species::Prey, Location::new(0, 0), 0, 0);
        let adult = h.spawn(Species::Prey, Location::new(2, 2), 35, 0);
        h.act(young);
        assert_eq!(h.world.resources().level(PREY_FOOD_LEVEL), 99);
        h.act(adult);
        assert_eq!(h.world.resources().level(PREY_FOOD_LEVEL), 96);
    }

    #[test]
    fn test_prey_stays_when_only_own_cell_is_free() {
        let mut h = Harness::new(1, 1, 10);
        let prey = h.spawn(Species::Prey, Location::new(0, 0), 0, 0);
        assert_eq!(h.act(prey), None);
        assert_eq!(h.next.object_at(Location::new(0, 0)), Some(Occupant::new(prey, Species::Prey)));
    }

    #[test]
    fn test_prey_dies_when_overcrowded() {
        let mut h = Harness::new(1, 1, 10);
        let prey = h.spawn(Species::Prey, Location::new(0, 0), 0, 0);
        h.next.place(Occupant::new(7, Species::Predator), Location::new(0, 0));
        assert_eq!(h.act(prey), Some(DeathCause::Overcrowding));
        assert_eq!(h.report.deaths.overcrowding, 1);
    }

    #[test]
    fn test_carnivore_hunger_follows_season() {
        let mut h = Harness::new(5, 5, 0);
        let predator = h.spawn(Species::Predator, Location::new(2, 2), 20, 4);
        h.act(predator);
        assert_eq!(h.roster[predator].food_level, 3);

        h.world.advance_season(600);
        assert_eq!(h.world.season(), Season::Winter);
        h.current.clear();
        h.next.clear();
        let hungry = h.spawn(Species::Predator, Location::new(2, 2), 20, 2);
        assert_eq!(h.act(hungry), Some(DeathCause::Starvation));
    }

    #[test]
    fn test_predator_eats_adjacent_prey() {
        let mut h = Harness::new(3, 3, 1000);
        let prey_at = Location::new(0, 1);
        let predator = h.spawn(Species::Predator, Location::new(1, 1), 0, 2);
        let prey = h.spawn(Species::Prey, prey_at, 0, 0);
        assert_eq!(h.act(predator), None);
        assert!(!h.roster[prey].active);
        assert_eq!(h.roster[predator].location, prey_at);
        assert_eq!(h.roster[predator].food_level, h.config.predator.food_value);
        assert_eq!(h.next.object_at(prey_at), Some(Occupant::new(predator, Species::Predator)));
        assert_eq!(h.report.deaths.predation, 1);

        // The eaten prey does nothing when its turn comes.
        assert_eq!(h.act(prey), None);
        assert_eq!(h.next.occupants().count(), 1);
    }

    #[test]
    fn test_victim_that_already_moved_is_removed() {
        let mut h = Harness::new(3, 3, 1000);
        let prey = h.spawn(Species::Prey, Location::new(0, 1), 0, 0);
        let predator = h.spawn(Species::Predator, Location::new(1, 1), 0, 4);
        h.act(prey);
        let moved_to = h.roster[prey].location;
        assert_eq!(h.next.object_at(moved_to).map(|o| o.index), Some(prey));

        assert_eq!(h.act(predator), None);
        assert!(!h.roster[prey].active);
        let survivors: Vec<_> = h.next.occupants().collect();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].1.index, predator);
        assert_eq!(survivors[0].0, Location::new(0, 1));
    }

    #[test]
    fn test_predator_ignores_apex_and_dead_prey() {
        let mut h = Harness::new(3, 3, 1000);
        let predator = h.spawn(Species::Predator, Location::new(1, 1), 0, 4);
        h.spawn(Species::ApexHunter, Location::new(0, 0), 0, 6);
        let prey = h.spawn(Species::Prey, Location::new(2, 2), 0, 0);
        h.roster[prey].active = false;
        assert_eq!(h.act(predator), None);
        assert_eq!(h.roster[predator].food_level, 3);
        assert!(h.roster.iter().filter(|a| a.species == Species::ApexHunter).all(|a| a.active));
    }

    #[test]
    fn test_apex_eats_predator() {
        let mut h = Harness::new(3, 3, 1000);
        h.config.predation.fight_death_probability = 0.0;
        let apex = h.spawn(Species::ApexHunter, Location::new(1, 1), 0, 2);
        let predator = h.spawn(Species::Predator, Location::new(2, 1), 0, 4);
        assert_eq!(h.act(apex), None);
        assert!(!h.roster[predator].active);
        assert_eq!(h.roster[apex].location, Location::new(2, 1));
        assert_eq!(h.roster[apex].food_level, h.config.apex_hunter.food_value);
    }

    #[test]
    fn test_apex_can_die_fighting() {
        let mut h = Harness::new(3, 3, 1000);
        h.config.predation.fight_death_probability = 1.0;
        let apex = h.spawn(Species::ApexHunter, Location::new(1, 1), 0, 6);
        let predator = h.spawn(Species::Predator, Location::new(1, 2), 0, 4);
        assert_eq!(h.act(apex), Some(DeathCause::Fight));
        assert!(!h.roster[apex].active);
        assert!(h.roster[predator].active);
        assert_eq!(h.next.occupants().count(), 0);
        assert_eq!(h.report.deaths.fight, 1);
    }

    #[test]
    fn test_breeding_fills_free_neighbours() {
        let mut h = Harness::new(3, 3, 1000);
        h.config.prey.breeding_probability = 1.0;
        h.config.prey.max_litter_size = 1;
        let parent = h.spawn(Species::Prey, Location::new(1, 1), 10, 0);
        assert_eq!(h.act(parent), None);
        assert_eq!(h.newborns.len(), 1);
        let young = h.newborns[0];
        assert_eq!(young.age, 0);
        assert_eq!(young.species, Species::Prey);
        assert_ne!(young.location, Location::new(1, 1));
        assert_eq!(h.next.object_at(young.location), Some(Occupant::new(1, Species::Prey)));
        assert_eq!(h.report.births, 1);
    }

    #[test]
    fn test_litter_is_limited_by_space() {
        let mut h = Harness::new(1, 2, 1000);
        h.config.prey.breeding_probability = 1.0;
        h.config.prey.max_litter_size = 5;
        let parent = h.spawn(Species::Prey, Location::new(0, 0), 10, 0);
        assert_eq!(h.act(parent), None);
        assert!(h.newborns.len() <= 1);
        assert_eq!(h.next.occupants().count(), 1 + h.newborns.len());
    }

    #[test]
    fn test_newborn_carnivore_is_fed() {
        let config = SpeciesConfig::apex_hunter();
        let young = Agent::newborn(Species::ApexHunter, Location::new(0, 0), &config);
        assert_eq!(young.food_level, config.food_value);
        assert!(young.is_active());
    }

    #[test]
    fn test_random_agent_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let config = SpeciesConfig::predator();
        for _ in 0..100 {
            let agent = Agent::random(Species::Predator, Location::new(0, 0), &config, &mut rng);
            assert!(agent.age < config.max_age);
            assert!((1..=config.food_value).contains(&agent.food_level));
        }
    }
}
