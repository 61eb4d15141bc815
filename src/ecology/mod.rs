//! Global ecological state shared by every agent.
//!
//! - Seasonal cycle (breeding and hunger adjustments)
//! - Shared resource pool (prey food)
//! - Predation rules (who eats whom, fights)
//!
//! Season and pool live in one [`WorldState`] that the simulator passes into each tick.
//! Only the simulator advances the season; agents only draw from the pool.

pub mod predation;
pub mod resources;
pub mod seasons;

pub use predation::PredationConfig;
pub use resources::{ForagingConfig, ResourcesConfig, SharedResourcePool, PREY_FOOD_LEVEL};
pub use seasons::{Season, SeasonController, SeasonsConfig};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Result of a season change, for display surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeasonTransition {
    pub season: Season,
    /// Signed change applied to the prey food pool
    pub food_delta: i64,
    /// Prey food level after the change, floored at zero
    pub food_level: i64,
}

/// Season plus shared resources.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldState {
    seasons: SeasonController,
    resources: SharedResourcePool,
    resources_config: ResourcesConfig,
    replenish_period: u64,
}

impl WorldState {
    /// Start in spring with the prey food level drawn uniformly from the
    /// configured bounds.
    pub fn new<R: Rng + ?Sized>(
        seasons: &SeasonsConfig,
        resources: &ResourcesConfig,
        rng: &mut R,
    ) -> Self {
        let mut state = Self {
            seasons: SeasonController::new(seasons),
            resources: SharedResourcePool::new(),
            resources_config: resources.clone(),
            replenish_period: seasons.replenish_period,
        };
        state.seed_resources(rng);
        state
    }

    fn seed_resources<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let min = self.resources_config.initial_min;
        let max = self.resources_config.initial_max.max(min);
        self.resources.set(PREY_FOOD_LEVEL, rng.gen_range(min..=max));
    }

    /// Back to spring with a freshly drawn pool.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.seasons.reset();
        self.seed_resources(rng);
    }

    #[inline]
    pub fn season(&self) -> Season {
        self.seasons.current()
    }

    #[inline]
    pub fn resources(&self) -> &SharedResourcePool {
        &self.resources
    }

    #[inline]
    pub fn resources_mut(&mut self) -> &mut SharedResourcePool {
        &mut self.resources
    }

    /// Prey food level as shown to users (never negative)
    pub fn food_level(&self) -> i64 {
        self.resources.display_level(PREY_FOOD_LEVEL)
    }

    /// Apply the season for `elapsed` completed steps.
    ///
    /// On a change, the prey pool is replenished when `elapsed` is a multiple
    /// of the replenish period and depleted otherwise, by the same amount.
    pub fn advance_season(&mut self, elapsed: u64) -> Option<SeasonTransition> {
        let season = self.seasons.advance(elapsed)?;
        let amount = self.resources_config.seasonal_adjustment();
        let food_delta = if self.replenish_period > 0 && elapsed % self.replenish_period == 0 {
            amount
        } else {
            -amount
        };
        self.resources.adjust(PREY_FOOD_LEVEL, food_delta);
        Some(SeasonTransition {
            season,
            food_delta,
            food_level: self.food_level(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state() -> WorldState {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let resources = ResourcesConfig {
            initial_min: 100,
            initial_max: 100,
            adjust_factor: 2,
        };
        WorldState::new(&SeasonsConfig::default(), &resources, &mut rng)
    }

    #[test]
    fn test_initial_level_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let resources = ResourcesConfig::default();
        for _ in 0..20 {
            let state = WorldState::new(&SeasonsConfig::default(), &resources, &mut rng);
            let level = state.resources().level(PREY_FOOD_LEVEL);
            assert!(level >= resources.initial_min && level <= resources.initial_max);
        }
    }

    #[test]
    fn test_pool_oscillates_across_transitions() {
        let mut state = state();
        assert_eq!(state.season(), Season::Spring);

        let summer = state.advance_season(200).unwrap();
        assert_eq!(summer.season, Season::Summer);
        assert_eq!(summer.food_delta, -200);
        assert_eq!(state.resources().level(PREY_FOOD_LEVEL), -100);
        assert_eq!(summer.food_level, 0);

        let autumn = state.advance_season(400).unwrap();
        assert_eq!(autumn.season, Season::Autumn);
        assert_eq!(autumn.food_delta, 200);
        assert_eq!(state.food_level(), 100);
    }

    #[test]
    fn test_no_adjustment_without_transition() {
        let mut state = state();
        for elapsed in 0..200 {
            assert!(state.advance_season(elapsed).is_none());
        }
        assert_eq!(state.resources().level(PREY_FOOD_LEVEL), 100);
    }
}
