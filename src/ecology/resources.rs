//! Shared, named food counters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Food available to every prey in the field.
pub const PREY_FOOD_LEVEL: &str = "PREY_FOOD_LEVEL";

/// Named integer counters shared by the whole world.
///
/// A level may drop below zero after a seasonal depletion. Draws treat any
/// level below the requested amount as insufficient, and [`display_level`]
/// floors at zero for presentation.
///
/// [`display_level`]: SharedResourcePool::display_level
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedResourcePool {
    levels: BTreeMap<String, i64>,
}

impl SharedResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored level, zero for an unknown name
    pub fn level(&self, name: &str) -> i64 {
        self.levels.get(name).copied().unwrap_or(0)
    }

    /// Level clamped to be non-negative
    pub fn display_level(&self, name: &str) -> i64 {
        self.level(name).max(0)
    }

    pub fn set(&mut self, name: &str, value: i64) {
        self.levels.insert(name.to_string(), value);
    }

    /// Add `delta` (which may be negative) without clamping.
    pub fn adjust(&mut self, name: &str, delta: i64) -> i64 {
        let level = self.levels.entry(name.to_string()).or_insert(0);
        *level = level.saturating_add(delta);
        *level
    }

    /// Take `amount` if the stored level covers it. Leaves the level untouched
    /// and returns `false` otherwise.
    pub fn try_draw(&mut self, name: &str, amount: i64) -> bool {
        match self.levels.get_mut(name) {
            Some(level) if *level >= amount => {
                *level -= amount;
                true
            }
            _ => false,
        }
    }
}

/// Shared resource configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Lower bound of the initial prey food level
    pub initial_min: i64,
    /// Upper bound of the initial prey food level
    pub initial_max: i64,
    /// Seasonal adjustments move the pool by `initial_min * adjust_factor`
    pub adjust_factor: i64,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            initial_min: 40_000,
            initial_max: 80_000,
            adjust_factor: 2,
        }
    }
}

impl ResourcesConfig {
    /// Size of one seasonal replenishment or depletion
    pub fn seasonal_adjustment(&self) -> i64 {
        self.initial_min.saturating_mul(self.adjust_factor)
    }
}

/// Prey food draw by age bracket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForagingConfig {
    /// Ages at which a prey moves into the next bracket
    pub age_tiers: [u32; 2],
    /// Food taken from the pool per step in each bracket
    pub draw: [i64; 3],
}

impl Default for ForagingConfig {
    fn default() -> Self {
        Self {
            age_tiers: [10, 30],
            draw: [1, 2, 3],
        }
    }
}

impl ForagingConfig {
    /// Amount a prey of `age` takes from the pool each step
    pub fn draw_for_age(&self, age: u32) -> i64 {
        if age < self.age_tiers[0] {
            self.draw[0]
        } else if age < self.age_tiers[1] {
            self.draw[1]
        } else {
            self.draw[2]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_within_level() {
        let mut pool = SharedResourcePool::new();
        pool.set(PREY_FOOD_LEVEL, 5);
        assert!(pool.try_draw(PREY_FOOD_LEVEL, 3));
        assert_eq!(pool.level(PREY_FOOD_LEVEL), 2);
        assert!(pool.try_draw(PREY_FOOD_LEVEL, 2));
        assert_eq!(pool.level(PREY_FOOD_LEVEL), 0);
    }

    #[test]
    fn test_draw_insufficient_leaves_level() {
        let mut pool = SharedResourcePool::new();
        pool.set(PREY_FOOD_LEVEL, 1);
        assert!(!pool.try_draw(PREY_FOOD_LEVEL, 2));
        assert_eq!(pool.level(PREY_FOOD_LEVEL), 1);
        assert!(!pool.try_draw("UNKNOWN", 1));
    }

    #[test]
    fn test_negative_level_is_insufficient() {
        let mut pool = SharedResourcePool::new();
        pool.set(PREY_FOOD_LEVEL, 10);
        assert_eq!(pool.adjust(PREY_FOOD_LEVEL, -25), -15);
        assert_eq!(pool.level(PREY_FOOD_LEVEL), -15);
        assert_eq!(pool.display_level(PREY_FOOD_LEVEL), 0);
        assert!(!pool.try_draw(PREY_FOOD_LEVEL, 1));
    }

    #[test]
    fn test_draw_grows_with_age() {
        let foraging = ForagingConfig::default();
        assert_eq!(foraging.draw_for_age(0), 1);
        assert_eq!(foraging.draw_for_age(9), 1);
        assert_eq!(foraging.draw_for_age(10), 2);
        assert_eq!(foraging.draw_for_age(29), 2);
        assert_eq!(foraging.draw_for_age(30), 3);
        assert_eq!(foraging.draw_for_age(500), 3);
    }

    #[test]
    fn test_seasonal_adjustment() {
        let config = ResourcesConfig {
            initial_min: 100,
            initial_max: 200,
            adjust_factor: 3,
        };
        assert_eq!(config.seasonal_adjustment(), 300);
    }
}
