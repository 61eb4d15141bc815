//! Predation rules - who can eat whom and how fights end.

use crate::agent::Species;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Outcome of a carnivore confronting a live neighbour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encounter {
    /// Target is not food for this hunter
    Ignore,
    /// Target is eaten
    Eat,
    /// Target fought back and the hunter died
    HunterKilled,
}

/// Predation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredationConfig {
    /// Chance an apex hunter dies when it confronts a predator
    pub fight_death_probability: f64,
}

impl Default for PredationConfig {
    fn default() -> Self {
        Self {
            fight_death_probability: 0.10,
        }
    }
}

/// Whether `hunter` feeds on `target`
pub fn is_food_for(hunter: Species, target: Species) -> bool {
    matches!(
        (hunter, target),
        (Species::Predator, Species::Prey)
            | (Species::ApexHunter, Species::Prey)
            | (Species::ApexHunter, Species::Predator)
    )
}

/// Whether `target` can kill `hunter` when confronted
pub fn fights_back(hunter: Species, target: Species) -> bool {
    matches!((hunter, target), (Species::ApexHunter, Species::Predator))
}

/// Resolve one confrontation between `hunter` and a live `target`.
pub fn resolve_encounter<R: Rng + ?Sized>(
    hunter: Species,
    target: Species,
    config: &PredationConfig,
    rng: &mut R,
) -> Encounter {
    if !is_food_for(hunter, target) {
        return Encounter::Ignore;
    }
    if fights_back(hunter, target) && rng.gen::<f64>() < config.fight_death_probability {
        return Encounter::HunterKilled;
    }
    Encounter::Eat
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_food_chain() {
        assert!(is_food_for(Species::Predator, Species::Prey));
        assert!(!is_food_for(Species::Predator, Species::Predator));
        assert!(!is_food_for(Species::Predator, Species::ApexHunter));
        assert!(is_food_for(Species::ApexHunter, Species::Prey));
        assert!(is_food_for(Species::ApexHunter, Species::Predator));
        assert!(!is_food_for(Species::ApexHunter, Species::ApexHunter));
        assert!(!is_food_for(Species::Prey, Species::Prey));
    }

    #[test]
    fn test_prey_never_fights_back() {
        let config = PredationConfig {
            fight_death_probability: 1.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(
                resolve_encounter(Species::ApexHunter, Species::Prey, &config, &mut rng),
                Encounter::Eat
            );
        }
    }

    #[test]
    fn test_certain_fight_death() {
        let config = PredationConfig {
            fight_death_probability: 1.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(
            resolve_encounter(Species::ApexHunter, Species::Predator, &config, &mut rng),
            Encounter::HunterKilled
        );
    }

    #[test]
    fn test_fight_death_rate() {
        let config = PredationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let deaths = (0..10_000)
            .filter(|_| {
                resolve_encounter(Species::ApexHunter, Species::Predator, &config, &mut rng)
                    == Encounter::HunterKilled
            })
            .count();
        assert!((800..1200).contains(&deaths), "deaths = {}", deaths);
    }
}
