//! Seasonal cycle.

use serde::{Deserialize, Serialize};

/// The four seasons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Added to 1 and multiplied into a carnivore's litter bound
    pub fn breeding_adjust(&self) -> u32 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Autumn => 1,
            Season::Winter => 2,
        }
    }

    /// Extra food a carnivore burns per step
    pub fn hunger_adjust(&self) -> i32 {
        match self {
            Season::Spring => 0,
            Season::Summer => 0,
            Season::Autumn => 1,
            Season::Winter => 1,
        }
    }

    /// Season in effect after `time` completed steps.
    ///
    /// Each season spans `season_length` steps; the cycle repeats every four.
    pub fn from_time(time: u64, season_length: u64) -> Season {
        if season_length == 0 {
            return Season::Spring;
        }
        Season::ALL[((time / season_length) % 4) as usize]
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks the current season. Replaced wholesale on each transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeasonController {
    current: Season,
    season_length: u64,
}

impl SeasonController {
    pub fn new(config: &SeasonsConfig) -> Self {
        Self {
            current: Season::Spring,
            season_length: config.season_length,
        }
    }

    #[inline]
    pub fn current(&self) -> Season {
        self.current
    }

    /// Move to the season for `time` completed steps.
    ///
    /// Returns the new season when it differs from the current one.
    pub fn advance(&mut self, time: u64) -> Option<Season> {
        let season = Season::from_time(time, self.season_length);
        if season == self.current {
            return None;
        }
        self.current = season;
        Some(season)
    }

    pub fn reset(&mut self) {
        self.current = Season::Spring;
    }
}

/// Seasons configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonsConfig {
    /// Steps per season
    pub season_length: u64,
    /// A transition starting on a multiple of this many elapsed steps
    /// replenishes the prey food pool; any other transition depletes it.
    pub replenish_period: u64,
}

impl Default for SeasonsConfig {
    fn default() -> Self {
        Self {
            season_length: 200,
            replenish_period: 400,
        }
    }
}
