//! Outbound notifications for rendering surfaces.

use crate::field::{Field, FieldSnapshot};
use std::sync::mpsc::Sender;

/// Receives display updates from the simulator.
///
/// All methods default to no-ops so a surface only implements what it shows.
pub trait SimulationObserver: Send {
    /// Called once per step after the buffers were swapped.
    fn on_step(&mut self, _step: u64, _field: &Field) {}

    fn on_season_changed(&mut self, _season: &str) {}

    /// `level` is already floored at zero.
    fn on_food_level_changed(&mut self, _level: i64) {}

    /// Fewer than two species remain.
    fn on_halted(&mut self, _step: u64) {}
}

/// Ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SimulationObserver for NullObserver {}

/// Forwards season and food updates to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SimulationObserver for LogObserver {
    fn on_season_changed(&mut self, season: &str) {
        log::info!("Season: {}", season);
    }

    fn on_food_level_changed(&mut self, level: i64) {
        log::info!("Prey food level: {}", level);
    }

    fn on_halted(&mut self, step: u64) {
        log::info!("Simulation halted at step {}", step);
    }
}

/// Events sent to a view running on another thread
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Step { step: u64, field: FieldSnapshot },
    SeasonChanged(String),
    FoodLevelChanged(i64),
    Halted { step: u64 },
}

/// Turns callbacks into [`ViewEvent`]s. A disconnected receiver is ignored.
pub struct ChannelObserver {
    tx: Sender<ViewEvent>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<ViewEvent>) -> Self {
        Self { tx }
    }
}

impl SimulationObserver for ChannelObserver {
    fn on_step(&mut self, step: u64, field: &Field) {
        let _ = self.tx.send(ViewEvent::Step {
            step,
            field: field.snapshot(),
        });
    }

    fn on_season_changed(&mut self, season: &str) {
        let _ = self.tx.send(ViewEvent::SeasonChanged(season.to_string()));
    }

    fn on_food_level_changed(&mut self, level: i64) {
        let _ = self.tx.send(ViewEvent::FoodLevelChanged(level));
    }

    fn on_halted(&mut self, step: u64) {
        let _ = self.tx.send(ViewEvent::Halted { step });
    }
}
