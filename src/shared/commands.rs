//! Commands for controlling the simulation from a front end.

use serde::{Deserialize, Serialize};

/// Commands sent from a front end to the simulation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimCommand {
    /// Run continuously until paused or no longer viable
    Start,
    /// Pause the simulation
    Pause,
    /// Execute a single step
    Step,
    /// Delay between steps while running, in milliseconds
    SetSpeed(u64),
    /// Start over with a fresh population
    Reset,
    /// Shutdown the simulation thread
    Shutdown,
}

/// Current simulation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimState {
    /// Simulation is running
    Running,
    /// Simulation is paused
    #[default]
    Paused,
    /// Simulation thread has stopped
    Stopped,
}

impl SimState {
    /// State after `command` was accepted
    pub fn after(self, command: &SimCommand) -> SimState {
        match command {
            SimCommand::Start => SimState::Running,
            SimCommand::Pause | SimCommand::Reset => SimState::Paused,
            SimCommand::Shutdown => SimState::Stopped,
            SimCommand::Step | SimCommand::SetSpeed(_) => self,
        }
    }
}
