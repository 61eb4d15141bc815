//! Simulation thread that runs independently from the front end.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::observer::{ChannelObserver, ViewEvent};
use crate::simulator::Simulator;

use super::commands::{SimCommand, SimState};

/// Handle for controlling the simulation thread
pub struct SimulationHandle {
    /// Thread handle; yields the simulator back on shutdown
    thread: Option<JoinHandle<Simulator>>,
    /// Channel to send commands to simulation
    command_tx: Sender<SimCommand>,
    /// Channel to receive view updates from simulation
    event_rx: Receiver<ViewEvent>,
    /// Last known state. Commands update it when sent; a `Halted` event
    /// moves it from running to paused once received.
    pub state: SimState,
}

impl SimulationHandle {
    /// Move `simulator` onto its own thread, paused.
    pub fn spawn(mut simulator: Simulator) -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        simulator.set_observer(Box::new(ChannelObserver::new(event_tx.clone())));
        let _ = event_tx.send(ViewEvent::Step {
            step: simulator.step_count(),
            field: simulator.field().snapshot(),
        });

        let thread = thread::spawn(move || run_simulation(simulator, command_rx, event_tx));

        Self {
            thread: Some(thread),
            command_tx,
            event_rx,
            state: SimState::Paused,
        }
    }

    /// Send a command to the simulation
    pub fn send(&mut self, command: SimCommand) {
        self.state = self.state.after(&command);
        let _ = self.command_tx.send(command);
    }

    pub fn start(&mut self) {
        self.send(SimCommand::Start);
    }

    pub fn pause(&mut self) {
        self.send(SimCommand::Pause);
    }

    pub fn step_once(&mut self) {
        self.send(SimCommand::Step);
    }

    pub fn set_speed(&mut self, delay_ms: u64) {
        self.send(SimCommand::SetSpeed(delay_ms));
    }

    pub fn reset(&mut self) {
        self.send(SimCommand::Reset);
    }

    /// Drain every pending event (non-blocking)
    pub fn try_recv_events(&mut self) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => {
                    self.track(&event);
                    events.push(event);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_event_timeout(&mut self, timeout: Duration) -> Option<ViewEvent> {
        let event = self.event_rx.recv_timeout(timeout).ok()?;
        self.track(&event);
        Some(event)
    }

    fn track(&mut self, event: &ViewEvent) {
        if matches!(event, ViewEvent::Halted { .. }) && self.state == SimState::Running {
            self.state = SimState::Paused;
        }
    }

    /// Check if simulation is running
    pub fn is_running(&self) -> bool {
        self.state == SimState::Running
    }

    /// Stop the thread and hand back the simulator.
    pub fn shutdown(&mut self) -> Option<Simulator> {
        self.send(SimCommand::Shutdown);
        self.thread.take().and_then(|thread| thread.join().ok())
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Main simulation loop running in separate thread.
///
/// Blocks on the command channel while paused. While running, a step is
/// taken whenever no command arrives within the configured delay. Pauses
/// itself once the field is no longer viable and reports it as `Halted`.
fn run_simulation(
    mut sim: Simulator,
    command_rx: Receiver<SimCommand>,
    event_tx: Sender<ViewEvent>,
) -> Simulator {
    let mut state = SimState::Paused;

    loop {
        let received = if state == SimState::Running {
            command_rx.recv_timeout(sim.delay())
        } else {
            command_rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };

        match received {
            Ok(command) => {
                log::debug!("Command: {:?}", command);
                state = state.after(&command);
                match command {
                    SimCommand::Start => {
                        log::info!("Simulation started at step {}", sim.step_count());
                    }
                    SimCommand::Pause => {
                        log::info!("Simulation paused at step {}", sim.step_count());
                    }
                    SimCommand::Step => {
                        sim.step();
                    }
                    SimCommand::SetSpeed(delay_ms) => sim.set_speed(delay_ms),
                    SimCommand::Reset => {
                        sim.reset();
                        log::info!("Simulation reset: {}", sim.population_details());
                    }
                    SimCommand::Shutdown => return sim,
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if sim.is_viable() {
                    sim.step();
                } else {
                    log::info!("Nothing left to simulate, pausing");
                    state = SimState::Paused;
                    let _ = event_tx.send(ViewEvent::Halted {
                        step: sim.step_count(),
                    });
                }
            }
            Err(RecvTimeoutError::Disconnected) => return sim,
        }
    }
}
