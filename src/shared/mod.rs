//! Control surface for driving a simulation from another thread.
//!
//! A front end sends [`SimCommand`]s and reads back
//! [`ViewEvent`](crate::observer::ViewEvent)s; it never touches the field.

pub mod commands;
pub mod sim_thread;

pub use commands::{SimCommand, SimState};
pub use sim_thread::SimulationHandle;
