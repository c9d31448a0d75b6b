//! Planner adapters implementing the
//! [`PlannerGateway`](conductor_application::PlannerGateway) port.

mod command;
mod playback;

pub use command::CommandPlanner;
pub use playback::{PLAYBACK_SEPARATOR, PlaybackPlanner};
