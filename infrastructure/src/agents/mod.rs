//! Agent adapters implementing the
//! [`AgentExecutor`](conductor_application::AgentExecutor) port.

mod command;
mod echo;

pub use command::CommandAgent;
pub use echo::EchoAgent;
