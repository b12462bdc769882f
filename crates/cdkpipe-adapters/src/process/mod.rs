//! Process host adapters.

mod scripted;
mod system;

pub use scripted::ScriptedProcessHost;
pub use system::SystemProcessHost;
