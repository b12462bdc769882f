//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! high-level use case "scaffold a pipeline project".

pub mod orchestrator;
pub mod process;
pub mod progress;
pub mod scaffold;
pub mod template;

pub use orchestrator::{Guard, RunSummary, Step, StepOrchestrator};
pub use process::{ProcessOutput, ProcessRunner};
pub use progress::wrap;
pub use scaffold::{Completion, ScaffoldPipeline, ScaffoldReport, ScaffoldService};
pub use template::{TemplateJob, TemplateRenderer};
