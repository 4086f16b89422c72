mod application_impl;
pub mod data;
mod runtime_config;
mod session;

pub use application_impl::{Application, ApplicationError};
pub use runtime_config::RuntimeConfig;
pub use session::{ApplyOutcome, Pipeline, PipelineError};
