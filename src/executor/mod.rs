mod executor_impl;
mod schedule;

pub use executor_impl::{ApplyMode, ExecutionError, Executor};
pub use schedule::schedule;
