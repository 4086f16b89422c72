mod ignore;
mod plan_config;

pub use ignore::IgnoreSet;
pub use plan_config::{PlanConfig, PlanConfigError};
