use std::path::PathBuf;

use crate::cli::{Cli, Command};
use crate::ext::absolute_normalized;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command: Command,
    pub root: PathBuf,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            command: cli.command,
            root: absolute_normalized(&cli.root),
        }
    }
}
