use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Plan and apply directory layouts written as marked-up trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// The directory the layout describes
    #[clap(long, short, default_value = ".", global = true)]
    pub root: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the current structure as an editable layout
    Scan {
        /// Write the layout to this file instead of stdout
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
    /// Show the operations a layout would perform, without running them
    Preview {
        /// Layout file with [+], [-] and [~ name] markers
        layout: PathBuf,
    },
    /// Run the operations of a layout
    Apply {
        /// Layout file with [+], [-] and [~ name] markers
        layout: PathBuf,

        /// Rewrite the layout file with the resulting structure
        #[clap(long)]
        write_back: bool,
    },
}
