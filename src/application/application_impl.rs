use std::path::Path;

use colored::{ColoredString, Colorize};
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::{ApplyOutcome, Pipeline, PipelineError, RuntimeConfig};
use crate::cli::Command;
use crate::config::{PlanConfig, PlanConfigError};
use crate::executor::{ApplyMode, ExecutionError};
use crate::ext::BestEffortPathExt;
use crate::filesystem::LocalFilesystem;
use crate::operations::OperationRecord;
use crate::tree::{OperationKind, Tree, render};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        setup_colors();

        let config = PlanConfig::read(&app_config.root)
            .await
            .context(PlanConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let provider = LocalFilesystem::new(&app_config.root);
        let pipeline = Pipeline::new(&provider, &config, &app_config.root);

        match &app_config.command {
            Command::Scan { output } => {
                let session = pipeline.refresh().await.context(PipelineSnafu)?;
                if session.baseline().is_some_and(Tree::is_empty) {
                    info!("{} is empty", app_config.root.best_effort_path_display());
                }
                let layout = session
                    .baseline()
                    .map(|tree| layout_text(tree, &app_config.root, config.indent_width()))
                    .unwrap_or_default();
                match output {
                    Some(path) => write_layout(path, layout).await?,
                    None => print!("{layout}"),
                }
            }
            Command::Preview { layout } => {
                let text = read_layout(layout).await?;
                let session = pipeline.refresh().await.context(PipelineSnafu)?;
                let outcome = pipeline
                    .run(&session, &text, ApplyMode::DryRun)
                    .await
                    .context(PipelineSnafu)?;
                print_outcome(&outcome);
            }
            Command::Apply { layout, write_back } => {
                let text = read_layout(layout).await?;
                let session = pipeline.refresh().await.context(PipelineSnafu)?;
                let result = pipeline.run(&session, &text, ApplyMode::Apply).await;

                if let Err(PipelineError::ExecutionError {
                    source: ExecutionError::PartialApply { completed, .. },
                }) = &result
                {
                    println!("Completed before the failure:");
                    print_records(completed);
                }
                let outcome = result.context(PipelineSnafu)?;
                print_outcome(&outcome);

                if *write_back {
                    if let Some(tree) = outcome.session.baseline() {
                        let refreshed = layout_text(tree, &app_config.root, config.indent_width());
                        write_layout(layout, refreshed).await?;
                        info!("Rewrote {}", layout.best_effort_path_display());
                    }
                }
            }
        }

        Ok(())
    }
}

fn setup_colors() {
    if supports_color::on(supports_color::Stream::Stdout).is_none() {
        colored::control::set_override(false);
    }
}

fn layout_text(tree: &Tree, root: &Path, indent_width: usize) -> String {
    format!(
        "# Layout of {}\n\
         # Mark entries with [+] to create, [-] to delete or [~ new-name] to rename.\n\
         # Quote names that contain spaces. Folders end with /.\n\
         {}",
        root.best_effort_path_display(),
        render(tree, indent_width)
    )
}

fn label(record: &OperationRecord) -> ColoredString {
    let text = record.to_string();
    match record.operation {
        OperationKind::Create => text.green(),
        OperationKind::Rename => text.yellow(),
        OperationKind::Delete => text.red(),
    }
}

fn print_records(records: &[OperationRecord]) {
    for (index, record) in records.iter().enumerate() {
        println!("{:>4}. {}", index + 1, label(record));
    }
}

fn print_outcome(outcome: &ApplyOutcome) {
    if outcome.records.is_empty() {
        println!("{}", "Nothing to do".bold());
        return;
    }
    let heading = match outcome.mode {
        ApplyMode::DryRun => "Planned operations (dry run):",
        ApplyMode::Apply => "Applied operations:",
    };
    println!("{}", heading.bold());
    print_records(&outcome.records);
}

async fn read_layout(path: &Path) -> Result<String, ApplicationError> {
    debug!("Reading layout file: {}", path.best_effort_path_display());
    let bytes = compio::fs::read(path).await.context(LayoutReadSnafu {
        file_path: path.best_effort_path_display(),
    })?;
    String::from_utf8(bytes).context(LayoutEncodingSnafu {
        file_path: path.best_effort_path_display(),
    })
}

async fn write_layout(path: &Path, layout: String) -> Result<(), ApplicationError> {
    debug!("Writing layout file: {}", path.best_effort_path_display());
    compio::fs::write(path, layout.into_bytes())
        .await
        .0
        .context(LayoutWriteSnafu {
            file_path: path.best_effort_path_display(),
        })
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    PlanConfigError { source: PlanConfigError },
    #[snafu(display("Failed to read the layout file: {}", file_path))]
    LayoutReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The layout file {} is not valid UTF-8", file_path))]
    LayoutEncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to write the layout file: {}", file_path))]
    LayoutWriteError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Critical failure encountered during application execution"))]
    PipelineError { source: PipelineError },
}
