use std::path::Path;

use snafu::prelude::*;
use tracing::{debug, info};

use crate::config::PlanConfig;
use crate::executor::{ApplyMode, ExecutionError, Executor, schedule};
use crate::filesystem::{FilesystemProvider, ProviderError, scan};
use crate::operations::{OperationRecord, extract};
use crate::parser::{ParseErrors, TreeParser};
use crate::safety::PathSafetyError;
use crate::tree::{Tree, TreePath};
use crate::validation::{StructureCheck, ValidationError, validate};

/// The structure last known to exist on disk. Owned by the caller and
/// replaced, never edited, after every successful scan or apply.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    baseline: Option<Tree>,
}

impl SessionState {
    pub fn new(baseline: Tree) -> Self {
        Self {
            baseline: Some(baseline),
        }
    }

    pub fn baseline(&self) -> Option<&Tree> {
        self.baseline.as_ref()
    }
}

/// Result of running a layout through the pipeline.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub mode: ApplyMode,
    /// Records in execution order: planned for a dry run, completed otherwise.
    pub records: Vec<OperationRecord>,
    pub session: SessionState,
}

/// Parse, validate, extract, schedule and execute, against one provider.
pub struct Pipeline<'a, P> {
    provider: &'a P,
    config: &'a PlanConfig,
    root: &'a Path,
}

impl<'a, P: FilesystemProvider> Pipeline<'a, P> {
    pub fn new(provider: &'a P, config: &'a PlanConfig, root: &'a Path) -> Self {
        Self {
            provider,
            config,
            root,
        }
    }

    pub fn parser(&self) -> TreeParser {
        TreeParser::new(self.config.indent_width())
    }

    /// Scans the live filesystem and makes it the new baseline.
    pub async fn refresh(&self) -> Result<SessionState, PipelineError> {
        let tree = scan(self.provider, self.config.ignore())
            .await
            .context(ScanSnafu)?;
        info!("Baseline refreshed with {} entries", tree.len());
        Ok(SessionState::new(tree))
    }

    /// Turns layout text into an ordered list of records, checking it against
    /// the live filesystem first. Nothing is mutated.
    pub async fn plan(
        &self,
        session: &SessionState,
        text: &str,
    ) -> Result<Vec<OperationRecord>, PipelineError> {
        let tree = self
            .parser()
            .parse(text)
            .inspect_err(|errors| debug!("Layout rejected with {} errors", errors.errors().len()))
            .context(ParseSnafu)?;

        let live = scan(self.provider, self.config.ignore())
            .await
            .context(ScanSnafu)?;
        let actual_paths = live.paths();
        if let Some(baseline) = session.baseline() {
            if !same_paths(baseline, &actual_paths) {
                info!("The filesystem changed since the last scan; validating against live state");
            }
        }

        if let StructureCheck::Mismatch(mismatch) = validate(&tree, &actual_paths) {
            return Err(PipelineError::ValidationError {
                source: ValidationError::StructureMismatch { mismatch },
            });
        }

        let records = extract(&tree).context(ValidationSnafu)?;
        let ordered = schedule(records, self.root).context(PathSafetySnafu)?;
        debug!("Planned {} operations", ordered.len());
        Ok(ordered)
    }

    /// Plans `text` and executes it in `mode`. After a real apply the
    /// filesystem is rescanned and returned as the new session.
    pub async fn run(
        &self,
        session: &SessionState,
        text: &str,
        mode: ApplyMode,
    ) -> Result<ApplyOutcome, PipelineError> {
        let ordered = self.plan(session, text).await?;
        let executor = Executor::new(self.provider, mode);
        let records = executor.execute(ordered).await.context(ExecutionSnafu)?;

        let session = match executor.mode() {
            ApplyMode::DryRun => session.clone(),
            ApplyMode::Apply => self.refresh().await?,
        };

        Ok(ApplyOutcome {
            mode,
            records,
            session,
        })
    }
}

fn same_paths(baseline: &Tree, actual_paths: &[TreePath]) -> bool {
    let mut expected = baseline.paths();
    let mut actual = actual_paths.to_vec();
    expected.sort();
    actual.sort();
    expected == actual
}

#[derive(Debug, Snafu)]
pub enum PipelineError {
    #[snafu(display("The layout has errors"))]
    ParseError { source: ParseErrors },
    #[snafu(display("The layout was rejected"))]
    ValidationError { source: ValidationError },
    #[snafu(display("The layout names an unsafe path"))]
    PathSafetyError { source: PathSafetyError },
    #[snafu(display("Failed to scan the filesystem"))]
    ScanError { source: ProviderError },
    #[snafu(display("Applying the layout stopped part way"))]
    ExecutionError { source: ExecutionError },
}
