use derive_more::Display;
use snafu::Snafu;
use tracing::{debug, info, warn};

use crate::filesystem::{FilesystemProvider, ProviderError};
use crate::operations::OperationRecord;
use crate::tree::{NodeKind, OperationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ApplyMode {
    #[display("apply")]
    Apply,
    #[display("dry run")]
    DryRun,
}

/// Runs scheduled records against a provider, one at a time.
pub struct Executor<'a, P> {
    provider: &'a P,
    mode: ApplyMode,
}

impl<'a, P: FilesystemProvider> Executor<'a, P> {
    pub fn new(provider: &'a P, mode: ApplyMode) -> Self {
        Self { provider, mode }
    }

    pub fn mode(&self) -> ApplyMode {
        self.mode
    }

    /// Executes `ordered` in sequence and returns the records that ran.
    ///
    /// Stops at the first failure without undoing anything; the error lists
    /// exactly which records completed. A dry run returns the list untouched.
    pub async fn execute(
        &self,
        ordered: Vec<OperationRecord>,
    ) -> Result<Vec<OperationRecord>, ExecutionError> {
        if self.mode == ApplyMode::DryRun {
            debug!("Dry run: {} operations not executed", ordered.len());
            return Ok(ordered);
        }

        let total = ordered.len();
        let mut completed = Vec::with_capacity(total);
        let mut pending = ordered.into_iter();

        while let Some(record) = pending.next() {
            match self.run_one(&record).await {
                Ok(()) => {
                    info!("Applied: {}", record);
                    completed.push(record);
                }
                Err(source) => {
                    warn!(
                        "Stopped after {} of {} operations: {} failed",
                        completed.len(),
                        total,
                        record
                    );
                    return Err(ExecutionError::PartialApply {
                        completed,
                        failed: record,
                        skipped: pending.collect(),
                        source,
                    });
                }
            }
        }

        info!("Applied {} operations", completed.len());
        Ok(completed)
    }

    async fn run_one(&self, record: &OperationRecord) -> Result<(), ProviderError> {
        match (record.operation, record.node_kind) {
            (OperationKind::Create, NodeKind::Folder) => {
                self.provider.create_folder(&record.path).await
            }
            (OperationKind::Create, NodeKind::File) => self.provider.create_file(&record.path).await,
            (OperationKind::Rename, _) => {
                let Some(new_path) = &record.new_path else {
                    return Err(ProviderError::MissingDestination {
                        path: record.path.clone(),
                    });
                };
                self.provider.rename(&record.path, new_path).await
            }
            (OperationKind::Delete, _) => self.provider.delete_recursive(&record.path).await,
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ExecutionError {
    #[snafu(display(
        "Applied {} operations, then '{}' failed; {} operations were not attempted",
        completed.len(),
        failed,
        skipped.len()
    ))]
    PartialApply {
        completed: Vec<OperationRecord>,
        failed: OperationRecord,
        skipped: Vec<OperationRecord>,
        source: ProviderError,
    },
}
