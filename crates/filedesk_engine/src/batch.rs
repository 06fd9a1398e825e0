use filedesk_core::{ConvertedArtifact, FileId, PendingFile};
use filedesk_logging::{desk_info, desk_warn};
use futures_util::future::join_all;

use crate::workflow::{JobWorkflow, SubmitRequest};
use crate::WorkflowError;

/// Per-file outcomes of one concurrent batch, in submit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<(FileId, Result<ConvertedArtifact, WorkflowError>)>,
}

impl BatchReport {
    pub fn first_error(&self) -> Option<&WorkflowError> {
        self.outcomes.iter().find_map(|(_, outcome)| outcome.as_ref().err())
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &ConvertedArtifact> {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| outcome.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = FileId> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_err())
            .map(|(id, _)| *id)
    }
}

/// Submit every file at once and wait for all of them.
///
/// One failing file never cancels the others.
pub async fn convert_batch(workflow: &dyn JobWorkflow, files: Vec<PendingFile>) -> BatchReport {
    desk_info!("Converting batch of {} file(s)", files.len());
    let submits = files.into_iter().map(|file| async move {
        let id = file.id;
        let name = file.name.clone();
        let outcome = workflow
            .submit(SubmitRequest::convert_word(file))
            .await
            .and_then(|submitted| {
                submitted.artifact().ok_or_else(|| {
                    WorkflowError::Upload(format!("no converted file returned for {name}"))
                })
            });
        if let Err(err) = &outcome {
            desk_warn!("Conversion of {} failed: {}", name, err);
        }
        (id, outcome)
    });
    BatchReport {
        outcomes: join_all(submits).await,
    }
}
