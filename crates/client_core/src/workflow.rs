//! Action Hub workflow for constituencies whose report is Outdated or Missing.
//!
//! ```text
//! SelectingAction --generate--> Generating --ok--> Completed(bundle)
//!        ^                          |
//!        +---------- error ---------+
//! ```
//!
//! Direct outreach is synchronous and never leaves `SelectingAction`.

use std::sync::Arc;

use shared::{
    domain::{DocumentSlot, GeneratedDocumentBundle, TransparencyStatus},
    protocol::{Endpoint, LegalDocsRequest, LegalDocsResponse},
    routing::ActionRoute,
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{
    copy::{ClipboardSink, CopyIndicator},
    events::{emit, event_channel, ClientEvent, StageKind},
    gateway::{call, GatewayError, RequestGateway},
};

const UNKNOWN_DATE: &str = "unknown date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowStage {
    SelectingAction,
    Generating,
    Completed(GeneratedDocumentBundle),
}

impl WorkflowStage {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::SelectingAction => StageKind::SelectingAction,
            Self::Generating => StageKind::Generating,
            Self::Completed(_) => StageKind::Completed,
        }
    }

    pub fn bundle(&self) -> Option<&GeneratedDocumentBundle> {
        match self {
            Self::Completed(bundle) => Some(bundle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("document generation is already in progress")]
    InFlight,
    #[error("documents have already been generated for this session")]
    AlreadyCompleted,
    #[error("{}", .0.user_message())]
    Generation(#[from] GatewayError),
    #[error("the {0} document is not available until generation completes")]
    NotGenerated(DocumentSlot),
    #[error("failed to copy document: {0}")]
    Clipboard(String),
}

/// Pre-filled message to the MP; built locally without any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachDraft {
    pub recipient: Option<String>,
    pub subject: String,
    pub body: String,
}

impl OutreachDraft {
    pub fn mailto_link(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.recipient.as_deref().unwrap_or_default(),
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body),
        )
    }
}

fn status_phrase(status: TransparencyStatus, last_date: Option<&str>, date_label: &str) -> String {
    let status_text = status.as_str().to_lowercase();
    if status == TransparencyStatus::Outdated {
        format!(
            "{status_text} ({date_label}: {})",
            last_date.unwrap_or(UNKNOWN_DATE)
        )
    } else {
        status_text
    }
}

/// Sentence sent to the generator describing the report's state.
pub fn finding_sentence(status: TransparencyStatus, last_date: Option<&str>) -> String {
    format!(
        "The official transparency report is {}.",
        status_phrase(status, last_date, "last seen")
    )
}

pub fn outreach_draft(route: &ActionRoute) -> OutreachDraft {
    let constituency = &route.constituency_name;
    let subject = format!("Request for MPLADS Transparency - {constituency}");
    let status = status_phrase(route.status, route.last_date.as_deref(), "last updated");
    let body = format!(
        "Subject: {subject}\n\
         \n\
         Dear {mp},\n\
         \n\
         I am writing as a concerned constituent of {constituency} to request transparency regarding the MPLADS expenditure report for our constituency.\n\
         \n\
         Currently, the MPLADS report appears to be {status}. Access to timely and transparent information about the utilization of public funds is essential for democratic accountability.\n\
         \n\
         I respectfully request that you take the necessary steps to publish the latest, complete MPLADS report for our constituency at your earliest convenience.\n\
         \n\
         Thank you for your attention to this important matter.\n\
         \n\
         Sincerely,\n\
         A Concerned Citizen of {constituency}",
        mp = route.mp_name,
    );
    OutreachDraft {
        recipient: route.mp_email.clone(),
        subject,
        body,
    }
}

struct WorkflowState {
    stage: WorkflowStage,
    notice: Option<String>,
}

pub struct GenerationWorkflow {
    gateway: Arc<dyn RequestGateway>,
    target: ActionRoute,
    inner: Mutex<WorkflowState>,
    copy: CopyIndicator,
    events: broadcast::Sender<ClientEvent>,
}

impl GenerationWorkflow {
    pub fn new(
        gateway: Arc<dyn RequestGateway>,
        target: ActionRoute,
        clipboard: Arc<dyn ClipboardSink>,
    ) -> Self {
        Self::with_copy_indicator(gateway, target, CopyIndicator::new(clipboard))
    }

    pub fn with_copy_indicator(
        gateway: Arc<dyn RequestGateway>,
        target: ActionRoute,
        copy: CopyIndicator,
    ) -> Self {
        Self {
            gateway,
            target,
            inner: Mutex::new(WorkflowState {
                stage: WorkflowStage::SelectingAction,
                notice: None,
            }),
            copy,
            events: event_channel(),
        }
    }

    pub fn target(&self) -> &ActionRoute {
        &self.target
    }

    pub fn finding(&self) -> String {
        finding_sentence(self.target.status, self.target.last_date.as_deref())
    }

    pub fn outreach(&self) -> OutreachDraft {
        outreach_draft(&self.target)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn stage(&self) -> WorkflowStage {
        self.inner.lock().await.stage.clone()
    }

    /// Error notice from the last failed generation, cleared on the next attempt.
    pub async fn notice(&self) -> Option<String> {
        self.inner.lock().await.notice.clone()
    }

    /// Action triggers are only live while selecting an action.
    pub async fn actions_enabled(&self) -> bool {
        matches!(self.inner.lock().await.stage, WorkflowStage::SelectingAction)
    }

    /// Issues the single generation request. On failure the workflow returns
    /// to `SelectingAction` with a notice and can be retried.
    pub async fn generate_documents(&self) -> Result<GeneratedDocumentBundle, WorkflowError> {
        {
            let mut guard = self.inner.lock().await;
            match guard.stage {
                WorkflowStage::Generating => return Err(WorkflowError::InFlight),
                WorkflowStage::Completed(_) => return Err(WorkflowError::AlreadyCompleted),
                WorkflowStage::SelectingAction => {}
            }
            guard.stage = WorkflowStage::Generating;
            guard.notice = None;
        }
        emit(
            &self.events,
            ClientEvent::WorkflowStageChanged(StageKind::Generating),
        );
        info!(
            constituency = %self.target.constituency_name,
            status = %self.target.status,
            "workflow: generating legal documents"
        );

        let endpoint = Endpoint::GenerateLegalDocs;
        let request = LegalDocsRequest {
            constituency_name: self.target.constituency_name.clone(),
            mp_name: self.target.mp_name.clone(),
            finding: self.finding(),
        };
        let result = call::<_, LegalDocsResponse>(self.gateway.as_ref(), &endpoint, &request)
            .await
            .and_then(|response| {
                GeneratedDocumentBundle::try_from(response)
                    .map_err(|violation| GatewayError::contract_violation(&endpoint, violation))
            });

        let mut guard = self.inner.lock().await;
        match result {
            Ok(bundle) => {
                guard.stage = WorkflowStage::Completed(bundle.clone());
                drop(guard);
                info!(
                    constituency = %self.target.constituency_name,
                    "workflow: legal documents ready"
                );
                emit(
                    &self.events,
                    ClientEvent::WorkflowStageChanged(StageKind::Completed),
                );
                Ok(bundle)
            }
            Err(err) => {
                let message = err.user_message();
                guard.stage = WorkflowStage::SelectingAction;
                guard.notice = Some(format!("An error occurred: {message}"));
                drop(guard);
                warn!(
                    constituency = %self.target.constituency_name,
                    error = %err,
                    "workflow: document generation failed"
                );
                emit(&self.events, ClientEvent::GenerationFailed(message));
                emit(
                    &self.events,
                    ClientEvent::WorkflowStageChanged(StageKind::SelectingAction),
                );
                Err(WorkflowError::Generation(err))
            }
        }
    }

    pub async fn copy_document(&self, slot: DocumentSlot) -> Result<(), WorkflowError> {
        let text = {
            let guard = self.inner.lock().await;
            guard
                .stage
                .bundle()
                .map(|bundle| bundle.document(slot).to_string())
                .ok_or(WorkflowError::NotGenerated(slot))?
        };
        self.copy.copy(slot, &text).await.map_err(|err| {
            warn!(document = %slot, error = %err, "workflow: clipboard write failed");
            WorkflowError::Clipboard(err.to_string())
        })?;
        emit(&self.events, ClientEvent::DocumentCopied(slot));
        Ok(())
    }

    /// Document currently showing the "copied" marker.
    pub async fn copied_document(&self) -> Option<DocumentSlot> {
        self.copy.current().await
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
