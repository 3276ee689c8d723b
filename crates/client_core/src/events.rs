use shared::domain::{DocumentSlot, InsightId};
use tokio::sync::broadcast;

pub(crate) const EVENT_CAPACITY: usize = 64;

/// Workflow stage without its payload, for event consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    SelectingAction,
    Generating,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    WorkflowStageChanged(StageKind),
    GenerationFailed(String),
    DocumentCopied(DocumentSlot),
    InsightDetailLoading(InsightId),
    InsightDetailReady(InsightId),
    InsightDetailFailed { insight_id: InsightId, message: String },
    BudgetSimulationStarted,
    BudgetAllocationReady { items: usize },
    BudgetSimulationFailed(String),
}

pub(crate) fn event_channel() -> broadcast::Sender<ClientEvent> {
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    events
}

/// Sending only fails when nobody is subscribed, which is fine.
pub(crate) fn emit(events: &broadcast::Sender<ClientEvent>, event: ClientEvent) {
    let _ = events.send(event);
}
