//! Client-side orchestration for the transparency dashboard.
//!
//! Each controller owns the state for one user-triggered generation flow and
//! talks to the backend only through a [`RequestGateway`].

pub mod budget;
pub mod copy;
pub mod events;
pub mod gateway;
pub mod insight;
pub mod reports;
pub mod theme;
pub mod workflow;

pub use budget::{BudgetSimulationController, SimulationError, SimulationView};
pub use copy::{ClipboardSink, CopyIndicator};
pub use events::{ClientEvent, StageKind};
pub use gateway::{GatewayError, HttpGateway, RequestGateway};
pub use insight::{DetailView, ExpansionOutcome, InsightExpansionController};
pub use theme::ThemeContext;
pub use workflow::{GenerationWorkflow, OutreachDraft, WorkflowError, WorkflowStage};

#[cfg(test)]
pub(crate) mod test_support;
