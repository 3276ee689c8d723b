//! Counterfactual "optimal" allocation for the displayed constituency.

use std::sync::Arc;

use shared::{
    domain::{BudgetAllocation, SpendingCategory},
    protocol::{Endpoint, OptimalBudgetRequest, OptimalBudgetResponse},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    events::{emit, event_channel, ClientEvent},
    gateway::{call, GatewayError, RequestGateway},
};

/// Representative total budget used to normalize chart percentages.
pub const BUDGET_CEILING: f64 = 50_000_000.0;

pub const DEFAULT_CONSTITUENCY_PROFILE: &str = "A largely rural constituency in Karnataka with a significant farming population and below-average literacy rates. Key needs are likely to be in primary education and basic amenities like clean water.";

pub const BUDGET_FAILURE_MESSAGE: &str = "Failed to generate optimal budget. Please try again.";

/// Chart-ready series. Percentages are relative to [`BUDGET_CEILING`] and are
/// never sent back to the backend.
pub fn chart_series(allocation: &BudgetAllocation) -> Vec<SpendingCategory> {
    allocation
        .items()
        .iter()
        .map(|item| SpendingCategory {
            category: item.category.clone(),
            amount: item.amount,
            percentage: item.amount / BUDGET_CEILING * 100.0,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationView {
    Idle,
    Loading,
    Ready(BudgetAllocation),
    Failed(String),
}

impl SimulationView {
    pub fn allocation(&self) -> Option<&BudgetAllocation> {
        match self {
            Self::Ready(allocation) => Some(allocation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("an optimal budget is already being generated")]
    InFlight,
    #[error("a newer budget request replaced this one")]
    Superseded,
    #[error("{}", .0.user_message())]
    Generation(#[from] GatewayError),
}

struct SimulationState {
    view: SimulationView,
    latest_seq: u64,
}

pub struct BudgetSimulationController {
    gateway: Arc<dyn RequestGateway>,
    constituency_name: String,
    profile: String,
    inner: Mutex<SimulationState>,
    events: broadcast::Sender<ClientEvent>,
}

impl BudgetSimulationController {
    pub fn new(
        gateway: Arc<dyn RequestGateway>,
        constituency_name: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            constituency_name: constituency_name.into(),
            profile: profile.into(),
            inner: Mutex::new(SimulationState {
                view: SimulationView::Idle,
                latest_seq: 0,
            }),
            events: event_channel(),
        }
    }

    pub fn constituency_name(&self) -> &str {
        &self.constituency_name
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> SimulationView {
        self.inner.lock().await.view.clone()
    }

    pub async fn chart(&self) -> Vec<SpendingCategory> {
        self.inner
            .lock()
            .await
            .view
            .allocation()
            .map(chart_series)
            .unwrap_or_default()
    }

    /// Requests a new allocation. Any previous allocation is cleared up front;
    /// a second trigger while one is loading is rejected.
    pub async fn generate(&self) -> Result<BudgetAllocation, SimulationError> {
        let seq = {
            let mut guard = self.inner.lock().await;
            if matches!(guard.view, SimulationView::Loading) {
                return Err(SimulationError::InFlight);
            }
            guard.latest_seq += 1;
            guard.view = SimulationView::Loading;
            guard.latest_seq
        };
        emit(&self.events, ClientEvent::BudgetSimulationStarted);
        info!(
            constituency = %self.constituency_name,
            request_seq = seq,
            "budget: generating optimal allocation"
        );

        let endpoint = Endpoint::GenerateOptimalBudget;
        let request = OptimalBudgetRequest {
            constituency_name: self.constituency_name.clone(),
            constituency_profile: self.profile.clone(),
        };
        let result = call::<_, OptimalBudgetResponse>(self.gateway.as_ref(), &endpoint, &request)
            .await
            .and_then(|response| {
                BudgetAllocation::try_from(response)
                    .map_err(|violation| GatewayError::contract_violation(&endpoint, violation))
            });

        let mut guard = self.inner.lock().await;
        if guard.latest_seq != seq {
            debug!(
                request_seq = seq,
                latest_seq = guard.latest_seq,
                "budget: discarding superseded response"
            );
            return Err(SimulationError::Superseded);
        }

        match result {
            Ok(allocation) => {
                guard.view = SimulationView::Ready(allocation.clone());
                drop(guard);
                emit(
                    &self.events,
                    ClientEvent::BudgetAllocationReady {
                        items: allocation.items().len(),
                    },
                );
                Ok(allocation)
            }
            Err(err) => {
                guard.view = SimulationView::Failed(BUDGET_FAILURE_MESSAGE.to_string());
                drop(guard);
                warn!(
                    constituency = %self.constituency_name,
                    error = %err,
                    "budget: optimal allocation failed"
                );
                emit(
                    &self.events,
                    ClientEvent::BudgetSimulationFailed(err.user_message()),
                );
                Err(SimulationError::Generation(err))
            }
        }
    }

    /// Clears the view; a response still in flight will be discarded.
    pub async fn reset(&self) {
        let mut guard = self.inner.lock().await;
        guard.latest_seq += 1;
        guard.view = SimulationView::Idle;
    }
}

#[cfg(test)]
#[path = "tests/budget_tests.rs"]
mod tests;
