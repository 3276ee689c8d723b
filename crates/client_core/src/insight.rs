//! On-demand detailed analysis for a single dashboard insight.
//!
//! Only the most recent selection may update the detail view. Each expansion
//! takes a sequence number; a response whose number is no longer the latest
//! is discarded instead of overwriting a newer selection.

use std::sync::Arc;

use shared::{
    domain::{Insight, InsightDetail},
    protocol::{Endpoint, InsightDetailRequest, InsightDetailResponse},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    events::{emit, event_channel, ClientEvent},
    gateway::{call, GatewayError, RequestGateway},
};

pub const DETAIL_FALLBACK_MESSAGE: &str = "Could not load detailed analysis. Please try again.";
pub const NO_INSIGHTS_MESSAGE: &str = "No AI insights were generated for this report.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Hidden,
    Loading { insight: Insight },
    Ready { insight: Insight, detail: InsightDetail },
    Failed { insight: Insight, message: String },
}

impl DetailView {
    pub fn insight(&self) -> Option<&Insight> {
        match self {
            Self::Hidden => None,
            Self::Loading { insight } | Self::Ready { insight, .. } | Self::Failed { insight, .. } => {
                Some(insight)
            }
        }
    }

    /// Text for the detail area, if it has any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Ready { detail, .. } => Some(&detail.brief),
            Self::Failed { message, .. } => Some(message),
            Self::Hidden | Self::Loading { .. } => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionOutcome {
    Applied(DetailView),
    /// A newer selection (or a close) happened while this request was out.
    Superseded,
}

struct ExpansionState {
    view: DetailView,
    latest_seq: u64,
}

pub struct InsightExpansionController {
    gateway: Arc<dyn RequestGateway>,
    inner: Mutex<ExpansionState>,
    events: broadcast::Sender<ClientEvent>,
}

impl InsightExpansionController {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            gateway,
            inner: Mutex::new(ExpansionState {
                view: DetailView::Hidden,
                latest_seq: 0,
            }),
            events: event_channel(),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> DetailView {
        self.inner.lock().await.view.clone()
    }

    /// Selects `insight` and fetches its detailed brief. Failures never
    /// propagate; they show [`DETAIL_FALLBACK_MESSAGE`] instead.
    pub async fn expand(&self, insight: Insight) -> ExpansionOutcome {
        let seq = {
            let mut guard = self.inner.lock().await;
            guard.latest_seq += 1;
            guard.view = DetailView::Loading {
                insight: insight.clone(),
            };
            guard.latest_seq
        };
        emit(&self.events, ClientEvent::InsightDetailLoading(insight.id));
        info!(insight_id = insight.id.0, request_seq = seq, "insight: expanding");

        let endpoint = Endpoint::InsightDetail;
        let request = InsightDetailRequest::from(&insight);
        let result = call::<_, InsightDetailResponse>(self.gateway.as_ref(), &endpoint, &request)
            .await
            .and_then(|response| {
                response
                    .into_detail(insight.id)
                    .map_err(|violation| GatewayError::contract_violation(&endpoint, violation))
            });

        let mut guard = self.inner.lock().await;
        if guard.latest_seq != seq {
            debug!(
                insight_id = insight.id.0,
                request_seq = seq,
                latest_seq = guard.latest_seq,
                "insight: discarding superseded response"
            );
            return ExpansionOutcome::Superseded;
        }

        let insight_id = insight.id;
        let (view, event) = match result {
            Ok(detail) => (
                DetailView::Ready { insight, detail },
                ClientEvent::InsightDetailReady(insight_id),
            ),
            Err(err) => {
                warn!(insight_id = insight_id.0, error = %err, "insight: detail request failed");
                (
                    DetailView::Failed {
                        insight,
                        message: DETAIL_FALLBACK_MESSAGE.to_string(),
                    },
                    ClientEvent::InsightDetailFailed {
                        insight_id,
                        message: err.user_message(),
                    },
                )
            }
        };
        guard.view = view.clone();
        drop(guard);
        emit(&self.events, event);
        ExpansionOutcome::Applied(view)
    }

    /// Hides the detail view; any outstanding response is discarded.
    pub async fn close(&self) {
        let mut guard = self.inner.lock().await;
        guard.latest_seq += 1;
        guard.view = DetailView::Hidden;
    }
}

#[cfg(test)]
#[path = "tests/insight_tests.rs"]
mod tests;
