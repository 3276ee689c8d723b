use super::*;
use crate::test_support::{application_error, ScriptedGateway};
use serde_json::json;
use shared::domain::{InsightId, Severity};

fn insight(id: i64, title: &str) -> Insight {
    Insight {
        id: InsightId(id),
        title: title.to_string(),
        finding: format!("{title} finding"),
        severity: Severity::High,
    }
}

#[tokio::test]
async fn expand_sends_insight_and_shows_brief() {
    let gateway = ScriptedGateway::new();
    gateway.push_ok(json!({ "detailed_brief": "## Detailed Analysis: Split contracts" }));
    let controller = InsightExpansionController::new(gateway.clone());

    let outcome = controller.expand(insight(7, "Split contracts")).await;

    let ExpansionOutcome::Applied(view) = outcome else {
        panic!("latest request must apply");
    };
    assert_eq!(view.text(), Some("## Detailed Analysis: Split contracts"));
    assert_eq!(controller.view().await, view);
    assert_eq!(
        gateway.calls()[0],
        (
            Endpoint::InsightDetail,
            json!({
                "insight_id": 7,
                "original_title": "Split contracts",
                "original_finding": "Split contracts finding"
            })
        )
    );
}

#[tokio::test]
async fn failure_shows_fallback_instead_of_previous_detail() {
    let gateway = ScriptedGateway::new();
    gateway.push_ok(json!({ "detailed_brief": "first brief" }));
    gateway.push_err(application_error(&Endpoint::InsightDetail, 500, "boom"));
    let controller = InsightExpansionController::new(gateway);

    controller.expand(insight(1, "First")).await;
    controller.expand(insight(2, "Second")).await;

    let view = controller.view().await;
    assert_eq!(view.insight().map(|i| i.id), Some(InsightId(2)));
    assert_eq!(view.text(), Some(DETAIL_FALLBACK_MESSAGE));
}

#[tokio::test]
async fn empty_brief_is_a_failure() {
    let gateway = ScriptedGateway::new();
    gateway.push_ok(json!({ "detailed_brief": "   " }));
    let controller = InsightExpansionController::new(gateway);

    controller.expand(insight(3, "Blank")).await;

    assert!(matches!(controller.view().await, DetailView::Failed { .. }));
}

#[tokio::test]
async fn late_response_for_older_selection_is_discarded() {
    let gateway = ScriptedGateway::new();
    let release_first = gateway.push_gated(Ok(json!({ "detailed_brief": "stale brief" })));
    gateway.push_ok(json!({ "detailed_brief": "fresh brief" }));
    let controller = Arc::new(InsightExpansionController::new(gateway.clone()));

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.expand(insight(1, "Older")).await }
    });
    gateway.wait_for_calls(1).await;
    assert!(controller.view().await.is_loading());

    let second = controller.expand(insight(2, "Newer")).await;
    assert!(matches!(second, ExpansionOutcome::Applied(_)));

    release_first.send(()).expect("release");
    assert_eq!(first.await.expect("join"), ExpansionOutcome::Superseded);

    let view = controller.view().await;
    assert_eq!(view.insight().map(|i| i.id), Some(InsightId(2)));
    assert_eq!(view.text(), Some("fresh brief"));
}

#[tokio::test]
async fn close_discards_outstanding_response() {
    let gateway = ScriptedGateway::new();
    let release = gateway.push_gated(Ok(json!({ "detailed_brief": "late brief" })));
    let controller = Arc::new(InsightExpansionController::new(gateway.clone()));

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.expand(insight(5, "Closing")).await }
    });
    gateway.wait_for_calls(1).await;

    controller.close().await;
    release.send(()).expect("release");

    assert_eq!(pending.await.expect("join"), ExpansionOutcome::Superseded);
    assert_eq!(controller.view().await, DetailView::Hidden);
}

#[tokio::test]
async fn emits_loading_then_ready() {
    let gateway = ScriptedGateway::new();
    gateway.push_ok(json!({ "detailed_brief": "brief" }));
    let controller = InsightExpansionController::new(gateway);
    let mut events = controller.subscribe_events();

    controller.expand(insight(9, "Evented")).await;

    assert_eq!(
        events.recv().await.expect("event"),
        ClientEvent::InsightDetailLoading(InsightId(9))
    );
    assert_eq!(
        events.recv().await.expect("event"),
        ClientEvent::InsightDetailReady(InsightId(9))
    );
}
