//! Directory and dashboard reads that feed the views.

use serde_json::Value;
use shared::{
    domain::{ConstituencyRecord, DashboardReport},
    protocol::Endpoint,
    routing::dashboard_lookup_name,
};
use tracing::info;

use crate::gateway::{call, GatewayError, RequestGateway};

pub async fn fetch_constituencies(
    gateway: &dyn RequestGateway,
) -> Result<Vec<ConstituencyRecord>, GatewayError> {
    let records: Vec<ConstituencyRecord> =
        call(gateway, &Endpoint::ListConstituencies, &Value::Null).await?;
    info!(count = records.len(), "reports: loaded constituency directory");
    Ok(records)
}

/// Report for a dashboard slug. A 404 means no report exists.
pub async fn fetch_dashboard(
    gateway: &dyn RequestGateway,
    slug: &str,
) -> Result<Option<DashboardReport>, GatewayError> {
    let endpoint = Endpoint::Dashboard {
        constituency_name: dashboard_lookup_name(slug),
    };
    match call::<_, DashboardReport>(gateway, &endpoint, &Value::Null).await {
        Ok(report) => Ok(Some(report)),
        Err(err) if err.is_not_found() => {
            info!(slug, "reports: no dashboard report");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
