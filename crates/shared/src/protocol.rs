use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        BudgetAllocation, BudgetItem, GeneratedDocumentBundle, Insight, InsightDetail, InsightId,
    },
    error::ContractViolation,
};

/// Backend endpoints consumed by the client, all under `/api/v1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    ListConstituencies,
    Dashboard { constituency_name: String },
    GenerateLegalDocs,
    InsightDetail,
    GenerateOptimalBudget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Self::ListConstituencies | Self::Dashboard { .. } => Method::Get,
            Self::GenerateLegalDocs | Self::InsightDetail | Self::GenerateOptimalBudget => {
                Method::Post
            }
        }
    }

    /// Path relative to the backend root, already percent-encoded.
    pub fn path(&self) -> String {
        match self {
            Self::ListConstituencies => "/api/v1/constituencies".to_string(),
            Self::Dashboard { constituency_name } => format!(
                "/api/v1/dashboard/{}",
                urlencoding::encode(constituency_name)
            ),
            Self::GenerateLegalDocs => "/api/v1/legal/generate-docs".to_string(),
            Self::InsightDetail => "/api/v1/insights/detail".to_string(),
            Self::GenerateOptimalBudget => "/api/v1/budget/generate-optimal".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalDocsRequest {
    pub constituency_name: String,
    pub mp_name: String,
    pub finding: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalDocsResponse {
    pub rti_application: String,
    pub first_appeal: String,
    pub pil_brief: String,
}

impl TryFrom<LegalDocsResponse> for GeneratedDocumentBundle {
    type Error = ContractViolation;

    fn try_from(value: LegalDocsResponse) -> Result<Self, Self::Error> {
        GeneratedDocumentBundle::new(value.rti_application, value.first_appeal, value.pil_brief)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightDetailRequest {
    pub insight_id: InsightId,
    pub original_title: String,
    pub original_finding: String,
}

impl From<&Insight> for InsightDetailRequest {
    fn from(insight: &Insight) -> Self {
        Self {
            insight_id: insight.id,
            original_title: insight.title.clone(),
            original_finding: insight.finding.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightDetailResponse {
    pub detailed_brief: String,
}

impl InsightDetailResponse {
    pub fn into_detail(self, insight_id: InsightId) -> Result<InsightDetail, ContractViolation> {
        if self.detailed_brief.trim().is_empty() {
            return Err(ContractViolation::EmptyDetail);
        }
        Ok(InsightDetail {
            insight_id,
            brief: self.detailed_brief,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimalBudgetRequest {
    pub constituency_name: String,
    pub constituency_profile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimalBudgetResponse {
    #[serde(default)]
    pub optimal_allocation: Vec<BudgetItem>,
}

impl TryFrom<OptimalBudgetResponse> for BudgetAllocation {
    type Error = ContractViolation;

    fn try_from(value: OptimalBudgetResponse) -> Result<Self, Self::Error> {
        BudgetAllocation::new(value.optimal_allocation)
    }
}
