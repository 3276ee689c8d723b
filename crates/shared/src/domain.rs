use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ContractViolation;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ConstituencyId);
id_newtype!(InsightId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransparencyStatus {
    Current,
    Outdated,
    Missing,
}

impl TransparencyStatus {
    pub const ALL: [TransparencyStatus; 3] = [Self::Current, Self::Outdated, Self::Missing];

    /// Outdated and Missing reports route to the Action Hub.
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::Outdated | Self::Missing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Outdated => "Outdated",
            Self::Missing => "Missing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Current => "Up to date",
            Self::Outdated => "Needs update",
            Self::Missing => "Action required",
        }
    }
}

impl fmt::Display for TransparencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transparency status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for TransparencyStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Current" => Ok(Self::Current),
            "Outdated" => Ok(Self::Outdated),
            "Missing" => Ok(Self::Missing),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstituencyRecord {
    pub id: ConstituencyId,
    pub mp_name: String,
    pub constituency_name: String,
    pub state: String,
    pub transparency_status: TransparencyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_report_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mp_email: Option<String>,
}

impl ConstituencyRecord {
    pub fn is_actionable(&self) -> bool {
        self.transparency_status.is_actionable()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingCategory {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contractor {
    pub name: String,
    pub amount: f64,
}

/// A single AI-produced observation about a constituency's spending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub id: InsightId,
    pub title: String,
    pub finding: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub id: ConstituencyId,
    pub mp_name: String,
    pub constituency_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_report_date: Option<NaiveDate>,
    pub total_expenditure: f64,
    pub total_projects: u32,
    #[serde(default)]
    pub spending_by_category: Vec<SpendingCategory>,
    #[serde(default, rename = "top_10_contractors")]
    pub top_contractors: Vec<Contractor>,
    #[serde(default, rename = "ai_insights")]
    pub insights: Vec<Insight>,
}

impl DashboardReport {
    pub fn insight(&self, id: InsightId) -> Option<&Insight> {
        self.insights.iter().find(|insight| insight.id == id)
    }
}

/// Fixed three-slot identity of the generated legal documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    Rti,
    Appeal,
    Pil,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 3] = [Self::Rti, Self::Appeal, Self::Pil];

    pub fn id(self) -> &'static str {
        match self {
            Self::Rti => "rti",
            Self::Appeal => "appeal",
            Self::Pil => "pil",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Rti => "RTI Application",
            Self::Appeal => "First Appeal Template",
            Self::Pil => "Public Interest Litigation Brief",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Rti => "Your legal right to demand transparency",
            Self::Appeal => "For when your RTI request is ignored or inadequately answered",
            Self::Pil => "For legal consultation on systemic transparency issues",
        }
    }

    pub fn guidance(self) -> &'static [&'static str] {
        match self {
            Self::Rti => &[
                "Copy the AI-generated RTI application below",
                "Visit the official Government of India RTI portal",
                "Create a new RTI request and paste the text",
                "Submit your application and save the reference number",
            ],
            Self::Appeal => &[
                "Use this if you don't receive a satisfactory response within 30 days of your RTI application.",
            ],
            Self::Pil => &[
                "This document can be shared with a lawyer to evaluate the possibility of filing a Public Interest Litigation case for systemic transparency issues.",
            ],
        }
    }

    pub fn portal_url(self) -> Option<&'static str> {
        match self {
            Self::Rti => Some("https://rtionline.gov.in/"),
            Self::Appeal | Self::Pil => None,
        }
    }
}

impl fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DocumentSlot {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rti" => Ok(Self::Rti),
            "appeal" => Ok(Self::Appeal),
            "pil" => Ok(Self::Pil),
            other => Err(format!("unknown document '{other}' (expected rti, appeal or pil)")),
        }
    }
}

/// All three legal documents. Construction fails unless every slot is
/// populated, so a partially generated bundle cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocumentBundle {
    rti_application: String,
    first_appeal: String,
    pil_brief: String,
}

impl GeneratedDocumentBundle {
    pub fn new(
        rti_application: impl Into<String>,
        first_appeal: impl Into<String>,
        pil_brief: impl Into<String>,
    ) -> Result<Self, ContractViolation> {
        let bundle = Self {
            rti_application: rti_application.into(),
            first_appeal: first_appeal.into(),
            pil_brief: pil_brief.into(),
        };
        for slot in DocumentSlot::ALL {
            if bundle.document(slot).trim().is_empty() {
                return Err(ContractViolation::MissingDocument(slot));
            }
        }
        Ok(bundle)
    }

    pub fn document(&self, slot: DocumentSlot) -> &str {
        match slot {
            DocumentSlot::Rti => &self.rti_application,
            DocumentSlot::Appeal => &self.first_appeal,
            DocumentSlot::Pil => &self.pil_brief,
        }
    }

    pub fn rti_application(&self) -> &str {
        &self.rti_application
    }

    pub fn first_appeal(&self) -> &str {
        &self.first_appeal
    }

    pub fn pil_brief(&self) -> &str {
        &self.pil_brief
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightDetail {
    pub insight_id: InsightId,
    pub brief: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub category: String,
    pub amount: f64,
    pub justification: String,
    pub example_project: String,
}

/// Ordered optimal allocation, produced as one unit by a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAllocation {
    items: Vec<BudgetItem>,
}

impl BudgetAllocation {
    pub fn new(items: Vec<BudgetItem>) -> Result<Self, ContractViolation> {
        if items.is_empty() {
            return Err(ContractViolation::EmptyAllocation);
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[BudgetItem] {
        &self.items
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}
