use std::{fmt, str::FromStr};

use crate::domain::{ConstituencyRecord, TransparencyStatus};

pub const EMPTY_STATE_TITLE: &str = "No constituencies found";
pub const EMPTY_STATE_HINT: &str =
    "Try adjusting your search terms or filters to find what you're looking for.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TransparencyStatus),
}

impl StatusFilter {
    pub fn matches(self, status: TransparencyStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "All" {
            return Ok(Self::All);
        }
        value
            .parse::<TransparencyStatus>()
            .map(Self::Only)
            .map_err(|err| err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectoryStats {
    pub total: usize,
    pub current: usize,
    pub outdated: usize,
    pub missing: usize,
}

impl DirectoryStats {
    pub fn from_records(records: &[ConstituencyRecord]) -> Self {
        records.iter().fold(
            Self {
                total: records.len(),
                ..Self::default()
            },
            |mut stats, record| {
                match record.transparency_status {
                    TransparencyStatus::Current => stats.current += 1,
                    TransparencyStatus::Outdated => stats.outdated += 1,
                    TransparencyStatus::Missing => stats.missing += 1,
                }
                stats
            },
        )
    }

    pub fn count(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.total,
            StatusFilter::Only(TransparencyStatus::Current) => self.current,
            StatusFilter::Only(TransparencyStatus::Outdated) => self.outdated,
            StatusFilter::Only(TransparencyStatus::Missing) => self.missing,
        }
    }
}

/// Records whose constituency, MP or state contains `search`
/// (case-insensitively) and whose status passes `filter`, in input order.
pub fn filter_records<'a>(
    records: &'a [ConstituencyRecord],
    search: &str,
    filter: StatusFilter,
) -> Vec<&'a ConstituencyRecord> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|record| {
            needle.is_empty()
                || record.constituency_name.to_lowercase().contains(&needle)
                || record.mp_name.to_lowercase().contains(&needle)
                || record.state.to_lowercase().contains(&needle)
        })
        .filter(|record| filter.matches(record.transparency_status))
        .collect()
}
