//! Dashboard overview types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{FALLBACK_GREETING, Organization, User};

/// Reporting window for `GET /dashboard/overview`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardPeriod {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl DashboardPeriod {
    /// Query-string value expected by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for DashboardPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dashboard period '{0}' (expected week, month, quarter or year)")]
pub struct ParsePeriodError(pub String);

impl FromStr for DashboardPeriod {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

/// KPIs for the caller's organization over a [`DashboardPeriod`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardOverview {
    pub customers_count: i64,
    pub active_opportunities_count: i64,
    pub won_opportunities_count: i64,
    pub total_pipeline_value: f64,
    pub average_deal_size: f64,
    pub recent_interactions_count: i64,
    pub customers_by_segment: BTreeMap<String, i64>,
    pub opportunities_by_stage: BTreeMap<String, i64>,
}

/// Everything the dashboard view shows.
///
/// `user` is the cached session record and may be absent when the backend's
/// login response carried only a token.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub greeting_name: String,
    pub period: DashboardPeriod,
    pub user: Option<User>,
    pub organization: Organization,
    pub overview: DashboardOverview,
}

impl DashboardSummary {
    #[must_use]
    pub fn new(
        period: DashboardPeriod,
        user: Option<User>,
        organization: Organization,
        overview: DashboardOverview,
    ) -> Self {
        let greeting_name = user
            .as_ref()
            .map_or(FALLBACK_GREETING, User::greeting_name)
            .to_string();
        Self {
            greeting_name,
            period,
            user,
            organization,
            overview,
        }
    }
}
