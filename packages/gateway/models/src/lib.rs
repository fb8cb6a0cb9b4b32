#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Row types of the dashboard views.
//!
//! The hosted store precomputes every aggregate the dashboard shows; these
//! types mirror the view columns. Columns the views may leave null are
//! `Option`s, and counts default to zero when absent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use worker_dashboard_worker_models::lenient;

pub use worker_dashboard_worker_models::DistressAlert;

/// Headline counters from `dashboard_summary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_users: i64,
    #[serde(default)]
    pub registered_users: i64,
    #[serde(default)]
    pub countries_count: i64,
    #[serde(default)]
    pub total_messages: i64,
    #[serde(default)]
    pub total_survey_responses: i64,
    #[serde(default)]
    pub unresolved_alerts: i64,
    /// Workers who messaged in the last 7 days.
    #[serde(default)]
    pub active_users_7d: i64,
    /// Workers who messaged in the last 30 days.
    #[serde(default)]
    pub active_users_30d: i64,
}

/// How the worker breakdown is grouped.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkerGrouping {
    #[default]
    Country,
    State,
    Industry,
}

impl WorkerGrouping {
    /// Name of the view holding this breakdown.
    #[must_use]
    pub const fn view(self) -> &'static str {
        match self {
            Self::Country => "dashboard_workers_by_country",
            Self::State => "dashboard_workers_by_state",
            Self::Industry => "dashboard_workers_by_industry",
        }
    }
}

/// A row of `dashboard_workers_by_country`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkersByCountry {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub worker_count: i64,
    #[serde(default)]
    pub registered_count: i64,
    /// Share of workers who finished registering, as a percentage.
    #[serde(default)]
    pub registration_rate: Option<f64>,
}

/// A row of `dashboard_workers_by_state`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkersByState {
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(default)]
    pub worker_count: i64,
    #[serde(default)]
    pub countries_represented: i64,
    #[serde(default)]
    pub countries: Option<Vec<String>>,
}

/// A row of `dashboard_workers_by_industry`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkersByIndustry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub industry: Option<String>,
    #[serde(default)]
    pub worker_count: i64,
    #[serde(default)]
    pub avg_employer_rating: Option<f64>,
    #[serde(default)]
    pub unique_employers: i64,
}

/// Worker counts grouped one of three ways.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WorkerBreakdown {
    Country(Vec<WorkersByCountry>),
    State(Vec<WorkersByState>),
    Industry(Vec<WorkersByIndustry>),
}

impl WorkerBreakdown {
    /// An empty breakdown for `grouping`.
    #[must_use]
    pub const fn empty(grouping: WorkerGrouping) -> Self {
        match grouping {
            WorkerGrouping::Country => Self::Country(Vec::new()),
            WorkerGrouping::State => Self::State(Vec::new()),
            WorkerGrouping::Industry => Self::Industry(Vec::new()),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Country(rows) => rows.len(),
            Self::State(rows) => rows.len(),
            Self::Industry(rows) => rows.len(),
        }
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A row of `dashboard_employer_ratings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployerRating {
    #[serde(default)]
    pub employer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(default)]
    pub worker_count: i64,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub max_rating: Option<f64>,
    #[serde(default)]
    pub rating_1_count: i64,
    #[serde(default)]
    pub rating_2_count: i64,
    #[serde(default)]
    pub rating_3_count: i64,
    #[serde(default)]
    pub rating_4_count: i64,
    #[serde(default)]
    pub rating_5_count: i64,
}

/// Overall mood of a map cell.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    NeedsAttention,
}

/// A row of `dashboard_map_data`: one state/postcode/industry cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub postcode: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub industry: Option<String>,
    #[serde(default)]
    pub worker_count: i64,
    #[serde(default)]
    pub avg_employer_rating: Option<f64>,
    #[serde(default)]
    pub distress_alerts: i64,
    #[serde(default)]
    pub sentiment: Sentiment,
}

/// A row of `dashboard_activity_trends`: registrations per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTrend {
    pub date: NaiveDate,
    #[serde(default)]
    pub new_users: i64,
    #[serde(default)]
    pub cumulative_users: i64,
}

/// Kind of event in the recent activity feed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityKind {
    Message,
    Registration,
    DistressAlert,
}

/// A row of `dashboard_recent_activity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub activity_type: ActivityKind,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone_number: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub activity_detail: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn summary_defaults_missing_counters() {
        let summary: DashboardSummary =
            serde_json::from_value(json!({"total_users": 12, "registered_users": 9})).unwrap();
        assert_eq!(summary.total_users, 12);
        assert_eq!(summary.registered_users, 9);
        assert_eq!(summary.active_users_30d, 0);
        assert_eq!(DashboardSummary::default().unresolved_alerts, 0);
    }

    #[test]
    fn grouping_names() {
        assert_eq!("state".parse::<WorkerGrouping>().unwrap(), WorkerGrouping::State);
        assert!("employer".parse::<WorkerGrouping>().is_err());
        assert_eq!(WorkerGrouping::default(), WorkerGrouping::Country);
        assert_eq!(WorkerGrouping::Industry.view(), "dashboard_workers_by_industry");
    }

    #[test]
    fn breakdown_serializes_as_plain_array() {
        let breakdown = WorkerBreakdown::Country(vec![WorkersByCountry {
            country: Some("Fiji".to_string()),
            worker_count: 4,
            registered_count: 3,
            registration_rate: Some(75.0),
        }]);
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json[0]["country"], "Fiji");
        assert_eq!(json[0]["worker_count"], 4);
        assert_eq!(breakdown.len(), 1);
        assert!(WorkerBreakdown::empty(WorkerGrouping::State).is_empty());
    }

    #[test]
    fn map_data_sentiment() {
        let row: MapData = serde_json::from_value(json!({
            "state": "NSW",
            "postcode": 2000,
            "industry": "Meat Processing",
            "worker_count": 3,
            "avg_employer_rating": 2.5,
            "distress_alerts": 1,
            "sentiment": "needs_attention"
        }))
        .unwrap();
        assert_eq!(row.postcode.as_deref(), Some("2000"));
        assert_eq!(row.sentiment, Sentiment::NeedsAttention);

        let row: MapData = serde_json::from_value(json!({"state": "VIC"})).unwrap();
        assert_eq!(row.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn activity_rows() {
        let trend: ActivityTrend = serde_json::from_value(json!({
            "date": "2025-10-25",
            "new_users": 2,
            "cumulative_users": 40
        }))
        .unwrap();
        assert_eq!(trend.date, NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());

        let recent: RecentActivity = serde_json::from_value(json!({
            "activity_type": "distress_alert",
            "phone_number": "61400000000",
            "activity_detail": "help",
            "timestamp": "2025-11-01T09:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(recent.activity_type, ActivityKind::DistressAlert);
        assert!(recent.timestamp.is_some());
        assert!(recent.name.is_none());
    }
}
