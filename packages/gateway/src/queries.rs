//! Typed reads and writes used by the dashboard API.
//!
//! Each function builds one [`RestQuery`], runs it through a [`Gateway`]
//! and decodes the rows. A row that fails to decode is logged and skipped
//! so one malformed record never hides the rest of a view.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use worker_dashboard_gateway_models::{
    ActivityTrend, DashboardSummary, DistressAlert, EmployerRating, MapData, RecentActivity,
    WorkerBreakdown, WorkerGrouping,
};
use worker_dashboard_worker_models::{ConversationMessage, WorkerRecord};

use crate::{Direction, Gateway, GatewayError, RestQuery};

pub const SUMMARY_VIEW: &str = "dashboard_summary";
pub const EMPLOYER_RATINGS_VIEW: &str = "dashboard_employer_ratings";
pub const MAP_DATA_VIEW: &str = "dashboard_map_data";
pub const DISTRESS_ALERTS_VIEW: &str = "dashboard_distress_alerts";
pub const ACTIVITY_TRENDS_VIEW: &str = "dashboard_activity_trends";
pub const RECENT_ACTIVITY_VIEW: &str = "dashboard_recent_activity";
pub const USERS_TABLE: &str = "users";
pub const ALERTS_TABLE: &str = "distress_alerts";
pub const CONVERSATIONS_TABLE: &str = "conversations";

/// Days of registration trend returned.
pub const TREND_DAYS: usize = 90;

/// Events returned in the recent activity feed.
pub const RECENT_ACTIVITY_LIMIT: usize = 50;

const DEFAULT_EMPLOYER_SORT: &str = "worker_count";

/// Filters for [`employer_ratings`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployerFilter {
    /// Column to sort by; `worker_count` when unset.
    pub sort_by: Option<String>,
    pub direction: Direction,
    /// Lower bound on `avg_rating`.
    pub min_rating: Option<f64>,
    /// Upper bound on `avg_rating`.
    pub max_rating: Option<f64>,
    pub state: Option<String>,
    pub industry: Option<String>,
}

/// Filters for [`map_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapFilter {
    pub state: Option<String>,
    pub industry: Option<String>,
}

/// Filters for [`distress_alerts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub resolved: Option<bool>,
    pub phone_number: Option<String>,
}

fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Skipping malformed {table} row: {e}");
                None
            }
        })
        .collect()
}

async fn fetch_as<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    query: &RestQuery,
) -> Result<Vec<T>, GatewayError> {
    let rows = gateway.fetch(query).await?;
    Ok(decode_rows(query.table_name(), rows))
}

async fn fetch_one_as<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    query: &RestQuery,
) -> Result<Option<T>, GatewayError> {
    let row = gateway.fetch_one(query).await?;
    Ok(row.and_then(|row| decode_rows(query.table_name(), vec![row]).pop()))
}

/// The headline counters, if the view has a row.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn dashboard_summary(
    gateway: &dyn Gateway,
) -> Result<Option<DashboardSummary>, GatewayError> {
    fetch_one_as(gateway, &RestQuery::table(SUMMARY_VIEW).select("*")).await
}

/// Worker counts grouped by country, state or industry, largest first.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn workers_by(
    gateway: &dyn Gateway,
    grouping: WorkerGrouping,
) -> Result<WorkerBreakdown, GatewayError> {
    let query = RestQuery::table(grouping.view())
        .select("*")
        .order("worker_count", Direction::Desc);

    Ok(match grouping {
        WorkerGrouping::Country => WorkerBreakdown::Country(fetch_as(gateway, &query).await?),
        WorkerGrouping::State => WorkerBreakdown::State(fetch_as(gateway, &query).await?),
        WorkerGrouping::Industry => WorkerBreakdown::Industry(fetch_as(gateway, &query).await?),
    })
}

/// Employer rating rows matching `filter`.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn employer_ratings(
    gateway: &dyn Gateway,
    filter: &EmployerFilter,
) -> Result<Vec<EmployerRating>, GatewayError> {
    let mut query = RestQuery::table(EMPLOYER_RATINGS_VIEW).select("*");

    if let Some(min) = filter.min_rating {
        query = query.gte("avg_rating", min);
    }
    if let Some(max) = filter.max_rating {
        query = query.lte("avg_rating", max);
    }
    if let Some(state) = &filter.state {
        query = query.eq("state", state.as_str());
    }
    if let Some(industry) = &filter.industry {
        query = query.eq("industry", industry.as_str());
    }

    let sort_by = filter.sort_by.as_deref().unwrap_or(DEFAULT_EMPLOYER_SORT);
    query = query.order(sort_by, filter.direction);

    fetch_as(gateway, &query).await
}

/// Map cells matching `filter`, largest first.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn map_data(
    gateway: &dyn Gateway,
    filter: &MapFilter,
) -> Result<Vec<MapData>, GatewayError> {
    let mut query = RestQuery::table(MAP_DATA_VIEW)
        .select("*")
        .order("worker_count", Direction::Desc);

    if let Some(state) = &filter.state {
        query = query.eq("state", state.as_str());
    }
    if let Some(industry) = &filter.industry {
        query = query.eq("industry", industry.as_str());
    }

    fetch_as(gateway, &query).await
}

/// Distress alerts matching `filter`, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn distress_alerts(
    gateway: &dyn Gateway,
    filter: &AlertFilter,
) -> Result<Vec<DistressAlert>, GatewayError> {
    let mut query = RestQuery::table(DISTRESS_ALERTS_VIEW)
        .select("*")
        .order("timestamp", Direction::Desc);

    if let Some(resolved) = filter.resolved {
        query = query.eq("resolved", resolved);
    }
    if let Some(phone) = &filter.phone_number {
        query = query.eq("phone_number", phone.as_str());
    }

    fetch_as(gateway, &query).await
}

/// Marks an alert resolved or open and returns the updated rows as
/// stored. With `resolved` unset the row is matched but left unchanged.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn set_alert_resolved(
    gateway: &dyn Gateway,
    alert_id: &Value,
    resolved: Option<bool>,
) -> Result<Vec<Value>, GatewayError> {
    log::info!("Setting alert {alert_id} resolved={resolved:?}");

    let mut patch = Map::new();
    if let Some(resolved) = resolved {
        patch.insert("resolved".to_string(), Value::Bool(resolved));
    }

    gateway
        .update(
            &RestQuery::table(ALERTS_TABLE).eq("id", alert_id.clone()),
            Value::Object(patch),
        )
        .await
}

/// Registrations per day, oldest first.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn activity_trends(gateway: &dyn Gateway) -> Result<Vec<ActivityTrend>, GatewayError> {
    let query = RestQuery::table(ACTIVITY_TRENDS_VIEW)
        .select("*")
        .order("date", Direction::Asc)
        .limit(TREND_DAYS);
    fetch_as(gateway, &query).await
}

/// The most recent activity events, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn recent_activity(gateway: &dyn Gateway) -> Result<Vec<RecentActivity>, GatewayError> {
    let query = RestQuery::table(RECENT_ACTIVITY_VIEW)
        .select("*")
        .order("timestamp", Direction::Desc)
        .limit(RECENT_ACTIVITY_LIMIT);
    fetch_as(gateway, &query).await
}

/// Every worker who finished registering, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn registered_workers(gateway: &dyn Gateway) -> Result<Vec<WorkerRecord>, GatewayError> {
    let query = RestQuery::table(USERS_TABLE)
        .select("*")
        .eq("registration_complete", true)
        .order("created_at", Direction::Desc);
    fetch_as(gateway, &query).await
}

/// Looks up one worker by phone number.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn worker_by_phone(
    gateway: &dyn Gateway,
    phone_number: &str,
    registered_only: bool,
) -> Result<Option<WorkerRecord>, GatewayError> {
    let mut query = RestQuery::table(USERS_TABLE)
        .select("*")
        .eq("phone_number", phone_number);
    if registered_only {
        query = query.eq("registration_complete", true);
    }
    fetch_one_as(gateway, &query).await
}

/// A worker's most recent messages, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn recent_messages(
    gateway: &dyn Gateway,
    phone_number: &str,
    limit: usize,
) -> Result<Vec<ConversationMessage>, GatewayError> {
    let query = RestQuery::table(CONVERSATIONS_TABLE)
        .select("role,content,timestamp")
        .eq("phone_number", phone_number)
        .order("timestamp", Direction::Desc)
        .limit(limit);
    fetch_as(gateway, &query).await
}

/// Total messages exchanged with a worker.
///
/// # Errors
///
/// Returns [`GatewayError`] if the store request fails.
pub async fn message_count(gateway: &dyn Gateway, phone_number: &str) -> Result<u64, GatewayError> {
    gateway
        .count(&RestQuery::table(CONVERSATIONS_TABLE).eq("phone_number", phone_number))
        .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use worker_dashboard_gateway_models::WorkersByCountry;

    use super::*;
    use crate::MemoryGateway;

    fn gateway() -> MemoryGateway {
        MemoryGateway::new()
            .with_table(
                "dashboard_workers_by_country",
                vec![
                    json!({"country": "Fiji", "worker_count": 2, "registered_count": 1}),
                    json!({"country": "Tonga", "worker_count": 7, "registered_count": 5}),
                    json!({"country": 12, "worker_count": "many"}),
                ],
            )
            .with_table(
                EMPLOYER_RATINGS_VIEW,
                vec![
                    json!({"employer_name": "A", "state": "NSW", "worker_count": 3, "avg_rating": 4.5}),
                    json!({"employer_name": "B", "state": "NSW", "worker_count": 9, "avg_rating": 2.0}),
                    json!({"employer_name": "C", "state": "VIC", "worker_count": 1, "avg_rating": 3.0}),
                ],
            )
            .with_table(
                USERS_TABLE,
                vec![
                    json!({"phone_number": "1", "registration_complete": true, "created_at": "2025-10-01T00:00:00Z"}),
                    json!({"phone_number": "2", "registration_complete": false, "created_at": "2025-10-05T00:00:00Z"}),
                    json!({"phone_number": "3", "registration_complete": true, "created_at": "2025-10-03T00:00:00Z"}),
                ],
            )
            .with_table(
                CONVERSATIONS_TABLE,
                (0..15)
                    .map(|i| {
                        json!({
                            "phone_number": "1",
                            "role": if i % 2 == 0 { "user" } else { "assistant" },
                            "content": format!("message {i}"),
                            "timestamp": format!("2025-10-01T00:00:{i:02}Z"),
                        })
                    })
                    .collect(),
            )
    }

    #[tokio::test]
    async fn breakdown_is_sorted_and_skips_bad_rows() {
        let breakdown = workers_by(&gateway(), WorkerGrouping::Country).await.unwrap();
        let WorkerBreakdown::Country(rows) = breakdown else {
            panic!("expected country rows");
        };
        let countries: Vec<_> = rows.iter().map(|r: &WorkersByCountry| r.country.clone()).collect();
        assert_eq!(countries, vec![Some("Tonga".to_string()), Some("Fiji".to_string())]);
    }

    #[tokio::test]
    async fn employer_filters_and_sorting() {
        let gateway = gateway();
        let rows = employer_ratings(
            &gateway,
            &EmployerFilter {
                state: Some("NSW".to_string()),
                ..EmployerFilter::default()
            },
        )
        .await
        .unwrap();
        let names: Vec<_> = rows.iter().filter_map(|r| r.employer_name.as_deref()).collect();
        assert_eq!(names, vec!["B", "A"]);

        let rows = employer_ratings(
            &gateway,
            &EmployerFilter {
                min_rating: Some(2.5),
                sort_by: Some("avg_rating".to_string()),
                direction: Direction::Asc,
                ..EmployerFilter::default()
            },
        )
        .await
        .unwrap();
        let names: Vec<_> = rows.iter().filter_map(|r| r.employer_name.as_deref()).collect();
        assert_eq!(names, vec!["C", "A"]);
    }

    #[tokio::test]
    async fn registered_workers_newest_first() {
        let workers = registered_workers(&gateway()).await.unwrap();
        let phones: Vec<_> = workers.iter().map(|w| w.phone_number.as_str()).collect();
        assert_eq!(phones, vec!["3", "1"]);
    }

    #[tokio::test]
    async fn worker_lookup() {
        let gateway = gateway();
        assert!(worker_by_phone(&gateway, "2", false).await.unwrap().is_some());
        assert!(worker_by_phone(&gateway, "2", true).await.unwrap().is_none());
        assert!(worker_by_phone(&gateway, "9", false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn messages_and_count() {
        let gateway = gateway();
        let messages = recent_messages(&gateway, "1", 10).await.unwrap();
        assert_eq!(messages.len(), 10);
        assert_eq!(messages[0].content, "message 14");
        assert_eq!(message_count(&gateway, "1").await.unwrap(), 15);
        assert_eq!(message_count(&gateway, "3").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn resolving_an_alert() {
        let gateway = MemoryGateway::new().with_table(
            ALERTS_TABLE,
            vec![json!({"id": 5, "resolved": false}), json!({"id": 6, "resolved": false})],
        );
        let updated = set_alert_resolved(&gateway, &json!(5), Some(true)).await.unwrap();
        assert_eq!(updated, vec![json!({"id": 5, "resolved": true})]);
        assert_eq!(gateway.rows(ALERTS_TABLE).unwrap()[1]["resolved"], false);

        let untouched = set_alert_resolved(&gateway, &json!(6), None).await.unwrap();
        assert_eq!(untouched, vec![json!({"id": 6, "resolved": false})]);
    }

    #[tokio::test]
    async fn missing_summary_is_none() {
        assert!(dashboard_summary(&MemoryGateway::new()).await.unwrap().is_none());
    }
}
