//! HTTP handler functions for the worker dashboard API.
//!
//! Every handler answers with JSON. Aggregate views degrade the way the
//! dashboard expects when the store fails: the summary falls back to
//! zeros, the worker lists to an empty array, everything else to a 500.

use actix_web::{HttpResponse, HttpResponseBuilder, http::header, web};
use worker_dashboard_avatar::AvatarIdentity;
use worker_dashboard_gateway::{
    Direction, GatewayError,
    queries::{self, AlertFilter, EmployerFilter, MapFilter},
};
use worker_dashboard_gateway_models::{DashboardSummary, WorkerBreakdown};
use worker_dashboard_server_models::{
    ActivityQueryParams, ActivityView, AlertQueryParams, AlertUpdateRequest, AlertUpdateResponse,
    ApiError, ApiHealth, ApiWorkerDetail, ApiWorkerMapEntry, ApiWorkerProfile,
    EmployerQueryParams, MapQueryParams, WorkerProfileParams, WorkersQueryParams,
};
use worker_dashboard_worker::ResolvedFields;
use worker_dashboard_worker_models::WorkerRecord;

use crate::AppState;

const SUMMARY_MAX_AGE: u32 = 30;
const BREAKDOWN_MAX_AGE: u32 = 60;
const ALERTS_MAX_AGE: u32 = 15;
const ACTIVITY_MAX_AGE: u32 = 30;
const WORKER_DETAIL_MAX_AGE: u32 = 15;

/// Messages included in the worker detail view.
const RECENT_MESSAGE_LIMIT: usize = 10;

/// A 200 response that caches for `max_age` seconds.
fn cached(max_age: u32) -> HttpResponseBuilder {
    let mut builder = HttpResponse::Ok();
    builder.insert_header((header::CACHE_CONTROL, format!("public, max-age={max_age}")));
    builder
}

fn internal_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiError::new(message))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/dashboard/summary`
///
/// Returns the headline counters, or all zeros if they are unavailable.
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    let summary = match queries::dashboard_summary(state.gateway.as_ref()).await {
        Ok(Some(summary)) => summary,
        Ok(None) => {
            log::warn!("Summary view returned no row");
            DashboardSummary::default()
        }
        Err(e) => {
            log::error!("Failed to fetch summary: {e}");
            DashboardSummary::default()
        }
    };

    cached(SUMMARY_MAX_AGE).json(summary)
}

/// `GET /api/dashboard/workers`
///
/// Worker counts grouped by `groupBy` (country, state or industry).
pub async fn workers(
    state: web::Data<AppState>,
    params: web::Query<WorkersQueryParams>,
) -> HttpResponse {
    let grouping = match params.grouping() {
        Ok(grouping) => grouping,
        Err(raw) => {
            log::debug!("Rejecting groupBy={raw}");
            return HttpResponse::BadRequest().json(ApiError::new("Invalid groupBy parameter"));
        }
    };

    let breakdown = match queries::workers_by(state.gateway.as_ref(), grouping).await {
        Ok(breakdown) => breakdown,
        Err(e) => {
            log::error!("Failed to fetch workers by {grouping}: {e}");
            WorkerBreakdown::empty(grouping)
        }
    };

    cached(BREAKDOWN_MAX_AGE).json(breakdown)
}

/// `GET /api/dashboard/employers`
pub async fn employers(
    state: web::Data<AppState>,
    params: web::Query<EmployerQueryParams>,
) -> HttpResponse {
    let filter = EmployerFilter {
        sort_by: params.sort_by().map(ToString::to_string),
        direction: Direction::from_param(params.order()),
        min_rating: params.min_rating(),
        max_rating: params.max_rating(),
        state: params.state().map(ToString::to_string),
        industry: params.industry().map(ToString::to_string),
    };

    match queries::employer_ratings(state.gateway.as_ref(), &filter).await {
        Ok(rows) => cached(BREAKDOWN_MAX_AGE).json(rows),
        Err(e) => {
            log::error!("Failed to fetch employer ratings: {e}");
            internal_error("Failed to fetch employer ratings")
        }
    }
}

/// `GET /api/dashboard/map-data`
pub async fn map_data(
    state: web::Data<AppState>,
    params: web::Query<MapQueryParams>,
) -> HttpResponse {
    let filter = MapFilter {
        state: params.state().map(ToString::to_string),
        industry: params.industry().map(ToString::to_string),
    };

    match queries::map_data(state.gateway.as_ref(), &filter).await {
        Ok(rows) => cached(BREAKDOWN_MAX_AGE).json(rows),
        Err(e) => {
            log::error!("Failed to fetch map data: {e}");
            internal_error("Failed to fetch map data")
        }
    }
}

/// `GET /api/dashboard/alerts`
pub async fn alerts(
    state: web::Data<AppState>,
    params: web::Query<AlertQueryParams>,
) -> HttpResponse {
    let filter = AlertFilter {
        resolved: params.resolved(),
        phone_number: None,
    };

    match queries::distress_alerts(state.gateway.as_ref(), &filter).await {
        Ok(rows) => cached(ALERTS_MAX_AGE).json(rows),
        Err(e) => {
            log::error!("Failed to fetch alerts: {e}");
            internal_error("Failed to fetch alerts")
        }
    }
}

/// `PATCH /api/dashboard/alerts`
///
/// Marks an alert resolved or open.
pub async fn update_alert(
    state: web::Data<AppState>,
    body: web::Json<AlertUpdateRequest>,
) -> HttpResponse {
    let Some(alert_id) = body.alert_id() else {
        return HttpResponse::BadRequest().json(ApiError::new("Alert ID is required"));
    };

    match queries::set_alert_resolved(state.gateway.as_ref(), alert_id, body.resolved).await {
        Ok(data) => HttpResponse::Ok().json(AlertUpdateResponse {
            success: true,
            data,
        }),
        Err(e) => {
            log::error!("Failed to update alert {alert_id}: {e}");
            internal_error("Failed to update alert")
        }
    }
}

/// `GET /api/dashboard/activity`
///
/// Registration trends by default, or the recent activity feed.
pub async fn activity(
    state: web::Data<AppState>,
    params: web::Query<ActivityQueryParams>,
) -> HttpResponse {
    let gateway = state.gateway.as_ref();

    let response = match params.view() {
        ActivityView::Trends => queries::activity_trends(gateway)
            .await
            .map(|rows| cached(ACTIVITY_MAX_AGE).json(rows)),
        ActivityView::Recent => queries::recent_activity(gateway)
            .await
            .map(|rows| cached(ACTIVITY_MAX_AGE).json(rows)),
    };

    response.unwrap_or_else(|e| {
        log::error!("Failed to fetch activity: {e}");
        internal_error("Failed to fetch activity")
    })
}

/// Registered workers with both a postcode and a state, newest first.
async fn located_workers(
    state: &AppState,
) -> Result<Vec<(WorkerRecord, ResolvedFields)>, GatewayError> {
    let workers = queries::registered_workers(state.gateway.as_ref()).await?;

    Ok(workers
        .into_iter()
        .map(|worker| {
            let fields = ResolvedFields::of(&worker);
            (worker, fields)
        })
        .filter(|(_, fields)| fields.has_location())
        .collect())
}

/// `GET /api/dashboard/workers-map`
pub async fn workers_map(state: web::Data<AppState>) -> HttpResponse {
    let entries: Vec<ApiWorkerMapEntry> = match located_workers(&state).await {
        Ok(workers) => workers
            .into_iter()
            .map(|(worker, fields)| ApiWorkerMapEntry::new(&worker, fields))
            .collect(),
        Err(e) => {
            log::error!("Failed to fetch workers for map: {e}");
            Vec::new()
        }
    };

    cached(BREAKDOWN_MAX_AGE).json(entries)
}

/// `GET /api/dashboard/globe-points`
///
/// The workers-map sequence projected onto the globe. A worker's jitter
/// index is its position in that sequence.
pub async fn globe_points(state: web::Data<AppState>) -> HttpResponse {
    let workers: Vec<WorkerRecord> = match located_workers(&state).await {
        Ok(workers) => workers.into_iter().map(|(worker, _)| worker).collect(),
        Err(e) => {
            log::error!("Failed to fetch workers for globe: {e}");
            Vec::new()
        }
    };

    cached(BREAKDOWN_MAX_AGE).json(state.projector.project_all(&workers))
}

/// `GET /api/dashboard/worker-profile?phone=`
pub async fn worker_profile(
    state: web::Data<AppState>,
    params: web::Query<WorkerProfileParams>,
) -> HttpResponse {
    let Some(phone) = params.phone() else {
        return HttpResponse::BadRequest().json(ApiError::new("Phone number is required"));
    };

    match queries::worker_by_phone(state.gateway.as_ref(), phone, true).await {
        Ok(Some(worker)) => {
            let fields = ResolvedFields::of(&worker);
            let city = state
                .resolver
                .resolve(fields.postcode.as_deref())
                .map(|region| region.place_name.as_str());
            let avatar = AvatarIdentity::derive(worker.name.as_deref(), state.avatars);

            HttpResponse::Ok().json(ApiWorkerProfile::new(&worker, fields, city, avatar))
        }
        Ok(None) => HttpResponse::NotFound().json(ApiError::new("Worker not found")),
        Err(e) => {
            log::error!("Failed to fetch worker profile {phone}: {e}");
            internal_error("Failed to fetch worker profile")
        }
    }
}

fn or_empty<T: Default>(result: Result<T, GatewayError>, what: &str, phone: &str) -> T {
    result.unwrap_or_else(|e| {
        log::error!("Failed to fetch {what} for {phone}: {e}");
        T::default()
    })
}

/// `GET /api/dashboard/worker/{phone}`
///
/// Everything the detail view shows for one worker. Alerts, messages and
/// the message count degrade to empty when their fetch fails.
pub async fn worker_detail(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let phone = path.into_inner();
    let gateway = state.gateway.as_ref();

    let worker = match queries::worker_by_phone(gateway, &phone, false).await {
        Ok(Some(worker)) => worker,
        Ok(None) => return HttpResponse::NotFound().json(ApiError::new("Worker not found")),
        Err(e) => {
            log::error!("Failed to fetch worker {phone}: {e}");
            return internal_error("Failed to fetch worker");
        }
    };

    let alert_filter = AlertFilter {
        resolved: None,
        phone_number: Some(phone.clone()),
    };
    let (alerts, messages, count) = tokio::join!(
        queries::distress_alerts(gateway, &alert_filter),
        queries::recent_messages(gateway, &phone, RECENT_MESSAGE_LIMIT),
        queries::message_count(gateway, &phone),
    );

    let avatar = AvatarIdentity::derive(worker.name.as_deref(), state.avatars);
    let detail = ApiWorkerDetail::new(
        worker,
        or_empty(alerts, "alerts", &phone),
        or_empty(messages, "messages", &phone),
        or_empty(count, "message count", &phone),
        avatar,
    );

    cached(WORKER_DETAIL_MAX_AGE).json(detail)
}
