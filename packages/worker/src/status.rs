//! Worker wellbeing classification.

use serde_json::Value;
use worker_dashboard_worker_models::{DistressAlert, WorkerRecord, WorkerStatus};

use crate::fields::survey_value;

/// Open alerts at or above this count make a worker critical.
pub const CRITICAL_ALERT_COUNT: usize = 3;

/// Ratings at or below this value need attention.
pub const POOR_RATING: i64 = 2;

/// Ratings at or above this value are positive.
pub const GOOD_RATING: i64 = 4;

/// Valid employer ratings.
pub const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Classifies a worker from their open alert count and employer rating.
///
/// Rules are checked in order and the first match wins:
///
/// 1. three or more open alerts: [`WorkerStatus::Critical`]
/// 2. any open alert, or a rating of 2 or lower: [`WorkerStatus::NeedsAttention`]
/// 3. a rating of 4 or higher: [`WorkerStatus::Positive`]
/// 4. otherwise: [`WorkerStatus::Neutral`]
///
/// Ratings outside 1-5 are treated as if no rating was given.
#[must_use]
pub fn classify(unresolved_alerts: usize, employer_rating: Option<i64>) -> WorkerStatus {
    let rating = employer_rating.filter(|r| RATING_RANGE.contains(r));

    if unresolved_alerts >= CRITICAL_ALERT_COUNT {
        WorkerStatus::Critical
    } else if unresolved_alerts > 0 || rating.is_some_and(|r| r <= POOR_RATING) {
        WorkerStatus::NeedsAttention
    } else if rating.is_some_and(|r| r >= GOOD_RATING) {
        WorkerStatus::Positive
    } else {
        WorkerStatus::Neutral
    }
}

/// Number of alerts not yet marked resolved.
#[must_use]
pub fn unresolved_count(alerts: &[DistressAlert]) -> usize {
    alerts.iter().filter(|a| !a.resolved).count()
}

/// Reads a rating the way a lenient integer parse would: JSON numbers are
/// truncated, strings yield their leading (optionally signed) digits and
/// ignore anything after them. Everything else is `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_rating(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..digits_end].parse::<i64>().ok().map(|n| sign * n)
}

/// The employer rating a worker reported in their survey, if any.
#[must_use]
pub fn employer_rating(worker: &WorkerRecord) -> Option<i64> {
    survey_value(worker, "employer_rating").as_ref().and_then(parse_rating)
}

/// Classifies `worker` given their alerts.
#[must_use]
pub fn worker_status(worker: &WorkerRecord, alerts: &[DistressAlert]) -> WorkerStatus {
    classify(unresolved_count(alerts), employer_rating(worker))
}
