#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Worker, distress alert and status types for the worker dashboard.
//!
//! These are the row shapes read from the hosted store. Every nullable
//! column is an `Option` and every column whose JSON type drifts between
//! rows goes through a tolerant adapter in [`lenient`], so a sparse or
//! oddly typed row still decodes.

pub mod keywords;
pub mod lenient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

pub use keywords::{KeywordPayload, normalize_keywords};

/// A registered (or partially registered) worker as stored in `users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Phone number; the worker's identity.
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone_number: String,
    /// Display name.
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    /// Country of origin.
    #[serde(default, deserialize_with = "lenient::text")]
    pub country: Option<String>,
    /// Australian state or territory of work.
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    /// Postcode of work.
    #[serde(default, deserialize_with = "lenient::text")]
    pub postcode: Option<String>,
    /// Industry of work.
    #[serde(default, deserialize_with = "lenient::text")]
    pub industry: Option<String>,
    /// Employer name.
    #[serde(default, deserialize_with = "lenient::text")]
    pub employer: Option<String>,
    /// Visa type.
    #[serde(default, deserialize_with = "lenient::text")]
    pub visa_type: Option<String>,
    /// When the worker first messaged.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the record last changed.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether the registration conversation finished.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub registration_complete: bool,
    /// Primary survey payload (free-form JSON object).
    #[serde(default)]
    pub survey_data: Option<Value>,
    /// Secondary survey payload (free-form JSON object).
    #[serde(default)]
    pub survey_responses: Option<Value>,
}

impl WorkerRecord {
    /// Creates an otherwise empty record for `phone_number`.
    #[must_use]
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            ..Self::default()
        }
    }
}

/// A distress alert raised from a worker's messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistressAlert {
    /// Alert ID.
    pub id: i64,
    /// Phone number of the worker who raised it.
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone_number: String,
    /// Worker name (joined in by the alerts view).
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    /// Worker country (joined in by the alerts view).
    #[serde(default, deserialize_with = "lenient::text")]
    pub country: Option<String>,
    /// Worker state (joined in by the alerts view).
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    /// Worker employer (joined in by the alerts view).
    #[serde(default, deserialize_with = "lenient::text")]
    pub employer: Option<String>,
    /// Message that triggered the alert.
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
    /// Keywords that triggered the alert, normalized at decode time.
    #[serde(default, deserialize_with = "keywords::deserialize_keywords")]
    pub keywords_detected: Vec<String>,
    /// Whether a case worker has handled it.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub resolved: bool,
    /// When the alert was raised.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Hours elapsed since the alert was raised.
    #[serde(default, deserialize_with = "lenient::number")]
    pub hours_since_alert: f64,
}

/// Qualitative wellbeing status derived from alerts and employer rating.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkerStatus {
    /// Good employer rating and no open alerts.
    Positive,
    /// Nothing notable either way.
    Neutral,
    /// An open alert or a poor employer rating.
    NeedsAttention,
    /// Three or more open alerts.
    Critical,
}

/// One message from a worker's conversation history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// `"user"` or `"assistant"`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    /// Message text.
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: String,
    /// When the message was sent.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_sparse_worker() {
        let worker: WorkerRecord = serde_json::from_value(json!({
            "phone_number": "61400000000",
            "name": null,
            "postcode": 2607,
            "survey_data": {"state": "ACT"}
        }))
        .unwrap();
        assert_eq!(worker.phone_number, "61400000000");
        assert_eq!(worker.name, None);
        assert_eq!(worker.postcode.as_deref(), Some("2607"));
        assert_eq!(worker.state, None);
        assert!(!worker.registration_complete);
        assert_eq!(worker.survey_data, Some(json!({"state": "ACT"})));
    }

    #[test]
    fn decodes_full_worker() {
        let worker: WorkerRecord = serde_json::from_value(json!({
            "phone_number": "61406778531",
            "name": "Jovi",
            "country": "Fiji",
            "state": "Australian Capital Terri",
            "postcode": "2607",
            "industry": "Aged Care",
            "employer": "Uniting Age Care",
            "visa_type": "Pacific Labour Schem",
            "created_at": "2025-10-25T13:51:41.569839+00:00",
            "updated_at": "2025-11-08T10:23:20.133563+00:00",
            "registration_complete": true
        }))
        .unwrap();
        assert_eq!(worker.country.as_deref(), Some("Fiji"));
        assert!(worker.created_at.is_some());
        assert!(worker.updated_at.is_some());
        assert!(worker.registration_complete);
    }

    #[test]
    fn decodes_alert_with_encoded_keywords() {
        let alert: DistressAlert = serde_json::from_value(json!({
            "id": 7,
            "phone_number": "61400000000",
            "message": "I need help",
            "keywords_detected": "[\"help\"]",
            "resolved": false,
            "timestamp": "2025-11-01T00:00:00+00:00",
            "hours_since_alert": "12.5"
        }))
        .unwrap();
        assert_eq!(alert.keywords_detected, vec!["help"]);
        assert!((alert.hours_since_alert - 12.5).abs() < 1e-9);
        assert!(!alert.resolved);
    }

    #[test]
    fn nulls_read_as_defaults() {
        let worker: WorkerRecord = serde_json::from_value(json!({
            "phone_number": null,
            "name": null,
            "country": 679,
            "registration_complete": null
        }))
        .unwrap();
        assert_eq!(worker.phone_number, "");
        assert_eq!(worker.country.as_deref(), Some("679"));
        assert!(!worker.registration_complete);

        let alert: DistressAlert = serde_json::from_value(json!({
            "id": 3,
            "phone_number": null,
            "message": null,
            "resolved": null
        }))
        .unwrap();
        assert_eq!(alert.phone_number, "");
        assert_eq!(alert.message, "");
        assert!(!alert.resolved);

        let message: ConversationMessage =
            serde_json::from_value(json!({"role": null, "content": null, "timestamp": null}))
                .unwrap();
        assert_eq!(message, ConversationMessage::default());
    }

    #[test]
    fn text_flags() {
        let worker: WorkerRecord = serde_json::from_value(json!({
            "phone_number": "61400000000",
            "registration_complete": "true"
        }))
        .unwrap();
        assert!(worker.registration_complete);

        let alert: DistressAlert =
            serde_json::from_value(json!({"id": 4, "resolved": "false"})).unwrap();
        assert!(!alert.resolved);
    }

    #[test]
    fn alert_serializes_canonical_keywords() {
        let alert: DistressAlert = serde_json::from_value(json!({
            "id": 1,
            "keywords_detected": {"a": "unsafe"}
        }))
        .unwrap();
        let out = serde_json::to_value(&alert).unwrap();
        assert_eq!(out["keywords_detected"], json!(["unsafe"]));
    }

    #[test]
    fn status_names() {
        assert_eq!(WorkerStatus::NeedsAttention.to_string(), "needs_attention");
        assert_eq!(
            serde_json::to_value(WorkerStatus::Critical).unwrap(),
            json!("critical")
        );
        assert_eq!(
            "positive".parse::<WorkerStatus>().unwrap(),
            WorkerStatus::Positive
        );
    }
}
