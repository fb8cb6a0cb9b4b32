//! Fallback resolution of worker fields.
//!
//! A field's value is taken from the first source that has one, in this
//! order: the record's own column, the `survey_data` payload, then the
//! `survey_responses` payload. Empty or whitespace-only text counts as
//! missing.

use serde_json::Value;
use worker_dashboard_worker_models::{WorkerRecord, lenient::value_text};

/// A worker field that may be duplicated in the survey payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkerField {
    /// State or territory.
    State,
    /// Postcode.
    Postcode,
    /// Industry.
    Industry,
    /// Employer name.
    Employer,
    /// Visa type.
    VisaType,
}

impl WorkerField {
    /// All resolvable fields.
    pub const ALL: &[Self] = &[
        Self::State,
        Self::Postcode,
        Self::Industry,
        Self::Employer,
        Self::VisaType,
    ];

    /// Column name, also used as the key inside survey payloads.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Postcode => "postcode",
            Self::Industry => "industry",
            Self::Employer => "employer",
            Self::VisaType => "visa_type",
        }
    }

    const fn column(self, worker: &WorkerRecord) -> Option<&String> {
        match self {
            Self::State => worker.state.as_ref(),
            Self::Postcode => worker.postcode.as_ref(),
            Self::Industry => worker.industry.as_ref(),
            Self::Employer => worker.employer.as_ref(),
            Self::VisaType => worker.visa_type.as_ref(),
        }
    }
}

type Source = fn(&WorkerRecord, WorkerField) -> Option<String>;

fn from_column(worker: &WorkerRecord, field: WorkerField) -> Option<String> {
    field.column(worker).cloned()
}

fn from_survey_data(worker: &WorkerRecord, field: WorkerField) -> Option<String> {
    payload_text(worker.survey_data.as_ref(), field.key())
}

fn from_survey_responses(worker: &WorkerRecord, field: WorkerField) -> Option<String> {
    payload_text(worker.survey_responses.as_ref(), field.key())
}

/// Sources in priority order.
const SOURCES: &[Source] = &[from_column, from_survey_data, from_survey_responses];

fn payload_text(payload: Option<&Value>, key: &str) -> Option<String> {
    payload.and_then(|p| p.get(key)).and_then(value_text)
}

fn is_present(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Resolves `field` for `worker`, falling back through the survey
/// payloads.
#[must_use]
pub fn resolve(worker: &WorkerRecord, field: WorkerField) -> Option<String> {
    SOURCES
        .iter()
        .filter_map(|source| source(worker, field))
        .find(|v| is_present(v))
}

fn survey_payloads(worker: &WorkerRecord) -> impl Iterator<Item = &Value> {
    [worker.survey_data.as_ref(), worker.survey_responses.as_ref()]
        .into_iter()
        .flatten()
}

/// Looks up a survey-only key (e.g. `employer_rating`), preferring
/// `survey_data` over `survey_responses`.
#[must_use]
pub fn survey_value(worker: &WorkerRecord, key: &str) -> Option<Value> {
    survey_payloads(worker)
        .filter_map(|payload| payload.get(key))
        .find(|v| match v {
            Value::Null => false,
            Value::String(s) => is_present(s),
            _ => true,
        })
        .cloned()
}

/// Same as [`survey_value`] but restricted to scalar text.
#[must_use]
pub fn survey_text(worker: &WorkerRecord, key: &str) -> Option<String> {
    survey_payloads(worker)
        .filter_map(|payload| payload_text(Some(payload), key))
        .find(|v| is_present(v))
}

/// Every resolvable field of a worker, resolved once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    /// State or territory.
    pub state: Option<String>,
    /// Postcode.
    pub postcode: Option<String>,
    /// Industry.
    pub industry: Option<String>,
    /// Employer name.
    pub employer: Option<String>,
    /// Visa type.
    pub visa_type: Option<String>,
}

impl ResolvedFields {
    /// Resolves every field of `worker`.
    #[must_use]
    pub fn of(worker: &WorkerRecord) -> Self {
        Self {
            state: resolve(worker, WorkerField::State),
            postcode: resolve(worker, WorkerField::Postcode),
            industry: resolve(worker, WorkerField::Industry),
            employer: resolve(worker, WorkerField::Employer),
            visa_type: resolve(worker, WorkerField::VisaType),
        }
    }

    /// Whether both a postcode and a state were found.
    #[must_use]
    pub const fn has_location(&self) -> bool {
        self.postcode.is_some() && self.state.is_some()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn worker() -> WorkerRecord {
        WorkerRecord::new("61400000000")
    }

    #[test]
    fn column_wins() {
        let mut w = worker();
        w.state = Some("NSW".to_string());
        w.survey_data = Some(json!({"state": "VIC"}));
        w.survey_responses = Some(json!({"state": "QLD"}));
        assert_eq!(resolve(&w, WorkerField::State).as_deref(), Some("NSW"));
    }

    #[test]
    fn falls_back_to_survey_data() {
        let mut w = worker();
        w.survey_data = Some(json!({"postcode": "2607"}));
        w.survey_responses = Some(json!({"postcode": "3000"}));
        assert_eq!(resolve(&w, WorkerField::Postcode).as_deref(), Some("2607"));
    }

    #[test]
    fn falls_back_to_survey_responses() {
        let mut w = worker();
        w.survey_data = Some(json!({"postcode": null}));
        w.survey_responses = Some(json!({"industry": "Meat Processing"}));
        assert_eq!(
            resolve(&w, WorkerField::Industry).as_deref(),
            Some("Meat Processing")
        );
    }

    #[test]
    fn empty_text_is_missing() {
        let mut w = worker();
        w.employer = Some(String::new());
        w.survey_data = Some(json!({"employer": "  "}));
        w.survey_responses = Some(json!({"employer": "Farm Co"}));
        assert_eq!(resolve(&w, WorkerField::Employer).as_deref(), Some("Farm Co"));
    }

    #[test]
    fn numeric_survey_postcode() {
        let mut w = worker();
        w.survey_data = Some(json!({"postcode": 4000}));
        assert_eq!(resolve(&w, WorkerField::Postcode).as_deref(), Some("4000"));
    }

    #[test]
    fn missing_everywhere_is_none() {
        let mut w = worker();
        w.survey_data = Some(json!("not an object"));
        for field in WorkerField::ALL {
            assert_eq!(resolve(&w, *field), None, "{field:?}");
        }
        assert_eq!(ResolvedFields::of(&w), ResolvedFields::default());
    }

    #[test]
    fn visa_type_key() {
        let mut w = worker();
        w.survey_responses = Some(json!({"visa_type": "PALM"}));
        assert_eq!(resolve(&w, WorkerField::VisaType).as_deref(), Some("PALM"));
    }

    #[test]
    fn resolved_location() {
        let mut w = worker();
        w.postcode = Some("2607".to_string());
        assert!(!ResolvedFields::of(&w).has_location());
        w.survey_data = Some(json!({"state": "ACT"}));
        assert!(ResolvedFields::of(&w).has_location());
    }

    #[test]
    fn survey_lookup() {
        let mut w = worker();
        w.survey_data = Some(json!({"employer_rating": null, "feeling": "ok"}));
        w.survey_responses = Some(json!({"employer_rating": "4"}));
        assert_eq!(survey_value(&w, "employer_rating"), Some(json!("4")));
        assert_eq!(survey_text(&w, "feeling").as_deref(), Some("ok"));
        assert_eq!(survey_value(&w, "age_range"), None);
    }
}
