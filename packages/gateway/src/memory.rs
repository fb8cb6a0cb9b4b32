//! In-memory [`Gateway`] with PostgREST filter semantics.
//!
//! Used by handler tests and for running the server without a store.
//! Tables are plain vectors of JSON rows. Supported behaviour matches the
//! subset of PostgREST the dashboard uses: `eq`/`gte`/`lte` filters,
//! single-column ordering with PostgREST null placement, limits and
//! column projection.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{Direction, Filter, Gateway, GatewayError, Operator, RestQuery};

/// Status returned for tables marked as failing.
const FAILURE_STATUS: u16 = 503;

#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: RwLock<BTreeMap<String, Vec<Value>>>,
    failing: RwLock<BTreeSet<String>>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::insert`]. A poisoned lock is logged and the
    /// rows are dropped.
    #[must_use]
    pub fn with_table(self, table: &str, rows: Vec<Value>) -> Self {
        if let Err(e) = self.insert(table, rows) {
            log::error!("Failed to seed table {table}: {e}");
        }
        self
    }

    /// Appends rows to `table`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Poisoned`] if the table lock is poisoned.
    pub fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), GatewayError> {
        self.tables
            .write()
            .map_err(|_| GatewayError::Poisoned)?
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        Ok(())
    }

    /// Makes every later operation on `table` fail with HTTP 503.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Poisoned`] if the lock is poisoned.
    pub fn fail_table(&self, table: &str) -> Result<(), GatewayError> {
        self.failing
            .write()
            .map_err(|_| GatewayError::Poisoned)?
            .insert(table.to_string());
        Ok(())
    }

    /// A copy of every row in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Poisoned`] if the lock is poisoned.
    pub fn rows(&self, table: &str) -> Result<Vec<Value>, GatewayError> {
        Ok(self
            .tables
            .read()
            .map_err(|_| GatewayError::Poisoned)?
            .get(table)
            .cloned()
            .unwrap_or_default())
    }

    fn check_available(&self, table: &str) -> Result<(), GatewayError> {
        if self
            .failing
            .read()
            .map_err(|_| GatewayError::Poisoned)?
            .contains(table)
        {
            return Err(GatewayError::Status {
                status: FAILURE_STATUS,
                message: format!("{table} is unavailable"),
            });
        }
        Ok(())
    }

    fn matching(&self, query: &RestQuery) -> Result<Vec<Value>, GatewayError> {
        self.check_available(query.table_name())?;
        Ok(self
            .rows(query.table_name())?
            .into_iter()
            .filter(|row| query.filters().iter().all(|f| matches(row, f)))
            .collect())
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn fetch(&self, query: &RestQuery) -> Result<Vec<Value>, GatewayError> {
        let mut rows = self.matching(query)?;

        if let Some((column, direction)) = query.ordering() {
            sort_rows(&mut rows, column, direction);
        }
        if let Some(limit) = query.row_limit() {
            rows.truncate(limit);
        }

        Ok(rows
            .into_iter()
            .map(|row| project(row, query.columns()))
            .collect())
    }

    async fn count(&self, query: &RestQuery) -> Result<u64, GatewayError> {
        Ok(self.matching(query)?.len() as u64)
    }

    async fn update(&self, query: &RestQuery, patch: Value) -> Result<Vec<Value>, GatewayError> {
        self.check_available(query.table_name())?;

        let Value::Object(patch) = patch else {
            return Err(GatewayError::Decode {
                table: query.table_name().to_string(),
                message: "patch must be a JSON object".to_string(),
            });
        };

        let mut tables = self.tables.write().map_err(|_| GatewayError::Poisoned)?;
        let Some(rows) = tables.get_mut(query.table_name()) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in rows.iter_mut() {
            if !query.filters().iter().all(|f| matches(row, f)) {
                continue;
            }
            if let Value::Object(fields) = row {
                for (key, value) in &patch {
                    fields.insert(key.clone(), value.clone());
                }
            }
            updated.push(project(row.clone(), query.columns()));
        }

        Ok(updated)
    }
}

fn cell<'a>(row: &'a Value, column: &str) -> Option<&'a Value> {
    row.get(column).filter(|v| !v.is_null())
}

fn matches(row: &Value, filter: &Filter) -> bool {
    let Some(value) = cell(row, &filter.column) else {
        return false;
    };

    match filter.operator {
        Operator::Eq => values_equal(value, &filter.value),
        Operator::Gte => compare(value, &filter.value).is_some_and(Ordering::is_ge),
        Operator::Lte => compare(value, &filter.value).is_some_and(Ordering::is_le),
    }
}

/// JSON equality, except that a string compares equal to a number or
/// boolean with the same text, and numbers compare by value.
fn values_equal(value: &Value, expected: &Value) -> bool {
    match (value, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Number(_) | Value::Bool(_), Value::String(s))
        | (Value::String(s), Value::Number(_) | Value::Bool(_)) => {
            let other = if value.is_string() { expected } else { value };
            other.to_string() == *s
        }
        _ => value == expected,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Numeric comparison when both sides are numeric, lexical when both are
/// strings, otherwise incomparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Value::String(x), Value::String(y)) = (a, b) {
        return Some(x.cmp(y));
    }
    as_number(a)?.partial_cmp(&as_number(b)?)
}

/// Stable sort with nulls last ascending and first descending.
fn sort_rows(rows: &mut [Value], column: &str, direction: Direction) {
    rows.sort_by(|a, b| {
        let ascending = match (cell(a, column), cell(b, column)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => sort_key_cmp(x, y),
        };
        match direction {
            Direction::Asc => ascending,
            Direction::Desc => ascending.reverse(),
        }
    });
}

/// Total order for sorting: numbers, then strings, then booleans, then
/// everything else.
fn sort_key_cmp(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Number(_) => 0,
            Value::String(_) => 1,
            Value::Bool(_) => 2,
            _ => 3,
        }
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or(f64::NAN)
            .total_cmp(&y.as_f64().unwrap_or(f64::NAN)),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn project(row: Value, columns: Option<&str>) -> Value {
    let Some(columns) = columns.map(str::trim).filter(|c| *c != "*") else {
        return row;
    };
    let Value::Object(fields) = row else {
        return row;
    };

    let projected: Map<String, Value> = columns
        .split(',')
        .map(str::trim)
        .filter_map(|column| fields.get(column).map(|v| (column.to_string(), v.clone())))
        .collect();
    Value::Object(projected)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn gateway() -> MemoryGateway {
        MemoryGateway::new().with_table(
            "users",
            vec![
                json!({"id": 1, "name": "Ana", "state": "NSW", "rating": 4, "created_at": "2025-10-01"}),
                json!({"id": 2, "name": "Ben", "state": "VIC", "rating": 2, "created_at": "2025-10-03"}),
                json!({"id": 3, "name": "Cal", "state": "NSW", "rating": null, "created_at": "2025-10-02"}),
                json!({"id": 4, "name": "Dee", "state": "QLD", "rating": 5, "created_at": "2025-10-04"}),
            ],
        )
    }

    fn ids(rows: &[Value]) -> Vec<i64> {
        rows.iter().filter_map(|r| r["id"].as_i64()).collect()
    }

    #[tokio::test]
    async fn eq_filter() {
        let rows = gateway()
            .fetch(&RestQuery::table("users").eq("state", "NSW"))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![1, 3]);
    }

    #[tokio::test]
    async fn eq_matches_numbers_by_text() {
        let gateway = gateway();
        let rows = gateway
            .fetch(&RestQuery::table("users").eq("id", "2"))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![2]);

        let rows = gateway
            .fetch(&RestQuery::table("users").eq("id", 2.0))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![2]);
    }

    #[tokio::test]
    async fn range_filters_skip_nulls() {
        let rows = gateway()
            .fetch(&RestQuery::table("users").gte("rating", 3).lte("rating", 4.5))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![1]);
    }

    #[tokio::test]
    async fn ordering_places_nulls() {
        let gateway = gateway();
        let asc = gateway
            .fetch(&RestQuery::table("users").order("rating", Direction::Asc))
            .await
            .unwrap();
        assert_eq!(ids(&asc), vec![2, 1, 4, 3]);

        let desc = gateway
            .fetch(&RestQuery::table("users").order("rating", Direction::Desc))
            .await
            .unwrap();
        assert_eq!(ids(&desc), vec![3, 4, 1, 2]);
    }

    #[tokio::test]
    async fn order_limit_and_select() {
        let rows = gateway()
            .fetch(
                &RestQuery::table("users")
                    .select("id, name")
                    .order("created_at", Direction::Desc)
                    .limit(2),
            )
            .await
            .unwrap();
        assert_eq!(rows, vec![json!({"id": 4, "name": "Dee"}), json!({"id": 2, "name": "Ben"})]);
    }

    #[tokio::test]
    async fn fetch_one_and_count() {
        let gateway = gateway();
        let row = gateway
            .fetch_one(&RestQuery::table("users").eq("name", "Cal"))
            .await
            .unwrap();
        assert_eq!(row.unwrap()["id"], 3);

        let none = gateway
            .fetch_one(&RestQuery::table("users").eq("name", "Zed"))
            .await
            .unwrap();
        assert!(none.is_none());

        let count = gateway
            .count(&RestQuery::table("users").eq("state", "NSW").limit(1))
            .await
            .unwrap();
        assert_eq!(count, 2);

        assert_eq!(gateway.count(&RestQuery::table("missing")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_returns_changed_rows() {
        let gateway = gateway();
        let updated = gateway
            .update(&RestQuery::table("users").eq("id", 2), json!({"state": "TAS"}))
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["state"], "TAS");

        let rows = gateway
            .fetch(&RestQuery::table("users").eq("state", "TAS"))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![2]);

        let none = gateway
            .update(&RestQuery::table("users").eq("id", 99), json!({"state": "WA"}))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn failing_tables() {
        let gateway = gateway();
        gateway.fail_table("users").unwrap();
        let err = gateway.fetch(&RestQuery::table("users")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 503, .. }));
        assert!(gateway.count(&RestQuery::table("users")).await.is_err());
    }

    #[test]
    fn seeding_a_poisoned_gateway_reports_poisoned() {
        let gateway = MemoryGateway::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = gateway.tables.write().unwrap();
            panic!("poison the table lock");
        }));

        let gateway = gateway.with_table("users", vec![json!({"id": 1})]);
        assert!(matches!(gateway.rows("users"), Err(GatewayError::Poisoned)));
        assert!(matches!(
            gateway.insert("users", vec![json!({"id": 2})]),
            Err(GatewayError::Poisoned)
        ));
    }
}
