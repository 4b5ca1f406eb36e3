//! In-process query backend.
//!
//! Tables are vectors of JSON objects keyed by an auto-assigned integer
//! `id`, all behind one lock. Filtering, ordering, windowing and embeds
//! follow the semantics of the hosted service (case-insensitive `ILIKE`,
//! `NULL`s sorting last in ascending order, inclusive row windows).
//! Reads and writes can be made to fail per table, which is how the
//! error paths of the screens are exercised in tests.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use erp_core::error::AppError;
use erp_core::result::AppResult;
use erp_core::traits::QueryBackend;
use erp_core::types::filter::ilike_matches;
use erp_core::types::query::ensure_identifier;
use erp_core::types::{
    FilterField, FilterOp, FilterValue, ListQuery, ParentChildInsert, ParentChildResult,
    QueryResult, Selection, SortDirection,
};

type Row = Map<String, Value>;

#[derive(Debug, Default)]
struct MemoryTable {
    rows: Vec<Row>,
    next_id: i64,
}

impl MemoryTable {
    fn assign_id(&mut self, row: &mut Row) {
        match row.get("id").and_then(Value::as_i64) {
            Some(id) => self.next_id = self.next_id.max(id),
            None => {
                self.next_id += 1;
                row.insert("id".to_string(), Value::from(self.next_id));
            }
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<String, MemoryTable>,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
}

impl MemoryState {
    fn check_read(&self, table: &str) -> AppResult<()> {
        if self.failing_reads.contains(table) {
            return Err(AppError::database(format!(
                "Simulated read failure on \"{table}\""
            )));
        }
        Ok(())
    }

    fn check_write(&self, table: &str) -> AppResult<()> {
        if self.failing_writes.contains(table) {
            return Err(AppError::database(format!(
                "Simulated write failure on \"{table}\""
            )));
        }
        Ok(())
    }

    fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map_or(&[], |t| t.rows.as_slice())
    }

    fn insert_rows(&mut self, table: &str, rows: Vec<Value>) -> Vec<Value> {
        let target = self.tables.entry(table.to_string()).or_default();
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let mut row = match row {
                Value::Object(map) => map,
                _ => continue,
            };
            target.assign_id(&mut row);
            stored.push(Value::Object(row.clone()));
            target.rows.push(row);
        }
        stored
    }

    fn project(&self, row: &Row, selection: &Selection) -> Value {
        let mut out = if selection.columns.is_empty() {
            row.clone()
        } else {
            selection
                .columns
                .iter()
                .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
                .collect()
        };
        for embed in &selection.embeds {
            let related = row.get(&embed.foreign_key).and_then(|fk| {
                self.rows(&embed.table)
                    .iter()
                    .find(|r| r.get("id").is_some_and(|id| json_eq(id, fk)))
            });
            let value = match related {
                Some(related) => Value::Object(
                    embed
                        .columns
                        .iter()
                        .map(|c| (c.clone(), related.get(c).cloned().unwrap_or(Value::Null)))
                        .collect(),
                ),
                None => Value::Null,
            };
            out.insert(embed.alias.clone(), value);
        }
        Value::Object(out)
    }
}

/// [`QueryBackend`] keeping every table in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
}

impl MemoryBackend {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows to `table`, assigning ids where missing.
    pub async fn seed(&self, table: &str, rows: Vec<Value>) -> Vec<Value> {
        self.state.write().await.insert_rows(table, rows)
    }

    /// Every row of `table`, in insertion order.
    pub async fn dump(&self, table: &str) -> Vec<Value> {
        self.state
            .read()
            .await
            .rows(table)
            .iter()
            .cloned()
            .map(Value::Object)
            .collect()
    }

    /// Make every read of `table` fail until [`clear_failures`](Self::clear_failures).
    pub async fn fail_reads_from(&self, table: &str) {
        self.state.write().await.failing_reads.insert(table.to_string());
    }

    /// Make every write to `table` fail until [`clear_failures`](Self::clear_failures).
    pub async fn fail_writes_to(&self, table: &str) {
        self.state.write().await.failing_writes.insert(table.to_string());
    }

    /// Remove all injected failures.
    pub async fn clear_failures(&self) {
        let mut state = self.state.write().await;
        state.failing_reads.clear();
        state.failing_writes.clear();
    }
}

#[async_trait]
impl QueryBackend for MemoryBackend {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn select(&self, query: &ListQuery) -> AppResult<QueryResult> {
        query.validate()?;
        let state = self.state.read().await;
        state.check_read(&query.table)?;
        for embed in &query.selection.embeds {
            state.check_read(&embed.table)?;
        }

        let mut matching: Vec<&Row> = state
            .rows(&query.table)
            .iter()
            .filter(|row| query.filters.iter().all(|f| row_matches(row, f)))
            .collect();
        let total = matching.len() as u64;

        if !query.order.is_empty() {
            matching.sort_by(|a, b| {
                query
                    .order
                    .iter()
                    .map(|sort| {
                        let ord = compare_nullable(a.get(&sort.field), b.get(&sort.field));
                        match sort.direction {
                            SortDirection::Asc => ord,
                            SortDirection::Desc => ord.reverse(),
                        }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let window: Vec<&Row> = match &query.range {
            Some(range) => matching
                .into_iter()
                .skip(range.offset() as usize)
                .take(range.limit() as usize)
                .collect(),
            None => matching,
        };

        debug!(table = %query.table, total, returned = window.len(), "Memory select");
        Ok(QueryResult {
            rows: window
                .into_iter()
                .map(|row| state.project(row, &query.selection))
                .collect(),
            total_count: query.count_exact.then_some(total),
        })
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> AppResult<Vec<Value>> {
        ensure_identifier(table)?;
        validate_objects(&rows)?;
        let mut state = self.state.write().await;
        state.check_write(table)?;
        Ok(state.insert_rows(table, rows))
    }

    async fn update(
        &self,
        table: &str,
        filters: &[FilterField],
        patch: Value,
    ) -> AppResult<Vec<Value>> {
        ensure_identifier(table)?;
        if filters.is_empty() {
            return Err(AppError::validation("Refusing to update without a filter"));
        }
        let Value::Object(patch) = patch else {
            return Err(AppError::validation("Patch must be a JSON object"));
        };
        let mut state = self.state.write().await;
        state.check_write(table)?;
        let Some(target) = state.tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let mut updated = Vec::new();
        for row in target
            .rows
            .iter_mut()
            .filter(|row| filters.iter().all(|f| row_matches(row, f)))
        {
            for (key, value) in &patch {
                row.insert(key.clone(), value.clone());
            }
            updated.push(Value::Object(row.clone()));
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        ensure_identifier(table)?;
        if filters.is_empty() {
            return Err(AppError::validation("Refusing to delete without a filter"));
        }
        let mut state = self.state.write().await;
        state.check_write(table)?;
        let Some(target) = state.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = target.rows.len();
        target
            .rows
            .retain(|row| !filters.iter().all(|f| row_matches(row, f)));
        Ok((before - target.rows.len()) as u64)
    }

    async fn insert_with_children(
        &self,
        request: ParentChildInsert,
    ) -> AppResult<ParentChildResult> {
        request.validate()?;
        let mut state = self.state.write().await;
        // Every check happens before the first mutation.
        state.check_write(&request.parent_table)?;
        state.check_write(&request.child_table)?;

        let parent = state
            .insert_rows(&request.parent_table, vec![request.parent.clone()])
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal("Parent row was not stored"))?;
        let parent_id = parent.get("id").cloned().unwrap_or(Value::Null);
        let children = state.insert_rows(&request.child_table, request.children_for(&parent_id));
        Ok(ParentChildResult { parent, children })
    }
}

fn validate_objects(rows: &[Value]) -> AppResult<()> {
    for row in rows {
        let Value::Object(map) = row else {
            return Err(AppError::validation("Rows must be JSON objects"));
        };
        map.keys().try_for_each(|k| ensure_identifier(k))?;
    }
    Ok(())
}

fn row_matches(row: &Row, filter: &FilterField) -> bool {
    let cell = row.get(&filter.field).unwrap_or(&Value::Null);
    match (&filter.op, &filter.value) {
        (FilterOp::Eq, FilterValue::Null) => cell.is_null(),
        (FilterOp::Eq, value) => json_eq(cell, &value.to_json()),
        (FilterOp::ILike, value) => match cell {
            Value::Null => false,
            Value::String(s) => ilike_matches(&value.to_string(), s),
            other => ilike_matches(&value.to_string(), &other.to_string()),
        },
    }
}

/// Equality with numbers compared by value (`1` equals `1.0`).
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.parse::<f64>().ok() == n.as_f64()
        }
        _ => a == b,
    }
}

/// Ascending order with `NULL` (or a missing column) after every value.
fn compare_nullable(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
