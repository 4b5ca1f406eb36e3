//! Backend-neutral description of a data query.
//!
//! Every backend (hosted REST API, direct Postgres, in-memory) receives the
//! same [`ListQuery`] and is responsible for rendering it in its own dialect.
//! Table and column names are identifiers, never values, so they are
//! checked with [`is_valid_identifier`] before a backend renders them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::result::AppResult;

use super::fetch::FetchParams;
use super::filter::FilterField;
use super::pagination::RowRange;
use super::sorting::SortField;

/// A to-one related row embedded into each result row.
///
/// `alias:table!foreign_key(columns)` in the hosted REST dialect; the row's
/// `foreign_key` column is matched against `table.id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Key under which the related row appears.
    pub alias: String,
    /// Related table.
    pub table: String,
    /// Column of the base row holding the related row's id.
    pub foreign_key: String,
    /// Columns of the related row to fetch.
    pub columns: Vec<String>,
}

impl Embed {
    /// Create an embed definition.
    pub fn new(
        alias: impl Into<String>,
        table: impl Into<String>,
        foreign_key: impl Into<String>,
        columns: &[&str],
    ) -> Self {
        Self {
            alias: alias.into(),
            table: table.into(),
            foreign_key: foreign_key.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Columns and embeds to select.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Base columns; empty means all columns.
    pub columns: Vec<String>,
    /// Related rows to embed.
    pub embeds: Vec<Embed>,
}

impl Selection {
    /// All base columns, no embeds.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an embed.
    pub fn with_embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    /// Render the `select=` parameter of the hosted REST dialect.
    pub fn to_rest(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.embeds.len());
        if self.columns.is_empty() {
            parts.push("*".to_string());
        } else {
            parts.push(self.columns.join(","));
        }
        for embed in &self.embeds {
            parts.push(format!(
                "{}:{}!{}({})",
                embed.alias,
                embed.table,
                embed.foreign_key,
                embed.columns.join(",")
            ));
        }
        parts.join(",")
    }

    fn validate(&self) -> AppResult<()> {
        for column in &self.columns {
            ensure_identifier(column)?;
        }
        for embed in &self.embeds {
            ensure_identifier(&embed.alias)?;
            ensure_identifier(&embed.table)?;
            ensure_identifier(&embed.foreign_key)?;
            for column in &embed.columns {
                ensure_identifier(column)?;
            }
        }
        Ok(())
    }
}

/// A read query: selection, AND-ed filters, ordering and an optional window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Table to read.
    pub table: String,
    /// Columns and embeds.
    pub selection: Selection,
    /// Conditions, all of which must hold.
    pub filters: Vec<FilterField>,
    /// Ordering, most significant first.
    pub order: Vec<SortField>,
    /// Row window; all rows when `None`.
    pub range: Option<RowRange>,
    /// Whether the exact total (ignoring `range`) is requested.
    pub count_exact: bool,
}

impl ListQuery {
    /// Select all columns of `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            selection: Selection::all(),
            filters: Vec::new(),
            order: Vec::new(),
            range: None,
            count_exact: false,
        }
    }

    /// Replace the selection.
    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Add a filter.
    pub fn filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add an ordering term.
    pub fn order(mut self, sort: SortField) -> Self {
        self.order.push(sort);
        self
    }

    /// Restrict to a row window.
    pub fn range(mut self, range: RowRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Request the exact total count.
    pub fn with_count(mut self) -> Self {
        self.count_exact = true;
        self
    }

    /// Build the query a list screen issues for its current parameters:
    /// exact count, one substring filter per non-empty entry, the explicit
    /// sort (or `default_order`), and the page window.
    pub fn from_fetch_params(
        table: impl Into<String>,
        selection: Selection,
        params: &FetchParams,
        default_order: Option<SortField>,
    ) -> Self {
        let mut query = Self::new(table).select(selection).with_count();
        query.filters = params.active_filters();
        if let Some(sort) = params.sort().or(default_order) {
            query.order.push(sort);
        }
        query.range(params.range())
    }

    /// Replace the substring filters on `columns` with exact matches on
    /// the integer typed into them. `None` when one of those patterns is
    /// not an integer, since no id can match it.
    pub fn match_keys(mut self, columns: &[&str], params: &FetchParams) -> Option<Self> {
        for filter in &mut self.filters {
            if !columns.contains(&filter.field.as_str()) {
                continue;
            }
            let id = params.filters.get(&filter.field)?.trim().parse::<i64>().ok()?;
            *filter = FilterField::eq(filter.field.clone(), id);
        }
        Some(self)
    }

    /// Reject identifiers that could not be a plain table or column name.
    pub fn validate(&self) -> AppResult<()> {
        ensure_identifier(&self.table)?;
        self.selection.validate()?;
        for filter in &self.filters {
            ensure_identifier(&filter.field)?;
        }
        for sort in &self.order {
            ensure_identifier(&sort.field)?;
        }
        Ok(())
    }
}

/// Rows returned by a read, plus the exact total when requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Result rows as JSON objects.
    pub rows: Vec<Value>,
    /// Total rows matching the filters, ignoring the window.
    pub total_count: Option<u64>,
}

/// A parent row and its child rows, written as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentChildInsert {
    /// Table of the parent row.
    pub parent_table: String,
    /// Parent row (without `id`).
    pub parent: Value,
    /// Table of the child rows.
    pub child_table: String,
    /// Child column that receives the parent's generated `id`.
    pub parent_key: String,
    /// Child rows (without `id` and `parent_key`).
    pub children: Vec<Value>,
}

impl ParentChildInsert {
    /// Check table and column names.
    pub fn validate(&self) -> AppResult<()> {
        ensure_identifier(&self.parent_table)?;
        ensure_identifier(&self.child_table)?;
        ensure_identifier(&self.parent_key)?;
        if !self.parent.is_object() {
            return Err(AppError::validation("Parent row must be a JSON object"));
        }
        if self.children.iter().any(|c| !c.is_object()) {
            return Err(AppError::validation("Child rows must be JSON objects"));
        }
        Ok(())
    }

    /// Child rows with `parent_key` set to `parent_id`.
    pub fn children_for(&self, parent_id: &Value) -> Vec<Value> {
        self.children
            .iter()
            .cloned()
            .map(|mut child| {
                if let Value::Object(map) = &mut child {
                    map.insert(self.parent_key.clone(), parent_id.clone());
                }
                child
            })
            .collect()
    }
}

/// Rows stored by a [`ParentChildInsert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentChildResult {
    /// Stored parent row, including its generated `id`.
    pub parent: Value,
    /// Stored child rows.
    pub children: Vec<Value>,
}

/// Whether `name` is a plain SQL identifier: ASCII letters, digits and
/// underscores, not starting with a digit.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validation error unless `name` is a plain identifier.
pub fn ensure_identifier(name: &str) -> AppResult<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(AppError::validation(format!("Invalid identifier '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sorting::SortDirection;
    use serde_json::json;

    #[test]
    fn test_match_keys_turns_id_filters_into_equality() {
        let params = FetchParams::new(10)
            .with_filter("status", "pend")
            .with_filter("fornecedor_id", " 4 ");
        let query = ListQuery::from_fetch_params("pedidos", Selection::all(), &params, None)
            .match_keys(&["fornecedor_id"], &params)
            .expect("numeric id");
        assert!(query.filters.contains(&FilterField::eq("fornecedor_id", 4_i64)));
        assert!(query.filters.contains(&FilterField::contains("status", "pend")));

        let params = FetchParams::new(10).with_filter("fornecedor_id", "acme");
        let query = ListQuery::from_fetch_params("pedidos", Selection::all(), &params, None);
        assert!(query.match_keys(&["fornecedor_id"], &params).is_none());
    }

    #[test]
    fn test_selection_to_rest() {
        let selection = Selection::all()
            .with_embed(Embed::new("banco", "bancos", "banco_id", &["nome"]))
            .with_embed(Embed::new(
                "bandeira",
                "bandeiras_cartao",
                "bandeira_id",
                &["nome"],
            ));
        assert_eq!(
            selection.to_rest(),
            "*,banco:bancos!banco_id(nome),bandeira:bandeiras_cartao!bandeira_id(nome)"
        );
    }

    #[test]
    fn test_from_fetch_params_orders_scenario() {
        let params = FetchParams::new(10)
            .sorted_by("data_pedido", SortDirection::Desc)
            .with_filter("status", "")
            .with_filter("fornecedor_id", "");
        let query = ListQuery::from_fetch_params("pedidos", Selection::all(), &params, None);
        assert!(query.count_exact);
        assert!(query.filters.is_empty());
        assert_eq!(query.order, vec![SortField::desc("data_pedido")]);
        assert_eq!(query.range, Some(RowRange { from: 0, to: 9 }));
    }

    #[test]
    fn test_from_fetch_params_uses_default_order_without_sort() {
        let params = FetchParams::new(5);
        let query = ListQuery::from_fetch_params(
            "bancos",
            Selection::all(),
            &params,
            Some(SortField::asc("nome")),
        );
        assert_eq!(query.order, vec![SortField::asc("nome")]);
    }

    #[test]
    fn test_filter_order_is_independent_of_insertion() {
        let a = FetchParams::new(10)
            .with_filter("status", "x")
            .with_filter("fornecedor_id", "1");
        let b = FetchParams::new(10)
            .with_filter("fornecedor_id", "1")
            .with_filter("status", "x");
        let qa = ListQuery::from_fetch_params("pedidos", Selection::all(), &a, None);
        let qb = ListQuery::from_fetch_params("pedidos", Selection::all(), &b, None);
        assert_eq!(qa, qb);
    }

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("data_pedido"));
        assert!(is_valid_identifier("_x1"));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier("nome; drop table"));
        assert!(!is_valid_identifier(""));
        let query = ListQuery::new("pedidos").order(SortField::asc("total desc"));
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_children_for_sets_parent_key() {
        let insert = ParentChildInsert {
            parent_table: "pedidos".into(),
            parent: json!({"status": "pending"}),
            child_table: "itens_pedido".into(),
            parent_key: "pedido_id".into(),
            children: vec![json!({"produto_id": 1}), json!({"produto_id": 2})],
        };
        let children = insert.children_for(&json!(99));
        assert!(children.iter().all(|c| c["pedido_id"] == json!(99)));
    }
}
