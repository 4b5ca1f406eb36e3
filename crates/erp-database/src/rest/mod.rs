//! Query backend over the hosted service's REST data API.

pub mod query;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use erp_core::error::{AppError, ErrorKind};
use erp_core::result::AppResult;
use erp_core::traits::QueryBackend;
use erp_core::types::query::ensure_identifier;
use erp_core::types::{
    FilterField, ListQuery, ParentChildInsert, ParentChildResult, QueryResult,
};

use crate::connection::{HostedClient, error_from_response};

use self::query::{append_filters, order_expression, parse_content_range};

/// [`QueryBackend`] speaking the hosted REST dialect (`/rest/v1/{table}`).
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: HostedClient,
    schema: String,
}

impl RestBackend {
    /// Create a backend on top of a configured client.
    pub fn new(client: HostedClient, schema: &str) -> Self {
        Self {
            client,
            schema: schema.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> AppResult<reqwest::Url> {
        ensure_identifier(table)?;
        self.client.endpoint(&format!("rest/v1/{table}"))
    }

    fn request(&self, method: Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        let profile_header = if method == Method::GET {
            "Accept-Profile"
        } else {
            "Content-Profile"
        };
        self.client
            .authorize(self.client.http().request(method, url))
            .header(profile_header, &self.schema)
    }

    async fn rows_from(response: reqwest::Response) -> AppResult<Vec<Value>> {
        let value: Value = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                "Backend returned an unreadable response",
                e,
            )
        })?;
        match value {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Ok(vec![other]),
        }
    }

    async fn write(
        &self,
        method: Method,
        table: &str,
        filters: &[FilterField],
        body: Option<Value>,
    ) -> AppResult<Vec<Value>> {
        let mut url = self.table_url(table)?;
        append_filters(&mut url, filters);
        let mut request = self
            .request(method.clone(), url)
            .header("Prefer", "return=representation");
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = self.client.send(request).await.inspect_err(|e| {
            warn!(table, method = %method, error = %e, "Backend write failed");
        })?;
        Self::rows_from(response).await
    }
}

#[async_trait]
impl QueryBackend for RestBackend {
    fn backend_type(&self) -> &str {
        "rest"
    }

    async fn health_check(&self) -> AppResult<bool> {
        let url = self.client.endpoint("rest/v1/")?;
        let response = self
            .client
            .authorize(self.client.http().get(url))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Backend health check failed", e)
            })?;
        Ok(response.status().is_success())
    }

    async fn select(&self, query: &ListQuery) -> AppResult<QueryResult> {
        query.validate()?;
        let mut url = self.table_url(&query.table)?;
        url.query_pairs_mut()
            .append_pair("select", &query.selection.to_rest());
        append_filters(&mut url, &query.filters);
        if let Some(order) = order_expression(&query.order) {
            url.query_pairs_mut().append_pair("order", &order);
        }

        let mut request = self.request(Method::GET, url);
        if let Some(range) = &query.range {
            request = request
                .header("Range-Unit", "items")
                .header("Range", range.header_value());
        }
        if query.count_exact {
            request = request.header("Prefer", "count=exact");
        }

        debug!(table = %query.table, range = ?query.range, "REST select");
        let response = request.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Backend request failed: {e}"),
                e,
            )
        })?;

        let total_count = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);

        // A window past the last row is answered with 416; it means "no rows".
        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(QueryResult {
                rows: Vec::new(),
                total_count,
            });
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let rows = Self::rows_from(response).await?;
        Ok(QueryResult {
            total_count: if query.count_exact { total_count } else { None },
            rows,
        })
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> AppResult<Vec<Value>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        self.write(Method::POST, table, &[], Some(Value::Array(rows)))
            .await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[FilterField],
        patch: Value,
    ) -> AppResult<Vec<Value>> {
        if filters.is_empty() {
            return Err(AppError::validation("Refusing to update without a filter"));
        }
        self.write(Method::PATCH, table, filters, Some(patch)).await
    }

    async fn delete(&self, table: &str, filters: &[FilterField]) -> AppResult<u64> {
        if filters.is_empty() {
            return Err(AppError::validation("Refusing to delete without a filter"));
        }
        let rows = self.write(Method::DELETE, table, filters, None).await?;
        Ok(rows.len() as u64)
    }

    async fn insert_with_children(
        &self,
        request: ParentChildInsert,
    ) -> AppResult<ParentChildResult> {
        request.validate()?;
        let parent = self
            .insert(&request.parent_table, vec![request.parent.clone()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::database("Backend did not return the inserted row"))?;
        let parent_id = parent
            .get("id")
            .cloned()
            .ok_or_else(|| AppError::database("Inserted row has no id"))?;

        let children = request.children_for(&parent_id);
        match self.insert(&request.child_table, children).await {
            Ok(children) => Ok(ParentChildResult { parent, children }),
            Err(err) => {
                // No cross-request transaction over REST: undo the header.
                let filter = [FilterField::eq("id", id_filter_value(&parent_id))];
                if let Err(undo) = self.delete(&request.parent_table, &filter).await {
                    error!(
                        table = %request.parent_table,
                        id = %parent_id,
                        error = %undo,
                        "Failed to remove parent row after child insert failure"
                    );
                }
                Err(err)
            }
        }
    }
}

fn id_filter_value(id: &Value) -> erp_core::types::FilterValue {
    use erp_core::types::FilterValue;
    match id {
        Value::Number(n) => n
            .as_i64()
            .map(FilterValue::Integer)
            .unwrap_or_else(|| FilterValue::String(n.to_string())),
        Value::String(s) => FilterValue::String(s.clone()),
        other => FilterValue::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::repositories::TableRepository;
    use erp_core::traits::Repository;
    use erp_entity::order::Order;
    use erp_core::types::{FetchParams, Selection, SortDirection};
    use httpmock::prelude::*;
    use serde_json::json;

    fn backend(server: &MockServer) -> RestBackend {
        let client =
            HostedClient::with_base_url(&server.base_url(), "anon", Duration::from_secs(5), None)
                .expect("client");
        RestBackend::new(client, "public")
    }

    #[tokio::test]
    async fn test_select_sends_range_count_and_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/pedidos")
                    .query_param("select", "*")
                    .query_param("status", "ilike.%pend%")
                    .query_param("order", "data_pedido.desc")
                    .header("range", "10-19")
                    .header("range-unit", "items")
                    .header("prefer", "count=exact")
                    .header("accept-profile", "public");
                then.status(206)
                    .header("content-range", "10-11/12")
                    .json_body(json!([{"id": 2}, {"id": 1}]));
            })
            .await;

        let params = FetchParams::new(10)
            .sorted_by("data_pedido", SortDirection::Desc)
            .with_filter("status", "pend")
            .at_page(1);
        let query = ListQuery::from_fetch_params("pedidos", Selection::all(), &params, None);
        let result = backend(&server).select(&query).await.expect("select");

        mock.assert_async().await;
        assert_eq!(result.total_count, Some(12));
        assert_eq!(result.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_select_past_last_page_is_empty_not_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/pedidos");
                then.status(416).header("content-range", "*/25");
            })
            .await;

        let params = FetchParams::new(10).at_page(7);
        let query = ListQuery::from_fetch_params("pedidos", Selection::all(), &params, None);
        let result = backend(&server).select(&query).await.expect("select");
        assert!(result.rows.is_empty());
        assert_eq!(result.total_count, Some(25));
    }

    #[tokio::test]
    async fn test_order_list_matches_supplier_id_exactly() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/pedidos")
                    .query_param("fornecedor_id", "eq.4")
                    .query_param("status", "ilike.%pend%");
                then.status(206)
                    .header("content-range", "0-0/1")
                    .json_body(json!([
                        {"id": 9, "status": "pending", "total": 5.0, "fornecedor_id": 4}
                    ]));
            })
            .await;

        let orders = TableRepository::<Order>::new(Arc::new(backend(&server)));
        let params = FetchParams::new(10)
            .with_filter("fornecedor_id", "4")
            .with_filter("status", "pend");
        let page = orders.list(&params).await.expect("list");

        mock.assert_async().await;
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_sum_reads_past_server_row_cap() {
        let server = MockServer::start_async().await;
        // The server answers at most two rows per request.
        let first = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/pedidos")
                    .query_param("select", "total")
                    .query_param("order", "id.asc")
                    .header("range", "0-999")
                    .header("prefer", "count=exact");
                then.status(206)
                    .header("content-range", "0-1/3")
                    .json_body(json!([{"total": 100.25}, {"total": 49.75}]));
            })
            .await;
        let rest = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/pedidos")
                    .header("range", "2-1001");
                then.status(206)
                    .header("content-range", "2-2/3")
                    .json_body(json!([{"total": 30.0}]));
            })
            .await;

        let total = backend(&server)
            .sum("pedidos", "total", &[])
            .await
            .expect("sum");

        first.assert_async().await;
        rest.assert_async().await;
        assert_eq!(total, 180.0);
    }

    #[tokio::test]
    async fn test_insert_with_children_compensates_on_child_failure() {
        let server = MockServer::start_async().await;
        let parent = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/pedidos")
                    .header("prefer", "return=representation");
                then.status(201)
                    .json_body(json!([{"id": 41, "status": "pending", "total": 20.0}]));
            })
            .await;
        let children = server
            .mock_async(|when, then| {
                when.method(POST).path("/rest/v1/itens_pedido");
                then.status(409).json_body(json!({
                    "code": "23503",
                    "message": "insert or update on table \"itens_pedido\" violates foreign key constraint"
                }));
            })
            .await;
        let undo = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/rest/v1/pedidos")
                    .query_param("id", "eq.41");
                then.status(200).json_body(json!([{"id": 41}]));
            })
            .await;

        let err = backend(&server)
            .insert_with_children(ParentChildInsert {
                parent_table: "pedidos".into(),
                parent: json!({"status": "pending", "total": 20.0}),
                child_table: "itens_pedido".into(),
                parent_key: "pedido_id".into(),
                children: vec![json!({"produto_id": 999, "quantidade": 1, "preco_unitario": 20.0})],
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        parent.assert_async().await;
        children.assert_async().await;
        undo.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_requires_filter() {
        let server = MockServer::start_async().await;
        let err = backend(&server)
            .update("pedidos", &[], json!({"status": "shipped"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_delete_counts_returned_rows() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/rest/v1/bancos")
                    .query_param("nome", "eq.Banco X");
                then.status(200).json_body(json!([{"id": 3, "nome": "Banco X"}]));
            })
            .await;
        let removed = backend(&server)
            .delete("bancos", &[FilterField::eq("nome", "Banco X")])
            .await
            .expect("delete");
        assert_eq!(removed, 1);
    }
}
