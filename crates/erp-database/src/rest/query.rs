//! Rendering of backend-neutral queries into the hosted REST dialect.

use reqwest::Url;

use erp_core::types::{FilterField, FilterOp, FilterValue, SortField};

/// Append `column=op.value` pairs for every filter.
pub fn append_filters(url: &mut Url, filters: &[FilterField]) {
    let mut pairs = url.query_pairs_mut();
    for filter in filters {
        pairs.append_pair(&filter.field, &filter_expression(filter));
    }
}

/// `op.value` for one filter (`is.null` for null equality).
pub fn filter_expression(filter: &FilterField) -> String {
    match (&filter.op, &filter.value) {
        (FilterOp::Eq, FilterValue::Null) => "is.null".to_string(),
        (op, value) => format!("{}.{}", op.as_rest(), value),
    }
}

/// `order=` value: `col.dir` terms joined by commas.
pub fn order_expression(order: &[SortField]) -> Option<String> {
    if order.is_empty() {
        return None;
    }
    Some(
        order
            .iter()
            .map(|s| format!("{}.{}", s.field, s.direction.as_rest()))
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Total from a `Content-Range` header (`0-9/25`, `*/25`). `None` when the
/// total is unknown (`0-9/*`) or the header is malformed.
pub fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_expressions() {
        assert_eq!(
            filter_expression(&FilterField::contains("status", "pend")),
            "ilike.%pend%"
        );
        assert_eq!(filter_expression(&FilterField::eq("id", 7_i64)), "eq.7");
        assert_eq!(
            filter_expression(&FilterField::eq("tracking_code", FilterValue::Null)),
            "is.null"
        );
    }

    #[test]
    fn test_order_expression() {
        assert_eq!(order_expression(&[]), None);
        assert_eq!(
            order_expression(&[SortField::desc("data_pedido"), SortField::asc("id")]),
            Some("data_pedido.desc,id.asc".to_string())
        );
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-9/25"), Some(25));
        assert_eq!(parse_content_range("*/25"), Some(25));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn test_append_filters_encodes_values() {
        let mut url = Url::parse("https://x.example.co/rest/v1/pedidos").expect("url");
        append_filters(&mut url, &[FilterField::contains("status", "50%")]);
        assert_eq!(url.query(), Some("status=ilike.%2550%5C%25%25"));
    }
}
