//! Display helpers shared by the list and detail screens.

use serde::{Deserialize, Serialize};

/// Placeholder shown when related data is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// An embedded related row of which only the name is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRef {
    /// The related row's `nome` column.
    pub nome: String,
}

/// Name of an optional embedded row, or [`NOT_AVAILABLE`].
pub fn name_or_placeholder(related: Option<&NameRef>) -> &str {
    related.map_or(NOT_AVAILABLE, |r| r.nome.as_str())
}

/// Format an amount as Brazilian reais with two decimals (`R$ 12.34`).
pub fn format_currency(amount: f64) -> String {
    format!("R$ {amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "R$ 1234.50");
        assert_eq!(format_currency(0.0), "R$ 0.00");
    }

    #[test]
    fn test_placeholder_for_missing_relation() {
        assert_eq!(name_or_placeholder(None), "N/A");
        let bank = NameRef {
            nome: "Banco do Brasil".into(),
        };
        assert_eq!(name_or_placeholder(Some(&bank)), "Banco do Brasil");
    }
}
