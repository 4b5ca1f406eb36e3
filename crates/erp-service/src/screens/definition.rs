//! Screen definitions.

use serde::Serialize;

use erp_core::traits::TableRow;
use erp_core::types::{FetchParams, Selection, SortField};
use erp_entity::finance::BankAccount;
use erp_entity::operations::{
    Complaint, InventoryMovement, MarketplaceQuestion, PurchaseOrder, SalesReturn,
};
use erp_entity::order::Order;
use erp_entity::partner::{Customer, Supplier};
use erp_entity::product::Product;

/// What a screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    /// Summary cards.
    Dashboard,
    /// A paginated table.
    List,
    /// Several small tables and dialogs.
    Finance,
}

/// Where a list screen reads its rows from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSource {
    /// Table read.
    pub table: &'static str,
    /// Columns and embeds.
    pub selection: Selection,
    /// Order used while no sort column is chosen.
    pub default_order: Option<SortField>,
    /// Filter columns matched by whole id.
    pub key_columns: &'static [&'static str],
}

impl ListSource {
    /// The table, selection and default order of `T`.
    pub fn of<T: TableRow>() -> Self {
        Self {
            table: T::TABLE,
            selection: T::selection(),
            default_order: T::default_order(),
            key_columns: T::key_columns(),
        }
    }
}

/// One entry of the navigation menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenDefinition {
    /// Stable key used in API paths.
    pub key: &'static str,
    /// Navigation path.
    pub path: &'static str,
    /// Menu title.
    pub title: &'static str,
    /// Screen layout.
    pub kind: ScreenKind,
    /// Rows shown by a list screen.
    pub source: Option<ListSource>,
    /// Columns offered as substring filters.
    pub filters: Vec<&'static str>,
    /// Initial sort column and direction, if the screen starts sorted.
    pub initial_sort: Option<SortField>,
    /// Rows per page; the console default when `None`.
    pub page_size: Option<u64>,
    /// Whether the screen only displays rows.
    pub read_only: bool,
}

impl ScreenDefinition {
    fn new(key: &'static str, path: &'static str, title: &'static str, kind: ScreenKind) -> Self {
        Self {
            key,
            path,
            title,
            kind,
            source: None,
            filters: Vec::new(),
            initial_sort: None,
            page_size: None,
            read_only: false,
        }
    }

    fn list<T: TableRow>(key: &'static str, path: &'static str, title: &'static str) -> Self {
        Self {
            source: Some(ListSource::of::<T>()),
            ..Self::new(key, path, title, ScreenKind::List)
        }
    }

    fn filtered(mut self, filters: &[&'static str]) -> Self {
        self.filters = filters.to_vec();
        self
    }

    fn sorted(mut self, sort: SortField) -> Self {
        self.initial_sort = Some(sort);
        self
    }

    fn paged(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Parameters a list screen starts with: first page, the screen's sort
    /// and an empty pattern for each filter column.
    pub fn initial_params(&self, default_page_size: u64) -> FetchParams {
        let mut params = FetchParams::new(self.page_size.unwrap_or(default_page_size));
        if let Some(sort) = &self.initial_sort {
            params = params.sorted_by(sort.field.clone(), sort.direction);
        }
        for column in &self.filters {
            params = params.with_filter(*column, "");
        }
        params
    }
}

/// Every screen of the console, in menu order.
pub fn console_screens() -> Vec<ScreenDefinition> {
    vec![
        ScreenDefinition::new("dashboard", "/", "Dashboard", ScreenKind::Dashboard),
        ScreenDefinition::list::<Product>("products", "/products", "Products")
            .filtered(&["nome", "sku"]),
        ScreenDefinition::list::<Order>("orders", "/orders", "Orders")
            .filtered(&["status", "fornecedor_id"])
            .sorted(SortField::desc("data_pedido"))
            .paged(10),
        ScreenDefinition::list::<Supplier>("suppliers", "/suppliers", "Suppliers")
            .filtered(&["nome"]),
        ScreenDefinition::list::<Customer>("customers", "/customers", "Customers")
            .filtered(&["name", "email"]),
        ScreenDefinition {
            source: Some(ListSource::of::<BankAccount>()),
            ..ScreenDefinition::new("finance", "/finance", "Finance", ScreenKind::Finance)
        },
        ScreenDefinition::list::<PurchaseOrder>(
            "purchase-order-tracker",
            "/purchase-order-tracker",
            "Purchase Order Tracker",
        )
        .filtered(&["status", "tracking_code"]),
        ScreenDefinition::list::<InventoryMovement>("inventory", "/inventory", "Inventory")
            .filtered(&["movement_type"])
            .read_only(),
        ScreenDefinition::list::<SalesReturn>("sales-returns", "/sales-returns", "Sales Returns")
            .filtered(&["status"])
            .read_only(),
        ScreenDefinition::list::<Complaint>("complaints", "/complaints", "Complaints")
            .filtered(&["status", "category"])
            .read_only(),
        ScreenDefinition::list::<MarketplaceQuestion>(
            "marketplace-questions",
            "/marketplace-questions",
            "Marketplace Questions",
        )
        .filtered(&["status"])
        .read_only(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use erp_core::types::SortDirection;

    #[test]
    fn test_menu_paths() {
        let paths: Vec<&str> = console_screens().iter().map(|s| s.path).collect();
        assert_eq!(
            paths,
            vec![
                "/",
                "/products",
                "/orders",
                "/suppliers",
                "/customers",
                "/finance",
                "/purchase-order-tracker",
                "/inventory",
                "/sales-returns",
                "/complaints",
                "/marketplace-questions",
            ]
        );
    }

    #[test]
    fn test_orders_initial_params() {
        let screens = console_screens();
        let orders = screens.iter().find(|s| s.key == "orders").expect("orders");
        let params = orders.initial_params(25);
        assert_eq!(params.page, 0);
        assert_eq!(params.page_size, 10);
        assert_eq!(params.sort_column.as_deref(), Some("data_pedido"));
        assert_eq!(params.sort_order, SortDirection::Desc);
        assert_eq!(params.filters.len(), 2);
        assert!(params.active_filters().is_empty());
    }

    #[test]
    fn test_read_only_screens_use_date_order() {
        let screens = console_screens();
        let inventory = screens.iter().find(|s| s.key == "inventory").expect("inventory");
        assert!(inventory.read_only);
        let source = inventory.source.as_ref().expect("source");
        assert_eq!(source.table, "inventory_movements");
        assert_eq!(source.default_order, Some(SortField::desc("movement_date")));
        assert_eq!(inventory.initial_params(25).page_size, 25);
    }
}
