//! Finance screen: bank accounts, credit cards and their lookup tables.

pub mod lookup;
pub mod service;

pub use lookup::NameCatalog;
pub use service::FinanceService;
