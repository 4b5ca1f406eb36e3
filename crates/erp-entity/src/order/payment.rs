//! Payment methods accepted on an order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an order is paid (`meio_pagamento`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Charged to one of the registered credit cards.
    CreditCard,
    /// Paid from one of the registered bank accounts.
    BankTransfer,
    /// Paid in cash.
    Cash,
}

impl PaymentMethod {
    /// Return the value stored in the `meio_pagamento` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::BankTransfer => "bank_transfer",
            Self::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
