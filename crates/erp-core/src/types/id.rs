//! Newtype wrappers for row identifiers.
//!
//! The hosted schema keys every table by a `bigint` identity column, so
//! each entity gets a distinct `i64` wrapper. This prevents passing a
//! `SupplierId` where a `CarrierId` is expected when building the
//! `fornecedor_id` / `transportadora_id` columns of an order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::filter::FilterValue;

/// Macro to define a newtype ID wrapper around an `i64` primary key.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw key.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Return the raw key.
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl From<$name> for FilterValue {
            fn from(id: $name) -> FilterValue {
                FilterValue::Integer(id.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a purchase order header (`pedidos`).
    OrderId
);

define_id!(
    /// Identifier of an order line item (`itens_pedido`).
    OrderItemId
);

define_id!(
    /// Identifier of a product (`produtos`).
    ProductId
);

define_id!(
    /// Identifier of a supplier (`fornecedores`).
    SupplierId
);

define_id!(
    /// Identifier of a carrier (`carriers`).
    CarrierId
);

define_id!(
    /// Identifier of a customer.
    CustomerId
);

define_id!(
    /// Identifier of a bank (`bancos`).
    BankId
);

define_id!(
    /// Identifier of a card network (`bandeiras_cartao`).
    CardNetworkId
);

define_id!(
    /// Identifier of a bank account (`contas_bancarias`).
    BankAccountId
);

define_id!(
    /// Identifier of a credit card (`cartoes_credito`).
    CreditCardId
);

define_id!(
    /// Identifier of an inventory movement.
    InventoryMovementId
);

define_id!(
    /// Identifier of a tracked purchase order.
    PurchaseOrderId
);

define_id!(
    /// Identifier of a sales order return.
    SalesReturnId
);

define_id!(
    /// Identifier of a customer complaint.
    ComplaintId
);

define_id!(
    /// Identifier of a marketplace question.
    MarketplaceQuestionId
);

define_id!(
    /// Identifier of a marketplace.
    MarketplaceId
);

/// Identifier of an authenticated user, issued by the auth service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create an identifier from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Return the inner UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
