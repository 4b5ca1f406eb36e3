//! Credit card row (`cartoes_credito`).

use erp_core::traits::TableRow;
use erp_core::types::{BankId, CardNetworkId, CreditCardId, Embed, Selection, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::{NameRef, name_or_placeholder};

/// A company credit card, with bank and network names embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    /// Unique card identifier.
    pub id: CreditCardId,
    /// Card nickname.
    #[serde(rename = "nome")]
    pub name: String,
    /// Last four digits.
    #[serde(rename = "numero_final")]
    pub last_digits: String,
    /// Expiry as printed on the card (`MM/YY`).
    #[serde(rename = "data_expiracao")]
    pub expiration: String,
    /// Card network.
    #[serde(rename = "bandeira_id", default)]
    pub network_id: Option<CardNetworkId>,
    /// Issuing bank.
    #[serde(rename = "banco_id", default)]
    pub bank_id: Option<BankId>,
    /// Embedded bank name.
    #[serde(rename = "banco", default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<NameRef>,
    /// Embedded network name.
    #[serde(rename = "bandeira", default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NameRef>,
}

impl CreditCard {
    /// Bank name or the placeholder.
    pub fn bank_name(&self) -> &str {
        name_or_placeholder(self.bank.as_ref())
    }

    /// Network name or the placeholder.
    pub fn network_name(&self) -> &str {
        name_or_placeholder(self.network.as_ref())
    }
}

impl TableRow for CreditCard {
    const TABLE: &'static str = "cartoes_credito";
    type Id = CreditCardId;
    type New = NewCreditCard;
    type Patch = CreditCardPatch;

    fn selection() -> Selection {
        Selection::all()
            .with_embed(Embed::new("banco", "bancos", "banco_id", &["nome"]))
            .with_embed(Embed::new(
                "bandeira",
                "bandeiras_cartao",
                "bandeira_id",
                &["nome"],
            ))
    }

    fn default_order() -> Option<SortField> {
        Some(SortField::asc("nome"))
    }

    fn id(&self) -> CreditCardId {
        self.id
    }
}

/// Data required to register a credit card.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCreditCard {
    /// Card nickname.
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Last four digits.
    #[serde(rename = "numero_final")]
    #[validate(length(equal = 4, message = "Exactly four digits are required"))]
    pub last_digits: String,
    /// Expiry (`MM/YY`).
    #[serde(rename = "data_expiracao")]
    #[validate(length(min = 1, message = "Expiration is required"))]
    pub expiration: String,
    /// Card network.
    #[serde(rename = "bandeira_id")]
    #[validate(required(message = "Card network is required"))]
    pub network_id: Option<CardNetworkId>,
    /// Issuing bank.
    #[serde(rename = "banco_id")]
    #[validate(required(message = "Bank is required"))]
    pub bank_id: Option<BankId>,
}

/// Editable fields of a credit card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditCardPatch {
    /// New nickname.
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New expiry.
    #[serde(rename = "data_expiracao", default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_selection_embeds_bank_and_network() {
        let select = CreditCard::selection().to_rest();
        assert!(select.contains("banco:bancos!banco_id(nome)"));
        assert!(select.contains("bandeira:bandeiras_cartao!bandeira_id(nome)"));
    }

    #[test]
    fn test_last_digits_length() {
        let card = NewCreditCard {
            name: "Corporativo".into(),
            last_digits: "123".into(),
            expiration: "12/27".into(),
            network_id: Some(CardNetworkId::new(1)),
            bank_id: Some(BankId::new(1)),
        };
        assert!(card.validate().is_err());
    }
}
