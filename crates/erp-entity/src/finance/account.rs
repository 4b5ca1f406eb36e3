//! Bank account row (`contas_bancarias`).

use erp_core::traits::TableRow;
use erp_core::types::{BankAccountId, BankId, Embed, Selection, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::{NameRef, name_or_placeholder};

/// A bank account, with its bank's name embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Unique account identifier.
    pub id: BankAccountId,
    /// Account nickname.
    #[serde(rename = "nome")]
    pub name: String,
    /// Bank holding the account.
    #[serde(rename = "banco_id", default)]
    pub bank_id: Option<BankId>,
    /// Account number.
    #[serde(rename = "numero_conta")]
    pub account_number: String,
    /// Account type code (`corrente`, `poupanca`, ...).
    #[serde(rename = "tipo_conta")]
    pub account_type: String,
    /// Embedded bank name.
    #[serde(rename = "banco", default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<NameRef>,
}

impl BankAccount {
    /// Bank name or the placeholder.
    pub fn bank_name(&self) -> &str {
        name_or_placeholder(self.bank.as_ref())
    }

    /// Display label of the account type.
    pub fn account_type_label(&self) -> &str {
        account_type_label(&self.account_type)
    }
}

impl TableRow for BankAccount {
    const TABLE: &'static str = "contas_bancarias";
    type Id = BankAccountId;
    type New = NewBankAccount;
    type Patch = BankAccountPatch;

    fn selection() -> Selection {
        Selection::all().with_embed(Embed::new("banco", "bancos", "banco_id", &["nome"]))
    }

    fn default_order() -> Option<SortField> {
        Some(SortField::asc("nome"))
    }

    fn id(&self) -> BankAccountId {
        self.id
    }
}

/// Label for an account type code; unknown codes are shown as stored.
pub fn account_type_label(code: &str) -> &str {
    match code {
        "corrente" => "Conta Corrente",
        "poupanca" => "Conta Poupança",
        other => other,
    }
}

/// Data required to create a bank account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBankAccount {
    /// Account nickname.
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Bank holding the account.
    #[serde(rename = "banco_id")]
    #[validate(required(message = "Bank is required"))]
    pub bank_id: Option<BankId>,
    /// Account number.
    #[serde(rename = "numero_conta")]
    #[validate(length(min = 1, message = "Account number is required"))]
    pub account_number: String,
    /// Account type code.
    #[serde(rename = "tipo_conta")]
    #[validate(length(min = 1, message = "Account type is required"))]
    pub account_type: String,
}

/// Editable fields of a bank account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankAccountPatch {
    /// New nickname.
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New account number.
    #[serde(rename = "numero_conta", default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    /// New account type.
    #[serde(rename = "tipo_conta", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}
