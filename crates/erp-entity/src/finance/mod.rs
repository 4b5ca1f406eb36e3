//! Finance entities: banks, card networks, bank accounts and credit cards.

pub mod account;
pub mod bank;
pub mod card;

pub use account::{BankAccount, BankAccountPatch, NewBankAccount, account_type_label};
pub use bank::{Bank, BankPatch, CardNetwork, CardNetworkPatch, NewBank, NewCardNetwork};
pub use card::{CreditCard, CreditCardPatch, NewCreditCard};
