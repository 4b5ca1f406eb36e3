//! Bank accounts and credit cards.

use std::sync::Arc;

use tracing::info;

use erp_core::result::AppResult;
use erp_core::traits::{QueryBackend, Repository};
use erp_database::TableRepository;
use erp_entity::finance::{
    Bank, BankAccount, CardNetwork, CreditCard, NewBankAccount, NewCreditCard,
};

use crate::context::RequestContext;

use super::lookup::NameCatalog;

/// Everything shown on the finance screen.
#[derive(Debug, Clone)]
pub struct FinanceService {
    /// Banks lookup.
    banks: NameCatalog<Bank>,
    /// Card networks lookup.
    networks: NameCatalog<CardNetwork>,
    /// Bank accounts.
    accounts: TableRepository<BankAccount>,
    /// Credit cards.
    cards: TableRepository<CreditCard>,
}

impl FinanceService {
    /// Creates a new finance service.
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            banks: NameCatalog::new(Arc::clone(&backend)),
            networks: NameCatalog::new(Arc::clone(&backend)),
            accounts: TableRepository::new(Arc::clone(&backend)),
            cards: TableRepository::new(backend),
        }
    }

    /// The banks dialog.
    pub fn banks(&self) -> &NameCatalog<Bank> {
        &self.banks
    }

    /// The card networks dialog.
    pub fn card_networks(&self) -> &NameCatalog<CardNetwork> {
        &self.networks
    }

    /// Bank accounts ordered by name, with bank names embedded.
    pub async fn list_accounts(&self) -> AppResult<Vec<BankAccount>> {
        self.accounts.find_where(&[], None).await
    }

    /// Registers a bank account.
    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        new: NewBankAccount,
    ) -> AppResult<BankAccount> {
        let account = self.accounts.insert(&new).await?;
        info!(account_id = %account.id, user_id = %ctx.user_id(), "Bank account created");
        Ok(account)
    }

    /// Credit cards ordered by name, with bank and network names embedded.
    pub async fn list_cards(&self) -> AppResult<Vec<CreditCard>> {
        self.cards.find_where(&[], None).await
    }

    /// Registers a credit card.
    pub async fn create_card(
        &self,
        ctx: &RequestContext,
        new: NewCreditCard,
    ) -> AppResult<CreditCard> {
        let card = self.cards.insert(&new).await?;
        info!(card_id = %card.id, user_id = %ctx.user_id(), "Credit card created");
        Ok(card)
    }
}
