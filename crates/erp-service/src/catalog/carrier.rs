//! Carriers dialog.

use std::sync::Arc;

use validator::Validate;

use erp_core::result::AppResult;
use erp_core::traits::QueryBackend;
use erp_core::types::{CarrierId, SortField};
use erp_database::repositories::table::validation_error;
use erp_entity::partner::{Carrier, CarrierPatch, NewCarrier};

use crate::context::RequestContext;
use crate::entity::EntityService;

/// Lists, adds, edits and deletes carriers.
#[derive(Debug, Clone)]
pub struct CarrierService {
    carriers: EntityService<Carrier>,
}

impl CarrierService {
    /// Creates a new carrier service.
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self {
            carriers: EntityService::new(backend),
        }
    }

    /// Carriers ordered by name.
    pub async fn list(&self) -> AppResult<Vec<Carrier>> {
        self.carriers.all(Some(SortField::asc("nome"))).await
    }

    /// Adds a carrier with a trimmed, non-empty name.
    pub async fn add(&self, ctx: &RequestContext, mut new: NewCarrier) -> AppResult<Carrier> {
        new.name = new.name.trim().to_string();
        self.carriers.create(ctx, &new).await
    }

    /// Edits a carrier.
    pub async fn edit(
        &self,
        ctx: &RequestContext,
        id: CarrierId,
        mut patch: CarrierPatch,
    ) -> AppResult<Carrier> {
        patch.name = patch.name.map(|n| n.trim().to_string());
        patch.validate().map_err(validation_error)?;
        self.carriers.update(ctx, id, &patch).await
    }

    /// Deletes a carrier.
    pub async fn delete(&self, ctx: &RequestContext, id: CarrierId) -> AppResult<()> {
        self.carriers.delete(ctx, id).await
    }
}
