//! Marketplace question row (`marketplace_questions`).

use chrono::{DateTime, Utc};
use erp_core::traits::TableRow;
use erp_core::types::{MarketplaceId, MarketplaceQuestionId, ProductId, SortField};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A buyer question received on a marketplace listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceQuestion {
    /// Unique identifier.
    pub id: MarketplaceQuestionId,
    /// Marketplace the question came from.
    #[serde(default)]
    pub marketplace_id: Option<MarketplaceId>,
    /// Product asked about.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// When the question was asked.
    #[serde(default)]
    pub question_date: Option<DateTime<Utc>>,
    /// Question text.
    pub question: String,
    /// Answer status.
    pub status: String,
    /// When it was answered.
    #[serde(default)]
    pub answer_date: Option<DateTime<Utc>>,
    /// Answer text.
    #[serde(default)]
    pub answer: Option<String>,
}

impl TableRow for MarketplaceQuestion {
    const TABLE: &'static str = "marketplace_questions";
    type Id = MarketplaceQuestionId;
    type New = NewMarketplaceQuestion;
    type Patch = MarketplaceQuestionPatch;

    fn default_order() -> Option<SortField> {
        Some(SortField::desc("question_date"))
    }

    fn id(&self) -> MarketplaceQuestionId {
        self.id
    }
}

/// Data required to record a question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMarketplaceQuestion {
    /// Marketplace the question came from.
    pub marketplace_id: MarketplaceId,
    /// Product asked about.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// When the question was asked.
    pub question_date: DateTime<Utc>,
    /// Question text.
    #[validate(length(min = 1, message = "Question is required"))]
    pub question: String,
    /// Answer status.
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

/// Editable fields of a question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceQuestionPatch {
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Answer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// When it was answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_date: Option<DateTime<Utc>>,
}
