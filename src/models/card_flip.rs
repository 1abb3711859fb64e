//! Card-flip API wire types.
//!
//! Request bodies, per-operation query parameters (with their defaults) and
//! the decoded response payloads. Loosely shaped payloads (pricing plans,
//! metrics, listings) stay as [`serde_json::Value`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::api_defaults;

// =============================================================================
// Request bodies
// =============================================================================

/// Body of `POST /trades/approve`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproveTrade {
    pub opportunity_id: i64,
    pub approved_buy_price: f64,
    pub approved_by: String,
    pub note: String,
}

impl ApproveTrade {
    pub fn new(opportunity_id: i64, approved_buy_price: f64) -> Self {
        Self {
            opportunity_id,
            approved_buy_price,
            approved_by: api_defaults::APPROVED_BY.to_string(),
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Body of `POST /trades/{id}/mark-listed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkListed {
    pub listing_url: String,
    pub note: String,
}

impl MarkListed {
    pub fn new(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            note: String::new(),
        }
    }
}

/// Body of `POST /trades/{id}/mark-sold`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkSold {
    pub sold_price: f64,
    pub note: String,
}

impl MarkSold {
    pub fn new(sold_price: f64) -> Self {
        Self {
            sold_price,
            note: String::new(),
        }
    }
}

// =============================================================================
// Query parameters
// =============================================================================

/// Filter for listing opportunities. `status: None` means all statuses.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOpportunities {
    pub status: Option<String>,
    pub limit: u32,
}

impl Default for ListOpportunities {
    fn default() -> Self {
        Self {
            status: Some(api_defaults::OPPORTUNITY_STATUS.to_string()),
            limit: api_defaults::LIST_LIMIT,
        }
    }
}

/// Filter for listing trades. `status: None` means all statuses.
#[derive(Debug, Clone, PartialEq)]
pub struct ListTrades {
    pub status: Option<String>,
    pub limit: u32,
}

impl Default for ListTrades {
    fn default() -> Self {
        Self {
            status: None,
            limit: api_defaults::LIST_LIMIT,
        }
    }
}

/// Parameters for applying one trade's pricing plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyPricingPlan {
    pub mode: String,
    pub note: String,
}

impl Default for ApplyPricingPlan {
    fn default() -> Self {
        Self {
            mode: api_defaults::PRICING_MODE.to_string(),
            note: api_defaults::APPLY_PLAN_NOTE.to_string(),
        }
    }
}

/// Parameters for batch repricing of open trades.
///
/// `apply: false` is a dry run: the backend reports plans without
/// updating prices.
#[derive(Debug, Clone, PartialEq)]
pub struct RepriceOpenTrades {
    pub mode: String,
    pub limit: u32,
    pub apply: bool,
    pub note: String,
}

impl Default for RepriceOpenTrades {
    fn default() -> Self {
        Self {
            mode: api_defaults::PRICING_MODE.to_string(),
            limit: api_defaults::REPRICE_LIMIT,
            apply: false,
            note: api_defaults::REPRICE_NOTE.to_string(),
        }
    }
}

/// Parameters for moving risk-blocked opportunities back to review.
#[derive(Debug, Clone, PartialEq)]
pub struct SendBlockedToReview {
    pub max_risk_score: f64,
    pub limit: u32,
    pub note: String,
}

impl Default for SendBlockedToReview {
    fn default() -> Self {
        Self {
            max_risk_score: f64::from(api_defaults::MAX_RISK_SCORE),
            limit: api_defaults::LIST_LIMIT,
            note: api_defaults::BATCH_REVIEW_NOTE.to_string(),
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// `{ items, count }` list envelope used by list endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemList<T> {
    pub items: Vec<T>,
    pub count: usize,
}

/// Result of an opportunity scan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanSummary {
    pub processed: u32,
    pub pending_review: u32,
    pub blocked_risk: u32,
    pub ignored: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Opportunity {
    pub opportunity_id: i64,
    pub listing_row_id: i64,
    pub title: String,
    pub list_price: Option<f64>,
    #[serde(default)]
    pub expected_sale_price: Option<f64>,
    #[serde(default)]
    pub suggested_list_price: Option<f64>,
    #[serde(default)]
    pub expected_profit: Option<f64>,
    #[serde(default)]
    pub roi: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
    pub status: String,
    #[serde(default)]
    pub risk_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trade {
    pub trade_id: i64,
    pub opportunity_id: i64,
    pub listing_row_id: i64,
    pub title: String,
    #[serde(default)]
    pub source_list_price: Option<f64>,
    #[serde(default)]
    pub approved_buy_price: Option<f64>,
    #[serde(default)]
    pub target_sell_price: Option<f64>,
    #[serde(default)]
    pub listing_url: Option<String>,
    #[serde(default)]
    pub sold_price: Option<f64>,
    pub status: String,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Acknowledgement of a trade approval.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeApproved {
    pub trade_id: i64,
    pub status: String,
    #[serde(default)]
    pub target_sell_price: Option<f64>,
}

/// Acknowledgement of a trade status change (listed / sold).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeStatus {
    pub trade_id: i64,
    pub status: String,
    #[serde(default)]
    pub sold_price: Option<f64>,
}

/// Acknowledgement of an opportunity status change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpportunityStatus {
    pub opportunity_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricingPlanReport {
    pub trade_id: i64,
    pub status: String,
    pub title: String,
    pub mode: String,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub active_trade_count: Option<u32>,
    pub plan: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricingPlanApplied {
    pub trade_id: i64,
    pub applied: bool,
    pub mode: String,
    pub action: String,
    #[serde(default)]
    pub recommended_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepriceReport {
    pub mode: String,
    pub apply: bool,
    pub processed: u32,
    pub updated: u32,
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchReviewReport {
    pub scanned: u32,
    pub eligible: u32,
    pub moved: u32,
    pub skipped_no_score: u32,
    pub max_risk_score: f64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_approve_trade_defaults() {
        let body = ApproveTrade::new(42, 88.5);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "opportunity_id": 42,
                "approved_buy_price": 88.5,
                "approved_by": "owner",
                "note": ""
            })
        );
    }

    #[test]
    fn test_param_defaults() {
        assert_eq!(
            ListOpportunities::default().status.as_deref(),
            Some("pending_review")
        );
        assert_eq!(ListOpportunities::default().limit, 200);
        assert_eq!(ListTrades::default().status, None);
        assert_eq!(RepriceOpenTrades::default().limit, 100);
        assert!(!RepriceOpenTrades::default().apply);
        assert_eq!(SendBlockedToReview::default().max_risk_score, 45.0);
    }

    #[test]
    fn test_trade_tolerates_nulls() {
        let trade: Trade = serde_json::from_value(json!({
            "trade_id": 1,
            "opportunity_id": 2,
            "listing_row_id": 3,
            "title": "Charizard holo",
            "source_list_price": 120.0,
            "approved_buy_price": 100.0,
            "target_sell_price": null,
            "listing_url": null,
            "sold_price": null,
            "status": "approved_for_buy",
            "approved_by": "owner",
            "note": "",
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00"
        }))
        .unwrap();
        assert_eq!(trade.target_sell_price, None);
        assert_eq!(trade.status, "approved_for_buy");
    }

    #[test]
    fn test_opportunity_list() {
        let list: ItemList<Opportunity> = serde_json::from_value(json!({
            "items": [{
                "opportunity_id": 9,
                "listing_row_id": 4,
                "title": "Pikachu promo",
                "list_price": 30.0,
                "expected_sale_price": 55.0,
                "suggested_list_price": 52.0,
                "expected_profit": 18.5,
                "roi": 0.61,
                "score": 0.8,
                "status": "pending_review",
                "risk_note": null
            }],
            "count": 1
        }))
        .unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.items[0].expected_profit, Some(18.5));
    }
}
