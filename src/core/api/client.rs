//! Typed client for the card-flip trading API.
//!
//! Each method builds an [`ApiRequest`] and passes it through
//! [`CardFlipApi::dispatch`], the single place where responses are decoded
//! and failures normalized. The client never retries, coalesces or cancels
//! calls; ordering is up to the caller.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::normalize::{decode_payload, normalize_failure};
use super::request::{ApiRequest, query_keys as key};
use super::transport::{FetchTransport, Transport};
use crate::config::{self, api_defaults};
use crate::core::error::ApiError;
use crate::models::{
    ApplyPricingPlan, ApproveTrade, BatchReviewReport, ItemList, ListOpportunities, ListTrades,
    MarkListed, MarkSold, Opportunity, OpportunityStatus, PricingPlanApplied, PricingPlanReport,
    RepriceOpenTrades, RepriceReport, ScanSummary, SendBlockedToReview, Trade, TradeApproved,
    TradeStatus,
};

/// Card-flip API client.
#[derive(Debug, Clone)]
pub struct CardFlipApi<T = FetchTransport> {
    base_url: String,
    transport: T,
}

impl CardFlipApi<FetchTransport> {
    /// Client against the build-time configured base URL.
    pub fn from_env() -> Self {
        Self::new(config::api_base_url(), FetchTransport::default())
    }
}

impl<T: Transport> CardFlipApi<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and decode its payload.
    pub async fn dispatch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let url = request.url(&self.base_url);
        tracing::debug!(method = %request.method, %url, "api request");

        match self.transport.send(&url, &request).await {
            Ok(body) => decode_payload(&body).inspect_err(|e| {
                tracing::warn!(%url, error = %e, "api response could not be decoded");
            }),
            Err(failure) => {
                let err = normalize_failure(&failure);
                tracing::warn!(
                    method = %request.method,
                    %url,
                    status = failure.response.as_ref().map(|r| r.status),
                    error = %err,
                    "api request failed"
                );
                Err(err)
            }
        }
    }

    fn with_body<B: serde::Serialize>(request: ApiRequest, body: &B) -> Result<ApiRequest, ApiError> {
        request
            .json(body)
            .map_err(|e| ApiError::new(e.to_string()))
    }

    // =========================================================================
    // Opportunities
    // =========================================================================

    /// Scan open listings for new opportunities.
    pub async fn scan_opportunities(&self, limit: Option<u32>) -> Result<ScanSummary, ApiError> {
        let limit = limit.unwrap_or(api_defaults::SCAN_LIMIT);
        self.dispatch(ApiRequest::post("/opportunities/scan").param(key::LIMIT, limit))
            .await
    }

    pub async fn list_opportunities(
        &self,
        filter: ListOpportunities,
    ) -> Result<ItemList<Opportunity>, ApiError> {
        self.dispatch(
            ApiRequest::get("/opportunities")
                .param_opt(key::STATUS, filter.status.filter(|s| !s.is_empty()))
                .param(key::LIMIT, filter.limit),
        )
        .await
    }

    pub async fn reject_opportunity(
        &self,
        opportunity_id: impl Display,
        note: Option<&str>,
    ) -> Result<OpportunityStatus, ApiError> {
        let note = note.unwrap_or(api_defaults::REJECT_NOTE);
        self.dispatch(
            ApiRequest::post(format!("/opportunities/{}/reject", opportunity_id))
                .param(key::NOTE, note),
        )
        .await
    }

    /// Override a risk block and send one opportunity to manual review.
    pub async fn send_opportunity_to_review(
        &self,
        opportunity_id: impl Display,
        note: Option<&str>,
    ) -> Result<OpportunityStatus, ApiError> {
        let note = note.unwrap_or(api_defaults::REVIEW_NOTE);
        self.dispatch(
            ApiRequest::post(format!("/opportunities/{}/send-to-review", opportunity_id))
                .param(key::NOTE, note),
        )
        .await
    }

    /// Send every blocked opportunity at or below `max_risk_score` to review.
    pub async fn send_blocked_to_review_batch(
        &self,
        params: SendBlockedToReview,
    ) -> Result<BatchReviewReport, ApiError> {
        self.dispatch(
            ApiRequest::post("/opportunities/send-to-review/batch")
                .param(key::MAX_RISK_SCORE, params.max_risk_score)
                .param(key::LIMIT, params.limit)
                .param(key::NOTE, params.note),
        )
        .await
    }

    // =========================================================================
    // Trades
    // =========================================================================

    pub async fn approve_trade(&self, payload: &ApproveTrade) -> Result<TradeApproved, ApiError> {
        let request = Self::with_body(ApiRequest::post("/trades/approve"), payload)?;
        self.dispatch(request).await
    }

    pub async fn list_trades(&self, filter: ListTrades) -> Result<ItemList<Trade>, ApiError> {
        self.dispatch(
            ApiRequest::get("/trades")
                .param(key::LIMIT, filter.limit)
                .param_opt(key::STATUS, filter.status.filter(|s| !s.is_empty())),
        )
        .await
    }

    pub async fn trade(&self, trade_id: impl Display) -> Result<Trade, ApiError> {
        self.dispatch(ApiRequest::get(format!("/trades/{}", trade_id)))
            .await
    }

    pub async fn mark_trade_listed(
        &self,
        trade_id: impl Display,
        payload: &MarkListed,
    ) -> Result<TradeStatus, ApiError> {
        let request = Self::with_body(
            ApiRequest::post(format!("/trades/{}/mark-listed", trade_id)),
            payload,
        )?;
        self.dispatch(request).await
    }

    pub async fn mark_trade_sold(
        &self,
        trade_id: impl Display,
        payload: &MarkSold,
    ) -> Result<TradeStatus, ApiError> {
        let request = Self::with_body(
            ApiRequest::post(format!("/trades/{}/mark-sold", trade_id)),
            payload,
        )?;
        self.dispatch(request).await
    }

    /// Compute (without applying) a pricing plan for one trade.
    pub async fn trade_pricing_plan(
        &self,
        trade_id: impl Display,
        mode: Option<&str>,
    ) -> Result<PricingPlanReport, ApiError> {
        let mode = mode.unwrap_or(api_defaults::PRICING_MODE);
        self.dispatch(
            ApiRequest::get(format!("/trades/{}/pricing-plan", trade_id)).param(key::MODE, mode),
        )
        .await
    }

    pub async fn apply_trade_pricing_plan(
        &self,
        trade_id: impl Display,
        params: ApplyPricingPlan,
    ) -> Result<PricingPlanApplied, ApiError> {
        self.dispatch(
            ApiRequest::post(format!("/trades/{}/apply-pricing-plan", trade_id))
                .param(key::MODE, params.mode)
                .param(key::NOTE, params.note),
        )
        .await
    }

    /// Reprice open trades; `apply: false` only reports the plans.
    pub async fn reprice_open_trades(
        &self,
        params: RepriceOpenTrades,
    ) -> Result<RepriceReport, ApiError> {
        self.dispatch(
            ApiRequest::post("/trades/reprice-open")
                .param(key::MODE, params.mode)
                .param(key::LIMIT, params.limit)
                .param(key::APPLY, params.apply)
                .param(key::NOTE, params.note),
        )
        .await
    }

    pub async fn metrics(&self) -> Result<Value, ApiError> {
        self.dispatch(ApiRequest::get("/trades/metrics-summary"))
            .await
    }

    // =========================================================================
    // Listings / service
    // =========================================================================

    /// Fetch a listing by its internal row id.
    pub async fn listing(&self, listing_row_id: impl Display) -> Result<Value, ApiError> {
        self.dispatch(ApiRequest::get(format!("/listings/{}", listing_row_id)))
            .await
    }

    pub async fn health(&self) -> Result<Value, ApiError> {
        self.dispatch(ApiRequest::get("/health")).await
    }
}
