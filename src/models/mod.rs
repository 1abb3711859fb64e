//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`RouteTable`], [`ResolvedRoute`], [`RouteMeta`] - path-based navigation
//! - [`SessionState`], [`TokenEntry`] - registered tokens and selection
//! - card-flip API request/response types

mod card_flip;
mod route;
mod session;

pub use card_flip::{
    ApplyPricingPlan, ApproveTrade, BatchReviewReport, ItemList, ListOpportunities, ListTrades,
    MarkListed, MarkSold, Opportunity, OpportunityStatus, PricingPlanApplied, PricingPlanReport,
    RepriceOpenTrades, RepriceReport, ScanSummary, SendBlockedToReview, Trade, TradeApproved,
    TradeStatus,
};
pub use route::{
    ResolvedRoute, RouteMeta, RouteRecord, RouteTable, RouteTarget, TokenImportProps, ViewId,
};
pub use session::{SessionState, TokenEntry};
