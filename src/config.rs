//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the console.
//! Build-time values are read with `option_env!` so the bundle needs no
//! runtime configuration file.

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name, used as the document title suffix and fallback.
pub const APP_NAME: &str = "XYZW 游戏管理系统";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Network Configuration
// =============================================================================

/// Build-time API base URL override (`CARD_FLIP_API_BASE=https://...`).
const API_BASE_OVERRIDE: Option<&str> = option_env!("CARD_FLIP_API_BASE");

/// Relative API base used when no override is compiled in.
pub const DEFAULT_API_BASE: &str = "/card-api";

/// Request timeout in milliseconds for every card-flip API call.
pub const REQUEST_TIMEOUT_MS: u32 = 15_000;

/// Resolve the API base URL from build-time configuration.
///
/// Falls back to [`DEFAULT_API_BASE`] when the variable is unset or blank.
pub fn api_base_url() -> String {
    resolve_api_base(API_BASE_OVERRIDE)
}

fn resolve_api_base(configured: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|base| !base.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
}

// =============================================================================
// Logging
// =============================================================================

/// Build-time log filter (`LOG_LEVEL=debug`), in `EnvFilter` syntax.
pub const LOG_FILTER: Option<&str> = option_env!("LOG_LEVEL");

/// Filter used when `LOG_LEVEL` is not set at build time.
pub const DEFAULT_LOG_FILTER: &str = "info";

// =============================================================================
// Routing
// =============================================================================

/// Well-known route paths.
pub mod paths {
    /// Landing page.
    pub const HOME: &str = "/";
    /// Token management; the target of every token-gate redirect.
    pub const TOKEN_SETUP: &str = "/tokens";
    /// Default admin screen once a token is selected.
    pub const DASHBOARD: &str = "/admin/dashboard";
    /// Prefix shared by all admin screens.
    pub const ADMIN_PREFIX: &str = "/admin";
}

/// Upper bound on redirects followed for one navigation.
pub const MAX_REDIRECT_HOPS: usize = 8;

use serde::Deserialize;

use crate::models::{RouteMeta, RouteRecord};

/// Build-time generated routes as a JSON array
/// (`GENERATED_ROUTES='[{"path":"/reports","name":"Reports","title":"报表","requires_token":true}]'`).
const GENERATED_ROUTES: Option<&str> = option_env!("GENERATED_ROUTES");

#[derive(Debug, Deserialize)]
struct GeneratedRoute {
    path: String,
    name: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    requires_token: Option<bool>,
}

/// Routes generated outside the static table.
///
/// They are merged before the catch-all; paths and names must not collide
/// with static routes.
pub fn generated_routes() -> Vec<RouteRecord> {
    parse_generated_routes(GENERATED_ROUTES)
}

fn parse_generated_routes(json: Option<&str>) -> Vec<RouteRecord> {
    let Some(json) = json.map(str::trim).filter(|j| !j.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<GeneratedRoute>>(json) {
        Ok(routes) => routes
            .into_iter()
            .map(|r| {
                let meta = RouteMeta {
                    title: r.title,
                    requires_token: r.requires_token,
                };
                RouteRecord::generated(&r.path, &r.name, meta)
            })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed GENERATED_ROUTES");
            Vec::new()
        }
    }
}

// =============================================================================
// API Defaults
// =============================================================================

/// Default parameter values for card-flip operations.
pub mod api_defaults {
    /// Default `limit` for an opportunity scan.
    pub const SCAN_LIMIT: u32 = 100;
    /// Default `limit` for listing opportunities and trades.
    pub const LIST_LIMIT: u32 = 200;
    /// Default opportunity status filter.
    pub const OPPORTUNITY_STATUS: &str = "pending_review";
    /// Default pricing mode.
    pub const PRICING_MODE: &str = "balanced";
    /// Pricing modes accepted by the pricing endpoints.
    pub const PRICING_MODES: &[&str] = &["balanced", "fast_exit", "profit_max"];
    /// Default note for a single pricing-plan application.
    pub const APPLY_PLAN_NOTE: &str = "auto pricing plan";
    /// Default `limit` for batch repricing.
    pub const REPRICE_LIMIT: u32 = 100;
    /// Default note for batch repricing.
    pub const REPRICE_NOTE: &str = "batch auto pricing plan";
    /// Default note for rejecting an opportunity.
    pub const REJECT_NOTE: &str = "manual reject from ui";
    /// Default note for sending one opportunity to review.
    pub const REVIEW_NOTE: &str = "manual review override from ui";
    /// Default risk-score threshold for the batch review override.
    pub const MAX_RISK_SCORE: u32 = 45;
    /// Default note for the batch review override.
    pub const BATCH_REVIEW_NOTE: &str = "manual batch review override from ui";
    /// Default approver recorded on trade approval.
    pub const APPROVED_BY: &str = "owner";
}

// =============================================================================
// Storage Configuration
// =============================================================================

/// localStorage keys owned by the token store.
pub mod storage {
    /// Registered tokens (JSON array).
    pub const TOKENS_KEY: &str = "xyzw.tokens";
    /// Selected token id (plain string).
    pub const SELECTED_TOKEN_KEY: &str = "xyzw.selected_token";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_fallback() {
        assert_eq!(resolve_api_base(None), "/card-api");
        assert_eq!(resolve_api_base(Some("")), "/card-api");
        assert_eq!(resolve_api_base(Some("   ")), "/card-api");
    }

    #[test]
    fn test_generated_routes_parse() {
        assert!(parse_generated_routes(None).is_empty());
        assert!(parse_generated_routes(Some("  ")).is_empty());
        assert!(parse_generated_routes(Some("{not json")).is_empty());

        let routes = parse_generated_routes(Some(
            r#"[{"path": "/reports", "name": "Reports", "title": "报表", "requires_token": true},
                {"path": "/about", "name": "About"}]"#,
        ));
        assert_eq!(routes.len(), 2);
        assert_eq!(
            routes[0],
            RouteRecord::generated("/reports", "Reports", RouteMeta::new("报表", true))
        );
        assert_eq!(routes[1].meta, RouteMeta::default());
    }

    #[test]
    fn test_api_base_override() {
        assert_eq!(
            resolve_api_base(Some("https://api.example.com/card/")),
            "https://api.example.com/card"
        );
        assert_eq!(resolve_api_base(Some("/proxy")), "/proxy");
    }
}
