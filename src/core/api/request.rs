//! Request descriptors for the card-flip API.
//!
//! An [`ApiRequest`] is a plain value: method, path with identifiers already
//! substituted, query pairs and an optional JSON body. Operations build one
//! and hand it to a transport, which keeps every operation testable without
//! a browser.

use std::fmt;

use serde::Serialize;
use url::form_urlencoded;

/// Wire names of query parameters.
///
/// Multi-word parameters are snake_case on the wire regardless of how the
/// operation names them.
pub mod query_keys {
    pub const LIMIT: &str = "limit";
    pub const STATUS: &str = "status";
    pub const MODE: &str = "mode";
    pub const NOTE: &str = "note";
    pub const APPLY: &str = "apply";
    pub const MAX_RISK_SCORE: &str = "max_risk_score";
}

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Add a query parameter.
    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present.
    ///
    /// `None` leaves the key out of the query entirely.
    pub fn param_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Look up a query value by wire key.
    #[cfg(test)]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full URL against `base`, with the query string form-encoded.
    pub fn url(&self, base: &str) -> String {
        let mut url = format!("{}{}", base.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_query() {
        let req = ApiRequest::get("/trades/metrics-summary");
        assert_eq!(req.url("/card-api"), "/card-api/trades/metrics-summary");
        assert_eq!(req.url("/card-api/"), "/card-api/trades/metrics-summary");
    }

    #[test]
    fn test_url_encodes_query() {
        let req = ApiRequest::post("/opportunities/7/reject").param("note", "manual reject from ui");
        assert_eq!(
            req.url("https://api.example.com"),
            "https://api.example.com/opportunities/7/reject?note=manual+reject+from+ui"
        );
    }

    #[test]
    fn test_param_opt_omits_none() {
        let req = ApiRequest::get("/trades")
            .param("limit", 200)
            .param_opt::<&str>("status", None);
        assert_eq!(req.query, vec![("limit", "200".to_string())]);
        assert_eq!(req.query_value("status"), None);
        assert_eq!(req.url(""), "/trades?limit=200");
    }

    #[test]
    fn test_json_body() {
        #[derive(Serialize)]
        struct Body {
            sold_price: f64,
        }
        let req = ApiRequest::post("/trades/3/mark-sold")
            .json(&Body { sold_price: 12.5 })
            .unwrap();
        assert_eq!(req.body, Some(serde_json::json!({ "sold_price": 12.5 })));
        assert_eq!(req.method.to_string(), "POST");
    }
}
