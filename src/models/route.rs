//! Route table for path-based navigation.
//!
//! Routes are an ordered list of records with a path index. Every path
//! resolves to exactly one record: unknown paths land on the catch-all
//! `NotFound` record, which always sits last.

use std::collections::HashMap;

use url::form_urlencoded;

use crate::config::paths;
use crate::core::error::RouteTableError;

/// Path pattern of the catch-all record.
pub const CATCH_ALL_PATH: &str = "/:pathMatch(.*)*";

/// Screen rendered for a route.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ViewId {
    Home,
    TokenImport,
    /// The admin frame with no screen selected.
    DefaultLayout,
    Dashboard,
    GameFeatures,
    CardFlipOps,
    MessageTest,
    Profile,
    DailyTasks,
    BatchDailyTasks,
    WebSocketTest,
    NotFound,
    /// Externally generated route, identified by its route name.
    Generated(String),
}

impl ViewId {
    /// Whether the view renders inside the admin layout.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::GameFeatures
                | Self::CardFlipOps
                | Self::MessageTest
                | Self::Profile
                | Self::DailyTasks
                | Self::BatchDailyTasks
        )
    }
}

/// Per-route metadata consulted by the navigation guard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteMeta {
    pub title: Option<String>,
    pub requires_token: Option<bool>,
}

impl RouteMeta {
    pub fn new(title: &str, requires_token: bool) -> Self {
        Self {
            title: Some(title.to_string()),
            requires_token: Some(requires_token),
        }
    }

    /// Absent metadata means no token is required.
    pub fn requires_token(&self) -> bool {
        self.requires_token.unwrap_or(false)
    }
}

/// What a record does when matched.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteTarget {
    View(ViewId),
    /// Record-level redirect, applied before the guard runs.
    Redirect(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<String>,
    pub target: RouteTarget,
    pub meta: RouteMeta,
}

impl RouteRecord {
    pub fn view(path: &str, name: &str, view: ViewId, meta: RouteMeta) -> Self {
        Self {
            path: path.to_string(),
            name: Some(name.to_string()),
            target: RouteTarget::View(view),
            meta,
        }
    }

    pub fn redirect(path: &str, to: &str) -> Self {
        Self {
            path: path.to_string(),
            name: None,
            target: RouteTarget::Redirect(to.to_string()),
            meta: RouteMeta::default(),
        }
    }

    /// A generated route rendered by [`ViewId::Generated`].
    pub fn generated(path: &str, name: &str, meta: RouteMeta) -> Self {
        Self::view(path, name, ViewId::Generated(name.to_string()), meta)
    }
}

/// Static routes, in match order, without the catch-all.
fn static_routes() -> Vec<RouteRecord> {
    use ViewId::*;

    let admin = |segment: &str, name: &str, view: ViewId, title: &str| {
        RouteRecord::view(
            &format!("{}/{}", paths::ADMIN_PREFIX, segment),
            name,
            view,
            RouteMeta::new(title, true),
        )
    };

    vec![
        RouteRecord::view(paths::HOME, "Home", Home, RouteMeta::new("首页", false)),
        RouteRecord::view(
            paths::TOKEN_SETUP,
            "TokenImport",
            TokenImport,
            RouteMeta::new("Token 管理", false),
        ),
        RouteRecord::view(
            paths::ADMIN_PREFIX,
            "DefaultLayout",
            DefaultLayout,
            RouteMeta::default(),
        ),
        admin("dashboard", "Dashboard", Dashboard, "控制台"),
        admin("game-features", "GameFeatures", GameFeatures, "游戏功能"),
        admin("card-flip-ops", "CardFlipOps", CardFlipOps, "卡片倒卖助手"),
        admin("message-test", "MessageTest", MessageTest, "消息测试"),
        admin("profile", "Profile", Profile, "个人设置"),
        admin("daily-tasks", "DailyTasks", DailyTasks, "日常任务"),
        admin("batch-daily-tasks", "BatchDailyTasks", BatchDailyTasks, "批量日常"),
        RouteRecord::view(
            "/websocket-test",
            "WebSocketTest",
            WebSocketTest,
            RouteMeta::new("WebSocket 测试", true),
        ),
        RouteRecord::redirect("/login", paths::TOKEN_SETUP),
        RouteRecord::redirect("/register", paths::TOKEN_SETUP),
        RouteRecord::redirect("/game-roles", paths::TOKEN_SETUP),
    ]
}

fn catch_all() -> RouteRecord {
    RouteRecord {
        path: CATCH_ALL_PATH.to_string(),
        name: Some("NotFound".to_string()),
        target: RouteTarget::View(ViewId::NotFound),
        meta: RouteMeta {
            title: Some("页面不存在".to_string()),
            requires_token: None,
        },
    }
}

/// Ordered route records with a lookup index by path.
#[derive(Clone, Debug)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// The static table.
    pub fn standard() -> Self {
        let records = static_routes();
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (index_key(&r.path), i))
            .collect();
        let mut table = Self { records, index };
        table.records.push(catch_all());
        table
    }

    /// The static table with generated routes merged before the catch-all.
    ///
    /// Paths and names must stay unique across the merged table.
    pub fn with_generated(generated: Vec<RouteRecord>) -> Result<Self, RouteTableError> {
        let mut table = Self::standard();
        let catch_all = table.records.pop();

        for record in generated {
            let path = normalize_path(&record.path);
            if path == CATCH_ALL_PATH || table.index.contains_key(&index_key(&path)) {
                return Err(RouteTableError::DuplicatePath(path));
            }
            if let Some(name) = &record.name
                && (name == "NotFound" || table.find_by_name(name).is_some())
            {
                return Err(RouteTableError::DuplicateName(name.clone()));
            }
            table.index.insert(index_key(&path), table.records.len());
            table.records.push(RouteRecord { path, ..record });
        }

        table.records.extend(catch_all);
        Ok(table)
    }

    /// All records in match order; the catch-all is last.
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.records
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
    }

    fn not_found(&self) -> &RouteRecord {
        // `standard()` always appends the catch-all last.
        &self.records[self.records.len() - 1]
    }

    /// Resolve a location (path with optional query/fragment) to a route.
    ///
    /// Matching ignores ASCII case; the resolved path keeps the requested
    /// spelling.
    pub fn resolve(&self, location: &str) -> ResolvedRoute {
        let (path, query) = split_location(location);
        let path = normalize_path(path);
        let record = match self.index.get(&index_key(&path)) {
            Some(&i) => &self.records[i],
            None => self.not_found(),
        };
        ResolvedRoute {
            path,
            query: query.to_string(),
            record: record.clone(),
        }
    }

    /// The catch-all route for `location`.
    pub fn resolve_not_found(&self, location: &str) -> ResolvedRoute {
        let (path, _) = split_location(location);
        ResolvedRoute {
            path: normalize_path(path),
            query: String::new(),
            record: self.not_found().clone(),
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn index_key(path: &str) -> String {
    path.to_ascii_lowercase()
}

/// Split `path?query#fragment` into path and query; the fragment is dropped.
fn split_location(location: &str) -> (&str, &str) {
    let without_fragment = location.split('#').next().unwrap_or_default();
    match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    }
}

/// Leading slash, no trailing slash (except root), no empty segments.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// A location matched against the route table.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRoute {
    /// Normalized path as requested (not the record's pattern).
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: String,
    pub record: RouteRecord,
}

impl ResolvedRoute {
    pub fn meta(&self) -> &RouteMeta {
        &self.record.meta
    }

    pub fn name(&self) -> Option<&str> {
        self.record.name.as_deref()
    }

    /// View to render, or `None` for redirect records.
    pub fn view(&self) -> Option<&ViewId> {
        match &self.record.target {
            RouteTarget::View(view) => Some(view),
            RouteTarget::Redirect(_) => None,
        }
    }

    /// Record-level redirect target, if this is a redirect record.
    pub fn redirect(&self) -> Option<&str> {
        match &self.record.target {
            RouteTarget::Redirect(to) => Some(to),
            RouteTarget::View(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.view() == Some(&ViewId::NotFound)
    }

    /// Path plus query, as it should appear in the address bar.
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// Value of a query parameter.
    pub fn query_param(&self, key: &str) -> Option<String> {
        form_urlencoded::parse(self.query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Query props accepted by the token import screen.
///
/// `/tokens?token=...&name=...&auto=true` pre-fills (and with `auto`
/// immediately imports) a token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenImportProps {
    pub token: Option<String>,
    pub name: Option<String>,
    pub server: Option<String>,
    pub ws_url: Option<String>,
    pub api: Option<String>,
    pub auto: bool,
}

impl TokenImportProps {
    pub fn from_route(route: &ResolvedRoute) -> Self {
        Self {
            token: route.query_param("token"),
            name: route.query_param("name"),
            server: route.query_param("server"),
            ws_url: route.query_param("wsUrl"),
            api: route.query_param("api"),
            auto: route.query_param("auto").as_deref() == Some("true"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_paths_resolve() {
        let table = RouteTable::standard();
        let cases = [
            ("/", ViewId::Home),
            ("/tokens", ViewId::TokenImport),
            ("/admin/dashboard", ViewId::Dashboard),
            ("/admin/card-flip-ops", ViewId::CardFlipOps),
            ("/admin/batch-daily-tasks", ViewId::BatchDailyTasks),
            ("/websocket-test", ViewId::WebSocketTest),
        ];
        for (path, view) in cases {
            assert_eq!(table.resolve(path).view(), Some(&view), "{}", path);
        }
    }

    #[test]
    fn test_unmatched_path_is_not_found() {
        let table = RouteTable::standard();
        for path in ["/nope", "/admin/unknown", "/tokens/extra", "/:pathMatch(.*)*"] {
            let route = table.resolve(path);
            assert!(route.is_not_found(), "{}", path);
            assert_eq!(route.meta().title.as_deref(), Some("页面不存在"));
            assert_eq!(route.meta().requires_token, None);
        }
        assert_eq!(table.resolve("/nope").path, "/nope");
    }

    #[test]
    fn test_admin_prefix_renders_bare_layout() {
        let table = RouteTable::standard();
        for path in ["/admin", "/admin/"] {
            let route = table.resolve(path);
            assert_eq!(route.view(), Some(&ViewId::DefaultLayout), "{}", path);
            assert_eq!(route.name(), Some("DefaultLayout"));
            assert_eq!(route.meta(), &RouteMeta::default());
            assert!(!route.meta().requires_token());
        }
    }

    #[test]
    fn test_paths_match_case_insensitively() {
        let table = RouteTable::standard();
        let route = table.resolve("/Tokens?name=A");
        assert_eq!(route.view(), Some(&ViewId::TokenImport));
        assert_eq!(route.path, "/Tokens");
        assert_eq!(route.query_param("name").as_deref(), Some("A"));
        assert_eq!(table.resolve("/ADMIN/Card-Flip-Ops").view(), Some(&ViewId::CardFlipOps));
        assert_eq!(table.resolve("/LOGIN").redirect(), Some("/tokens"));
    }

    #[test]
    fn test_path_normalization() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("").view(), Some(&ViewId::Home));
        assert_eq!(table.resolve("/tokens/").view(), Some(&ViewId::TokenImport));
        assert_eq!(table.resolve("//admin//profile").view(), Some(&ViewId::Profile));
        assert_eq!(table.resolve("/tokens?auto=true#top").path, "/tokens");
    }

    #[test]
    fn test_legacy_paths_are_redirect_records() {
        let table = RouteTable::standard();
        for path in ["/login", "/register", "/game-roles"] {
            assert_eq!(table.resolve(path).redirect(), Some("/tokens"));
        }
    }

    #[test]
    fn test_token_setup_never_requires_token() {
        let table = RouteTable::standard();
        assert!(!table.resolve(paths::TOKEN_SETUP).meta().requires_token());
    }

    #[test]
    fn test_admin_routes_require_token() {
        let table = RouteTable::standard();
        let admin: Vec<_> = table
            .records()
            .iter()
            .filter(|r| r.path.starts_with("/admin/"))
            .collect();
        assert_eq!(admin.len(), 7);
        assert!(admin.iter().all(|r| r.meta.requires_token()));
    }

    #[test]
    fn test_names_and_paths_are_unique() {
        let table = RouteTable::standard();
        let mut paths: Vec<_> = table.records().iter().map(|r| r.path.as_str()).collect();
        let mut names: Vec<_> = table.records().iter().filter_map(|r| r.name.as_deref()).collect();
        let (p, n) = (paths.len(), names.len());
        paths.sort();
        paths.dedup();
        names.sort();
        names.dedup();
        assert_eq!(paths.len(), p);
        assert_eq!(names.len(), n);
    }

    #[test]
    fn test_generated_routes_merge_before_catch_all() {
        let table = RouteTable::with_generated(vec![RouteRecord::generated(
            "/reports/",
            "Reports",
            RouteMeta::new("报表", true),
        )])
        .unwrap();

        let route = table.resolve("/reports");
        assert_eq!(route.view(), Some(&ViewId::Generated("Reports".to_string())));
        assert!(table.records().last().map(|r| r.path.as_str()) == Some(CATCH_ALL_PATH));
        assert!(table.resolve("/missing").is_not_found());
    }

    #[test]
    fn test_generated_duplicates_rejected() {
        let dup_path = RouteRecord::generated("/tokens", "Other", RouteMeta::default());
        assert_eq!(
            RouteTable::with_generated(vec![dup_path]).unwrap_err(),
            RouteTableError::DuplicatePath("/tokens".to_string())
        );

        let dup_case = RouteRecord::generated("/Admin/Profile", "Other", RouteMeta::default());
        assert_eq!(
            RouteTable::with_generated(vec![dup_case]).unwrap_err(),
            RouteTableError::DuplicatePath("/Admin/Profile".to_string())
        );

        let dup_name = RouteRecord::generated("/other", "Dashboard", RouteMeta::default());
        assert_eq!(
            RouteTable::with_generated(vec![dup_name]).unwrap_err(),
            RouteTableError::DuplicateName("Dashboard".to_string())
        );
    }

    #[test]
    fn test_token_import_props() {
        let table = RouteTable::standard();
        let route = table.resolve("/tokens?token=abc%3D%3D&name=main%20acct&wsUrl=wss%3A%2F%2Fgame&auto=true");
        let props = TokenImportProps::from_route(&route);
        assert_eq!(props.token.as_deref(), Some("abc=="));
        assert_eq!(props.name.as_deref(), Some("main acct"));
        assert_eq!(props.ws_url.as_deref(), Some("wss://game"));
        assert_eq!(props.server, None);
        assert!(props.auto);

        let route = table.resolve("/tokens?auto=1");
        assert!(!TokenImportProps::from_route(&route).auto);
    }

    #[test]
    fn test_full_path_keeps_query() {
        let table = RouteTable::standard();
        assert_eq!(table.resolve("/tokens?name=a").full_path(), "/tokens?name=a");
        assert_eq!(table.resolve("/admin/profile/").full_path(), "/admin/profile");
    }
}
