//! Navigation authorization gate.
//!
//! [`decide`] is the whole policy: a pure function of the target route's
//! metadata and a [`SessionState`] snapshot. [`Navigator`] wraps it the way
//! the router uses it: set the document title for the requested route,
//! decide, and treat every redirect as a fresh navigation.

use crate::config::{APP_NAME, MAX_REDIRECT_HOPS, paths};
use crate::models::{ResolvedRoute, RouteMeta, RouteTable, SessionState};

/// Outcome of one guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Render the requested route.
    Proceed,
    /// Abandon the request and navigate to this path instead.
    RedirectTo(String),
}

/// One route transition.
#[derive(Clone, Copy, Debug)]
pub struct NavigationRequest<'a> {
    pub target: &'a ResolvedRoute,
    pub source: Option<&'a ResolvedRoute>,
}

/// Document title for a route: `"{title} - {APP_NAME}"` or just the app name.
pub fn document_title(meta: &RouteMeta) -> String {
    match meta.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => format!("{} - {}", title, APP_NAME),
        None => APP_NAME.to_string(),
    }
}

/// Decide whether `target` may render under `session`.
///
/// First match wins:
/// 1. token required but none registered: token setup
/// 2. root with tokens registered: dashboard if one is selected, else token setup
/// 3. proceed
pub fn decide(target: &ResolvedRoute, session: &SessionState) -> NavigationDecision {
    if target.meta().requires_token() && !session.has_tokens() {
        return NavigationDecision::RedirectTo(paths::TOKEN_SETUP.to_string());
    }

    if target.path == paths::HOME && session.has_tokens() {
        let to = match session.selected_token() {
            Some(_) => paths::DASHBOARD,
            None => paths::TOKEN_SETUP,
        };
        return NavigationDecision::RedirectTo(to.to_string());
    }

    NavigationDecision::Proceed
}

/// Receives the document title on every transition.
pub trait TitleSink {
    fn set_title(&self, title: &str);
}

/// Final result of a navigation after all redirects.
#[derive(Clone, Debug, PartialEq)]
pub struct Navigation {
    /// Route to render.
    pub route: ResolvedRoute,
    /// Whether the rendered route differs from the requested one.
    pub redirected: bool,
}

/// Applies the guard to navigations against a route table.
pub struct Navigator<'a> {
    table: &'a RouteTable,
}

impl<'a> Navigator<'a> {
    pub fn new(table: &'a RouteTable) -> Self {
        Self { table }
    }

    /// Evaluate the guard once.
    ///
    /// The title is written for the requested target before the decision is
    /// computed, so it reflects that target even when redirecting.
    pub fn guard(
        &self,
        request: NavigationRequest<'_>,
        session: &SessionState,
        titles: &impl TitleSink,
    ) -> NavigationDecision {
        titles.set_title(&document_title(request.target.meta()));
        let decision = decide(request.target, session);
        tracing::debug!(
            to = %request.target.path,
            name = request.target.name(),
            from = request.source.map(|r| r.path.as_str()),
            ?decision,
            "navigation guard"
        );
        decision
    }

    /// Navigate to `location`, following record redirects and guard
    /// redirects until a route may render.
    pub fn navigate(
        &self,
        location: &str,
        source: Option<&ResolvedRoute>,
        session: &SessionState,
        titles: &impl TitleSink,
    ) -> Navigation {
        let mut location = location.to_string();
        let mut redirected = false;

        for _ in 0..MAX_REDIRECT_HOPS {
            let target = self.table.resolve(&location);

            if let Some(to) = target.redirect() {
                location = to.to_string();
                redirected = true;
                continue;
            }

            let request = NavigationRequest {
                target: &target,
                source,
            };
            match self.guard(request, session, titles) {
                NavigationDecision::Proceed => {
                    return Navigation {
                        route: target,
                        redirected,
                    };
                }
                NavigationDecision::RedirectTo(to) => {
                    location = to;
                    redirected = true;
                }
            }
        }

        tracing::warn!(%location, hops = MAX_REDIRECT_HOPS, "redirect limit reached");
        let route = self.table.resolve_not_found(&location);
        titles.set_title(&document_title(route.meta()));
        Navigation {
            route,
            redirected: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::models::{RouteMeta, RouteRecord, ViewId};

    #[derive(Default)]
    struct RecordedTitles(RefCell<Vec<String>>);

    impl TitleSink for RecordedTitles {
        fn set_title(&self, title: &str) {
            self.0.borrow_mut().push(title.to_string());
        }
    }

    fn no_tokens() -> SessionState {
        SessionState::new(false, None)
    }

    fn tokens_unselected() -> SessionState {
        SessionState::new(true, None)
    }

    fn tokens_selected() -> SessionState {
        SessionState::new(true, Some("main".to_string()))
    }

    fn redirect(to: &str) -> NavigationDecision {
        NavigationDecision::RedirectTo(to.to_string())
    }

    #[test]
    fn test_protected_routes_without_tokens() {
        let table = RouteTable::standard();
        let protected: Vec<_> = table
            .records()
            .iter()
            .filter(|r| r.meta.requires_token())
            .collect();
        assert_eq!(protected.len(), 8);

        for record in protected {
            let target = table.resolve(&record.path);
            assert_eq!(decide(&target, &no_tokens()), redirect("/tokens"), "{}", record.path);
            // A selection alone never satisfies the gate.
            assert_eq!(
                decide(&target, &SessionState::new(false, Some("x".to_string()))),
                redirect("/tokens")
            );
        }
    }

    #[test]
    fn test_protected_routes_with_tokens() {
        let table = RouteTable::standard();
        let target = table.resolve("/admin/card-flip-ops");
        assert_eq!(decide(&target, &tokens_unselected()), NavigationDecision::Proceed);
        assert_eq!(decide(&target, &tokens_selected()), NavigationDecision::Proceed);
    }

    #[test]
    fn test_root() {
        let table = RouteTable::standard();
        let root = table.resolve("/");
        assert_eq!(decide(&root, &tokens_selected()), redirect("/admin/dashboard"));
        assert_eq!(decide(&root, &tokens_unselected()), redirect("/tokens"));
        assert_eq!(decide(&root, &no_tokens()), NavigationDecision::Proceed);
    }

    #[test]
    fn test_missing_requires_token_means_public() {
        let table = RouteTable::standard();
        let not_found = table.resolve("/definitely/missing");
        assert_eq!(not_found.meta().requires_token, None);
        assert_eq!(decide(&not_found, &no_tokens()), NavigationDecision::Proceed);
    }

    #[test]
    fn test_document_title() {
        assert_eq!(
            document_title(&RouteMeta::new("控制台", true)),
            "控制台 - XYZW 游戏管理系统"
        );
        assert_eq!(document_title(&RouteMeta::default()), "XYZW 游戏管理系统");
        assert_eq!(
            document_title(&RouteMeta {
                title: Some(String::new()),
                requires_token: None
            }),
            "XYZW 游戏管理系统"
        );
    }

    #[test]
    fn test_guard_sets_title_of_requested_route() {
        let table = RouteTable::standard();
        let titles = RecordedTitles::default();
        let target = table.resolve("/admin/profile");

        let decision = Navigator::new(&table).guard(
            NavigationRequest {
                target: &target,
                source: None,
            },
            &no_tokens(),
            &titles,
        );

        assert_eq!(decision, redirect("/tokens"));
        assert_eq!(*titles.0.borrow(), vec!["个人设置 - XYZW 游戏管理系统"]);
    }

    #[test]
    fn test_navigate_title_before_redirect() {
        let table = RouteTable::standard();
        let titles = RecordedTitles::default();

        let nav = Navigator::new(&table).navigate("/admin/profile", None, &no_tokens(), &titles);

        assert_eq!(nav.route.view(), Some(&ViewId::TokenImport));
        assert!(nav.redirected);
        assert_eq!(
            *titles.0.borrow(),
            vec![
                "个人设置 - XYZW 游戏管理系统".to_string(),
                "Token 管理 - XYZW 游戏管理系统".to_string(),
            ]
        );
    }

    #[test]
    fn test_legacy_paths_always_reach_tokens() {
        let table = RouteTable::standard();
        let navigator = Navigator::new(&table);
        for path in ["/login", "/register", "/game-roles"] {
            for session in [no_tokens(), tokens_unselected(), tokens_selected()] {
                let nav = navigator.navigate(path, None, &session, &RecordedTitles::default());
                assert_eq!(nav.route.path, "/tokens", "{} {:?}", path, session);
                assert!(nav.redirected);
            }
        }
    }

    #[test]
    fn test_navigate_root_with_selection() {
        let table = RouteTable::standard();
        let nav = Navigator::new(&table).navigate(
            "/",
            None,
            &tokens_selected(),
            &RecordedTitles::default(),
        );
        assert_eq!(nav.route.view(), Some(&ViewId::Dashboard));
        assert!(nav.redirected);
    }

    #[test]
    fn test_navigate_proceeds_without_redirect() {
        let table = RouteTable::standard();
        let source = table.resolve("/admin/dashboard");
        let titles = RecordedTitles::default();
        let nav = Navigator::new(&table).navigate(
            "/admin/daily-tasks",
            Some(&source),
            &tokens_selected(),
            &titles,
        );
        assert_eq!(nav.route.view(), Some(&ViewId::DailyTasks));
        assert!(!nav.redirected);
        assert_eq!(titles.0.borrow().len(), 1);
    }

    #[test]
    fn test_bare_admin_prefix_is_public() {
        let table = RouteTable::standard();
        let titles = RecordedTitles::default();
        let nav = Navigator::new(&table).navigate("/admin", None, &no_tokens(), &titles);

        assert_eq!(nav.route.view(), Some(&ViewId::DefaultLayout));
        assert!(!nav.redirected);
        assert_eq!(*titles.0.borrow(), vec!["XYZW 游戏管理系统"]);
    }

    #[test]
    fn test_generated_protected_route_is_gated() {
        let table = RouteTable::with_generated(vec![RouteRecord::generated(
            "/reports",
            "Reports",
            RouteMeta::new("报表", true),
        )])
        .unwrap();
        let navigator = Navigator::new(&table);
        let titles = RecordedTitles::default();

        let nav = navigator.navigate("/reports", None, &no_tokens(), &titles);
        assert_eq!(nav.route.view(), Some(&ViewId::TokenImport));
        assert!(nav.redirected);
        assert_eq!(titles.0.borrow()[0], "报表 - XYZW 游戏管理系统");

        let nav = navigator.navigate("/reports", None, &tokens_unselected(), &titles);
        assert_eq!(nav.route.view(), Some(&ViewId::Generated("Reports".to_string())));
        assert!(!nav.redirected);
    }

    #[test]
    fn test_redirect_loop_is_cut_off() {
        let table = RouteTable::with_generated(vec![
            RouteRecord::redirect("/a", "/b"),
            RouteRecord::redirect("/b", "/a"),
        ])
        .unwrap();
        let nav = Navigator::new(&table).navigate(
            "/a",
            None,
            &no_tokens(),
            &RecordedTitles::default(),
        );
        assert!(nav.route.is_not_found());
        assert!(nav.redirected);
    }
}
