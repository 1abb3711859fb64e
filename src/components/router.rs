//! Application router component.
//!
//! Path-based routing on the History API. Every transition, including the
//! initial load and browser back/forward, goes through the [`Navigator`],
//! which runs the token gate before anything renders.
//!
//! # Architecture
//!
//! - **The address bar is the source of truth**: the route signal is derived
//!   from `location.pathname` + `location.search`
//! - **Redirects replace history**: a guarded or legacy path never stays in
//!   back-button history
//! - **popstate events**: browser back/forward buttons work automatically

use leptos::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::Closure;

use crate::app::AppContext;
use crate::components::views;
use crate::core::guard::{Navigation, Navigator};
use crate::models::ResolvedRoute;
use crate::utils::dom::{self, DocumentTitle};

// ============================================================================
// Router Context
// ============================================================================

/// Access to the current route and programmatic navigation.
#[derive(Clone, Copy)]
pub struct RouterContext {
    /// Route currently rendered.
    pub route: RwSignal<ResolvedRoute>,
    navigate: Callback<String>,
}

impl RouterContext {
    /// Navigate to `location` (path with optional query), pushing history.
    pub fn navigate(&self, location: &str) {
        self.navigate.run(location.to_string());
    }
}

// ============================================================================
// Main Router
// ============================================================================

#[component]
pub fn AppRouter() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let resolve = move |location: &str, source: Option<&ResolvedRoute>| -> Navigation {
        let session = ctx.session_state();
        ctx.routes.with_value(|table| {
            Navigator::new(table).navigate(location, source, &session, &DocumentTitle)
        })
    };

    let initial = resolve(&dom::current_location(), None);
    if initial.redirected {
        dom::replace_path(&initial.route.full_path());
    }
    let route = RwSignal::new(initial.route);

    let navigate = Callback::new(move |location: String| {
        let source = route.get_untracked();
        let nav = resolve(&location, Some(&source));
        let full_path = nav.route.full_path();
        if full_path != dom::current_location() {
            dom::push_path(&full_path);
        }
        route.set(nav.route);
        dom::scroll_to_top();
    });

    // Pushed navigations scroll to top; traversals keep the saved position.
    dom::restore_scroll_on_traversal();

    // Browser back/forward (runs once on mount)
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        let closure = Closure::wrap(Box::new(move || {
            let source = route.get_untracked();
            let nav = resolve(&dom::current_location(), Some(&source));
            if nav.redirected {
                dom::replace_path(&nav.route.full_path());
            }
            route.set(nav.route);
        }) as Box<dyn Fn()>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // Keep the closure alive for the lifetime of the app
        closure.forget();
    }

    provide_context(RouterContext { route, navigate });

    view! { {move || views::render(&route.get())} }
}
