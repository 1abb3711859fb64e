//! Root application module.
//!
//! Contains the main App component and the AppContext shared by every
//! screen.

use leptos::prelude::*;

use crate::components::AppRouter;
use crate::config;
use crate::core::api::CardFlipApi;
use crate::core::error::SessionError;
use crate::core::session::{self, TokenRegistry};
use crate::models::{RouteTable, SessionState};

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and accessed from children
/// with `use_context::<AppContext>()`.
///
/// # Note
///
/// This struct is `Copy` because every field is a Leptos signal or stored
/// value handle.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Registered tokens and selection, mirrored to localStorage.
    pub tokens: RwSignal<TokenRegistry>,
    /// Route table, fixed for the lifetime of the app.
    pub routes: StoredValue<RouteTable>,
    /// Card-flip API client.
    pub api: StoredValue<CardFlipApi>,
}

impl AppContext {
    /// Creates the context from persisted tokens and build-time config.
    pub fn new() -> Self {
        let routes = RouteTable::with_generated(config::generated_routes()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "generated routes rejected, using static table");
            RouteTable::standard()
        });

        Self {
            tokens: RwSignal::new(session::load_or_default()),
            routes: StoredValue::new(routes),
            api: StoredValue::new(CardFlipApi::from_env()),
        }
    }

    /// Snapshot of the session for the navigation guard.
    pub fn session_state(&self) -> SessionState {
        self.tokens.with_untracked(|registry| registry.snapshot())
    }

    /// Mutate the token registry and persist the result.
    ///
    /// Nothing is persisted when `f` fails.
    pub fn update_tokens<R>(
        &self,
        f: impl FnOnce(&mut TokenRegistry) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut registry = self.tokens.get_untracked();
        let value = f(&mut registry)?;
        session::save(&registry)?;
        self.tokens.set(registry);
        Ok(value)
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Wraps the app in an ErrorBoundary for graceful error handling
/// - Renders the router
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div class="app-error">
                    <h1>"出错了"</h1>
                    <p>"An unexpected error occurred. Please try reloading the page."</p>
                    <ul>
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button
                        on:click=move |_| {
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().reload();
                            }
                        }
                    >
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <AppRouter />
        </ErrorBoundary>
    }
}
