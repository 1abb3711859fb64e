//! Shared layout pieces: links, the session badge and the admin frame.

use leptos::prelude::*;

use crate::app::AppContext;
use crate::components::router::RouterContext;
use crate::config::{APP_NAME, paths};
use crate::models::RouteTarget;

/// In-app link that navigates through the router instead of reloading.
#[component]
pub fn Link(#[prop(into)] to: String, children: Children) -> impl IntoView {
    let router = use_context::<RouterContext>().expect("RouterContext must be provided");
    let href = to.clone();

    view! {
        <a
            href=href
            on:click=move |ev: leptos::ev::MouseEvent| {
                ev.prevent_default();
                router.navigate(&to);
            }
        >
            {children()}
        </a>
    }
}

/// Shows which token the console is operating under.
#[component]
pub fn SessionBadge() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let session_name = Signal::derive(move || {
        ctx.tokens.with(|r| match r.selected() {
            Some(entry) => entry.name.clone(),
            None => r.snapshot().display_name(),
        })
    });

    view! {
        <span class="session-badge">
            "Token: " {session_name} " "
            <Link to=paths::TOKEN_SETUP>"切换"</Link>
        </span>
    }
}

/// Frame for the admin screens: header, navigation, content.
#[component]
pub fn AdminLayout(children: Children) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let router = use_context::<RouterContext>().expect("RouterContext must be provided");

    // (path, title) of every admin view, in table order
    let entries: Vec<(String, String)> = ctx.routes.with_value(|table| {
        table
            .records()
            .iter()
            .filter(|r| matches!(&r.target, RouteTarget::View(view) if view.is_admin()))
            .map(|r| (r.path.clone(), r.meta.title.clone().unwrap_or_default()))
            .collect()
    });

    let nav_items = entries
        .into_iter()
        .map(|(path, title)| {
            let active_path = path.clone();
            let is_active = move || router.route.with(|r| r.path == active_path);
            view! {
                <li class:active=is_active>
                    <Link to=path>{title}</Link>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="admin-layout">
            <header class="admin-header">
                <span class="app-name">{APP_NAME}</span>
                <SessionBadge />
            </header>
            <nav class="admin-nav">
                <ul>{nav_items}</ul>
            </nav>
            <main class="admin-content">{children()}</main>
        </div>
    }
}
