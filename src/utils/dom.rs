//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use web_sys::{ScrollRestoration, ScrollToOptions, Storage, Window};

use crate::core::guard::TitleSink;

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get localStorage.
#[inline]
pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// Set `document.title`.
pub fn set_document_title(title: &str) {
    if let Some(document) = window().and_then(|w| w.document()) {
        document.set_title(title);
    }
}

/// Writes guard titles to the browser document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTitle;

impl TitleSink for DocumentTitle {
    fn set_title(&self, title: &str) {
        set_document_title(title);
    }
}

/// Scroll the page back to the top.
pub fn scroll_to_top() {
    if let Some(window) = window() {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        window.scroll_to_with_scroll_to_options(&options);
    }
}

// =============================================================================
// Browser Navigation
// =============================================================================

/// Current location as `pathname?search`.
pub fn current_location() -> String {
    let Some(location) = window().map(|w| w.location()) else {
        return "/".to_string();
    };
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    format!("{}{}", path, search)
}

/// Push a new history entry for `path`.
pub fn push_path(path: &str) {
    if let Some(window) = window()
        && let Ok(history) = window.history()
    {
        let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path));
    }
}

/// Let the browser restore the saved scroll position on back/forward.
pub fn restore_scroll_on_traversal() {
    if let Some(window) = window()
        && let Ok(history) = window.history()
    {
        let _ = history.set_scroll_restoration(ScrollRestoration::Auto);
    }
}

/// Replace the current history entry with `path`.
///
/// Used for redirects that shouldn't appear in back button history.
pub fn replace_path(path: &str) {
    if let Some(window) = window()
        && let Ok(history) = window.history()
    {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_document_title_sink() {
        DocumentTitle.set_title("控制台 - XYZW 游戏管理系统");
        let title = window().and_then(|w| w.document()).map(|d| d.title());
        assert_eq!(title.as_deref(), Some("控制台 - XYZW 游戏管理系统"));
    }

    #[wasm_bindgen_test]
    fn test_scroll_restoration_is_auto() {
        restore_scroll_on_traversal();
        let mode = window().and_then(|w| w.history().ok()).and_then(|h| h.scroll_restoration().ok());
        assert_eq!(mode, Some(ScrollRestoration::Auto));
    }

    #[wasm_bindgen_test]
    fn test_replace_path_updates_location() {
        replace_path("/tokens?name=a");
        assert_eq!(current_location(), "/tokens?name=a");
    }
}
