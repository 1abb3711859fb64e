//! Token registry persisted in localStorage.
//!
//! The registry owns the session: which tokens exist and which one is
//! selected. The navigation guard only ever sees a [`SessionState`]
//! snapshot of it.

use crate::config::storage::{SELECTED_TOKEN_KEY, TOKENS_KEY};
use crate::core::error::SessionError;
use crate::models::{SessionState, TokenEntry};
use crate::utils::dom;

/// Registered tokens plus the current selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenRegistry {
    tokens: Vec<TokenEntry>,
    selected: Option<String>,
}

impl TokenRegistry {
    pub fn new(tokens: Vec<TokenEntry>, selected: Option<String>) -> Self {
        let selected = selected.filter(|id| tokens.iter().any(|t| &t.id == id));
        Self { tokens, selected }
    }

    pub fn tokens(&self) -> &[TokenEntry] {
        &self.tokens
    }

    pub fn selected(&self) -> Option<&TokenEntry> {
        let id = self.selected.as_deref()?;
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Read-only view for the navigation guard.
    pub fn snapshot(&self) -> SessionState {
        SessionState::new(!self.tokens.is_empty(), self.selected.clone())
    }

    /// Register a token, replacing any entry with the same id.
    pub fn add(&mut self, entry: TokenEntry) {
        match self.tokens.iter_mut().find(|t| t.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.tokens.push(entry),
        }
    }

    /// Register a token entered by the user and return its id.
    ///
    /// The token must not be blank; a blank name falls back to `token-N`.
    pub fn import(&mut self, mut entry: TokenEntry) -> Result<String, SessionError> {
        entry.token = entry.token.trim().to_string();
        if entry.token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        entry.name = entry.name.trim().to_string();
        if entry.name.is_empty() {
            entry.name = format!("token-{}", self.tokens.len() + 1);
        }
        entry.id = entry.name.clone();

        let id = entry.id.clone();
        self.add(entry);
        Ok(id)
    }

    /// Remove a token. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.tokens.len() != before
    }

    pub fn select(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.tokens.iter().any(|t| t.id == id) {
            return Err(SessionError::UnknownToken(id.to_string()));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.selected = None;
    }
}

// =============================================================================
// localStorage persistence
// =============================================================================

/// Load the registry from localStorage.
///
/// Missing keys yield an empty registry.
pub fn load() -> Result<TokenRegistry, SessionError> {
    let storage = dom::local_storage().ok_or(SessionError::StorageUnavailable)?;

    let tokens = match storage.get_item(TOKENS_KEY).ok().flatten() {
        Some(json) => serde_json::from_str::<Vec<TokenEntry>>(&json)
            .map_err(|e| SessionError::Corrupted(e.to_string()))?,
        None => Vec::new(),
    };
    let selected = storage.get_item(SELECTED_TOKEN_KEY).ok().flatten();

    Ok(TokenRegistry::new(tokens, selected))
}

/// Load the registry, falling back to an empty one on any error.
pub fn load_or_default() -> TokenRegistry {
    load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "token registry unavailable, starting empty");
        TokenRegistry::default()
    })
}

/// Persist the registry to localStorage.
pub fn save(registry: &TokenRegistry) -> Result<(), SessionError> {
    let storage = dom::local_storage().ok_or(SessionError::StorageUnavailable)?;

    let json = serde_json::to_string(&registry.tokens)
        .map_err(|e| SessionError::Corrupted(e.to_string()))?;
    storage
        .set_item(TOKENS_KEY, &json)
        .map_err(|_| SessionError::SaveFailed)?;

    match &registry.selected {
        Some(id) => storage.set_item(SELECTED_TOKEN_KEY, id),
        None => storage.remove_item(SELECTED_TOKEN_KEY),
    }
    .map_err(|_| SessionError::SaveFailed)
}
