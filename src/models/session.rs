use serde::{Deserialize, Serialize};

/// A registered game-account credential.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenEntry {
    /// Stable identifier, unique within the registry.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The credential itself.
    pub token: String,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub ws_url: Option<String>,
    /// Endpoint the token was issued by, when imported from a link.
    #[serde(default)]
    pub api: Option<String>,
}

impl TokenEntry {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            token: token.into(),
            server: None,
            ws_url: None,
            api: None,
        }
    }
}

/// Snapshot of the session as seen by the navigation guard.
///
/// A selection can only exist while at least one token is registered;
/// [`SessionState::new`] drops it otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    has_tokens: bool,
    selected_token: Option<String>,
}

impl SessionState {
    pub fn new(has_tokens: bool, selected_token: Option<String>) -> Self {
        Self {
            has_tokens,
            selected_token: selected_token.filter(|_| has_tokens),
        }
    }

    /// Whether any token is registered
    pub fn has_tokens(&self) -> bool {
        self.has_tokens
    }

    /// Id of the active token, if one is selected
    pub fn selected_token(&self) -> Option<&str> {
        self.selected_token.as_deref()
    }

    /// Label for the session indicator
    pub fn display_name(&self) -> String {
        match (&self.selected_token, self.has_tokens) {
            (Some(id), _) => id.clone(),
            (None, true) => "no token selected".to_string(),
            (None, false) => "guest".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let state = SessionState::default();
        assert!(!state.has_tokens());
        assert_eq!(state.selected_token(), None);
        assert_eq!(state.display_name(), "guest");
    }

    #[test]
    fn test_selection_requires_tokens() {
        let state = SessionState::new(false, Some("main".to_string()));
        assert!(!state.has_tokens());
        assert_eq!(state.selected_token(), None);
    }

    #[test]
    fn test_selected() {
        let state = SessionState::new(true, Some("main".to_string()));
        assert_eq!(state.selected_token(), Some("main"));
        assert_eq!(state.display_name(), "main");
    }

    #[test]
    fn test_token_entry_optional_fields_default() {
        let entry: TokenEntry =
            serde_json::from_str(r#"{"id": "main", "name": "main", "token": "abc"}"#).unwrap();
        assert_eq!(entry, TokenEntry::new("main", "abc"));
        assert_eq!(entry.api, None);
    }

    #[test]
    fn test_tokens_without_selection() {
        let state = SessionState::new(true, None);
        assert!(state.has_tokens());
        assert_eq!(state.display_name(), "no token selected");
    }
}
