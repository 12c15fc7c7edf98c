use std::fmt;

/// Identity used when the embedding page does not declare one.
pub const GUEST_USER_ID: &str = "guest";

const HISTORY_KEY_PREFIX: &str = "stpChatHistory_";
const OPEN_KEY_PREFIX: &str = "stpChatOpen_";

/// User identity declared by the hosting page.
///
/// All anonymous visitors share the guest bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserIdentity(String);

impl UserIdentity {
    pub fn guest() -> Self {
        Self(GUEST_USER_ID.to_string())
    }

    /// Resolves the identity from the raw embedding attribute; blank values fall back to guest.
    pub fn from_declared(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Self(value.to_string()),
            _ => Self::guest(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_guest(&self) -> bool {
        self.0 == GUEST_USER_ID
    }
}

impl Default for UserIdentity {
    fn default() -> Self {
        Self::guest()
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// The two independent keys persisted per identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub history: String,
    pub open: String,
}

impl StorageKeys {
    pub fn for_user(identity: &UserIdentity) -> Self {
        Self {
            history: format!("{HISTORY_KEY_PREFIX}{identity}"),
            open: format!("{OPEN_KEY_PREFIX}{identity}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_declaration_falls_back_to_guest() {
        assert!(UserIdentity::from_declared(None).is_guest());
        assert!(UserIdentity::from_declared(Some("   ")).is_guest());
        assert_eq!(UserIdentity::from_declared(Some(" 42 ")).as_str(), "42");
    }

    #[test]
    fn keys_are_scoped_per_identity() {
        let keys = StorageKeys::for_user(&UserIdentity::from_declared(Some("7")));
        assert_eq!(keys.history, "stpChatHistory_7");
        assert_eq!(keys.open, "stpChatOpen_7");

        let guest = StorageKeys::for_user(&UserIdentity::guest());
        assert_eq!(guest.history, "stpChatHistory_guest");
        assert_ne!(guest.history, keys.history);
    }
}
