use stp_storage::UserIdentity;

/// Attribute on the embedding `<script>` tag carrying the signed-in user.
pub const USER_ID_ATTRIBUTE: &str = "data-user-id";
/// Optional attribute pointing the widget at another backend origin.
pub const ENDPOINT_ATTRIBUTE: &str = "data-endpoint";
pub const EMBED_SCRIPT_SELECTOR: &str = "script[data-user-id]";

/// What the hosting page declares about the widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    pub identity: UserIdentity,
    pub endpoint: String,
}

impl EmbedConfig {
    /// Resolves the declaration; without an endpoint the page's own origin is used.
    pub fn from_attributes(
        user_id: Option<&str>,
        endpoint: Option<&str>,
        page_origin: &str,
    ) -> Self {
        let endpoint = endpoint
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(page_origin);

        Self {
            identity: UserIdentity::from_declared(user_id),
            endpoint: endpoint.to_string(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl EmbedConfig {
    pub fn from_document(document: &web_sys::Document, page_origin: &str) -> Self {
        let script = document
            .query_selector(EMBED_SCRIPT_SELECTOR)
            .ok()
            .flatten();
        let user_id = script
            .as_ref()
            .and_then(|element| element.get_attribute(USER_ID_ATTRIBUTE));
        let endpoint = script
            .as_ref()
            .and_then(|element| element.get_attribute(ENDPOINT_ATTRIBUTE));

        Self::from_attributes(user_id.as_deref(), endpoint.as_deref(), page_origin)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_declaration_means_guest_on_page_origin() {
        let config = EmbedConfig::from_attributes(None, None, "https://crm.example.com");

        assert_eq!(config.identity, UserIdentity::guest());
        assert_eq!(config.endpoint, "https://crm.example.com");
    }

    #[test]
    fn declared_user_and_endpoint_are_used() {
        let config = EmbedConfig::from_attributes(
            Some("42"),
            Some(" https://api.example.com "),
            "https://crm.example.com",
        );

        assert_eq!(config.identity.as_str(), "42");
        assert_eq!(config.endpoint, "https://api.example.com");
    }

    #[test]
    fn blank_attributes_fall_back() {
        let config = EmbedConfig::from_attributes(Some("  "), Some(""), "http://localhost:5000");

        assert!(config.identity.is_guest());
        assert_eq!(config.endpoint, "http://localhost:5000");
    }
}
