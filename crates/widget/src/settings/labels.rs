use serde::{Deserialize, Serialize};

use crate::chat::render::DEFAULT_LINK_LABEL;

/// User-facing strings of the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetLabels {
    pub title: String,
    /// Bubble shown when there is no history; never persisted.
    pub greeting: String,
    pub typing_indicator: String,
    pub input_placeholder: String,
    pub link_label: String,
    pub connectivity_error: String,
    /// Prepended to backend-reported error messages.
    pub error_prefix: String,
    /// Used when the backend reports an error without a message.
    pub unknown_error: String,
    pub reset_confirm: String,
    /// Render-only notice shown after a confirmed reset.
    pub reset_notice: String,
}

impl Default for WidgetLabels {
    fn default() -> Self {
        Self {
            title: "Assistant STP".to_string(),
            greeting: "Bonjour! Je suis votre assistant virtuel. Je peux vous aider à gérer vos clients, devis et fournisseurs.".to_string(),
            typing_indicator: "L'assistant réfléchit...".to_string(),
            input_placeholder: "Écrivez votre demande...".to_string(),
            link_label: DEFAULT_LINK_LABEL.to_string(),
            connectivity_error: "Erreur de communication avec le serveur.".to_string(),
            error_prefix: "Erreur: ".to_string(),
            unknown_error: "erreur inconnue".to_string(),
            reset_confirm: "Voulez-vous réinitialiser le chat et effacer l'historique ?".to_string(),
            reset_notice: "Historique effacé. Bonjour! Je suis prêt pour une nouvelle session.".to_string(),
        }
    }
}

impl WidgetLabels {
    pub fn backend_error(&self, message: Option<&str>) -> String {
        format!(
            "{}{}",
            self.error_prefix,
            message.unwrap_or(self.unknown_error.as_str())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_uses_prefix() {
        let labels = WidgetLabels::default();
        assert_eq!(labels.backend_error(Some("quota exceeded")), "Erreur: quota exceeded");
        assert_eq!(labels.backend_error(None), "Erreur: erreur inconnue");
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let labels: WidgetLabels =
            serde_json::from_str(r#"{"link_label":"[Open document]"}"#).unwrap();
        assert_eq!(labels.link_label, "[Open document]");
        assert_eq!(labels.error_prefix, "Erreur: ");
    }
}
