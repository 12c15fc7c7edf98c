use stp_widget::chat::escape_html;
use stp_widget::settings::WidgetLabels;

pub const CONTAINER_ID: &str = "chat-widget-container";
pub const TOGGLE_BUTTON_ID: &str = "chat-toggle-btn";
pub const CHAT_BOX_ID: &str = "chat-box";
pub const RESET_BUTTON_ID: &str = "chat-reset-btn";
pub const CLOSE_BUTTON_ID: &str = "chat-close-btn";
pub const MESSAGES_ID: &str = "chat-messages";
pub const TYPING_INDICATOR_ID: &str = "typing-indicator";
pub const INPUT_ID: &str = "chat-input";
pub const SEND_BUTTON_ID: &str = "chat-send-btn";

/// Class set on `#chat-box` while the panel is expanded.
pub const OPEN_CLASS: &str = "open";

/// Inner markup of `#chat-widget-container`.
///
/// The message list starts empty; the controller fills it with the greeting or
/// the restored history.
pub fn widget_markup(labels: &WidgetLabels) -> String {
    let title = escape_html(&labels.title);
    let typing = escape_html(&labels.typing_indicator);
    let placeholder = escape_html(&labels.input_placeholder);

    format!(
        r#"<button id="{TOGGLE_BUTTON_ID}"><i class="fas fa-robot fa-lg"></i></button>
<div id="{CHAT_BOX_ID}">
  <div class="chat-header">
    <div><i class="fas fa-robot me-1"></i><span style="font-weight: 600;">{title}</span></div>
    <div>
      <button type="button" id="{RESET_BUTTON_ID}" title="Nouvelle session"><i class="fas fa-trash-alt"></i></button>
      <button type="button" class="btn-close btn-close-white ms-2" id="{CLOSE_BUTTON_ID}" aria-label="Close"></button>
    </div>
  </div>
  <div class="chat-messages" id="{MESSAGES_ID}"></div>
  <div class="typing-indicator" id="{TYPING_INDICATOR_ID}" style="display: none;">{typing}</div>
  <div class="chat-input-area">
    <input type="text" id="{INPUT_ID}" placeholder="{placeholder}" autocomplete="off">
    <button id="{SEND_BUTTON_ID}"><i class="fas fa-paper-plane"></i></button>
  </div>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_exposes_every_control_id() {
        let markup = widget_markup(&WidgetLabels::default());

        for id in [
            TOGGLE_BUTTON_ID,
            CHAT_BOX_ID,
            RESET_BUTTON_ID,
            CLOSE_BUTTON_ID,
            MESSAGES_ID,
            TYPING_INDICATOR_ID,
            INPUT_ID,
            SEND_BUTTON_ID,
        ] {
            assert!(markup.contains(&format!(r#"id="{id}""#)), "missing #{id}");
        }
        assert!(markup.contains("Assistant STP"));
        assert!(markup.contains(r#"placeholder="Écrivez votre demande...""#));
    }

    #[test]
    fn labels_are_escaped() {
        let labels = WidgetLabels {
            title: "<b>STP</b>".to_string(),
            ..WidgetLabels::default()
        };

        let markup = widget_markup(&labels);

        assert!(markup.contains("&lt;b&gt;STP&lt;/b&gt;"));
        assert!(!markup.contains("<b>STP</b>"));
    }
}
