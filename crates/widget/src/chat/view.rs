use super::render::RenderedMessage;

/// Display surface driven by the widget controller.
///
/// The browser binding maps these calls onto DOM nodes; the terminal host and
/// tests provide their own surfaces.
pub trait WidgetView {
    fn set_panel_open(&self, open: bool);
    fn focus_input(&self);
    /// Current content of the input field, untrimmed.
    fn input_value(&self) -> String;
    fn clear_input(&self);
    fn set_typing_visible(&self, visible: bool);
    /// Appends one bubble at the end of the message list.
    fn append_message(&self, message: &RenderedMessage);
    fn clear_messages(&self);
    fn scroll_to_bottom(&self);
    /// Blocking yes/no confirmation.
    fn confirm(&self, prompt: &str) -> bool;
}
