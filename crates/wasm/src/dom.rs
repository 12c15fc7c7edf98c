use stp_widget::chat::{RenderedMessage, WidgetView};
use stp_widget::settings::WidgetLabels;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

use crate::markup::{
    CHAT_BOX_ID, CONTAINER_ID, INPUT_ID, MESSAGES_ID, OPEN_CLASS, TYPING_INDICATOR_ID,
    widget_markup,
};

/// The injected widget panel.
pub struct DomView {
    window: Window,
    document: Document,
    chat_box: Element,
    messages: Element,
    typing_indicator: HtmlElement,
    input: HtmlInputElement,
}

impl DomView {
    /// Appends `#chat-widget-container` to the body and resolves its controls.
    pub fn mount(window: &Window, document: &Document, labels: &WidgetLabels) -> Result<Self, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let container = document.create_element("div")?;
        container.set_id(CONTAINER_ID);
        container.set_inner_html(&widget_markup(labels));
        body.append_child(&container)?;

        Ok(Self {
            window: window.clone(),
            document: document.clone(),
            chat_box: element_by_id(document, CHAT_BOX_ID)?,
            messages: element_by_id(document, MESSAGES_ID)?,
            typing_indicator: element_by_id(document, TYPING_INDICATOR_ID)?
                .dyn_into::<HtmlElement>()
                .map_err(|_| JsValue::from_str("typing indicator is not an HTML element"))?,
            input: element_by_id(document, INPUT_ID)?
                .dyn_into::<HtmlInputElement>()
                .map_err(|_| JsValue::from_str("chat input is not an input element"))?,
        })
    }

    pub fn control(&self, id: &str) -> Result<Element, JsValue> {
        element_by_id(&self.document, id)
    }

    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }
}

fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{id} is missing from the widget markup")))
}

impl WidgetView for DomView {
    fn set_panel_open(&self, open: bool) {
        let _ = self.chat_box.class_list().toggle_with_force(OPEN_CLASS, open);
    }

    fn focus_input(&self) {
        let _ = self.input.focus();
    }

    fn input_value(&self) -> String {
        self.input.value()
    }

    fn clear_input(&self) {
        self.input.set_value("");
    }

    fn set_typing_visible(&self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        let _ = self.typing_indicator.style().set_property("display", display);
    }

    fn append_message(&self, message: &RenderedMessage) {
        let bubble = match self.document.create_element("div") {
            Ok(bubble) => bubble,
            Err(error) => {
                tracing::warn!("failed to create message element: {error:?}");
                return;
            }
        };
        bubble.set_class_name(&message.class_name());
        // Only the renderer's escaped output is injected as markup.
        bubble.set_inner_html(&message.to_html());
        if let Err(error) = self.messages.append_child(&bubble) {
            tracing::warn!("failed to append message element: {error:?}");
        }
    }

    fn clear_messages(&self) {
        self.messages.set_inner_html("");
    }

    fn scroll_to_bottom(&self) {
        self.messages.set_scroll_top(self.messages.scroll_height());
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.window.confirm_with_message(prompt).unwrap_or(false)
    }
}
