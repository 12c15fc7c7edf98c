use std::rc::Rc;

use stp_client::HttpChatClient;
use stp_storage::{KeyValueStore, MemoryStore};
use stp_widget::chat::{WidgetController, WidgetEvent, WidgetView};
use stp_widget::settings::WidgetLabels;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, EventTarget, KeyboardEvent, Window};

use crate::LocalStorageStore;
use crate::dom::DomView;
use crate::embed::EmbedConfig;
use crate::markup::{CLOSE_BUTTON_ID, RESET_BUTTON_ID, SEND_BUTTON_ID, TOGGLE_BUTTON_ID};

/// Builds the controller over browser collaborators and wires the panel events.
pub fn mount_chat_widget(window: &Window, document: &Document) -> Result<(), JsValue> {
    let origin = window.location().origin()?;
    let config = EmbedConfig::from_document(document, &origin);
    let labels = WidgetLabels::default();

    let storage: Rc<dyn KeyValueStore> = match LocalStorageStore::from_window(window) {
        Ok(storage) => Rc::new(storage),
        Err(error) => {
            tracing::warn!("{error}; chat history will not survive a reload");
            Rc::new(MemoryStore::new())
        }
    };
    let backend = HttpChatClient::new(config.endpoint.clone())
        .map_err(|error| JsValue::from_str(&error.to_string()))?;

    let view = Rc::new(DomView::mount(window, document, &labels)?);
    let controller = Rc::new(
        WidgetController::new(
            &config.identity,
            storage,
            Rc::new(backend),
            view.clone() as Rc<dyn WidgetView>,
        )
        .with_labels(labels),
    );
    controller.initialize();

    let click = |_: &Event| Some(WidgetEvent::ToggleClicked);
    dispatch_on(&view.control(TOGGLE_BUTTON_ID)?, "click", &controller, click)?;
    dispatch_on(&view.control(CLOSE_BUTTON_ID)?, "click", &controller, click)?;
    dispatch_on(&view.control(SEND_BUTTON_ID)?, "click", &controller, |_| {
        Some(WidgetEvent::SendClicked)
    })?;
    dispatch_on(&view.control(RESET_BUTTON_ID)?, "click", &controller, |_| {
        Some(WidgetEvent::ResetClicked)
    })?;
    dispatch_on(view.input(), "keypress", &controller, |event| {
        event
            .dyn_ref::<KeyboardEvent>()
            .map(|keyboard| WidgetEvent::InputKey { key: keyboard.key() })
    })?;

    tracing::info!(
        "chat widget mounted for '{}' against {}",
        config.identity,
        config.endpoint
    );
    Ok(())
}

/// Forwards a DOM event to the controller on the browser's local executor.
///
/// The listener lives as long as the page, so the closure is leaked on purpose.
fn dispatch_on<F>(
    target: &EventTarget,
    event_type: &str,
    controller: &Rc<WidgetController>,
    to_widget_event: F,
) -> Result<(), JsValue>
where
    F: Fn(&Event) -> Option<WidgetEvent> + 'static,
{
    let controller = controller.clone();
    let listener = Closure::wrap(Box::new(move |event: Event| {
        let Some(widget_event) = to_widget_event(&event) else {
            return;
        };
        let controller = controller.clone();
        spawn_local(async move {
            let outcome = controller.handle(widget_event).await;
            tracing::debug!("widget event handled: {outcome:?}");
        });
    }) as Box<dyn FnMut(Event)>);

    target.add_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}
