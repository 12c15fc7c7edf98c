use std::cell::{Cell, RefCell};
use std::rc::Rc;

use stp_client::{ChatBackend, SendReply};
use stp_storage::{KeyValueStore, StorageKeys, UserIdentity};

use super::events::{
    EventOutcome, PanelState, ResetOutcome, SUBMIT_KEY, SendOutcome, SendSkipReason, WidgetEvent,
};
use super::message::Message;
use super::render::MessageRenderer;
use super::session::SessionStore;
use super::view::WidgetView;
use crate::settings::WidgetLabels;

/// Chat widget state machine.
///
/// Handlers take `&self` and never hold a borrow across an `.await`, so the
/// host may dispatch other events (toggle) while a send is outstanding.
pub struct WidgetController {
    view: Rc<dyn WidgetView>,
    backend: Rc<dyn ChatBackend>,
    storage: Rc<dyn KeyValueStore>,
    keys: StorageKeys,
    session: RefCell<SessionStore>,
    renderer: MessageRenderer,
    labels: WidgetLabels,
    panel: Cell<PanelState>,
    send_in_flight: Cell<bool>,
}

impl WidgetController {
    pub fn new(
        identity: &UserIdentity,
        storage: Rc<dyn KeyValueStore>,
        backend: Rc<dyn ChatBackend>,
        view: Rc<dyn WidgetView>,
    ) -> Self {
        let keys = StorageKeys::for_user(identity);
        let session = SessionStore::open(storage.clone(), keys.history.clone());
        let labels = WidgetLabels::default();

        Self {
            view,
            backend,
            storage,
            keys,
            session: RefCell::new(session),
            renderer: MessageRenderer::new(labels.link_label.clone()),
            labels,
            panel: Cell::new(PanelState::Closed),
            send_in_flight: Cell::new(false),
        }
    }

    pub fn with_labels(mut self, labels: WidgetLabels) -> Self {
        self.renderer = MessageRenderer::new(labels.link_label.clone());
        self.labels = labels;
        self
    }

    pub fn labels(&self) -> &WidgetLabels {
        &self.labels
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel.get()
    }

    pub fn is_sending(&self) -> bool {
        self.send_in_flight.get()
    }

    /// Snapshot of the in-memory history.
    pub fn history(&self) -> Vec<Message> {
        self.session.borrow().messages().to_vec()
    }

    /// Restores the panel visibility and replays the stored history.
    ///
    /// With no history, the greeting bubble is shown instead; it is never persisted.
    pub fn initialize(&self) {
        let panel = self.read_open_state();
        self.panel.set(panel);
        self.view.set_panel_open(panel.is_open());

        let history = self.history();
        self.view.clear_messages();
        if history.is_empty() {
            self.show(&Message::bot(self.labels.greeting.clone()));
        } else {
            for message in &history {
                self.show(message);
            }
        }

        tracing::debug!(
            "chat widget initialized for '{}' with {} stored messages, panel {:?}",
            self.keys.history,
            history.len(),
            panel
        );
    }

    pub async fn handle(&self, event: WidgetEvent) -> EventOutcome {
        match event {
            WidgetEvent::ToggleClicked => EventOutcome::Panel(self.toggle()),
            WidgetEvent::SendClicked => EventOutcome::Send(self.send().await),
            WidgetEvent::InputKey { key } if key == SUBMIT_KEY => {
                EventOutcome::Send(self.send().await)
            }
            WidgetEvent::InputKey { .. } => EventOutcome::Ignored,
            WidgetEvent::ResetClicked => EventOutcome::Reset(self.reset().await),
        }
    }

    /// Flips the panel, persists the new state and focuses the input when opening.
    pub fn toggle(&self) -> PanelState {
        let next = self.panel.get().toggled();
        self.panel.set(next);
        self.view.set_panel_open(next.is_open());

        if let Err(error) = self.storage.set(&self.keys.open, next.as_stored()) {
            tracing::warn!("failed to persist panel state '{}': {}", self.keys.open, error);
        }

        if next.is_open() {
            self.view.focus_input();
        }
        next
    }

    /// Sends the trimmed input field content to the backend and renders the outcome.
    pub async fn send(&self) -> SendOutcome {
        let text = self.view.input_value().trim().to_string();
        if text.is_empty() {
            return SendOutcome::Skipped(SendSkipReason::EmptyInput);
        }

        let Some(_in_flight) = InFlightGuard::acquire(&self.send_in_flight) else {
            tracing::debug!("ignoring chat send while a previous request is in flight");
            return SendOutcome::Skipped(SendSkipReason::AlreadyInFlight);
        };

        self.append(Message::user(text.clone()));
        self.view.clear_input();
        self.view.set_typing_visible(true);

        let result = self.backend.send(&text).await;
        self.view.set_typing_visible(false);

        match result {
            Ok(reply) => self.apply_reply(&reply),
            Err(error) => {
                tracing::error!("chat send failed on `{}`: {}", error.stage(), error);
                self.append(Message::system(self.labels.connectivity_error.clone()));
                SendOutcome::Failed
            }
        }
    }

    /// Clears the local session after confirmation, then notifies the backend.
    ///
    /// The clear is optimistic: local history is gone even if the backend
    /// notification fails, which may leave the server context behind.
    pub async fn reset(&self) -> ResetOutcome {
        if !self.view.confirm(&self.labels.reset_confirm) {
            return ResetOutcome::Declined;
        }

        self.session.borrow_mut().clear();
        self.view.clear_messages();
        self.show(&Message::system(self.labels.reset_notice.clone()));

        let backend_notified = match self.backend.reset().await {
            Ok(()) => true,
            Err(error) => {
                tracing::error!("error resetting chat session: {error}");
                false
            }
        };

        ResetOutcome::Cleared { backend_notified }
    }

    fn apply_reply(&self, reply: &SendReply) -> SendOutcome {
        let reply_appended = match reply.reply_text() {
            Some(text) => {
                self.append(Message::bot(text));
                true
            }
            None => false,
        };

        let history_reset = reply.requests_reset();
        if history_reset {
            // The backend already dropped its context; bubbles stay on screen until reload.
            self.session.borrow_mut().clear();
            tracing::info!("backend requested a reset, cleared '{}'", self.keys.history);
        }

        let backend_error = match reply.error_result() {
            Some(result) => {
                let text = self.labels.backend_error(result.message.as_deref());
                self.append(Message::system(text));
                true
            }
            None => false,
        };

        SendOutcome::Delivered {
            reply_appended,
            history_reset,
            backend_error,
        }
    }

    fn append(&self, message: Message) {
        self.session.borrow_mut().append(message.clone());
        self.show(&message);
    }

    fn show(&self, message: &Message) {
        let rendered = self.renderer.render(message);
        self.view.append_message(&rendered);
        self.view.scroll_to_bottom();
    }

    fn read_open_state(&self) -> PanelState {
        match self.storage.get(&self.keys.open) {
            Ok(raw) => PanelState::from_stored(raw.as_deref()),
            Err(error) => {
                tracing::warn!("failed to read panel state '{}': {}", self.keys.open, error);
                PanelState::Closed
            }
        }
    }
}

/// Clears the in-flight flag when the send future completes or is dropped.
struct InFlightGuard<'a>(&'a Cell<bool>);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
