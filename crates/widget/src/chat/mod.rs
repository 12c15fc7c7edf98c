pub mod controller;
/// Event and outcome contracts between hosts and the controller.
pub mod events;
/// Persisted message model.
pub mod message;
pub mod render;
pub mod session;
pub mod view;

pub use controller::WidgetController;
pub use events::{
    EventOutcome, PanelState, ResetOutcome, SUBMIT_KEY, SendOutcome, SendSkipReason, WidgetEvent,
};
pub use message::{Message, Sender};
pub use render::{DEFAULT_LINK_LABEL, Fragment, MessageRenderer, RenderedMessage, escape_html};
pub use session::{HISTORY_CAPACITY, SessionStore};
pub use view::WidgetView;
