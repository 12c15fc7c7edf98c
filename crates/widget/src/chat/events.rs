/// Stored value meaning "panel expanded".
pub const OPEN_STATE_TRUE: &str = "true";
/// Stored value meaning "panel collapsed".
pub const OPEN_STATE_FALSE: &str = "false";

/// Key that submits the input field.
pub const SUBMIT_KEY: &str = "Enter";

/// Visibility of the chat panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

impl PanelState {
    /// Restores the state from its persisted text; anything but `"true"` is closed.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some(OPEN_STATE_TRUE) => Self::Open,
            _ => Self::Closed,
        }
    }

    pub fn as_stored(&self) -> &'static str {
        match self {
            Self::Open => OPEN_STATE_TRUE,
            Self::Closed => OPEN_STATE_FALSE,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

/// UI events dispatched to the widget controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Toggle button or close button.
    ToggleClicked,
    SendClicked,
    /// Key pressed inside the input field; only [`SUBMIT_KEY`] sends.
    InputKey { key: String },
    ResetClicked,
}

/// Why a send request did not reach the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendSkipReason {
    EmptyInput,
    /// A previous send is still awaiting its response.
    AlreadyInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendOutcome {
    Skipped(SendSkipReason),
    Delivered {
        reply_appended: bool,
        history_reset: bool,
        backend_error: bool,
    },
    /// Transport or decode failure; the connectivity notice was shown.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetOutcome {
    Declined,
    Cleared { backend_notified: bool },
}

/// What handling one [`WidgetEvent`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventOutcome {
    Panel(PanelState),
    Send(SendOutcome),
    Reset(ResetOutcome),
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_literal_true_restores_open() {
        assert_eq!(PanelState::from_stored(Some("true")), PanelState::Open);
        assert_eq!(PanelState::from_stored(Some("false")), PanelState::Closed);
        assert_eq!(PanelState::from_stored(Some("TRUE")), PanelState::Closed);
        assert_eq!(PanelState::from_stored(None), PanelState::Closed);
    }

    #[test]
    fn toggling_twice_is_identity() {
        for state in [PanelState::Open, PanelState::Closed] {
            assert_eq!(state.toggled().toggled(), state);
            assert_ne!(state.toggled(), state);
        }
    }

    #[test]
    fn stored_form_roundtrips() {
        for state in [PanelState::Open, PanelState::Closed] {
            assert_eq!(PanelState::from_stored(Some(state.as_stored())), state);
        }
    }
}
