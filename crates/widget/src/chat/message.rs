use serde::{Deserialize, Serialize};

/// Provenance of one chat bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    /// Locally synthesized notices (errors, status), never produced by the assistant.
    System,
}

impl Sender {
    /// CSS class applied next to `message` on the rendered bubble.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::System => "system",
        }
    }
}

/// One chat message. Position in the history is the only ordering signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(text, Sender::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_text_sender_record() {
        let encoded = serde_json::to_string(&Message::user("Bonjour")).unwrap();
        assert_eq!(encoded, r#"{"text":"Bonjour","sender":"user"}"#);

        let decoded: Message = serde_json::from_str(r#"{"text":"Salut!","sender":"bot"}"#).unwrap();
        assert_eq!(decoded, Message::bot("Salut!"));
    }

    #[test]
    fn unknown_sender_is_rejected() {
        let decoded = serde_json::from_str::<Message>(r#"{"text":"x","sender":"admin"}"#);
        assert!(decoded.is_err());
    }
}
