use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Action value asking the widget to drop its local history.
pub const RESET_ACTION: &str = "reset";
/// Result status that the widget surfaces as a system message.
pub const ERROR_STATUS: &str = "error";

/// Body of `POST /api/chat/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub message: String,
}

impl SendRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of a backend-side action, reported next to the reply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some(ERROR_STATUS)
    }
}

/// Response of `POST /api/chat/send`. Every field is optional.
///
/// A field with an unexpected shape reads as absent instead of failing the
/// whole payload, so a usable reply survives a malformed `result`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendReply {
    #[serde(default, deserialize_with = "lenient")]
    pub reply: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub result: Option<ActionResult>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

impl SendReply {
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            ..Self::default()
        }
    }

    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            result: Some(ActionResult {
                status: Some(ERROR_STATUS.to_string()),
                message: Some(message.into()),
            }),
            ..Self::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Non-empty reply text, if any.
    pub fn reply_text(&self) -> Option<&str> {
        self.reply.as_deref().filter(|reply| !reply.is_empty())
    }

    pub fn requests_reset(&self) -> bool {
        self.action.as_deref() == Some(RESET_ACTION)
    }

    /// Error result reported by the backend, if the result status is `error`.
    pub fn error_result(&self) -> Option<&ActionResult> {
        self.result.as_ref().filter(|result| result.is_error())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_fields_decode_as_absent() {
        let reply: SendReply = serde_json::from_str("{}").unwrap();
        assert_eq!(reply, SendReply::default());
        assert!(reply.reply_text().is_none());
        assert!(!reply.requests_reset());
        assert!(reply.error_result().is_none());
    }

    #[test]
    fn decodes_full_payload() {
        let reply: SendReply = serde_json::from_str(
            r#"{"reply":"C'est fait.","action":"reset","result":{"status":"error","message":"quota exceeded"}}"#,
        )
        .unwrap();

        assert_eq!(reply.reply_text(), Some("C'est fait."));
        assert!(reply.requests_reset());
        assert_eq!(
            reply.error_result().and_then(|result| result.message.as_deref()),
            Some("quota exceeded")
        );
    }

    #[test]
    fn non_error_status_is_not_surfaced() {
        let reply: SendReply =
            serde_json::from_str(r#"{"result":{"status":"success","message":"ok"}}"#).unwrap();
        assert!(reply.error_result().is_none());
    }

    #[test]
    fn empty_reply_counts_as_absent() {
        let reply: SendReply = serde_json::from_str(r#"{"reply":""}"#).unwrap();
        assert!(reply.reply_text().is_none());
    }

    #[test]
    fn malformed_result_keeps_the_reply() {
        let null_status: SendReply = serde_json::from_str(
            r#"{"reply":"Salut!","action":null,"result":{"status":null,"message":"x"}}"#,
        )
        .unwrap();
        assert_eq!(null_status.reply_text(), Some("Salut!"));
        assert!(!null_status.requests_reset());
        assert!(null_status.error_result().is_none());

        let scalar_result: SendReply =
            serde_json::from_str(r#"{"reply":"Salut!","result":"ok"}"#).unwrap();
        assert_eq!(scalar_result, SendReply::with_reply("Salut!"));
    }

    #[test]
    fn error_without_readable_message_is_still_an_error() {
        let reply: SendReply =
            serde_json::from_str(r#"{"result":{"status":"error","message":42}}"#).unwrap();
        let result = reply.error_result().unwrap();
        assert_eq!(result.message, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let reply: SendReply =
            serde_json::from_str(r#"{"reply":"Salut!","debug":{"tokens":12}}"#).unwrap();
        assert_eq!(reply, SendReply::with_reply("Salut!"));
    }
}
