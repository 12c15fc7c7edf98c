mod error;
mod http;
mod protocol;

use futures::future::LocalBoxFuture;

pub use error::{ClientError, ClientResult};
pub use http::{HttpChatClient, RESET_PATH, SEND_PATH};
pub use protocol::{ActionResult, ERROR_STATUS, RESET_ACTION, SendReply, SendRequest};

/// The two calls the widget makes against its assistant backend.
///
/// Futures are local (not `Send`) so the same implementations run on the
/// browser's single-threaded executor and on a current-thread tokio runtime.
pub trait ChatBackend {
    /// Sends one user message; transport and decode failures come back as one error.
    fn send<'a>(&'a self, message: &'a str) -> LocalBoxFuture<'a, ClientResult<SendReply>>;

    /// Asks the backend to drop its conversation context.
    fn reset(&self) -> LocalBoxFuture<'_, ClientResult<()>>;
}
