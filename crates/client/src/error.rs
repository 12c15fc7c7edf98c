use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ClientError {
    #[snafu(display("invalid backend endpoint '{endpoint}': {details}"))]
    InvalidEndpoint {
        stage: &'static str,
        endpoint: String,
        details: String,
    },
    #[snafu(display("http client failed on `{stage}`, {source}"))]
    HttpClient {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("backend response on `{stage}` is not valid JSON (status {status}): {source}"))]
    DecodeResponse {
        stage: &'static str,
        status: u16,
        source: serde_json::Error,
    },
}

impl ClientError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint { stage, .. }
            | Self::HttpClient { stage, .. }
            | Self::DecodeResponse { stage, .. } => stage,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
