use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    #[snafu(display("storage backend '{backend}' is unavailable: {details}"))]
    Unavailable {
        stage: &'static str,
        backend: &'static str,
        details: String,
    },
    #[snafu(display("storage backend '{backend}' failed on `{stage}`: {source}"))]
    Backend {
        stage: &'static str,
        backend: &'static str,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl StorageError {
    /// Builds an `Unavailable` error for adapters whose native errors are not `Send`
    /// (browser storage reports `JsValue`s).
    pub fn unavailable(
        stage: &'static str,
        backend: &'static str,
        details: impl Into<String>,
    ) -> Self {
        Self::Unavailable {
            stage,
            backend,
            details: details.into(),
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::Unavailable { stage, .. } | Self::Backend { stage, .. } => stage,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
